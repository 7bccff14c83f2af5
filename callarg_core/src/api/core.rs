use std::env;
use std::path::Path;

use crate::api::{ScriptInfo, Target};
use crate::parser::{ConfigError, ConsoleInterface, Dispatcher, Printer, UserInterface};

/// The entry point: a program name, its target, and the script information.
///
/// ### Example
/// ```
/// # use callarg_core as callarg;
/// use callarg::{Function, Script, Signature};
///
/// let sum = Function::new("sum", Signature::new().variadic(), |arguments| {
///     Ok(arguments.extra().len() as i32)
/// });
///
/// let dispatcher = Script::new("sum", sum)
///     .title("Sum")
///     .version("1.0")
///     .build();
///
/// assert_eq!(dispatcher.run_tokens(&["1", "2", "3"]), 3);
/// ```
pub struct Script<'a> {
    program: String,
    target: Target<'a>,
    info: ScriptInfo,
    width: Option<usize>,
}

impl<'a> Script<'a> {
    /// Create a script for the target (a [`Function`](crate::Function) or a [`Class`](crate::Class)).
    pub fn new(program: impl Into<String>, target: impl Into<Target<'a>>) -> Self {
        Self {
            program: program.into(),
            target: target.into(),
            info: ScriptInfo::default(),
            width: None,
        }
    }

    /// Set the title shown by `--version`.
    /// Setting a title (or a version) enables the `-V, --version` option.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.info.title.replace(title.into());
        self
    }

    /// Set the version shown by `--version`.
    /// Setting a version (or a title) enables the `-V, --version` option.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.info.version.replace(version.into());
        self
    }

    /// Set the copyright line shown by `--version`.
    pub fn copyright(mut self, copyright: impl Into<String>) -> Self {
        self.info.copyright.replace(copyright.into());
        self
    }

    /// Set the license paragraph shown by `--version`.
    pub fn license(mut self, license: impl Into<String>) -> Self {
        self.info.license.replace(license.into());
        self
    }

    /// Fix the width of the help message, rather than fitting it to the terminal.
    ///
    /// ### Example
    /// ```
    /// # use callarg_core as callarg;
    /// use callarg::{Function, Script, Signature};
    ///
    /// let noop = Function::new("noop", Signature::new(), |_| Ok(0));
    /// let dispatcher = Script::new("noop", noop).width(40).build();
    /// ```
    pub fn width(mut self, width: usize) -> Self {
        self.width.replace(width);
        self
    }

    pub(crate) fn build_with_interface(
        self,
        user_interface: Box<dyn UserInterface>,
    ) -> Result<Dispatcher<'a>, ConfigError> {
        let Script {
            program,
            target,
            info,
            width,
        } = self;
        let printer = match width {
            Some(width) => Printer::new(program, width),
            None => Printer::terminal(program),
        };

        Dispatcher::new(target, info, printer, user_interface)
    }

    /// Build the dispatcher as a Result.
    /// This derives the specification of the target (and of each of its commands), checking for errors (ex: a repeated parameter name).
    pub fn build_parser(self) -> Result<Dispatcher<'a>, ConfigError> {
        self.build_with_interface(Box::new(ConsoleInterface::default()))
    }

    /// Build the dispatcher.
    /// This derives the specification of the target (and of each of its commands), checking for errors (ex: a repeated parameter name).
    /// If an error is encountered, exits with error code `1` (via [`std::process::exit`]).
    pub fn build(self) -> Dispatcher<'a> {
        match self.build_parser() {
            Ok(dispatcher) => dispatcher,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
    }
}

/// Build a dispatcher for the target and run it once against `tokens`.
///
/// The program name is taken from the first of the process arguments ([`env::args`]).
///
/// ### Example
/// ```
/// # use callarg_core as callarg;
/// use callarg::{dispatch, Function, Signature};
///
/// let add = Function::new("add", Signature::new().required("a").required("b"), |arguments| {
///     let a: String = arguments.get("a")?;
///     let b: String = arguments.get("b")?;
///     Ok((a.len() + b.len()) as i32)
/// });
///
/// assert_eq!(dispatch(add, &["abc", "de"]), Ok(5));
/// ```
pub fn dispatch<'a>(target: impl Into<Target<'a>>, tokens: &[&str]) -> Result<i32, ConfigError> {
    let dispatcher = Script::new(program_name(), target).build_parser()?;
    Ok(dispatcher.run_tokens(tokens))
}

fn program_name() -> String {
    env::args()
        .next()
        .as_deref()
        .and_then(|argument| Path::new(argument).file_name())
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| "program".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{CallError, Class, Function, Method, Signature};
    use crate::constant::*;
    use crate::parser::util::channel_interface;
    use crate::test::assert_contains;
    use std::cell::Cell;

    #[test]
    fn script_info() {
        let function = Function::new("noop", Signature::new(), |_| Ok(0));
        let script = Script::new("program", function)
            .title("--this will get discarded--")
            .title("Noop")
            .version("0.1")
            .copyright("Copyright 2024.")
            .license("MIT")
            .width(50);

        assert_eq!(
            script.info,
            ScriptInfo {
                title: Some("Noop".to_string()),
                version: Some("0.1".to_string()),
                copyright: Some("Copyright 2024.".to_string()),
                license: Some("MIT".to_string()),
            }
        );
        assert_eq!(script.width, Some(50));
    }

    #[test]
    fn build_version() {
        let function = Function::new("noop", Signature::new(), |_| Ok(0));
        let (sender, receiver) = channel_interface();
        let dispatcher = Script::new("program", function)
            .version("0.1")
            .copyright("Copyright 2024.")
            .width(50)
            .build_with_interface(Box::new(sender))
            .unwrap();

        assert_eq!(dispatcher.run_tokens(&["--version"]), EX_USAGE);
        drop(dispatcher);

        assert_eq!(receiver.consume_message(), "program 0.1\nCopyright 2024.");
    }

    #[test]
    fn build_help_width() {
        let function = Function::new("noop", Signature::new(), |_| Ok(0))
            .doc("A summary which goes well beyond the width of forty characters.");
        let (sender, receiver) = channel_interface();
        let dispatcher = Script::new("program", function)
            .width(40)
            .build_with_interface(Box::new(sender))
            .unwrap();

        assert_eq!(dispatcher.run_tokens(&["-h"]), EX_USAGE);
        drop(dispatcher);

        let message = receiver.consume_message();
        assert_contains!(message, "A summary which goes well beyond the\nwidth of forty characters.\n");
    }

    #[test]
    fn build_parser_error() {
        let function = Function::new("broken", Signature::new().keyword("help", false), |_| Ok(0));

        assert_matches!(
            Script::new("program", function).build_parser().err(),
            Some(ConfigError::InvalidTarget { .. })
        );
    }

    #[test]
    fn repeated_runs() {
        let count = Cell::new(0);
        let class = Class::new("Counter", Signature::new(), |_| Ok(()))
            .command(Method::new("tick", Signature::new(), |_: &mut (), _| {
                count.set(count.get() + 1);
                Ok(count.get())
            }));
        let (sender, receiver) = channel_interface();
        let dispatcher = Script::new("program", class)
            .build_with_interface(Box::new(sender))
            .unwrap();

        assert_eq!(dispatcher.run_tokens(&["tick"]), 1);
        assert_eq!(dispatcher.run_tokens(&["tick"]), 2);
        assert_eq!(dispatcher.run_tokens(&["tock"]), EX_USAGE);
        drop(dispatcher);
        receiver.consume();
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn dispatch_function() {
        let function = Function::new("len", Signature::new().required("word"), |arguments| {
            let word: String = arguments.get("word")?;
            Ok(word.len() as i32)
        });
        assert_eq!(dispatch(function, &["four"]), Ok(4));

        let function = Function::new("fail", Signature::new(), |_| Err(CallError::new("no")));
        assert_eq!(dispatch(function, &["extra"]), Ok(EX_USAGE));
    }

    #[test]
    fn dispatch_error() {
        let function = Function::new("broken", Signature::new().required("a").required("a"), |_| {
            Ok(0)
        });
        assert_matches!(
            dispatch(function, &[]),
            Err(ConfigError::InvalidTarget { .. })
        );
    }

    #[test]
    fn program() {
        assert!(!program_name().is_empty());
        assert!(!program_name().contains('/'));
    }
}
