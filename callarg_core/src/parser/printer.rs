use std::env;
use terminal_size::{terminal_size, Width};

use crate::api::{Cast, ScriptInfo};
use crate::constant::*;
use crate::parser::base::{display_name, Specification};
use crate::parser::interface::{wrap, ColumnRenderer, TotalWidth, UserInterface};

const FALLBACK_WIDTH: usize = 79;
const MAIN_INDENT: usize = 1;
const PADDING_WIDTH: usize = 2;

pub(crate) struct Printer {
    program: String,
    width: usize,
}

impl Printer {
    pub(crate) fn new(program: impl Into<String>, width: usize) -> Self {
        Self {
            program: program.into(),
            width,
        }
    }

    /// Use the width of the current terminal, else `$COLUMNS`, else 79.
    pub(crate) fn terminal(program: impl Into<String>) -> Self {
        let width = if let Some((Width(terminal_width), _)) = terminal_size() {
            (terminal_width as usize).saturating_sub(1)
        } else {
            match env::var("COLUMNS").ok().and_then(|c| c.parse::<usize>().ok()) {
                Some(columns) => columns.saturating_sub(1),
                None => FALLBACK_WIDTH,
            }
        };

        Self::new(program, width)
    }

    /// Print the help message for the chain of specifications (top level first).
    pub(crate) fn print_help(
        &self,
        chain: &[&Specification],
        user_interface: &(impl UserInterface + ?Sized),
    ) {
        let print_wrapped = |text: &str| {
            for line in wrap(text, self.width) {
                user_interface.print(line);
            }
        };

        if let Some(summary) = chain.first().and_then(|top| top.summary()) {
            print_wrapped(summary);
        }

        user_interface.print(self.usage(chain));

        for (i, specification) in chain.iter().enumerate() {
            let last = i + 1 == chain.len();

            if !specification.is_top() {
                user_interface.print("".to_string());
                user_interface.print(format!("Command: {}", specification.name()));

                if let Some(summary) = specification.summary() {
                    print_wrapped(summary);
                }
            }

            self.print_options(specification, user_interface);
            self.print_arguments(specification, user_interface);

            if specification.is_class() && last {
                user_interface.print("".to_string());
                user_interface.print("COMMAND may be one of:".to_string());
                user_interface.print("".to_string());
                let commands = specification.commands();
                let left = commands
                    .iter()
                    .map(|(name, _)| name.chars().count())
                    .max()
                    .unwrap_or(0);
                let column_renderer =
                    ColumnRenderer::guided(MAIN_INDENT, left, PADDING_WIDTH, TotalWidth(self.width));

                for (name, summary) in commands {
                    for line in column_renderer.render(name, summary) {
                        user_interface.print(line);
                    }
                }

                user_interface.print("".to_string());
                print_wrapped(COMMAND_HINT);
            }

            if let Some(description) = specification.description() {
                user_interface.print("".to_string());
                print_wrapped(description);
            }
        }

        user_interface.print("".to_string());
    }

    fn usage(&self, chain: &[&Specification]) -> String {
        let mut summary = vec![format!("Usage: {}", self.program)];

        for (i, specification) in chain.iter().enumerate() {
            if !specification.is_top() {
                summary.push(specification.name().to_string());
            }

            summary.push(if specification.is_top() { "[OPTIONS]" } else { "[CMDOPTS]" }.to_string());

            if specification.accepts_extra_keyword() {
                summary.push("[--name=value...]".to_string());
            }

            for name in specification.positional() {
                summary.push(format!("<{}>", display_name(name)));
            }

            if specification.accepts_extra_positional() {
                summary.push("[value...]".to_string());
            }

            if specification.is_class() && i + 1 == chain.len() {
                summary.push("<COMMAND> ...".to_string());
            }
        }

        summary.join(" ")
    }

    fn print_options(
        &self,
        specification: &Specification,
        user_interface: &(impl UserInterface + ?Sized),
    ) {
        let heading = if specification.is_top() {
            "OPTIONS"
        } else {
            "CMDOPTS"
        };
        let mut options: Vec<(String, String)> = specification
            .keyword()
            .iter()
            .map(|(name, default)| {
                let toggle = specification
                    .cast(name)
                    .map(Cast::is_toggle)
                    .unwrap_or(false);
                let long = display_name(name);
                let flags = match (specification.short(name), toggle) {
                    (Some(short), true) => format!("-{short}, --{long}"),
                    (Some(short), false) => format!("-{short}, --{long}=VAL"),
                    (None, true) => format!("--{long}"),
                    (None, false) => format!("--{long}=VAL"),
                };
                let description = match specification.parameter_description(name) {
                    Some(description) => description.to_string(),
                    None if toggle => format!("Toggle this value.\nDefault: {default}"),
                    None => format!("Override this value.\nDefault: {default}"),
                };
                (flags, description)
            })
            .collect();
        options.sort();

        user_interface.print("".to_string());
        user_interface.print(format!("{heading} may be one or more of:"));
        user_interface.print("".to_string());
        self.print_table(&options, user_interface);
    }

    fn print_arguments(
        &self,
        specification: &Specification,
        user_interface: &(impl UserInterface + ?Sized),
    ) {
        let arguments: Vec<(String, String)> = specification
            .positional()
            .iter()
            .filter_map(|name| {
                specification
                    .parameter_description(name)
                    .map(|description| (format!("<{}>", display_name(name)), description.to_string()))
            })
            .collect();

        if !arguments.is_empty() {
            user_interface.print("".to_string());
            user_interface.print("ARGUMENTS:".to_string());
            user_interface.print("".to_string());
            self.print_table(&arguments, user_interface);
        }
    }

    fn print_table(
        &self,
        rows: &[(String, String)],
        user_interface: &(impl UserInterface + ?Sized),
    ) {
        let left = rows
            .iter()
            .map(|(left, _)| left.chars().count())
            .max()
            .unwrap_or(0);
        let column_renderer =
            ColumnRenderer::guided(MAIN_INDENT, left, PADDING_WIDTH, TotalWidth(self.width));

        for (left, middle) in rows {
            for line in column_renderer.render(left, middle) {
                user_interface.print(line);
            }
        }
    }

    /// Print the version banner: `program (title) version`, then the copyright and license.
    pub(crate) fn print_version(
        &self,
        info: &ScriptInfo,
        user_interface: &(impl UserInterface + ?Sized),
    ) {
        let mut banner = self.program.clone();

        if let Some(title) = &info.title {
            banner.push_str(&format!(" ({title})"));
        }

        if let Some(version) = &info.version {
            banner.push(' ');
            banner.push_str(version);
        }

        user_interface.print(banner);

        if let Some(copyright) = &info.copyright {
            for line in wrap(copyright, self.width) {
                user_interface.print(line);
            }
        }

        if let Some(license) = &info.license {
            user_interface.print("".to_string());

            for line in wrap(license, self.width) {
                user_interface.print(line);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Class, Function, Instantiable, Metadata, Method, Signature};
    use crate::parser::util::channel_interface;
    use crate::parser::Level;
    use crate::test::assert_contains;

    fn help(chain: &[&Specification], width: usize) -> String {
        let (sender, receiver) = channel_interface();
        Printer::new("program", width).print_help(chain, &sender);
        drop(sender);
        receiver.consume_message()
    }

    #[test]
    fn help_function() {
        let function = Function::new(
            "copy",
            Signature::new()
                .required("source")
                .required("target_file")
                .keyword("verbose", false)
                .keyword("retries", 3)
                .variadic(),
            |_| Ok(0),
        )
        .doc("Copy things.\n\nCopies the source to the target.")
        .metadata(Metadata::new().describe("source", "Where from."));
        let specification =
            Specification::build(&function.shape, None, Level::Top { versioned: false }).unwrap();

        let message = help(&[&specification], 79);
        assert_eq!(
            message,
            r#"Copy things.
Usage: program [OPTIONS] <source> <target-file> [value...]

OPTIONS may be one or more of:

 -h, --help         Display this help and exit.
 -r, --retries=VAL  Override this value.
                    Default: 3
 -v, --verbose      Toggle this value.
                    Default: false

ARGUMENTS:

 <source>  Where from.

Copies the source to the target.
"#
        );
    }

    #[test]
    fn help_version_keywords() {
        let function = Function::new(
            "f",
            Signature::new().keyword("name", "world").variadic_keywords(),
            |_| Ok(0),
        );
        let specification =
            Specification::build(&function.shape, None, Level::Top { versioned: true }).unwrap();

        let message = help(&[&specification], 79);
        assert_contains!(message, "Usage: program [OPTIONS] [--name=value...]\n");
        assert_contains!(message, " -n, --name=VAL  Override this value.\n");
        assert_contains!(message, "Default: \"world\"\n");
        assert_contains!(message, " -V, --version   Show version and copyright information, then exit.\n");
    }

    #[test]
    fn help_class_chain() {
        let class = Class::new("Bar", Signature::new().required("argument"), |_| Ok(()))
            .doc("A bar.")
            .command(
                Method::new("foo", Signature::new().keyword("loud", false), |_: &mut (), _| Ok(0))
                    .doc("Foo the bar.\n\nAt length."),
            )
            .command(Method::new("baz", Signature::new(), |_: &mut (), _| Ok(0)));
        let top = Specification::build(
            &class.shape,
            Some(class.commands()),
            Level::Top { versioned: false },
        )
        .unwrap();

        let message = help(&[&top], 79);
        assert_contains!(message, "A bar.\nUsage: program [OPTIONS] <argument> <COMMAND> ...\n");
        assert_contains!(
            message,
            "COMMAND may be one of:\n\n baz  Undocumented command.\n foo  Foo the bar.\n\n"
        );
        assert_contains!(message, COMMAND_HINT);

        let foo = class
            .commands()
            .into_iter()
            .find(|shape| shape.name == "foo")
            .unwrap();
        let command = Specification::build(foo, None, Level::Command).unwrap();
        let message = help(&[&top, &command], 79);
        assert_contains!(
            message,
            "Usage: program [OPTIONS] <argument> foo [CMDOPTS]\n"
        );
        assert_contains!(message, "\nCommand: foo\nFoo the bar.\n");
        assert_contains!(message, "CMDOPTS may be one or more of:");
        assert_contains!(message, " -l, --loud  Toggle this value.");
        assert!(!message.contains("COMMAND may be one of:"));
        assert!(message.ends_with("At length.\n"), "{message}");
    }

    #[test]
    fn help_narrow() {
        let function = Function::new("f", Signature::new().keyword("value", 0), |_| Ok(0))
            .doc("A summary which is rather long for such a narrow terminal.")
            .metadata(Metadata::new().describe("value", "The value to use for the computation."));
        let specification =
            Specification::build(&function.shape, None, Level::Top { versioned: false }).unwrap();

        let message = help(&[&specification], 30);
        assert!(
            message.starts_with("A summary which is rather long\nfor such a narrow terminal.\nUsage:"),
            "{message}"
        );
        // The middle column never shrinks below its minimum.
        assert_contains!(message, " -v, --value=VAL  The value to use\n");
        assert_contains!(message, "\n                  for the\n");
    }

    #[test]
    fn version() {
        let (sender, receiver) = channel_interface();
        let info = ScriptInfo {
            title: Some("Naval Fate".to_string()),
            version: Some("2.0".to_string()),
            copyright: Some("Copyright 2024 Somebody.".to_string()),
            license: Some("MIT".to_string()),
        };
        Printer::new("naval", 79).print_version(&info, &sender);
        drop(sender);

        assert_eq!(
            receiver.consume_message(),
            "naval (Naval Fate) 2.0\nCopyright 2024 Somebody.\n\nMIT"
        );
    }

    #[test]
    fn version_partial() {
        let (sender, receiver) = channel_interface();
        let info = ScriptInfo {
            version: Some("2.0".to_string()),
            ..ScriptInfo::default()
        };
        Printer::new("naval", 79).print_version(&info, &sender);
        drop(sender);

        assert_eq!(receiver.consume_message(), "naval 2.0");
    }
}
