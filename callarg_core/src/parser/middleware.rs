use std::collections::BTreeMap;
use std::env;

use crate::api::{CallError, Function, Instantiable, ScriptInfo, Target, TargetInner};
use crate::constant::*;
use crate::matcher::{consume, expand, is_option_like, Binding, Expansion, OffsetValue};
use crate::parser::base::*;
use crate::parser::interface::UserInterface;
use crate::parser::printer::Printer;
use crate::parser::ErrorContext;

#[cfg(feature = "tracing_debug")]
use tracing::{debug, error};

/// The specification of one level, and those of its commands (when the level is a class).
struct Node {
    specification: Specification,
    commands: BTreeMap<String, Node>,
}

impl Node {
    fn function(function: &Function, level: Level) -> Result<Self, ConfigError> {
        Ok(Self {
            specification: Specification::build(&function.shape, None, level)?,
            commands: BTreeMap::default(),
        })
    }

    fn class(class: &dyn Instantiable, level: Level) -> Result<Self, ConfigError> {
        let specification = Specification::build(class.shape(), Some(class.commands()), level)?;
        let commands = class
            .commands()
            .into_iter()
            .map(|shape| {
                let node = match class.group(&shape.name) {
                    Some(group) => Node::class(group, Level::Command)?,
                    None => Node {
                        specification: Specification::build(shape, None, Level::Command)?,
                        commands: BTreeMap::default(),
                    },
                };
                Ok((shape.name.clone(), node))
            })
            .collect::<Result<BTreeMap<String, Node>, ConfigError>>()?;

        Ok(Self {
            specification,
            commands,
        })
    }
}

/// The configured dispatcher: binds command line tokens to the target, and calls it.
/// Built via [`Script::build`](crate::Script::build) or [`Script::build_parser`](crate::Script::build_parser).
///
/// Every specification is built up front, so the dispatcher may be run any number of times.
pub struct Dispatcher<'a> {
    target: Target<'a>,
    top: Node,
    info: ScriptInfo,
    printer: Printer,
    user_interface: Box<dyn UserInterface>,
}

impl<'a> Dispatcher<'a> {
    pub(crate) fn new(
        target: Target<'a>,
        info: ScriptInfo,
        printer: Printer,
        user_interface: Box<dyn UserInterface>,
    ) -> Result<Self, ConfigError> {
        let level = Level::Top {
            versioned: info.is_versioned(),
        };
        let top = match &target.0 {
            TargetInner::Function(function) => Node::function(function, level)?,
            TargetInner::Class(class) => Node::class(class.as_ref(), level)?,
        };

        #[cfg(feature = "tracing_debug")]
        {
            debug!(
                "Built dispatcher for '{}' with commands {:?}.",
                top.specification.name(),
                top.commands.keys().collect::<Vec<&String>>()
            );
        }

        Ok(Self {
            target,
            top,
            info,
            printer,
            user_interface,
        })
    }

    /// Run the dispatcher against the input tokens, returning the exit status.
    ///
    /// The tokens are bound to the target's parameters in a single pass.
    /// For a class target, the tokens left over after binding the constructor's parameters name the command, followed by the command's own tokens.
    /// When the command is itself a nested class, the same goes for its constructor and one of its commands, and so on.
    ///
    /// On success, the exit status is whatever the target returns.
    /// When help or version information is requested, or when the tokens are incomplete or malformed, the dispatcher displays the help message and returns [`EX_USAGE`](crate::EX_USAGE) instead.
    /// The same goes for a target that returns a [`CallError`].
    pub fn run_tokens(&self, tokens: &[&str]) -> i32 {
        let input: Vec<OffsetValue> = tokens
            .iter()
            .enumerate()
            .map(|(offset, token)| (offset, token.to_string()))
            .collect();

        let outcome = match &self.target.0 {
            TargetInner::Function(function) => self.run_function(function, tokens, &input),
            TargetInner::Class(class) => self.run_class(class.as_ref(), tokens, input),
        };

        match outcome {
            Ok(status) | Err(status) => status,
        }
    }

    /// Run the dispatcher against the Cli [`env::args`], and exit (via [`std::process::exit`]) with the resulting status.
    pub fn run(self) {
        let tokens: Vec<String> = env::args().skip(1).collect();
        let status = self.run_tokens(
            tokens
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<&str>>()
                .as_slice(),
        );
        std::process::exit(status);
    }

    fn run_function(
        &self,
        function: &Function<'a>,
        tokens: &[&str],
        input: &[OffsetValue],
    ) -> Result<i32, i32> {
        let chain = [&self.top.specification];
        let binding = self.bind(&chain, tokens, input, Expansion::Strict)?;
        self.reject_remainder(&chain, tokens, &binding)?;

        self.conclude(&chain, function.invoke(binding.into_arguments()))
    }

    fn run_class(
        &self,
        class: &dyn Instantiable,
        tokens: &[&str],
        input: Vec<OffsetValue>,
    ) -> Result<i32, i32> {
        let mut class = class;
        let mut node = &self.top;
        let mut chain: Vec<&Specification> = vec![&node.specification];
        let mut input = input;
        let mut binding = self.bind(&chain, tokens, &input, Expansion::Deferred)?;

        loop {
            let (command, offset, command_input) = self.route(&chain, tokens, &input, &binding)?;

            let mut instance = match class.instantiate(binding.into_arguments()) {
                Ok(instance) => instance,
                Err(error) => {
                    return Err(self.fail(&chain, error));
                }
            };

            let child = match node.commands.get(&command) {
                Some(child) => child,
                None => {
                    return Err(self.report(
                        &chain,
                        ParseError::UnknownCommand(command),
                        Some(ErrorContext::new(offset, tokens)),
                    ));
                }
            };
            chain.push(&child.specification);

            // A nested class binds its constructor's parameters, then looks for its own command.
            if let Some(group) = class.group(&command) {
                binding = self.bind(&chain, tokens, &command_input, Expansion::Deferred)?;
                input = command_input;
                class = group;
                node = child;
                continue;
            }

            let command_binding = self.bind(&chain, tokens, &command_input, Expansion::Strict)?;
            self.reject_remainder(&chain, tokens, &command_binding)?;

            return match instance.invoke(&command, command_binding.into_arguments()) {
                Some(result) => self.conclude(&chain, result),
                None => Err(self.report(
                    &chain[..chain.len() - 1],
                    ParseError::UnknownCommand(command),
                    None,
                )),
            };
        }
    }

    /// Find the command among the tokens a class level left over, and gather the tokens the command receives.
    /// Those are whatever is left of the token where the remainder starts, then the level's tokens after it (except for the command itself).
    fn route(
        &self,
        chain: &[&Specification],
        tokens: &[&str],
        input: &[OffsetValue],
        binding: &Binding,
    ) -> Result<(String, usize, Vec<OffsetValue>), i32> {
        let (index, offset, command) = match binding
            .remainder
            .iter()
            .enumerate()
            .find(|(_, (_, token))| !is_option_like(token))
        {
            Some((index, (offset, command))) => (index, *offset, command.clone()),
            None => {
                return Err(self.report(
                    chain,
                    ParseError::Incomplete("Command not specified.".to_string()),
                    None,
                ));
            }
        };

        if tokens.get(offset) != Some(&command.as_str()) {
            return Err(self.report(
                chain,
                ParseError::Malformed(format!("Unknown argument: {command}")),
                Some(ErrorContext::new(offset, tokens)),
            ));
        }

        let start = binding.remainder[0].0;
        let mut command_input: Vec<OffsetValue> = Vec::default();

        if binding.terminated {
            command_input.push((start, TERMINATOR.to_string()));
        }

        command_input.extend(
            binding
                .remainder
                .iter()
                .enumerate()
                .filter(|(i, (o, _))| *i != index && *o == start)
                .map(|(_, item)| item.clone()),
        );
        command_input.extend(
            input
                .iter()
                .filter(|(o, token)| *o > start && !(*o == offset && *token == command))
                .cloned(),
        );

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Command '{command}' at offset {offset} receives {command_input:?}.");
        }

        Ok((command, offset, command_input))
    }

    /// Expand and match one level of tokens.
    /// Help and version requests, failures, and incomplete bindings all end the dispatch.
    fn bind(
        &self,
        chain: &[&Specification],
        tokens: &[&str],
        input: &[OffsetValue],
        expansion: Expansion,
    ) -> Result<Binding, i32> {
        let specification = chain
            .last()
            .expect("internal error - the chain must not be empty");
        let level_tokens: Vec<&str> = input.iter().map(|(_, token)| token.as_str()).collect();

        // Offsets from the expansion refer to the level's tokens; map them back to the raw tokens.
        let expanded: Vec<OffsetValue> = match expand(&level_tokens, specification, expansion) {
            Ok(expanded) => expanded
                .into_iter()
                .map(|(offset, token)| (input[offset].0, token))
                .collect(),
            Err((offset, error)) => {
                return Err(self.report(
                    chain,
                    ParseError::from(error),
                    Some(ErrorContext::new(input[offset].0, tokens)),
                ));
            }
        };

        let mut binding = consume(specification, expanded);

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Bound level '{}': {binding:?}.", specification.name());
        }

        if binding.requested(HELP_NAME) {
            self.printer.print_help(chain, &*self.user_interface);
            return Err(EX_USAGE);
        }

        if binding.requested(VERSION_NAME) {
            self.printer.print_version(&self.info, &*self.user_interface);
            return Err(EX_USAGE);
        }

        if !binding.failures.is_empty() {
            let (offset, error) = binding.failures.remove(0);
            return Err(self.report(
                chain,
                ParseError::from(error),
                Some(ErrorContext::new(offset, tokens)),
            ));
        }

        if !binding.complete {
            return Err(self.report(
                chain,
                ParseError::Incomplete("Insufficient positional arguments.".to_string()),
                None,
            ));
        }

        Ok(binding)
    }

    fn reject_remainder(
        &self,
        chain: &[&Specification],
        tokens: &[&str],
        binding: &Binding,
    ) -> Result<(), i32> {
        match binding.remainder.first() {
            Some((offset, token)) => Err(self.report(
                chain,
                ParseError::Malformed(format!("Unknown argument: {token}")),
                Some(ErrorContext::new(*offset, tokens)),
            )),
            None => Ok(()),
        }
    }

    fn conclude(&self, chain: &[&Specification], result: Result<i32, CallError>) -> Result<i32, i32> {
        result.map_err(|call_error| self.fail(chain, call_error))
    }

    fn fail(&self, chain: &[&Specification], call_error: CallError) -> i32 {
        #[cfg(feature = "tracing_debug")]
        {
            error!("'{}' failed: {call_error}.", chain[chain.len() - 1].name());
        }

        self.report(chain, ParseError::Command(call_error.0), None)
    }

    fn report(
        &self,
        chain: &[&Specification],
        parse_error: ParseError,
        error_context: Option<ErrorContext>,
    ) -> i32 {
        self.user_interface.print_error(parse_error);

        if let Some(error_context) = error_context {
            self.user_interface.print_error_context(error_context);
        }

        self.printer.print_help(chain, &*self.user_interface);
        EX_USAGE
    }
}
