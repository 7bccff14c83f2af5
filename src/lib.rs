//! `callarg` binds command line arguments straight onto a declared function (or a class-like target and its methods).
//!
//! There is no separate parser definition step.
//! Instead, the command line interface is derived from the *signature* of the callable:
//! * *Required parameters* become positional arguments (they may also be given by name: `--name=value`).
//! * *Keyword parameters* (those with a default value) become options: `--name=value`, `--name value`, or `-n value`.
//! The type of the default decides how the option's token is cast (ex: a `false` default makes the option a toggle).
//! * *Variadic parameters* accept any number of extra positional values, and/or extra `--name=value` pairs.
//! * A *class* target takes its constructor's parameters first, followed by the name of one of its methods (the *command*) and that method's parameters.
//! A command may also be a nested class, which takes its own constructor's parameters and then one of its own commands.
//!
//! Every level gets a `-h, --help` option, and the top level gets `-V, --version` when the script declares a title or a version.
//! Help and version requests, as well as incomplete or malformed input, display the help message and exit with [`EX_USAGE`] (`64`).
//!
//! # Usage
//! Declare the callable with its [`Signature`] (and optionally, [`Metadata`] to describe, cast, abbreviate or validate its parameters).
//! Then hand it to a [`Script`], and run the resulting [`Dispatcher`].
//!
//! ```no_run
#![doc = include_str!("../demos/greet.rs")]
//! ```
//!
//! ```console
//! $ greet world -n 2
//! Hello world!
//! Hello world!
//!
//! $ greet --greeting=Howdy --loud world
//! HOWDY WORLD!
//!
//! $ greet
//! Incomplete arguments: Insufficient positional arguments.
//! Greet somebody.
//! Usage: greet [OPTIONS] <name>
//! ...
//! ```
//!
//! # Token grammar
//! * `--name=value` and `--name value` bind a value to a named parameter.
//! Underscores in parameter names may be typed as dashes (`--dry-run` for `dry_run`).
//! * `--name`, for a toggle, binds the negation of the default.
//! * `-abc` bundles short names: `--a --b --c`; a trailing `=value` (`-abc=value`) goes to the final short name.
//! * `--` ends option processing: every token after it is positional, even `--value`.
//! * Negative numbers (ex: `-3`) and a lone `-` are positional values.
//! * Repeating a parameter (ex: `-v -v`) is an error.
//! * `--help` (or `-h`) is honoured anywhere before `--`, even in place of an option's value.
//!
//! Short names are assigned automatically: for each keyword parameter (in name order), the first character of its name which isn't already taken, trying the lower case before the upper case of each.
//! The characters `h`, `H` (help) and, at the top level, `V` (version) are reserved.
//! Use [`Metadata::abbreviate`] to choose a short name explicitly.
//!
//! # Classes
//! A [`Class`] is a constructor plus a closed set of commands: its [`Method`]s, and any nested classes registered via [`Class::group`].
//! Each level has its own options: the class's options go before the command name, and the command's options go after it.
//! Commands whose names start with `_` are private: they are neither listed in the help message nor dispatched to.
//!
//! ```no_run
#![doc = include_str!("../demos/naval.rs")]
//! ```
//!
//! ```console
//! $ naval --help
//! Naval Fate.
//! Usage: naval [OPTIONS] <COMMAND> ...
//!
//! OPTIONS may be one or more of:
//!
//!  -V, --version  Show version and copyright information, then exit.
//!  -h, --help     Display this help and exit.
//!
//! COMMAND may be one of:
//!
//!  mine  Manage mines.
//!  ship  Manage ships.
//!
//! For help on a specific command, call the command and pass --help in CMDOPTS.
//!
//! An adaption of the docopt naval example.
//!
//! $ naval ship -v move Nimitz 3 4 --speed 20
//! [Nimitz] setting course at 20 knots
//! Moving ship Nimitz to (3, 4) with speed 20 knots.
//! ```
//!
//! # Casting and validation
//! Tokens are cast according to the parameter's [`Cast`].
//! The cast is inferred from the default value, or set explicitly via [`Metadata::cast`] (including [`Cast::custom`] conversions).
//! Casted values may be further checked via [`Metadata::validate`].
//!
//! ```no_run
#![doc = include_str!("../demos/validation.rs")]
//! ```
//!
//! # Logging
//! Enable the `tracing_debug` feature to emit [`tracing`](https://docs.rs/tracing) debug events as the dispatcher derives specifications and matches tokens.
//! `callarg` never installs a subscriber itself.
pub use callarg_core::*;
