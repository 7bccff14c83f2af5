pub(crate) const HELP_NAME: &str = "help";
pub(crate) const HELP_SHORT: char = 'h';
pub(crate) const HELP_SHORT_UPPER: char = 'H';
pub(crate) const HELP_MESSAGE: &str = "Display this help and exit.";

pub(crate) const VERSION_NAME: &str = "version";
pub(crate) const VERSION_SHORT: char = 'V';
pub(crate) const VERSION_MESSAGE: &str = "Show version and copyright information, then exit.";

pub(crate) const TERMINATOR: &str = "--";

/// The exit status for incomplete/malformed input, and for help/version requests (`EX_USAGE` from sysexits.h).
pub const EX_USAGE: i32 = 64;

/// The exit status for a successful run.
pub const EX_OK: i32 = 0;

pub(crate) const UNDOCUMENTED_COMMAND: &str = "Undocumented command.";
pub(crate) const COMMAND_HINT: &str =
    "For help on a specific command, call the command and pass --help in CMDOPTS.";
