mod base;
mod interface;
mod middleware;
mod printer;

pub(crate) use self::base::*;
pub use self::base::ConfigError;
pub(crate) use self::interface::*;
pub use self::middleware::Dispatcher;
pub(crate) use self::printer::*;

#[cfg(test)]
pub(crate) use self::interface::util;

/// Points at the raw token responsible for an error.
///
/// Displays as the tokens (space separated), with a caret under the offending one:
/// ```text
///  --value=abc extra
///  ^
/// ```
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ErrorContext {
    offset: usize,
    tokens: Vec<String>,
}

impl ErrorContext {
    pub(crate) fn new(offset: usize, tokens: &[&str]) -> Self {
        Self {
            offset,
            tokens: tokens.iter().map(|token| token.to_string()).collect(),
        }
    }
}

impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let column: usize = self
            .tokens
            .iter()
            .take(self.offset)
            .map(|token| token.chars().count() + 1)
            .sum();
        writeln!(f, " {}", self.tokens.join(" "))?;
        write!(f, " {:column$}^", "")
    }
}
