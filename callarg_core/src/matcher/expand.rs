use crate::constant::*;
use crate::matcher::{MatchError, OffsetValue};
use crate::parser::Specification;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// How to treat a short flag that the specification cannot resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Expansion {
    /// Fail with `MatchError::UnknownAbbreviation`.
    Strict,
    /// Emit it as a literal `-c` token, for a later (command) level to resolve.
    Deferred,
}

/// Normalize the raw tokens into long form.
///
/// * `--` and everything after it passes through untouched.
/// * `--name` and `--name=value` pass through (the matcher splits on the first `=`).
/// * `-abc` becomes `--a --b --c` (by abbreviation), and `-abc=value` attaches the value to the final flag.
/// * Empty tokens are dropped.
///
/// Every emitted token carries the offset of the raw token it came from.
pub(crate) fn expand(
    tokens: &[&str],
    specification: &Specification,
    expansion: Expansion,
) -> Result<Vec<OffsetValue>, (usize, MatchError)> {
    let mut out: Vec<OffsetValue> = Vec::default();
    let mut terminated = false;

    for (offset, token) in tokens.iter().enumerate() {
        if token.is_empty() {
            continue;
        }

        if terminated || *token == TERMINATOR {
            terminated = true;
            out.push((offset, token.to_string()));
        } else if is_short_bundle(token) {
            let (flags, value) = match token[1..].split_once('=') {
                Some((flags, value)) => (flags, Some(value)),
                None => (&token[1..], None),
            };
            let count = flags.chars().count();

            for (index, single) in flags.chars().enumerate() {
                let mut expanded = match specification.abbreviation(single) {
                    Some(name) => format!("--{name}"),
                    None => match expansion {
                        Expansion::Strict => {
                            return Err((offset, MatchError::UnknownAbbreviation(single)));
                        }
                        Expansion::Deferred => format!("-{single}"),
                    },
                };

                // Only the final flag may take the '=' value.
                if index + 1 == count {
                    if let Some(value) = value {
                        expanded.push('=');
                        expanded.push_str(value);
                    }
                }

                out.push((offset, expanded));
            }
        } else {
            out.push((offset, token.to_string()));
        }
    }

    #[cfg(feature = "tracing_debug")]
    {
        debug!("Expanded {tokens:?} into {out:?}.");
    }

    Ok(out)
}

/// Whether the token is (or starts like) a flag: `-x`, `--name`, but neither `-` nor a negative number.
pub(crate) fn is_option_like(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-') && !is_negative_number(token)
}

fn is_negative_number(token: &str) -> bool {
    token[1..].starts_with(|c: char| c.is_ascii_digit() || c == '.') && token.parse::<f64>().is_ok()
}

fn is_short_bundle(token: &str) -> bool {
    is_option_like(token) && !token.starts_with("--") && !token.starts_with("-=")
}
