use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

use crate::api::{Cast, Shape, Validator};
use crate::constant::*;
use crate::matcher::{Bound, MatchError};
use crate::model::Value;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// An error in the declaration of a target (detected when the dispatcher is built).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The declared target cannot be turned into a specification.
    #[error("Config error: invalid target '{target}': {reason}")]
    InvalidTarget {
        /// The name of the offending callable.
        target: String,
        /// Why the declaration is invalid.
        reason: String,
    },

    /// No short name is available for a parameter (and none was configured explicitly).
    #[error("Config error: cannot abbreviate the parameter '{parameter}' of '{target}'.")]
    AmbiguousAbbreviation {
        /// The name of the offending callable.
        target: String,
        /// The parameter without a short name.
        parameter: String,
    },

    /// The metadata refers to a parameter which isn't part of the signature.
    #[error("Config error: '{target}' has no parameter '{parameter}'.")]
    UnknownParameter {
        /// The name of the offending callable.
        target: String,
        /// The parameter named by the metadata.
        parameter: String,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ParseError {
    #[error("Malformed arguments: {0}")]
    Malformed(String),

    #[error("Incomplete arguments: {0}")]
    Incomplete(String),

    #[error("Unknown command '{0}'.")]
    UnknownCommand(String),

    #[error("Command failed: {0}")]
    Command(String),
}

impl From<MatchError> for ParseError {
    fn from(error: MatchError) -> Self {
        ParseError::Malformed(error.to_string())
    }
}

/// Where in the command hierarchy a specification sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Level {
    Top { versioned: bool },
    Command,
}

/// The command specification derived from a declared callable.
#[derive(Debug, PartialEq)]
pub(crate) struct Specification {
    name: String,
    positional: Vec<String>,
    keyword: Vec<(String, Value)>,
    extra_positional: bool,
    extra_keyword: bool,
    casts: BTreeMap<String, Cast>,
    abbreviations: BTreeMap<char, String>,
    descriptions: BTreeMap<String, String>,
    validators: BTreeMap<String, Validator>,
    range: Bound,
    level: Level,
    commands: Option<Vec<(String, String)>>,
    summary: Option<String>,
    description: Option<String>,
}

impl Specification {
    /// Build the specification of a function or method (`commands: None`), or of a class (`commands: Some(..)`).
    pub(crate) fn build(
        shape: &Shape,
        commands: Option<Vec<&Shape>>,
        level: Level,
    ) -> Result<Self, ConfigError> {
        let target = shape.name.clone();
        let invalid = |reason: String| ConfigError::InvalidTarget {
            target: target.clone(),
            reason,
        };

        if target.is_empty() {
            return Err(invalid("the name must not be empty.".to_string()));
        }

        let signature = &shape.signature;
        let positional: Vec<String> = signature.required_names().to_vec();
        let mut keyword: Vec<(String, Value)> = signature.keyword_defaults().to_vec();
        let mut names: BTreeSet<&str> = BTreeSet::default();

        for name in positional.iter().chain(keyword.iter().map(|(name, _)| name)) {
            if name.is_empty() {
                return Err(invalid("parameter names must not be empty.".to_string()));
            }

            if name == HELP_NAME || name == VERSION_NAME {
                return Err(invalid(format!("the parameter name '{name}' is reserved.")));
            }

            if !names.insert(name.as_str()) {
                return Err(invalid(format!("cannot duplicate the parameter '{name}'.")));
            }
        }

        for name in shape.metadata.names() {
            if !names.contains(name.as_str()) {
                return Err(ConfigError::UnknownParameter {
                    target: target.clone(),
                    parameter: name.clone(),
                });
            }
        }

        let commands = match commands {
            Some(shapes) => {
                if shapes.is_empty() {
                    return Err(invalid("a class must have at least one public method.".to_string()));
                }

                Some(
                    shapes
                        .into_iter()
                        .map(|command| {
                            let summary = match &command.doc {
                                Some(doc) => partition(doc).0,
                                None => None,
                            };
                            (
                                command.name.clone(),
                                summary.unwrap_or_else(|| UNDOCUMENTED_COMMAND.to_string()),
                            )
                        })
                        .collect(),
                )
            }
            None => None,
        };

        // Explicit casts take precedence over the ones inferred from the default.
        let mut casts: BTreeMap<String, Cast> = BTreeMap::default();

        for (name, default) in &keyword {
            if let Some(cast) = Cast::infer(default) {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Inferred cast {cast:?} for '{name}' of '{target}'.");
                }
                casts.insert(name.clone(), cast);
            }
        }

        for (name, cast) in &shape.metadata.casts {
            casts.insert(name.clone(), cast.clone());
        }

        let versioned = matches!(level, Level::Top { versioned: true });
        let abbreviations = abbreviate(&target, &keyword, &shape.metadata.abbreviations, level)?;

        keyword.push((HELP_NAME.to_string(), Value::Bool(false)));
        casts.insert(HELP_NAME.to_string(), Cast::Toggle);

        if versioned {
            keyword.push((VERSION_NAME.to_string(), Value::Bool(false)));
            casts.insert(VERSION_NAME.to_string(), Cast::Toggle);
        }

        let mut descriptions = shape.metadata.descriptions.clone();
        descriptions.insert(HELP_NAME.to_string(), HELP_MESSAGE.to_string());

        if versioned {
            descriptions.insert(VERSION_NAME.to_string(), VERSION_MESSAGE.to_string());
        }

        let range = if signature.accepts_extra_positional() {
            Bound::Lower(positional.len())
        } else {
            Bound::Range(positional.len(), positional.len())
        };
        let (summary, description) = match &shape.doc {
            Some(doc) => partition(doc),
            None => (None, None),
        };

        Ok(Self {
            name: target,
            positional,
            keyword,
            extra_positional: signature.accepts_extra_positional(),
            extra_keyword: signature.accepts_extra_keyword(),
            casts,
            abbreviations,
            descriptions,
            validators: shape.metadata.validators.clone(),
            range,
            level,
            commands,
            summary,
            description,
        })
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn positional(&self) -> &[String] {
        &self.positional
    }

    pub(crate) fn keyword(&self) -> &[(String, Value)] {
        &self.keyword
    }

    pub(crate) fn accepts_extra_positional(&self) -> bool {
        self.extra_positional
    }

    pub(crate) fn accepts_extra_keyword(&self) -> bool {
        self.extra_keyword
    }

    pub(crate) fn bound(&self) -> Bound {
        self.range
    }

    pub(crate) fn is_top(&self) -> bool {
        matches!(self.level, Level::Top { .. })
    }

    pub(crate) fn is_class(&self) -> bool {
        self.commands.is_some()
    }

    /// The public commands of a class: `(name, summary)` ordered by name.
    pub(crate) fn commands(&self) -> &[(String, String)] {
        match &self.commands {
            Some(commands) => commands,
            None => &[],
        }
    }

    pub(crate) fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub(crate) fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub(crate) fn abbreviation(&self, short: char) -> Option<&str> {
        self.abbreviations.get(&short).map(String::as_str)
    }

    pub(crate) fn short(&self, name: &str) -> Option<char> {
        // Reserved characters are claimed first, so 'h' always wins over 'H' for help.
        self.abbreviations
            .iter()
            .filter(|(_, n)| n.as_str() == name)
            .map(|(c, _)| *c)
            .min_by_key(|c| (*c != HELP_SHORT, *c))
    }

    pub(crate) fn cast(&self, name: &str) -> Option<&Cast> {
        self.casts.get(name)
    }

    pub(crate) fn validator(&self, name: &str) -> Option<&Validator> {
        self.validators.get(name)
    }

    pub(crate) fn parameter_description(&self, name: &str) -> Option<&str> {
        self.descriptions.get(name).map(String::as_str)
    }

    pub(crate) fn default(&self, name: &str) -> Option<&Value> {
        self.keyword
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, default)| default)
    }

    /// Resolve a command line name (`some-name` or `some_name`) to the declared parameter name.
    pub(crate) fn resolve(&self, name: &str) -> Option<&str> {
        let underscored = name.replace('-', "_");

        self.positional
            .iter()
            .chain(self.keyword.iter().map(|(n, _)| n))
            .find(|n| n.as_str() == name || **n == underscored)
            .map(String::as_str)
    }
}

/// Render a parameter name the way it is typed on the command line.
pub(crate) fn display_name(name: &str) -> String {
    name.replace('_', "-")
}

fn abbreviate(
    target: &str,
    keyword: &[(String, Value)],
    explicit: &BTreeMap<String, char>,
    level: Level,
) -> Result<BTreeMap<char, String>, ConfigError> {
    let mut abbreviations: BTreeMap<char, String> = BTreeMap::default();
    let mut claimed: BTreeSet<char> = BTreeSet::from([HELP_SHORT, HELP_SHORT_UPPER]);
    abbreviations.insert(HELP_SHORT, HELP_NAME.to_string());
    abbreviations.insert(HELP_SHORT_UPPER, HELP_NAME.to_string());

    if let Level::Top { versioned } = level {
        claimed.insert(VERSION_SHORT);

        if versioned {
            abbreviations.insert(VERSION_SHORT, VERSION_NAME.to_string());
        }
    }

    for (name, short) in explicit {
        if !claimed.insert(*short) {
            return Err(ConfigError::AmbiguousAbbreviation {
                target: target.to_string(),
                parameter: name.clone(),
            });
        }

        abbreviations.insert(*short, name.clone());
    }

    let mut remaining: Vec<&String> = keyword
        .iter()
        .map(|(name, _)| name)
        .filter(|name| !explicit.contains_key(*name))
        .collect();
    remaining.sort();

    for name in remaining {
        let candidate = name
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(|c| [single(c.to_lowercase()), single(c.to_uppercase())])
            .flatten()
            .find(|c| !claimed.contains(c));

        match candidate {
            Some(short) => {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Abbreviating '{name}' of '{target}' as '-{short}'.");
                }
                claimed.insert(short);
                abbreviations.insert(short, name.clone());
            }
            None => {
                return Err(ConfigError::AmbiguousAbbreviation {
                    target: target.to_string(),
                    parameter: name.clone(),
                });
            }
        }
    }

    Ok(abbreviations)
}

/// The case mapping of a character, when it is a single character itself (ex: not `ß` → `SS`).
fn single(mut mapping: impl Iterator<Item = char>) -> Option<char> {
    let c = mapping.next()?;
    mapping.next().is_none().then_some(c)
}

/// Split documentation into its summary (the first paragraph) and its description (the rest).
/// Lines within a paragraph are joined with spaces; paragraphs in the description are separated by a blank line.
pub(crate) fn partition(doc: &str) -> (Option<String>, Option<String>) {
    let mut paragraphs: Vec<String> = Vec::default();
    let mut current: Vec<&str> = Vec::default();

    for line in doc.lines().map(str::trim) {
        if line.is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }

    if !current.is_empty() {
        paragraphs.push(current.join(" "));
    }

    let mut paragraphs = paragraphs.into_iter();
    let summary = paragraphs.next();
    let rest: Vec<String> = paragraphs.collect();
    let description = if rest.is_empty() {
        None
    } else {
        Some(rest.join("\n\n"))
    };

    (summary, description)
}
