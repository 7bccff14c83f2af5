use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

use crate::api::InvalidCapture;
use crate::constant::*;
use crate::matcher::{is_option_like, Binding, OffsetValue};
use crate::model::Value;
use crate::parser::Specification;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum MatchError {
    #[error("Unknown short option '-{0}'.")]
    UnknownAbbreviation(char),

    #[error("{0}")]
    Invalid(#[from] InvalidCapture),

    #[error("Cannot repeat the parameter '{0}'.")]
    Conflict(String),

    #[error("No value provided for '{0}'.")]
    MissingValue(String),
}

#[derive(Debug)]
enum Pending {
    Declared(String),
    Extra(String),
}

/// Matches (expanded) tokens against one specification.
///
/// Tokens are consumed in a single pass.
/// The first token that cannot be matched, and every token after it, make up the remainder.
#[derive(Debug)]
pub(crate) struct TokenMatcher<'s> {
    specification: &'s Specification,
    slots: Vec<(String, Option<Value>)>,
    keyword: BTreeMap<String, Value>,
    extra: Vec<Value>,
    extra_keyword: BTreeMap<String, Value>,
    seen: BTreeSet<String>,
    remainder: Vec<OffsetValue>,
    failures: Vec<(usize, MatchError)>,
    pending: Option<(usize, Pending)>,
    terminated: bool,
}

impl<'s> TokenMatcher<'s> {
    pub(crate) fn new(specification: &'s Specification) -> Self {
        Self {
            specification,
            slots: specification
                .positional()
                .iter()
                .map(|name| (name.clone(), None))
                .collect(),
            keyword: specification.keyword().iter().cloned().collect(),
            extra: Vec::default(),
            extra_keyword: BTreeMap::default(),
            seen: BTreeSet::default(),
            remainder: Vec::default(),
            failures: Vec::default(),
            pending: None,
            terminated: false,
        }
    }

    pub(crate) fn feed(&mut self, (offset, token): OffsetValue) {
        // Once a token has been left over, the rest of the tokens belong to the next level.
        if !self.remainder.is_empty() {
            self.remainder.push((offset, token));
            return;
        }

        // A help request is honoured even where a value is expected; the option stays pending.
        if self.pending.is_some() && !self.terminated && self.requests_help(&token) {
            self.match_option(offset, HELP_NAME, &token);
            return;
        }

        // A pending option takes the next token, whatever it looks like.
        if let Some((_, pending)) = self.pending.take() {
            match pending {
                Pending::Declared(name) => self.bind_text(offset, name, &token),
                Pending::Extra(name) => {
                    self.bind(offset, Pending::Extra(name), Value::Text(token));
                }
            }
            return;
        }

        if !self.terminated {
            if token == TERMINATOR {
                self.terminated = true;
                return;
            }

            if let Some(option) = token.strip_prefix("--") {
                self.match_option(offset, option, &token);
                return;
            }

            if is_option_like(&token) {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Leaving unresolved '{token}' to the remainder.");
                }
                self.remainder.push((offset, token));
                return;
            }
        }

        self.match_positional(offset, token);
    }

    fn requests_help(&self, token: &str) -> bool {
        token
            .strip_prefix("--")
            .and_then(|name| self.specification.resolve(name))
            == Some(HELP_NAME)
    }

    fn match_option(&mut self, offset: usize, option: &str, token: &str) {
        let (name, value) = match option.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (option, None),
        };

        match self.specification.resolve(name) {
            Some(declared) => {
                let declared = declared.to_string();
                let toggle = self
                    .specification
                    .cast(&declared)
                    .map(|cast| cast.is_toggle())
                    .unwrap_or(false);

                match value {
                    Some(value) => self.bind_text(offset, declared, value),
                    None if toggle => {
                        // Toggling is relative to the default, not to a previous toggle.
                        let default = matches!(
                            self.specification.default(&declared),
                            Some(Value::Bool(true))
                        );
                        self.bind(offset, Pending::Declared(declared), Value::Bool(!default));
                    }
                    None => {
                        self.pending.replace((offset, Pending::Declared(declared)));
                    }
                }
            }
            None if self.specification.accepts_extra_keyword() => {
                let name = name.to_string();

                match value {
                    Some(value) => {
                        self.bind(offset, Pending::Extra(name), Value::Text(value.to_string()))
                    }
                    None => {
                        self.pending.replace((offset, Pending::Extra(name)));
                    }
                }
            }
            None => {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Leaving unknown option '{token}' to the remainder.");
                }
                self.remainder.push((offset, token.to_string()));
            }
        }
    }

    fn match_positional(&mut self, offset: usize, token: String) {
        let count = self.slots.iter().filter(|(_, v)| v.is_some()).count() + self.extra.len();

        if !self.specification.bound().is_open(count) {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Positional values exhausted; leaving '{token}' to the remainder.");
            }
            self.remainder.push((offset, token));
            return;
        }

        match self.slots.iter().find(|(_, value)| value.is_none()) {
            Some((name, _)) => {
                let name = name.clone();
                self.bind_text(offset, name, &token);
            }
            None => self.extra.push(Value::Text(token)),
        }
    }

    fn bind_text(&mut self, offset: usize, name: String, text: &str) {
        let value = match self.specification.cast(&name) {
            Some(cast) => cast.apply(text),
            None => Ok(Value::Text(text.to_string())),
        };

        match value {
            Ok(value) => self.bind(offset, Pending::Declared(name), value),
            Err(error) => self.failures.push((offset, MatchError::from(error))),
        }
    }

    fn bind(&mut self, offset: usize, target: Pending, value: Value) {
        let name = match &target {
            Pending::Declared(name) | Pending::Extra(name) => name.clone(),
        };

        if !self.seen.insert(name.clone()) {
            self.failures.push((offset, MatchError::Conflict(name)));
            return;
        }

        if let Pending::Declared(name) = &target {
            if let Some(validator) = self.specification.validator(name) {
                if let Err(error) = validator.check(name, &value) {
                    self.failures.push((offset, MatchError::from(error)));
                    return;
                }
            }
        }

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Binding '{name}' to {value}.");
        }

        match target {
            Pending::Declared(name) => {
                match self.slots.iter_mut().find(|(slot, _)| slot == &name) {
                    Some((_, slot)) => {
                        slot.replace(value);
                    }
                    None => {
                        self.keyword.insert(name, value);
                    }
                }
            }
            Pending::Extra(name) => {
                self.extra_keyword.insert(name, value);
            }
        }
    }

    pub(crate) fn close(self) -> Binding {
        let TokenMatcher {
            specification,
            slots,
            keyword,
            extra,
            extra_keyword,
            remainder,
            mut failures,
            pending,
            terminated,
            ..
        } = self;

        if let Some((offset, pending)) = pending {
            let name = match pending {
                Pending::Declared(name) | Pending::Extra(name) => name,
            };
            failures.push((offset, MatchError::MissingValue(name)));
        }

        let filled = slots.iter().all(|(_, value)| value.is_some());
        let count = slots.len() + extra.len();
        let complete = failures.is_empty() && filled && specification.bound().contains(count);

        Binding {
            slots,
            keyword,
            extra,
            extra_keyword,
            remainder,
            failures,
            terminated,
            complete,
        }
    }
}

/// Match the tokens against the specification.
pub(crate) fn consume(specification: &Specification, tokens: Vec<OffsetValue>) -> Binding {
    let mut token_matcher = TokenMatcher::new(specification);

    for token in tokens {
        token_matcher.feed(token);
    }

    token_matcher.close()
}
