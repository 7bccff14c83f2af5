use std::collections::BTreeMap;

use crate::api::Arguments;
use crate::constant::*;
use crate::matcher::MatchError;
use crate::model::Value;

/// A token along with the offset of the raw (un-expanded) token it came from.
pub(crate) type OffsetValue = (usize, String);

/// The number of positional values a specification accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Bound {
    Range(usize, usize),
    Lower(usize),
}

impl Bound {
    pub(crate) fn lower(&self) -> usize {
        match self {
            Bound::Range(lower, _) => *lower,
            Bound::Lower(lower) => *lower,
        }
    }

    pub(crate) fn upper(&self) -> Option<usize> {
        match self {
            Bound::Range(_, upper) => Some(*upper),
            Bound::Lower(_) => None,
        }
    }

    /// Whether another positional value may be accepted after `count` values.
    pub(crate) fn is_open(&self, count: usize) -> bool {
        self.upper().map_or(true, |upper| count < upper)
    }

    pub(crate) fn contains(&self, count: usize) -> bool {
        self.lower() <= count && self.upper().map_or(true, |upper| count <= upper)
    }
}

/// The outcome of matching one level's tokens.
#[derive(Debug, PartialEq)]
pub(crate) struct Binding {
    pub(crate) slots: Vec<(String, Option<Value>)>,
    pub(crate) keyword: BTreeMap<String, Value>,
    pub(crate) extra: Vec<Value>,
    pub(crate) extra_keyword: BTreeMap<String, Value>,
    pub(crate) remainder: Vec<OffsetValue>,
    pub(crate) failures: Vec<(usize, MatchError)>,
    pub(crate) terminated: bool,
    pub(crate) complete: bool,
}

impl Binding {
    /// Whether a synthesized switch (ex: `help`) was turned on.
    pub(crate) fn requested(&self, name: &str) -> bool {
        matches!(self.keyword.get(name), Some(Value::Bool(true)))
    }

    pub(crate) fn into_arguments(self) -> Arguments {
        let Binding {
            slots,
            mut keyword,
            extra,
            extra_keyword,
            ..
        } = self;
        keyword.remove(HELP_NAME);
        keyword.remove(VERSION_NAME);
        let positional = slots
            .into_iter()
            .map(|(name, value)| {
                let value = value.expect("internal error - only complete bindings are converted");
                (name, value)
            })
            .collect();

        Arguments::new(positional, keyword, extra, extra_keyword)
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use rand::{distributions::Standard, prelude::Distribution, Rng};

    impl Distribution<Bound> for Standard {
        fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Bound {
            match rng.gen_range(0..2) {
                0 => {
                    let upper: usize = rng.gen_range(0..256);

                    if upper == 0 {
                        Bound::Range(0, upper)
                    } else {
                        Bound::Range(rng.gen_range(0..upper), upper)
                    }
                }
                1 => Bound::Lower(rng.gen_range(0..256)),
                _ => unreachable!("internal error - impossible gen_range()"),
            }
        }
    }
}
