//! Core module for `callarg`.
//! See [documentation root](https://docs.rs/callarg/latest/callarg/index.html) for full details.
#![deny(missing_docs)]
mod api;
mod constant;
mod matcher;
mod model;
mod parser;
#[allow(missing_docs)]
pub mod prelude;

pub use api::*;
pub use constant::{EX_OK, EX_USAGE};
pub use model::*;
pub use parser::{ConfigError, Dispatcher};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
