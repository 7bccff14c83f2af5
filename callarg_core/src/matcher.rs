mod core;
mod expand;
mod model;

pub(crate) use self::core::*;
pub(crate) use self::expand::*;
pub(crate) use self::model::*;
