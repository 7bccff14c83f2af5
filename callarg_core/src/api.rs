mod capture;
mod core;
mod signature;
mod target;

pub use self::core::*;
pub use capture::*;
pub use signature::*;
pub use target::*;
