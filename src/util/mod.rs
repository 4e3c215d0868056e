//! Shared error, result, and hash helpers.

mod hash256;
mod result;

pub use self::hash256::{Hash256, sha256d};
pub use self::result::{Error, Result};
