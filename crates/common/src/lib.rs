//! Common types for the fabdash workspace

mod error;
mod secret;

pub use error::{Error, Result};
pub use secret::Secret;
