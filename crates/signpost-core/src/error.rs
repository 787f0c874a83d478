//! Error types shared across the Signpost crates.

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by domain-model validation.
#[derive(Error, Debug)]
pub enum Error {
    /// A field has an invalid format (e.g., a domain that is not a hostname).
    #[error("invalid field '{field}': {reason}")]
    InvalidField {
        /// The name of the invalid field.
        field: &'static str,
        /// Description of what's wrong.
        reason: String,
    },
}
