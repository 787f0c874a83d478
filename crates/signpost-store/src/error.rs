//! Error types for the content store.

use thiserror::Error;

/// Result type alias using the store's error type.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors that can occur against the content store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The owning user already has a project for this domain.
    #[error("a project for this domain already exists")]
    DuplicateDomain,

    /// The project already has a page at this path.
    #[error("a page at this path already exists in the project")]
    DuplicatePath,

    /// The targeted row does not exist.
    #[error("row not found")]
    NotFound,

    /// Validation of an input field failed.
    #[error(transparent)]
    Invalid(#[from] signpost_core::Error),

    /// The store could not be reached or the query failed.
    #[error("store unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),

    /// Schema migration failed.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}
