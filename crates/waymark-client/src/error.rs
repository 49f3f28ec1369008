use thiserror::Error;

use waymark_store::StoreError;

/// Errors surfaced by client commands.
#[derive(Error, Debug)]
pub enum AppError {
    /// Persistence-layer failure (including duplicate-username conflicts,
    /// which the UI maps to its own message).
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A field failed validation before anything was written.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Username/password mismatch. Deliberately silent about which half.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// The command needs an active session.
    #[error("Not signed in")]
    NotSignedIn,

    /// The referenced record does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// A value could not be serialized for storage or export.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AppError>;
