use thiserror::Error;

/// Errors produced by the store layer.
///
/// A record that simply is not there is never an error: lookups return
/// `Option` and mutations of missing records return `false`.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying SQLite failure.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// No platform data directory could be resolved.
    #[error("Could not determine application data directory")]
    NoDataDir,

    /// Filesystem error while preparing the data directory.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A record value could not be encoded for storage.
    #[error("Encode error: {0}")]
    Encode(bincode::Error),

    /// Stored bytes could not be decoded into the requested record type.
    #[error("Decode error: {0}")]
    Decode(bincode::Error),

    /// A schema migration step failed.
    #[error("Migration error: {0}")]
    Migration(String),

    /// Password hashing or hash parsing failure. A wrong password is not
    /// an error; see `validate_user`.
    #[error("Password hash error: {0}")]
    PasswordHash(String),

    /// Signup conflict: the username is already taken.
    #[error("Username already taken")]
    DuplicateUsername,

    /// A backup payload could not be read.
    #[error("Backup error: {0}")]
    Backup(String),
}

/// Alias used by every fallible operation in this crate.
pub type Result<T> = std::result::Result<T, StoreError>;
