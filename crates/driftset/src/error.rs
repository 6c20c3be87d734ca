//! Error types for driftset.
//!
//! Every fallible operation in the crate returns [`Result`]. Lenient input
//! handling (numeric coercion, blank car names) never produces an error; only
//! storage, configuration, and lookup failures do.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for driftset operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Lookup Errors ===
    /// No car is stored under the given identifier.
    #[error("no car with id {id}")]
    CarNotFound {
        /// The identifier that was looked up.
        id: i64,
    },

    /// A field key did not name any tunable field.
    #[error("unknown field '{key}' (run `driftset fields` for the list)")]
    UnknownField {
        /// The key as given.
        key: String,
    },

    // === Background Errors ===
    /// A write dispatched on a screen scope panicked or was cancelled.
    #[error("background write failed: {0}")]
    BackgroundTask(String),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

}

/// A specialized Result type for driftset operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::BackgroundTask(err.to_string())
    }
}

impl Error {
    /// Create an unknown field error.
    #[must_use]
    pub fn unknown_field(key: impl Into<String>) -> Self {
        Self::UnknownField { key: key.into() }
    }
}
