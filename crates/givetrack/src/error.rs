//! Error types for givetrack.
//!
//! This module defines all error types used throughout the givetrack crate.
//! User-facing form errors are kept apart from storage and configuration
//! failures so the submission handlers can show the former and log the latter.

use std::path::PathBuf;
use thiserror::Error;

/// A form submission that failed validation.
///
/// The message is shown verbatim in the view's error region.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    /// Create a validation error carrying the given user-facing message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The user-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The main error type for givetrack operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Form Errors ===
    /// Submitted form input was rejected.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    // === Store Errors ===
    /// The key-value store cannot be reached.
    #[error("storage is not available: {reason}")]
    StorageUnavailable {
        /// Why the store is unavailable.
        reason: String,
    },

    /// Text stored under a collection key does not decode as that collection.
    #[error("stored data under '{key}' is malformed: {source}")]
    MalformedStoredData {
        /// The collection key that was read.
        key: String,
        /// The underlying decode error.
        #[source]
        source: serde_json::Error,
    },

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

    /// Failed to bring the store's tables up to date.
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

    // === I/O Errors ===
    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for givetrack operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a storage unavailable error.
    #[must_use]
    pub fn storage_unavailable(reason: impl Into<String>) -> Self {
        Self::StorageUnavailable {
            reason: reason.into(),
        }
    }

    /// Create a malformed stored data error for the given key.
    #[must_use]
    pub fn malformed(key: impl Into<String>, source: serde_json::Error) -> Self {
        Self::MalformedStoredData {
            key: key.into(),
            source,
        }
    }

    /// Check if this error is a rejected form submission.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error means the store could not be reached.
    #[must_use]
    pub fn is_storage_unavailable(&self) -> bool {
        matches!(self, Self::StorageUnavailable { .. })
    }

    /// Check if this error is a stored collection that failed to decode.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedStoredData { .. })
    }
}
