//! Error types for deepblue.
//!
//! This module defines all error types used throughout the deepblue crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for deepblue operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Store Errors ===
    /// Failed to open or create the record database.
    #[error("failed to open record database at {path}: {source}")]
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

    // === Domain Errors ===
    /// A calculator or analyzer input is outside its valid domain.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// Description of the rejected input.
        message: String,
    },

    // === Assistant Errors ===
    /// The assistant provider request failed (transport, status, or decode).
    ///
    /// Callers of the public chat surface never see this variant; it is
    /// caught at the client boundary and replaced with a fallback message.
    #[error("assistant provider error: {message}")]
    Provider {
        /// Description of the provider failure.
        message: String,
    },

    // === Sensor Errors ===
    /// A sensor source failed to start.
    #[error("failed to start sensor source '{name}': {message}")]
    SensorStart {
        /// Name of the sensor source.
        name: &'static str,
        /// Description of what went wrong.
        message: String,
    },

    /// A sensor source failed to stop.
    #[error("failed to stop sensor source '{name}': {message}")]
    SensorStop {
        /// Name of the sensor source.
        name: &'static str,
        /// Description of what went wrong.
        message: String,
    },

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

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for deepblue operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new invalid-input error.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a new provider error.
    #[must_use]
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a sensor start error.
    #[must_use]
    pub fn sensor_start(name: &'static str, message: impl Into<String>) -> Self {
        Self::SensorStart {
            name,
            message: message.into(),
        }
    }

    /// Create a sensor stop error.
    #[must_use]
    pub fn sensor_stop(name: &'static str, message: impl Into<String>) -> Self {
        Self::SensorStop {
            name,
            message: message.into(),
        }
    }

    /// Check if this error is a rejected domain input.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }

    /// Check if this error came from the assistant provider.
    #[must_use]
    pub fn is_provider_error(&self) -> bool {
        matches!(self, Self::Provider { .. })
    }
}
