//! Error types for blooddonor.
//!
//! This module defines all error types used throughout the blooddonor crate,
//! separating backend failures (which propagate) from the user-facing domain
//! errors that page controllers surface as short messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for blooddonor operations.
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

    // === Account Errors ===
    /// Signup with an email that another user already registered.
    #[error("Email already registered")]
    DuplicateEmail {
        /// The email as supplied by the caller.
        email: String,
    },

    /// No user matches the email and password pair.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The current session does not belong to an admin.
    #[error("admin access required")]
    NotAuthorized,

    // === Page Errors ===
    /// One or more required form fields were empty.
    #[error("Please fill all fields")]
    MissingFields {
        /// Names of the empty fields.
        fields: Vec<&'static str>,
    },

    /// A blood group string did not name one of the eight groups.
    #[error("unknown blood group '{0}'")]
    InvalidBloodGroup(String),

    /// A blood request matched no registered donors.
    #[error("No donors found for that group and city")]
    NoDonorsFound,

    /// An admin decision referenced an unknown camp request.
    #[error("camp request '{id}' not found")]
    CampRequestNotFound {
        /// The id that was looked up.
        id: String,
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
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for blooddonor operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a duplicate email error.
    #[must_use]
    pub fn duplicate_email(email: impl Into<String>) -> Self {
        Self::DuplicateEmail {
            email: email.into(),
        }
    }

    /// Create a missing fields error.
    #[must_use]
    pub fn missing_fields(fields: Vec<&'static str>) -> Self {
        Self::MissingFields { fields }
    }

    /// Create a camp request not found error.
    #[must_use]
    pub fn camp_request_not_found(id: impl Into<String>) -> Self {
        Self::CampRequestNotFound { id: id.into() }
    }

    /// Check if this error is a user-facing domain error rather than a
    /// backend failure.
    #[must_use]
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::DuplicateEmail { .. }
                | Self::InvalidCredentials
                | Self::NotAuthorized
                | Self::MissingFields { .. }
                | Self::InvalidBloodGroup(_)
                | Self::NoDonorsFound
                | Self::CampRequestNotFound { .. }
        )
    }

    /// Check if this error is an authentication or authorization failure.
    #[must_use]
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::InvalidCredentials | Self::NotAuthorized)
    }
}
