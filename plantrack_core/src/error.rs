//! Error types for the plantrack_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for plantrack_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A requested record does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A required input field is missing or empty after trimming
    #[error("Validation error: {0}")]
    Validation(String),

    /// A stored or incoming record references a record that does not exist
    #[error("Referential integrity failed: {0}")]
    ReferentialIntegrity(String),

    /// Malformed JSON text or an envelope missing required structure
    #[error("Invalid export format: {0}")]
    InvalidFormat(String),

    /// Incoming envelope's major schema version differs from the supported one
    #[error("Incompatible schema version {found}, expected {supported}")]
    SchemaVersionMismatch { found: String, supported: String },

    /// The store transaction could not commit
    #[error("Transaction failed: {0}")]
    Transaction(String),
}

impl Error {
    /// Shorthand for a NotFound error
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Error::NotFound {
            entity,
            id: id.into(),
        }
    }
}
