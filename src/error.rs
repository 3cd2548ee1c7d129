//! Error types for the schema form core

use thiserror::Error;

/// Errors that indicate an integration fault rather than a user input problem
#[derive(Debug, Error)]
pub enum SchemaFormError {
    /// A path segment runs into a scalar where a container is required, or
    /// indexes too far past the end of an array
    #[error("Path conflict at '{path}': segment '{segment}' cannot be created inside a {found}")]
    PathConflict {
        path: String,
        segment: String,
        found: &'static str,
    },

    /// The schema could not be compiled by the validation engine
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// Settings could not be loaded or failed validation
    #[error("Settings error: {0}")]
    Settings(String),

    /// I/O error while reading an input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl From<config::ConfigError> for SchemaFormError {
    fn from(err: config::ConfigError) -> Self {
        SchemaFormError::Settings(err.to_string())
    }
}

/// Result type alias for the schema form core
pub type Result<T> = std::result::Result<T, SchemaFormError>;
