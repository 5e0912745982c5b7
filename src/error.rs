//! Error types for schema generation

use std::path::PathBuf;
use thiserror::Error;

/// Result type for schema generation
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Schema generation errors
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Interface {name} not found in {}", path.display())]
    DefinitionNotFound { name: String, path: PathBuf },

    #[error("Malformed source {}:{line}:{column}: {message}", path.display())]
    MalformedSource {
        path: PathBuf,
        line: u32,
        column: u32,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),
}

impl SchemaError {
    /// The requested root name, if this is a lookup failure
    pub fn missing_definition(&self) -> Option<&str> {
        match self {
            SchemaError::DefinitionNotFound { name, .. } => Some(name),
            _ => None,
        }
    }
}
