//! SDK error types

use thiserror::Error;

/// SDK error type
#[derive(Error, Debug)]
pub enum SdkError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Schema or expression loading error
    #[error("Import error: {0}")]
    ImportError(#[from] qtree_import::ImportError),

    /// Schema error (unknown function, bad value format ...)
    #[error("Schema error: {0}")]
    SchemaError(#[from] qtree_core::CoreError),

    /// No schema was given to the builder
    #[error("No schema configured")]
    MissingSchema,
}

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;
