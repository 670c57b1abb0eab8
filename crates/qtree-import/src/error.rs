//! Import error types
//!
//! Conversion itself never fails fatally (problems become diagnostics).
//! These errors cover loading schema configurations and expressions.

use thiserror::Error;

/// Import error
#[derive(Error, Debug)]
pub enum ImportError {
    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// File read error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// File extension not recognized
    #[error("Unsupported schema format: {0}")]
    UnsupportedFormat(String),

    /// Expression text is not valid JSON
    #[error("Invalid expression: {0}")]
    InvalidExpression(String),
}

/// Result type for import operations
pub type Result<T> = std::result::Result<T, ImportError>;
