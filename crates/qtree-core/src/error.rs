//! Error types for QTree Core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Function not found: {0}")]
    FuncNotFound(String),

    #[error("Invalid value format '{pattern}': {message}")]
    InvalidFormat { pattern: String, message: String },
}

pub type Result<T> = std::result::Result<T, CoreError>;
