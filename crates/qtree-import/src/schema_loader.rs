//! Schema configuration loading
//!
//! Loads a [`SchemaConfig`] from YAML or JSON, as text or from a file. Function
//! importer hooks cannot be expressed in either format; attach them afterwards
//! with [`SchemaConfig::set_func_importer`].

use crate::error::{ImportError, Result};
use qtree_core::SchemaConfig;
use serde_json::Value;
use std::path::Path;

/// Schema configuration loader
pub struct SchemaLoader;

impl SchemaLoader {
    /// Parse a YAML schema configuration
    pub fn from_yaml_str(yaml_str: &str) -> Result<SchemaConfig> {
        let config: SchemaConfig = serde_yaml::from_str(yaml_str)?;
        log::debug!(
            "Loaded schema: {} fields, {} operators, {} funcs",
            config.fields.len(),
            config.operators.len(),
            config.funcs.len()
        );
        Ok(config)
    }

    /// Parse a JSON schema configuration
    pub fn from_json_str(json_str: &str) -> Result<SchemaConfig> {
        Ok(serde_json::from_str(json_str)?)
    }

    /// Parse text that may be JSON or YAML
    ///
    /// Text starting with `{` is read as JSON, everything else as YAML.
    pub fn parse(content: &str) -> Result<SchemaConfig> {
        if content.trim_start().starts_with('{') {
            Self::from_json_str(content)
        } else {
            Self::from_yaml_str(content)
        }
    }

    /// Load a schema file; the format follows the extension
    pub fn from_file(path: impl AsRef<Path>) -> Result<SchemaConfig> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            Some("json") => Self::from_json_str(&content),
            Some(other) => Err(ImportError::UnsupportedFormat(other.to_string())),
            None => Self::parse(&content),
        }
    }

    /// Parse a logic expression from JSON text
    pub fn parse_expression(json_str: &str) -> Result<Value> {
        serde_json::from_str(json_str).map_err(|e| ImportError::InvalidExpression(e.to_string()))
    }
}
