//! Configuration types for Importer

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main importer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImporterConfig {
    /// Schema configuration file (YAML or JSON)
    pub schema_file: Option<PathBuf>,

    /// Schema configuration text - alternative to file path
    #[serde(skip)]
    pub schema_content: Option<String>,

    /// Log a warning for every import that records diagnostics
    pub warn_on_diagnostics: bool,

    /// Generate sequential node ids (restarting at 1 for every import)
    /// instead of random UUIDs
    pub deterministic_ids: bool,
}

impl ImporterConfig {
    /// Create a new importer configuration
    pub fn new() -> Self {
        Self {
            schema_file: None,
            schema_content: None,
            warn_on_diagnostics: true,
            deterministic_ids: false,
        }
    }

    /// Set schema file
    pub fn with_schema_file(mut self, path: PathBuf) -> Self {
        self.schema_file = Some(path);
        self
    }

    /// Set schema content
    pub fn with_schema_content(mut self, content: impl Into<String>) -> Self {
        self.schema_content = Some(content.into());
        self
    }

    /// Warn on diagnostics
    pub fn warn_on_diagnostics(mut self, enable: bool) -> Self {
        self.warn_on_diagnostics = enable;
        self
    }

    /// Use deterministic ids
    pub fn deterministic_ids(mut self, enable: bool) -> Self {
        self.deterministic_ids = enable;
        self
    }
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self::new()
    }
}
