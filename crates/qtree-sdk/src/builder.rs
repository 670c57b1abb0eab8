//! Builder pattern for Importer

use crate::config::ImporterConfig;
use crate::error::{Result, SdkError};
use crate::importer::{Importer, SharedFieldResolver, SharedWidgetSelector};
use qtree_core::{ImporterHook, SchemaConfig, ValueFormatter};
use qtree_import::SchemaLoader;
use std::path::PathBuf;
use std::sync::Arc;

/// Builder for Importer
///
/// # Example
///
/// ```rust,ignore
/// use qtree_sdk::ImporterBuilder;
///
/// // From a schema file
/// let importer = ImporterBuilder::new()
///     .with_schema_file("config/schema.yaml")
///     .build()?;
///
/// // From schema text, with a custom function importer
/// let importer = ImporterBuilder::new()
///     .with_schema_content(yaml_content)
///     .with_func_importer("NOW", ImporterHook::from_fn(|expr| Ok(is_now(expr).then(Vec::new))))
///     .deterministic_ids(true)
///     .build()?;
/// ```
pub struct ImporterBuilder {
    config: ImporterConfig,
    schema: Option<SchemaConfig>,
    func_importers: Vec<(String, ImporterHook)>,
    field_resolver: Option<SharedFieldResolver>,
    widget_selector: Option<SharedWidgetSelector>,
    formatter: Option<Arc<dyn ValueFormatter>>,
}

impl ImporterBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::from_config(ImporterConfig::new())
    }

    /// Create a builder from an existing configuration
    pub fn from_config(config: ImporterConfig) -> Self {
        Self {
            config,
            schema: None,
            func_importers: Vec::new(),
            field_resolver: None,
            widget_selector: None,
            formatter: None,
        }
    }

    // ========== Schema ==========

    /// Set schema file (YAML or JSON, by extension)
    pub fn with_schema_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.schema_file = Some(path.into());
        self
    }

    /// Set schema content directly (alternative to file path)
    ///
    /// # Arguments
    /// * `content` - YAML or JSON text of the schema configuration
    pub fn with_schema_content(mut self, content: impl Into<String>) -> Self {
        self.config.schema_content = Some(content.into());
        self
    }

    /// Use an already built schema configuration
    pub fn with_schema(mut self, schema: SchemaConfig) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Attach an importer hook to a function of the schema
    pub fn with_func_importer(mut self, func: impl Into<String>, hook: ImporterHook) -> Self {
        self.func_importers.push((func.into(), hook));
        self
    }

    // ========== Collaborators ==========

    /// Set field resolver (defaults to the schema's own field definitions)
    pub fn with_field_resolver(mut self, resolver: SharedFieldResolver) -> Self {
        self.field_resolver = Some(resolver);
        self
    }

    /// Set widget selector (defaults to the schema's own field widgets)
    pub fn with_widget_selector(mut self, selector: SharedWidgetSelector) -> Self {
        self.widget_selector = Some(selector);
        self
    }

    /// Set date/time value formatter
    pub fn with_formatter(mut self, formatter: Arc<dyn ValueFormatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    // ========== Options ==========

    /// Warn on diagnostics
    pub fn warn_on_diagnostics(mut self, enable: bool) -> Self {
        self.config.warn_on_diagnostics = enable;
        self
    }

    /// Use deterministic ids
    pub fn deterministic_ids(mut self, enable: bool) -> Self {
        self.config.deterministic_ids = enable;
        self
    }

    /// Build the importer
    ///
    /// The schema comes from `with_schema()`, else from the schema content,
    /// else from the schema file. Function importers are attached afterwards.
    pub fn build(mut self) -> Result<Importer> {
        let mut schema = match self.schema.take() {
            Some(schema) => schema,
            None => self.load_schema()?,
        };

        for (func, hook) in self.func_importers {
            schema.set_func_importer(&func, hook)?;
        }

        tracing::info!(
            fields = schema.fields.len(),
            operators = schema.operators.len(),
            funcs = schema.funcs.len(),
            "Importer built"
        );

        Ok(Importer::new(schema, self.config).with_collaborators(
            self.field_resolver,
            self.widget_selector,
            self.formatter,
        ))
    }

    fn load_schema(&self) -> Result<SchemaConfig> {
        match (&self.config.schema_content, &self.config.schema_file) {
            (Some(_), Some(_)) => Err(SdkError::ConfigError(
                "Both schema content and schema file are set".to_string(),
            )),
            (Some(content), None) => Ok(SchemaLoader::parse(content)?),
            (None, Some(path)) => {
                tracing::debug!("Loading schema from {}", path.display());
                Ok(SchemaLoader::from_file(path)?)
            }
            (None, None) => Err(SdkError::MissingSchema),
        }
    }
}

impl Default for ImporterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
