//! Importer - Main API for converting logic expressions

use crate::config::ImporterConfig;
use crate::error::Result;
use qtree_core::{
    FieldResolver, MomentFormatter, SchemaConfig, SequentialIds, UuidIds, ValueFormatter,
    WidgetSelector,
};
use qtree_import::{Converter, ImportOutcome, LookupIndex, SchemaLoader};
use serde_json::Value;
use std::sync::Arc;

/// Field resolver shared across threads
pub type SharedFieldResolver = Arc<dyn FieldResolver + Send + Sync>;

/// Widget selector shared across threads
pub type SharedWidgetSelector = Arc<dyn WidgetSelector + Send + Sync>;

/// Main importer
///
/// Holds a schema configuration (with its lookup index built once) and the
/// collaborators used by every import. Each call to [`Importer::import`]
/// gets its own diagnostics, so one importer may serve many threads.
pub struct Importer {
    /// Schema configuration
    schema: Arc<SchemaConfig>,

    /// Lookup tables compiled from the schema
    index: LookupIndex,

    /// Field resolver (defaults to the schema)
    field_resolver: Option<SharedFieldResolver>,

    /// Widget selector (defaults to the schema)
    widget_selector: Option<SharedWidgetSelector>,

    /// Date/time value formatter
    formatter: Arc<dyn ValueFormatter>,

    /// Configuration
    config: ImporterConfig,
}

impl Importer {
    /// Create an importer over a schema with default collaborators
    pub fn new(schema: SchemaConfig, config: ImporterConfig) -> Self {
        let index = LookupIndex::build(&schema);
        Self {
            schema: Arc::new(schema),
            index,
            field_resolver: None,
            widget_selector: None,
            formatter: Arc::new(MomentFormatter),
            config,
        }
    }

    pub(crate) fn with_collaborators(
        mut self,
        field_resolver: Option<SharedFieldResolver>,
        widget_selector: Option<SharedWidgetSelector>,
        formatter: Option<Arc<dyn ValueFormatter>>,
    ) -> Self {
        self.field_resolver = field_resolver;
        self.widget_selector = widget_selector;
        if let Some(formatter) = formatter {
            self.formatter = formatter;
        }
        self
    }

    /// Convert a logic expression into a query tree
    ///
    /// Never fails: problems are reported in the outcome's diagnostics and,
    /// when `warn_on_diagnostics` is set, logged as a warning.
    pub fn import(&self, expr: &Value) -> ImportOutcome {
        let sequential = SequentialIds::new();
        let mut converter =
            Converter::from_index(&self.schema, &self.index).with_formatter(self.formatter.as_ref());
        if self.config.deterministic_ids {
            converter = converter.with_ids(&sequential);
        } else {
            converter = converter.with_ids(&UuidIds);
        }
        if let Some(resolver) = &self.field_resolver {
            converter = converter.with_field_resolver(resolver.as_ref());
        }
        if let Some(selector) = &self.widget_selector {
            converter = converter.with_widget_selector(selector.as_ref());
        }

        let outcome = converter.import_tree(expr);

        tracing::debug!(
            nodes = outcome.tree.as_ref().map_or(0, |t| t.node_count()),
            diagnostics = outcome.diagnostics.len(),
            "Imported logic expression"
        );
        if self.config.warn_on_diagnostics && !outcome.is_clean() {
            tracing::warn!(
                count = outcome.diagnostics.len(),
                "Logic import recorded diagnostics: {}",
                outcome.diagnostics
            );
        }
        outcome
    }

    /// Parse JSON text and import it
    pub fn import_str(&self, json: &str) -> Result<ImportOutcome> {
        let expr = SchemaLoader::parse_expression(json)?;
        Ok(self.import(&expr))
    }

    /// Schema configuration in use
    pub fn schema(&self) -> &SchemaConfig {
        &self.schema
    }

    /// Importer configuration
    pub fn config(&self) -> &ImporterConfig {
        &self.config
    }

    /// Lookup index shared by every import
    pub fn index(&self) -> &LookupIndex {
        &self.index
    }
}

impl std::fmt::Debug for Importer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Importer")
            .field("fields", &self.schema.fields.len())
            .field("custom_field_resolver", &self.field_resolver.is_some())
            .field("custom_widget_selector", &self.widget_selector.is_some())
            .field("config", &self.config)
            .finish()
    }
}
