//! Collaborator contracts
//!
//! The importer leans on a few services it does not own:
//! - field path resolution and normalization ([`FieldResolver`])
//! - widget selection for a field/operator pair ([`WidgetSelector`])
//! - unique node identifiers ([`IdGenerator`])
//! - date/time value formatting ([`ValueFormatter`])
//! - custom function importers ([`FuncImporter`])
//!
//! Default implementations are provided: [`SchemaConfig`](crate::SchemaConfig)
//! resolves fields and widgets from its own definitions, [`UuidIds`] /
//! [`SequentialIds`] generate identifiers, and [`MomentFormatter`] formats
//! values with moment-style patterns.

mod format;
mod ids;
mod resolve;

pub use format::MomentFormatter;
pub use ids::{SequentialIds, UuidIds};

use crate::types::FieldConfig;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Resolves field paths against the field schema
pub trait FieldResolver {
    /// Field configuration for a normalized path
    fn resolve(&self, path: &str) -> Option<&FieldConfig>;

    /// Canonical form of a path
    fn normalize(&self, path: &str) -> String;
}

/// Chooses the widget that types the values of a rule
pub trait WidgetSelector {
    fn widget_for(&self, field: &str, operator: &str) -> Option<String>;
}

/// Generates node identifiers, never reusing one
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Formats date/time values with a widget value format
pub trait ValueFormatter: Send + Sync {
    fn format(&self, value: &DateTime<Utc>, pattern: &str) -> String;
}

/// Custom importer attached to a function
///
/// Receives the raw expression and returns the function's arguments if the
/// expression is recognized. Errors and `None` both mean "not this function".
pub trait FuncImporter: Send + Sync {
    fn import(&self, expr: &Value) -> anyhow::Result<Option<Vec<Value>>>;
}

impl<F> FuncImporter for F
where
    F: Fn(&Value) -> anyhow::Result<Option<Vec<Value>>> + Send + Sync,
{
    fn import(&self, expr: &Value) -> anyhow::Result<Option<Vec<Value>>> {
        self(expr)
    }
}

/// Shared handle to a [`FuncImporter`]
#[derive(Clone)]
pub struct ImporterHook(Arc<dyn FuncImporter>);

impl ImporterHook {
    pub fn new(importer: impl FuncImporter + 'static) -> Self {
        Self(Arc::new(importer))
    }

    /// Wrap a closure
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&Value) -> anyhow::Result<Option<Vec<Value>>> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Run the importer; failures count as no match
    pub fn try_import(&self, expr: &Value) -> Option<Vec<Value>> {
        match self.0.import(expr) {
            Ok(args) => args,
            Err(e) => {
                log::trace!("Function importer rejected {}: {}", expr, e);
                None
            }
        }
    }
}

impl fmt::Debug for ImporterHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ImporterHook(..)")
    }
}
