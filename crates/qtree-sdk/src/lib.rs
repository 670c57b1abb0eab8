//! QTree Importer SDK
//!
//! High-level API for building importers and converting logic expressions
//! into query trees.

pub mod builder;
pub mod config;
pub mod error;
pub mod importer;

// Re-export main types
pub use builder::ImporterBuilder;
pub use config::ImporterConfig;
pub use error::{Result, SdkError};
pub use importer::{Importer, SharedFieldResolver, SharedWidgetSelector};

// Re-export commonly used types from dependencies
pub use qtree_core::{ImporterHook, Node, QueryTree, SchemaConfig};
pub use qtree_import::{Diagnostic, DiagnosticKind, Diagnostics, ImportOutcome};
