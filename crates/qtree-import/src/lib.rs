//! QTree Import - Logic expression to query tree conversion
//!
//! This crate converts JsonLogic-style expressions into query trees, driven
//! by a schema configuration:
//!
//! ```text
//! {"and": [{"==": [{"var": "name"}, "Bob"]}, {"<": [18, {"var": "age"}, 65]}]}
//!     -> group(AND){ rule(name equal "Bob"), rule(age between 18, 65) }
//! ```
//!
//! Conversion is best effort: every problem becomes a [`Diagnostic`] and the
//! failing subtree is left out.

pub mod converter;
pub mod diagnostics;
pub mod error;
pub mod index;
pub mod recognize;
pub mod schema_loader;

// Re-export main types
pub use converter::{import_tree, top_level_fields, Converted, Converter, Expected, ImportOutcome, ValueTarget};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::{ImportError, Result};
pub use index::{FuncSignature, LookupIndex, OpSignature};
pub use recognize::{recognize, FieldOperand};
pub use schema_loader::SchemaLoader;
