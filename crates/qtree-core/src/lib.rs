//! QTree Core - Core types for the query tree importer
//!
//! This crate provides the types shared by the importer crates:
//! - Logic expression view over JSON values
//! - Schema configuration (fields, operators, funcs, widgets, settings)
//! - Query tree nodes and operand descriptors
//! - Collaborator contracts (field resolution, widgets, ids, formatting)
//! - Error types

pub mod collab;
pub mod error;
pub mod logic;
pub mod tree;
pub mod types;

// Re-export commonly used types
pub use collab::{
    FieldResolver, FuncImporter, IdGenerator, ImporterHook, MomentFormatter, SequentialIds,
    UuidIds, ValueFormatter, WidgetSelector,
};
pub use error::CoreError;
pub use logic::Logic;
pub use tree::{GroupNode, Node, QueryTree, RuleGroupNode, RuleNode};
pub use types::{
    FieldConfig, FuncConfig, GroupMode, Operand, OperandValue, OperatorConfig, SchemaConfig,
    Settings, ValueSrc, WidgetConfig,
};
