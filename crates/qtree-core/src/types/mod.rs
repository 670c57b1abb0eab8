//! Type system for QTree
//!
//! This module contains:
//! - Schema configuration (fields, operators, funcs, widgets, settings)
//! - Operand descriptors produced for rule arguments

pub mod operand;
pub mod schema;

pub use operand::{FuncValue, Operand, OperandValue, ValueSrc};
pub use schema::{
    ConjunctionConfig, FieldConfig, FieldSettings, FieldWidgetConfig, FuncArgConfig, FuncConfig,
    GroupMode, JsonLogicSettings, OperatorConfig, SchemaConfig, Settings, WidgetConfig,
    GROUP_TYPE, STRUCT_TYPE,
};
