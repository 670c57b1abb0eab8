//! Field operand recognition
//!
//! The field side of a rule is normally a plain variable access. Rules over
//! nested collections may also count matching elements through a reduce:
//!
//! ```text
//! {"reduce": [{"filter": [{"var": "cars"}, <predicate>]}, {"+": [1, {"var": "accumulator"}]}, 0]}
//! {"reduce": [{"var": "cars"}, {"+": [1, {"var": "accumulator"}]}, 0]}
//! ```
//!
//! The first form yields the collection plus the predicate as the rule's
//! "having" clause, the second the collection alone.

use crate::index::LookupIndex;
use qtree_core::logic::{is_logic, Logic};
use serde_json::Value;

/// What the field side of a rule turned out to be
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldOperand<'e> {
    /// `{"var": "path"}`
    DirectVar(&'e str),
    /// Collection counted through a reduce, optionally filtered
    FilteredCollection {
        path: &'e str,
        having: Option<&'e Value>,
    },
    /// Not a field reference
    NoMatch,
}

/// Recognize the field operand of a rule
pub fn recognize<'e>(expr: &'e Value, index: &LookupIndex) -> FieldOperand<'e> {
    match Logic::of(expr) {
        Logic::Operation { op, args } if index.is_var_key(op) => match var_path(args) {
            Some(path) => FieldOperand::DirectVar(path),
            None => FieldOperand::NoMatch,
        },
        Logic::Operation { op: "reduce", args } => recognize_reduce(args, index),
        _ => FieldOperand::NoMatch,
    }
}

fn recognize_reduce<'e>(args: &'e [Value], index: &LookupIndex) -> FieldOperand<'e> {
    let [source, accumulator, init] = args else {
        return FieldOperand::NoMatch;
    };
    if !is_logic(source) || !is_number(init, 0.0) || !is_increment(accumulator) {
        return FieldOperand::NoMatch;
    }

    match Logic::of(source) {
        Logic::Operation { op: "filter", args } => {
            let collection = match args.first().map(Logic::of) {
                Some(Logic::Operation { op, args }) if index.is_var_key(op) => var_path(args),
                _ => None,
            };
            match collection {
                Some(path) => FieldOperand::FilteredCollection {
                    path,
                    having: args.get(1),
                },
                None => FieldOperand::NoMatch,
            }
        }
        Logic::Operation { op, args } if index.is_var_key(op) => match var_path(args) {
            Some(path) => FieldOperand::FilteredCollection { path, having: None },
            None => FieldOperand::NoMatch,
        },
        _ => FieldOperand::NoMatch,
    }
}

fn var_path(args: &[Value]) -> Option<&str> {
    match args.first() {
        Some(Value::String(path)) if !path.is_empty() => Some(path),
        _ => None,
    }
}

fn is_number(value: &Value, expected: f64) -> bool {
    value.as_f64() == Some(expected)
}

// {"+": [1, {"var": "accumulator"}]}
fn is_increment(value: &Value) -> bool {
    match Logic::of(value) {
        Logic::Operation { op: "+", args } => match args {
            [step, acc] => {
                let acc = Logic::of(acc);
                is_number(step, 1.0)
                    && acc.op() == Some("var")
                    && acc.args().first().and_then(Value::as_str) == Some("accumulator")
            }
            _ => false,
        },
        _ => false,
    }
}
