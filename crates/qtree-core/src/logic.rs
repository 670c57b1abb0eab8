//! Logic expression view
//!
//! Logic expressions arrive as plain JSON. An operation is an object with
//! exactly one key (the operator, function or conjunction name) mapped to its
//! argument list; a single non-list argument counts as a one-element list.
//! Everything else is a literal.
//!
//! ```text
//! {"==": [{"var": "age"}, 18]}   -> Operation { op: "==", args: [{"var": "age"}, 18] }
//! {"var": "age"}                 -> Operation { op: "var", args: ["age"] }
//! "hello", 42, [1, 2], null      -> Literal
//! ```

use serde_json::Value;
use std::slice;

/// Borrowed, classified view over a logic expression
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Logic<'a> {
    /// Terminal value (string, number, boolean, null, array, or multi-key object)
    Literal(&'a Value),
    /// Single-key operation
    Operation {
        /// Operator / function / conjunction name
        op: &'a str,
        /// Normalized argument list
        args: &'a [Value],
    },
}

impl<'a> Logic<'a> {
    /// Classify a JSON value
    pub fn of(value: &'a Value) -> Self {
        match value {
            Value::Object(map) if map.len() == 1 => match map.iter().next() {
                Some((op, raw)) => {
                    let args = match raw {
                        Value::Array(items) => items.as_slice(),
                        other => slice::from_ref(other),
                    };
                    Logic::Operation { op: op.as_str(), args }
                }
                None => Logic::Literal(value),
            },
            _ => Logic::Literal(value),
        }
    }

    /// Operator name, if this is an operation
    pub fn op(&self) -> Option<&'a str> {
        match self {
            Logic::Operation { op, .. } => Some(*op),
            Logic::Literal(_) => None,
        }
    }

    /// Argument list (empty for literals)
    pub fn args(&self) -> &'a [Value] {
        match self {
            Logic::Operation { args, .. } => *args,
            Logic::Literal(_) => &[],
        }
    }

    /// Returns true if this is an operation
    pub fn is_operation(&self) -> bool {
        matches!(self, Logic::Operation { .. })
    }
}

/// Returns true if the value is a single-key operation
pub fn is_logic(value: &Value) -> bool {
    matches!(value, Value::Object(map) if map.len() == 1)
}

/// Operator name of a single-key operation
pub fn op_of(value: &Value) -> Option<&str> {
    Logic::of(value).op()
}

/// Loose truthiness used when deciding whether a value is "present"
///
/// `null`, `false`, `0`, `NaN` and `""` are falsy, everything else is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
