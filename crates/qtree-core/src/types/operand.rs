//! Operand descriptors
//!
//! An operand is one converted argument of a rule: a literal value, a
//! reference to another field, or a function call whose own arguments are
//! operands.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Where an operand value comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSrc {
    /// Literal value
    Value,
    /// Another field
    Field,
    /// Function call
    Func,
}

/// Operand payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OperandValue {
    /// Literal JSON value (strings, numbers, lists, formatted dates ...)
    Literal(Value),
    /// Date kept as a date because the widget declares no value format
    Date(DateTime<Utc>),
    /// Field path
    Field(String),
    /// Function call
    Func(FuncValue),
}

/// Converted function call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuncValue {
    /// Function key in the schema configuration
    pub func: String,
    /// Arguments by name, in declaration order
    pub args: IndexMap<String, Operand>,
}

/// A converted argument
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Operand {
    pub value_src: ValueSrc,
    pub value: OperandValue,
    pub value_type: Option<String>,
    /// Values to resolve asynchronously before display
    #[serde(skip_serializing_if = "Option::is_none")]
    pub async_list_values: Option<Vec<Value>>,
}

impl Operand {
    /// Create a literal operand
    pub fn literal(value: Value, value_type: impl Into<String>) -> Self {
        Self {
            value_src: ValueSrc::Value,
            value: OperandValue::Literal(value),
            value_type: Some(value_type.into()),
            async_list_values: None,
        }
    }

    /// Create a date operand
    pub fn date(value: DateTime<Utc>, value_type: impl Into<String>) -> Self {
        Self {
            value_src: ValueSrc::Value,
            value: OperandValue::Date(value),
            value_type: Some(value_type.into()),
            async_list_values: None,
        }
    }

    /// Create a field reference operand
    pub fn field(path: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            value_src: ValueSrc::Field,
            value: OperandValue::Field(path.into()),
            value_type: Some(field_type.into()),
            async_list_values: None,
        }
    }

    /// Create a function call operand
    pub fn func(func: FuncValue, return_type: impl Into<String>) -> Self {
        Self {
            value_src: ValueSrc::Func,
            value: OperandValue::Func(func),
            value_type: Some(return_type.into()),
            async_list_values: None,
        }
    }

    /// Attach values for asynchronous resolution
    pub fn with_async_list_values(mut self, values: Vec<Value>) -> Self {
        self.async_list_values = Some(values);
        self
    }

    /// Literal JSON value, if this is a literal
    pub fn as_literal(&self) -> Option<&Value> {
        match &self.value {
            OperandValue::Literal(v) => Some(v),
            _ => None,
        }
    }

    /// Field path, if this is a field reference
    pub fn as_field(&self) -> Option<&str> {
        match &self.value {
            OperandValue::Field(path) => Some(path),
            _ => None,
        }
    }

    /// Function call, if this is a function operand
    pub fn as_func(&self) -> Option<&FuncValue> {
        match &self.value {
            OperandValue::Func(func) => Some(func),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_literal_operand() {
        let op = Operand::literal(json!(42), "number");
        assert_eq!(op.value_src, ValueSrc::Value);
        assert_eq!(op.as_literal(), Some(&json!(42)));
        assert_eq!(op.as_field(), None);
        assert_eq!(op.value_type.as_deref(), Some("number"));
    }

    #[test]
    fn test_field_operand_serde() {
        let op = Operand::field("user.name", "text");
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(
            json,
            json!({"valueSrc": "field", "value": "user.name", "valueType": "text"})
        );
    }

    #[test]
    fn test_func_operand_serde() {
        let mut args = IndexMap::new();
        args.insert("str".to_string(), Operand::field("name", "text"));
        let op = Operand::func(
            FuncValue {
                func: "LOWER".to_string(),
                args,
            },
            "text",
        );
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json["valueSrc"], json!("func"));
        assert_eq!(json["value"]["func"], json!("LOWER"));
        assert_eq!(json["value"]["args"]["str"]["value"], json!("name"));
    }

    #[test]
    fn test_async_list_values_skipped_when_absent() {
        let op = Operand::literal(json!(["a"]), "multiselect");
        let json = serde_json::to_string(&op).unwrap();
        assert!(!json.contains("asyncListValues"));

        let op = op.with_async_list_values(vec![json!("a")]);
        let json = serde_json::to_string(&op).unwrap();
        assert!(json.contains("asyncListValues"));
    }
}
