//! Schema configuration
//!
//! The schema configuration drives the whole import: it names the fields that
//! may appear in a query, the operators and functions recognized in logic
//! expressions, the widgets that type argument values, the conjunctions, and
//! the global settings. It is read-only input; the importer never mutates or
//! validates it.
//!
//! All maps keep declaration order. When several operators share one external
//! name the first declared one wins, and function arguments are matched by
//! position in declaration order.

use crate::collab::ImporterHook;
use crate::error::{CoreError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field type of nested collections
pub const GROUP_TYPE: &str = "!group";

/// Field type of nested structs
pub const STRUCT_TYPE: &str = "!struct";

/// The complete schema configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchemaConfig {
    /// Conjunctions (AND / OR ...)
    pub conjunctions: IndexMap<String, ConjunctionConfig>,

    /// Operators by key
    pub operators: IndexMap<String, OperatorConfig>,

    /// Functions by key
    pub funcs: IndexMap<String, FuncConfig>,

    /// Top-level fields; nested fields live in `subfields`
    pub fields: IndexMap<String, FieldConfig>,

    /// Widgets by name
    pub widgets: IndexMap<String, WidgetConfig>,

    /// Global settings
    pub settings: Settings,
}

/// Conjunction definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConjunctionConfig {
    pub label: Option<String>,
}

/// Operator definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OperatorConfig {
    pub label: Option<String>,

    /// Operator name in logic expressions (e.g. `"=="`, `"in"`, `"some"`)
    pub json_logic: Option<String>,

    /// Secondary name used when the primary one is not a plain string
    /// (e.g. `"all-in"` for multiselect containment)
    pub json_logic2: Option<String>,

    /// The expression lists the value before the field (`{"in": [value, field]}`)
    #[serde(alias = "_jsonLogicIsRevArgs")]
    pub json_logic_is_rev_args: bool,

    /// Number of value arguments (default 1)
    pub cardinality: Option<usize>,

    /// Logical inverse operator key
    pub reversed_op: Option<String>,
}

impl OperatorConfig {
    /// Declared cardinality, defaulting to 1
    pub fn cardinality(&self) -> usize {
        self.cardinality.unwrap_or(1)
    }
}

/// Function definition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FuncConfig {
    pub label: Option<String>,

    /// Function name in logic expressions
    pub json_logic: Option<String>,

    /// Called with method syntax: `{"method": [obj, name, ...args]}`
    pub json_logic_is_method: bool,

    /// Type of the returned value
    pub return_type: String,

    /// Arguments in positional order
    pub args: IndexMap<String, FuncArgConfig>,

    /// Custom importer for expressions that do not follow the plain call shape
    #[serde(skip)]
    pub importer: Option<ImporterHook>,
}

/// Function argument definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FuncArgConfig {
    pub label: Option<String>,

    #[serde(rename = "type")]
    pub value_type: String,

    /// Used when the argument is missing or cannot be converted
    pub default_value: Option<Value>,

    pub main_widget: Option<String>,

    pub field_settings: FieldSettings,
}

impl FuncArgConfig {
    /// Widget used for argument values: explicit main widget, else the type name
    pub fn main_widget(&self) -> &str {
        self.main_widget.as_deref().unwrap_or(&self.value_type)
    }
}

/// Nested collection / struct mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupMode {
    /// Plain nested object
    Struct,
    /// Existential match over the collection (`some` of elements ...)
    Some,
    /// Collection compared as a whole (count, all, none ...)
    Array,
}

/// Field definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldConfig {
    pub label: Option<String>,

    /// Field type (`text`, `number`, `date`, `time`, `!group`, `!struct` ...)
    #[serde(rename = "type")]
    pub field_type: String,

    /// Operators allowed on this field (all operators when absent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operators: Option<Vec<String>>,

    pub main_widget: Option<String>,

    /// Per-widget settings
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub widgets: IndexMap<String, FieldWidgetConfig>,

    /// Mode for `!group` fields
    pub mode: Option<GroupMode>,

    /// Overrides `settings.showNot`
    pub show_not: Option<bool>,

    /// Default conjunction for rule groups on this field
    pub default_conjunction: Option<String>,

    pub field_settings: FieldSettings,

    /// Nested fields of `!group` / `!struct` fields
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub subfields: IndexMap<String, FieldConfig>,
}

impl FieldConfig {
    /// Create a field of the given type
    pub fn new(field_type: impl Into<String>) -> Self {
        Self {
            field_type: field_type.into(),
            ..Default::default()
        }
    }

    /// Create a nested collection field
    pub fn group(mode: GroupMode) -> Self {
        Self {
            field_type: GROUP_TYPE.to_string(),
            mode: Some(mode),
            ..Default::default()
        }
    }

    /// Restrict allowed operators
    pub fn with_operators<I, S>(mut self, operators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.operators = Some(operators.into_iter().map(Into::into).collect());
        self
    }

    /// Add a nested field
    pub fn with_subfield(mut self, name: impl Into<String>, field: FieldConfig) -> Self {
        self.subfields.insert(name.into(), field);
        self
    }

    /// Set the main widget
    pub fn with_main_widget(mut self, widget: impl Into<String>) -> Self {
        self.main_widget = Some(widget.into());
        self
    }

    /// Mark values as fetched asynchronously
    pub fn with_async_fetch(mut self) -> Self {
        self.field_settings.async_fetch = true;
        self
    }

    /// Returns true for nested collections
    pub fn is_group(&self) -> bool {
        self.field_type == GROUP_TYPE
    }

    /// Returns true for nested collections in `array` mode
    pub fn is_array_group(&self) -> bool {
        self.is_group() && self.mode == Some(GroupMode::Array)
    }

    /// Widget used for values: explicit main widget, else the type name
    pub fn main_widget(&self) -> &str {
        self.main_widget.as_deref().unwrap_or(&self.field_type)
    }

    /// Returns true if the operator may be used on this field
    pub fn allows_operator(&self, operator: &str) -> bool {
        match &self.operators {
            Some(ops) => ops.iter().any(|op| op == operator),
            None => true,
        }
    }
}

/// Per-field widget settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldWidgetConfig {
    /// Operators rendered with this widget
    pub operators: Vec<String>,
}

/// Field value settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldSettings {
    /// List values are fetched asynchronously by the UI
    pub async_fetch: bool,
}

/// Widget definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetConfig {
    /// Value type produced by the widget
    #[serde(rename = "type")]
    pub value_type: String,

    /// Moment-style format for date/time values (e.g. `YYYY-MM-DD`)
    pub value_format: Option<String>,
}

/// Global settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Separator of compound field paths
    pub field_separator: String,

    pub default_conjunction: Option<String>,

    pub default_group_conjunction: Option<String>,

    /// Operators over nested collections whose cardinality is always 0
    pub group_operators: Vec<String>,

    /// Whether the UI shows a NOT toggle
    pub show_not: bool,

    pub json_logic: JsonLogicSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            field_separator: ".".to_string(),
            default_conjunction: None,
            default_group_conjunction: None,
            group_operators: vec!["some".to_string(), "all".to_string(), "none".to_string()],
            show_not: true,
            json_logic: JsonLogicSettings::default(),
        }
    }
}

/// Variable-access keys
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JsonLogicSettings {
    /// Key used to read fields of collection elements
    pub group_var_key: String,

    /// Alternative variable-access key
    pub alt_var_key: String,
}

impl Default for JsonLogicSettings {
    fn default() -> Self {
        Self {
            group_var_key: "var".to_string(),
            alt_var_key: "$".to_string(),
        }
    }
}

impl SchemaConfig {
    /// Create an empty configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a conjunction
    pub fn with_conjunction(mut self, key: impl Into<String>) -> Self {
        self.conjunctions.insert(key.into(), ConjunctionConfig::default());
        self
    }

    /// Add an operator
    pub fn with_operator(mut self, key: impl Into<String>, operator: OperatorConfig) -> Self {
        self.operators.insert(key.into(), operator);
        self
    }

    /// Add a function
    pub fn with_func(mut self, key: impl Into<String>, func: FuncConfig) -> Self {
        self.funcs.insert(key.into(), func);
        self
    }

    /// Add a top-level field
    pub fn with_field(mut self, name: impl Into<String>, field: FieldConfig) -> Self {
        self.fields.insert(name.into(), field);
        self
    }

    /// Add a widget
    pub fn with_widget(mut self, name: impl Into<String>, widget: WidgetConfig) -> Self {
        self.widgets.insert(name.into(), widget);
        self
    }

    /// Attach a custom importer to a configured function
    ///
    /// Importers cannot be expressed in YAML/JSON, so they are attached after
    /// the configuration has been loaded.
    pub fn set_func_importer(&mut self, func_key: &str, hook: ImporterHook) -> Result<()> {
        let func = self
            .funcs
            .get_mut(func_key)
            .ok_or_else(|| CoreError::FuncNotFound(func_key.to_string()))?;
        func.importer = Some(hook);
        Ok(())
    }

    /// Path separator
    pub fn field_separator(&self) -> &str {
        &self.settings.field_separator
    }

    pub fn operator(&self, key: &str) -> Option<&OperatorConfig> {
        self.operators.get(key)
    }

    pub fn func(&self, key: &str) -> Option<&FuncConfig> {
        self.funcs.get(key)
    }

    pub fn widget(&self, name: &str) -> Option<&WidgetConfig> {
        self.widgets.get(name)
    }

    /// Default conjunction: configured one, else the first declared
    pub fn default_conjunction(&self) -> Option<&str> {
        self.settings
            .default_conjunction
            .as_deref()
            .or_else(|| self.conjunctions.keys().next().map(String::as_str))
    }

    /// Default conjunction of rule groups on `field`
    pub fn default_group_conjunction<'s>(&'s self, field: Option<&'s FieldConfig>) -> Option<&'s str> {
        field
            .and_then(|f| f.default_conjunction.as_deref())
            .or(self.settings.default_group_conjunction.as_deref())
            .or_else(|| self.default_conjunction())
    }

    /// Whether the NOT toggle is visible for `field`
    pub fn show_not(&self, field: &FieldConfig) -> bool {
        field.show_not.unwrap_or(self.settings.show_not)
    }
}
