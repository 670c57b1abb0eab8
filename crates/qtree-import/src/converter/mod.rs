//! Logic expression converter
//!
//! [`Converter`] walks a logic expression top-down in one of two contexts:
//!
//! - **rule** context: the expression must become a query tree node. It is
//!   tried as a conjunction, then as a rule.
//! - **value** context: the expression must become an operand. It is tried as
//!   a field reference, then as a function call, then as a literal value.
//!
//! `{"!": X}` converts `X` with negation toggled, except when `X` reads a
//! field directly (`{"!": {"var": "name"}}` is an emptiness test and is a
//! rule of its own).
//!
//! Failures never abort the run: they are recorded in [`Diagnostics`] and the
//! failing subtree is left out of its parent.

mod conj;
mod func;
mod rule;
mod value;
mod wrap;

pub use conj::top_level_fields;

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::index::LookupIndex;
use qtree_core::logic::{is_truthy, Logic};
use qtree_core::types::FuncArgConfig;
use qtree_core::{
    FieldConfig, FieldResolver, IdGenerator, MomentFormatter, Node, Operand, QueryTree,
    SchemaConfig, UuidIds, ValueFormatter, WidgetSelector,
};
use serde_json::Value;
use std::borrow::Cow;

/// Conjunction used when the configuration declares none
const FALLBACK_CONJUNCTION: &str = "AND";

/// Typing context for values
#[derive(Debug, Clone, PartialEq)]
pub struct ValueTarget<'c> {
    /// Field or argument type (`text`, `date`, `time` ...)
    pub value_type: &'c str,
    /// Widget used when no explicit one is given
    pub main_widget: &'c str,
    /// Widget chosen for the rule's operator
    pub widget: Option<String>,
    /// Values are fetched asynchronously
    pub async_fetch: bool,
}

impl<'c> ValueTarget<'c> {
    /// Values of a rule on `field`, rendered with `widget`
    pub fn field(field: &'c FieldConfig, widget: Option<String>) -> Self {
        Self {
            value_type: &field.field_type,
            main_widget: field.main_widget(),
            widget,
            async_fetch: field.field_settings.async_fetch,
        }
    }

    /// Values of a function argument
    pub fn arg(arg: &'c FuncArgConfig) -> Self {
        Self {
            value_type: &arg.value_type,
            main_widget: arg.main_widget(),
            widget: None,
            async_fetch: arg.field_settings.async_fetch,
        }
    }

    /// Widget name the value is typed by
    pub fn widget_name(&self) -> &str {
        self.widget.as_deref().unwrap_or(self.main_widget)
    }
}

/// Grammar context of a conversion
#[derive(Debug, Clone, Copy)]
pub enum Expected<'t, 'c> {
    Rule,
    Value(&'t ValueTarget<'c>),
}

/// Result of a conversion
#[derive(Debug, Clone, PartialEq)]
pub enum Converted {
    Node(Node),
    Operand(Operand),
}

/// Outcome of one converter branch
///
/// `Failed` means the branch recognized the expression but could not convert
/// it; a diagnostic has been recorded and no other branch is tried.
#[derive(Debug)]
pub(crate) enum Attempt<T> {
    NoMatch,
    Matched(T),
    Failed,
}

impl<T> Attempt<T> {
    fn or_else(self, next: impl FnOnce() -> Attempt<T>) -> Attempt<T> {
        match self {
            Attempt::NoMatch => next(),
            other => other,
        }
    }

    fn into_option(self) -> Option<T> {
        match self {
            Attempt::Matched(value) => Some(value),
            Attempt::NoMatch | Attempt::Failed => None,
        }
    }
}

/// Result of a top-level import
#[derive(Debug, Clone, Default)]
pub struct ImportOutcome {
    /// Converted tree, absent when nothing could be converted
    pub tree: Option<QueryTree>,
    pub diagnostics: Diagnostics,
}

impl ImportOutcome {
    /// Returns true if conversion recorded no problem
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Converts logic expressions into query trees
pub struct Converter<'a> {
    config: &'a SchemaConfig,
    index: Cow<'a, LookupIndex>,
    fields: &'a dyn FieldResolver,
    widgets: &'a dyn WidgetSelector,
    ids: &'a dyn IdGenerator,
    formatter: &'a dyn ValueFormatter,
}

impl<'a> Converter<'a> {
    /// Create a converter using the schema itself for field and widget
    /// lookups, random ids and moment-style formatting
    pub fn new(config: &'a SchemaConfig) -> Self {
        Self::with_index(config, Cow::Owned(LookupIndex::build(config)))
    }

    /// Create a converter over an index already built from `config`
    pub fn from_index(config: &'a SchemaConfig, index: &'a LookupIndex) -> Self {
        Self::with_index(config, Cow::Borrowed(index))
    }

    fn with_index(config: &'a SchemaConfig, index: Cow<'a, LookupIndex>) -> Self {
        Self {
            config,
            index,
            fields: config,
            widgets: config,
            ids: &UuidIds,
            formatter: &MomentFormatter,
        }
    }

    pub fn with_field_resolver(mut self, fields: &'a dyn FieldResolver) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_widget_selector(mut self, widgets: &'a dyn WidgetSelector) -> Self {
        self.widgets = widgets;
        self
    }

    pub fn with_ids(mut self, ids: &'a dyn IdGenerator) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_formatter(mut self, formatter: &'a dyn ValueFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn index(&self) -> &LookupIndex {
        &self.index
    }

    /// Convert a whole expression into a query tree
    ///
    /// Falsy expressions (`null`, `false`, `""`, `0`) yield no tree and no
    /// diagnostics. A result that is not a group is wrapped into one using
    /// the default conjunction.
    pub fn import_tree(&self, expr: &Value) -> ImportOutcome {
        let mut diagnostics = Diagnostics::new();
        if !is_truthy(expr) {
            return ImportOutcome {
                tree: None,
                diagnostics,
            };
        }

        log::debug!("Converting logic expression {}", expr);
        let tree = self
            .convert_rule(expr, false, None, &mut diagnostics)
            .map(|node| match node {
                Node::Group(group) => QueryTree::new(group),
                other => QueryTree::new(self.wrap_in_default_conj(other, false)),
            });

        ImportOutcome { tree, diagnostics }
    }

    /// Convert an expression in the given context
    pub fn convert(
        &self,
        expr: &Value,
        expected: Expected<'_, '_>,
        negated: bool,
        parent: Option<&str>,
        diags: &mut Diagnostics,
    ) -> Option<Converted> {
        let logic = Logic::of(expr);
        let is_not = logic.op() == Some("!");

        if is_not && !self.is_emptiness_test(logic.args()) {
            if let Some(inner) = logic.args().first() {
                log::trace!("Folding negation of {}", inner);
                return self.convert(inner, expected, !negated, parent, diags);
            }
        }

        let before = diags.len();
        let converted = match expected {
            Expected::Value(target) => self
                .convert_field(logic, parent, diags)
                .or_else(|| self.convert_func(expr, logic, target, parent, diags))
                .or_else(|| self.convert_val(expr, target, diags))
                .into_option()
                .map(Converted::Operand),
            Expected::Rule => self
                .convert_conj(logic, negated, parent, diags)
                .or_else(|| self.convert_op(expr, logic, negated, parent, diags))
                .into_option()
                .map(Converted::Node),
        };

        if converted.is_none() && !is_not && diags.len() == before {
            diags.record(
                DiagnosticKind::UnrecognizedExpression,
                format!("Can't parse logic {}", expr),
            );
        }
        converted
    }

    /// Convert in rule context
    pub fn convert_rule(
        &self,
        expr: &Value,
        negated: bool,
        parent: Option<&str>,
        diags: &mut Diagnostics,
    ) -> Option<Node> {
        match self.convert(expr, Expected::Rule, negated, parent, diags)? {
            Converted::Node(node) => Some(node),
            Converted::Operand(_) => None,
        }
    }

    /// Convert in value context
    pub fn convert_value(
        &self,
        expr: &Value,
        target: &ValueTarget<'_>,
        parent: Option<&str>,
        diags: &mut Diagnostics,
    ) -> Option<Operand> {
        match self.convert(expr, Expected::Value(target), false, parent, diags)? {
            Converted::Operand(operand) => Some(operand),
            Converted::Node(_) => None,
        }
    }

    // {"!": {"var": "name"}}
    fn is_emptiness_test(&self, args: &[Value]) -> bool {
        match args {
            [only] => Logic::of(only)
                .op()
                .map_or(false, |op| self.index.is_var_key(op)),
            _ => false,
        }
    }

    /// Parent path joined with a relative path, normalized
    fn compose_path(&self, parent: Option<&str>, path: &str) -> String {
        match parent {
            Some(parent) => {
                let joined = format!("{}{}{}", parent, self.config.field_separator(), path);
                self.fields.normalize(&joined)
            }
            None => self.fields.normalize(path),
        }
    }

    fn default_conjunction(&self) -> &str {
        self.config
            .default_conjunction()
            .unwrap_or(FALLBACK_CONJUNCTION)
    }

    fn default_group_conjunction<'s>(&'s self, field: Option<&'s FieldConfig>) -> &'s str {
        self.config
            .default_group_conjunction(field)
            .unwrap_or(FALLBACK_CONJUNCTION)
    }
}

/// Import an expression with the default collaborators
pub fn import_tree(expr: &Value, config: &SchemaConfig) -> ImportOutcome {
    Converter::new(config).import_tree(expr)
}
