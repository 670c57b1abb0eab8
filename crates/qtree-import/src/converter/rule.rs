//! Rules
//!
//! A rule expression is `{<op>: [field, values...]}`. Finding the rule means
//! finding the operator key for the expression name and cardinality, the
//! field operand and the value operands:
//!
//! - group operators (`some`, `all`, `none`) always have cardinality 0 and
//!   take their first value as the "having" clause;
//! - `{"all": [list, {"in": [item, values]}]}` is `all-in(list, values)`;
//! - `{"<": [0, {"var": "age"}, 100]}` has its field in the middle;
//! - operators declared with reversed arguments have their field second.

use super::{Attempt, Converter, ValueTarget};
use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::index::OpSignature;
use crate::recognize::{recognize, FieldOperand};
use qtree_core::logic::{op_of, Logic};
use qtree_core::{FieldConfig, GroupMode, Node, Operand, RuleGroupNode, RuleNode};
use serde_json::Value;

const RANGE_OPS: [&str; 4] = ["<", "<=", ">", ">="];

/// A rule expression matched against the schema
#[derive(Debug)]
pub(crate) struct ParsedRule<'e, 'c> {
    pub field: String,
    pub field_config: &'c FieldConfig,
    pub op_key: String,
    pub args: Vec<&'e Value>,
    pub having: Option<&'e Value>,
}

impl<'a> Converter<'a> {
    /// Rule expression as a rule, a rule group, or a negated group around one
    pub(crate) fn convert_op(
        &self,
        expr: &Value,
        logic: Logic<'_>,
        negated: bool,
        parent: Option<&str>,
        diags: &mut Diagnostics,
    ) -> Attempt<Node> {
        let Logic::Operation { op, args } = logic else {
            return Attempt::NoMatch;
        };

        let arity = args.len();
        let mut values: Vec<&Value> = args.iter().collect();
        let mut op = op.to_string();
        if op == "all" {
            if let Some(Logic::Operation { op: "in", args: in_args }) = args.get(1).map(Logic::of) {
                if let [_, list, ..] = in_args {
                    values = vec![&args[0], list];
                    op = "all-in".to_string();
                }
            }
        }

        let Some(parsed) = self.parse_rule(expr, &op, arity, &values, parent, diags) else {
            return Attempt::Failed;
        };
        match self.assemble_rule(parsed, negated, parent, diags) {
            Some(node) => Attempt::Matched(node),
            None => Attempt::Failed,
        }
    }

    /// Match the expression directly, then with reversed arguments
    ///
    /// Records one diagnostic when neither form matches.
    pub(crate) fn parse_rule<'e>(
        &self,
        expr: &Value,
        op: &str,
        arity: usize,
        values: &[&'e Value],
        parent: Option<&str>,
        diags: &mut Diagnostics,
    ) -> Option<ParsedRule<'e, 'a>> {
        let mut errors: Vec<Diagnostic> = Vec::new();
        let parsed = self
            .try_parse_rule(op, arity, values, parent, false, &mut errors)
            .or_else(|| self.try_parse_rule(op, arity, values, parent, true, &mut errors));

        if parsed.is_none() {
            let diagnostic = match errors.first() {
                Some(first) => Diagnostic::new(
                    first.kind,
                    errors
                        .iter()
                        .map(|e| e.message.as_str())
                        .collect::<Vec<_>>()
                        .join("; "),
                ),
                None => Diagnostic::new(
                    DiagnosticKind::UnrecognizedExpression,
                    format!("Unknown op {}/{}", op, arity),
                )
                .with_context(expr.to_string()),
            };
            diags.push(diagnostic);
        }
        parsed
    }

    fn try_parse_rule<'e>(
        &self,
        op: &str,
        arity: usize,
        values: &[&'e Value],
        parent: Option<&str>,
        reversed: bool,
        errors: &mut Vec<Diagnostic>,
    ) -> Option<ParsedRule<'e, 'a>> {
        let is_all_in = op == "all" && values.get(1).and_then(|v| op_of(v)) == Some("in");
        let is_group_op = !is_all_in && self.config.settings.group_operators.iter().any(|g| g == op);
        let cardinality = if is_group_op { 0 } else { arity.checked_sub(1)? };

        let signature = OpSignature::new(op, cardinality, reversed);
        let candidates = self.index.operators(&signature);
        if candidates.is_empty() {
            return None;
        }
        log::trace!("Operator signature {} matches {:?}", signature, candidates);

        let (field_expr, mut args): (Option<&'e Value>, Vec<&'e Value>) =
            if RANGE_OPS.contains(&op) && arity == 3 {
                (values.get(1).copied(), vec![values[0], values[2]])
            } else if reversed {
                (values.get(1).copied(), values.first().copied().into_iter().collect())
            } else {
                (values.first().copied(), values.iter().skip(1).copied().collect())
            };

        let Some(field_expr) = field_expr.filter(|f| Logic::of(f).is_operation()) else {
            errors.push(Diagnostic::new(
                DiagnosticKind::UnrecognizedExpression,
                format!(
                    "Incorrect operands for {}: {}",
                    op,
                    serde_json::to_string(values).unwrap_or_default()
                ),
            ));
            return None;
        };

        let mut having = None;
        if is_group_op {
            having = args.first().copied();
            args.clear();
        }
        let path = match recognize(field_expr, &self.index) {
            FieldOperand::DirectVar(path) => path,
            FieldOperand::FilteredCollection { path, having: filter } => {
                if filter.is_some() {
                    having = filter;
                }
                path
            }
            FieldOperand::NoMatch => {
                errors.push(Diagnostic::new(
                    DiagnosticKind::UnrecognizedExpression,
                    format!("Unknown field {}", field_expr),
                ));
                return None;
            }
        };

        let field = self.compose_path(parent, path);
        let fields = self.fields;
        let Some(field_config) = fields.resolve(&field) else {
            errors.push(Diagnostic::new(
                DiagnosticKind::UnresolvedReference,
                format!("No config for field {}", field),
            ));
            return None;
        };

        let op_key = if candidates.len() > 1 && field_config.operators.is_some() {
            match candidates.iter().find(|key| field_config.allows_operator(key)) {
                Some(key) => key.clone(),
                None => {
                    errors.push(Diagnostic::new(
                        DiagnosticKind::UnresolvedReference,
                        format!("No corresponding ops for field {}", field),
                    ));
                    return None;
                }
            }
        } else {
            candidates[0].clone()
        };

        Some(ParsedRule {
            field,
            field_config,
            op_key,
            args,
            having,
        })
    }

    /// Build the node for a parsed rule, applying negation
    fn assemble_rule(
        &self,
        parsed: ParsedRule<'_, 'a>,
        negated: bool,
        parent: Option<&str>,
        diags: &mut Diagnostics,
    ) -> Option<Node> {
        let ParsedRule {
            field,
            field_config,
            mut op_key,
            args,
            mut having,
        } = parsed;
        let mut negated = negated;

        // an array-mode group with a visible NOT keeps negation on itself
        let can_reverse = !(field_config.is_array_group() && self.config.show_not(field_config));

        if field_config.is_group() {
            if let Some(Logic::Operation { op: "!", args: inner }) = having.map(Logic::of) {
                negated = !negated;
                having = inner.first();
            }
        }

        if negated && can_reverse {
            let reversed = self
                .config
                .operator(&op_key)
                .and_then(|op| op.reversed_op.clone());
            if let Some(reversed) = reversed {
                log::trace!("Using reversed operator {} for negated {}", reversed, op_key);
                op_key = reversed;
                negated = false;
            }
        }

        let widget = self.widgets.widget_for(&field, &op_key);
        let target = ValueTarget::field(field_config, widget);
        let mut operands: Vec<Operand> = Vec::with_capacity(args.len());
        for arg in args {
            operands.push(self.convert_value(arg, &target, parent, diags)?);
        }

        let own_not = if can_reverse { false } else { negated };
        let node: Node = if field_config.is_group() {
            let mut group = match having {
                Some(having) => self.convert_having(having, &field, field_config, diags)?,
                None => RuleGroupNode::new(
                    self.ids.next_id(),
                    field.as_str(),
                    self.default_group_conjunction(Some(field_config)),
                ),
            };
            group.properties.field = field;
            group.properties.mode = field_config.mode;
            group.properties.not = own_not;
            group.properties.operator = Some(op_key);
            if field_config.mode == Some(GroupMode::Array) {
                group.properties.args = operands;
            }
            group.into()
        } else {
            let async_list_values = operands
                .iter()
                .find_map(|operand| operand.async_list_values.clone());
            let mut rule = RuleNode::new(self.ids.next_id(), field, op_key).with_args(operands);
            rule.properties.async_list_values = async_list_values;
            rule.into()
        };

        if negated && can_reverse {
            return Some(self.wrap_in_default_conj(node, true).into());
        }
        Some(node)
    }

    /// Having clause of a rule on a nested collection, converted with the
    /// collection as parent path
    fn convert_having(
        &self,
        having: &Value,
        field: &str,
        field_config: &FieldConfig,
        diags: &mut Diagnostics,
    ) -> Option<RuleGroupNode> {
        let logic = Logic::of(having);
        let is_conjunction = logic
            .op()
            .and_then(|op| self.index.conjunction(op))
            .is_some();

        let node = if is_conjunction {
            self.convert_conj(logic, false, Some(field), diags).into_option()?
        } else {
            let rule = self.convert_rule(having, false, Some(field), diags)?;
            self.wrap_in_default_conj_rule_group(rule, field, field_config, self.index.conjunction("and"))
                .into()
        };
        Some(self.rehome(node, field, field_config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qtree_core::types::OperatorConfig;
    use qtree_core::{SchemaConfig, SequentialIds, WidgetConfig};
    use serde_json::json;

    fn op(json_logic: &str, cardinality: Option<usize>, rev: bool) -> OperatorConfig {
        OperatorConfig {
            json_logic: Some(json_logic.to_string()),
            cardinality,
            json_logic_is_rev_args: rev,
            ..Default::default()
        }
    }

    fn config() -> SchemaConfig {
        SchemaConfig::new()
            .with_conjunction("AND")
            .with_conjunction("OR")
            .with_operator("equal", op("==", None, false))
            .with_operator("select_equals", op("==", None, false))
            .with_operator("between", op("<=", Some(2), false))
            .with_operator("select_any_in", op("in", None, true))
            .with_widget(
                "number",
                WidgetConfig {
                    value_type: "number".to_string(),
                    value_format: None,
                },
            )
            .with_field("age", FieldConfig::new("number"))
            .with_field("color", FieldConfig::new("select").with_operators(["select_equals", "select_any_in"]))
            .with_field("flag", FieldConfig::new("boolean").with_operators(["is_true"]))
    }

    fn parse(config: &SchemaConfig, expr: Value) -> (Option<(String, String, usize)>, Diagnostics) {
        let ids = SequentialIds::new();
        let converter = Converter::new(config).with_ids(&ids);
        let mut diags = Diagnostics::new();
        let logic = Logic::of(&expr);
        let op = logic.op().unwrap_or_default();
        let values: Vec<&Value> = logic.args().iter().collect();
        let parsed = converter
            .parse_rule(&expr, op, values.len(), &values, None, &mut diags)
            .map(|p| (p.field, p.op_key, p.args.len()));
        (parsed, diags)
    }

    #[test]
    fn test_parse_direct() {
        let config = config();
        let (parsed, diags) = parse(&config, json!({"==": [{"var": "age"}, 5]}));
        assert!(diags.is_empty());
        assert_eq!(parsed, Some(("age".to_string(), "equal".to_string(), 1)));
    }

    #[test]
    fn test_parse_range_middle_field() {
        let config = config();
        let (parsed, _) = parse(&config, json!({"<=": [1, {"var": "age"}, 9]}));
        assert_eq!(parsed, Some(("age".to_string(), "between".to_string(), 2)));
    }

    #[test]
    fn test_parse_reversed() {
        let config = config();
        let (parsed, diags) = parse(&config, json!({"in": [["red"], {"var": "color"}]}));
        assert!(diags.is_empty());
        assert_eq!(parsed, Some(("color".to_string(), "select_any_in".to_string(), 1)));
    }

    #[test]
    fn test_parse_disambiguates_by_field_operators() {
        let config = config();
        let (parsed, _) = parse(&config, json!({"==": [{"var": "color"}, "red"]}));
        assert_eq!(parsed.map(|p| p.1), Some("select_equals".to_string()));

        let (parsed, diags) = parse(&config, json!({"==": [{"var": "flag"}, true]}));
        assert!(parsed.is_none());
        assert_eq!(diags.messages(), vec!["No corresponding ops for field flag"]);
    }

    #[test]
    fn test_parse_unknown_op() {
        let config = config();
        let (parsed, diags) = parse(&config, json!({"foo": [1, 2, 3]}));
        assert!(parsed.is_none());
        assert_eq!(diags.len(), 1);
        let diag = diags.iter().next().unwrap();
        assert_eq!(diag.message, "Unknown op foo/3");
        assert!(diag.to_string().contains(r#"{"foo":[1,2,3]}"#));
    }

    #[test]
    fn test_parse_errors_joined() {
        let config = config();
        let (parsed, diags) = parse(&config, json!({"==": [{"var": "nope"}, 1]}));
        assert!(parsed.is_none());
        assert_eq!(diags.messages(), vec!["No config for field nope"]);

        let (_, diags) = parse(&config, json!({"==": [1, 2]}));
        assert_eq!(diags.messages(), vec!["Incorrect operands for ==: [1,2]"]);
    }
}
