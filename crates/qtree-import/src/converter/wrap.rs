//! Default wrappers

use super::Converter;
use qtree_core::{FieldConfig, GroupNode, Node, RuleGroupNode};

impl<'a> Converter<'a> {
    /// Single-child group with the default conjunction
    pub(crate) fn wrap_in_default_conj(&self, node: Node, not: bool) -> GroupNode {
        GroupNode::new(self.ids.next_id(), self.default_conjunction(), not).with_child(node)
    }

    /// Single-child rule group on `field`
    ///
    /// Uses `conjunction` when given, else the field's default group conjunction.
    pub(crate) fn wrap_in_default_conj_rule_group(
        &self,
        node: Node,
        field: &str,
        field_config: &FieldConfig,
        conjunction: Option<&str>,
    ) -> RuleGroupNode {
        let conjunction =
            conjunction.unwrap_or_else(|| self.default_group_conjunction(Some(field_config)));
        RuleGroupNode::new(self.ids.next_id(), field, conjunction)
            .with_mode(field_config.mode)
            .with_child(node)
    }

    /// Make a converted having clause a rule group on `field`
    ///
    /// A plain group keeps its id, conjunction and children; rule groups on
    /// `field` nested directly in it are flattened only when they share the
    /// group's conjunction and carry neither operator nor negation. Rules and
    /// rule groups on deeper fields are wrapped.
    pub(crate) fn rehome(&self, node: Node, field: &str, field_config: &FieldConfig) -> RuleGroupNode {
        match node {
            Node::RuleGroup(group) if group.properties.field == field => group,
            Node::Group(group) => {
                let mut rehomed = RuleGroupNode::new(group.id, field, group.properties.conjunction)
                    .with_mode(field_config.mode);
                for child in group.children {
                    match child {
                        Node::RuleGroup(inner)
                            if inner.properties.field == field
                                && inner.properties.operator.is_none()
                                && !inner.properties.not
                                && inner.properties.conjunction == rehomed.properties.conjunction =>
                        {
                            rehomed.children.extend(inner.children)
                        }
                        other => rehomed.children.push(other),
                    }
                }
                rehomed
            }
            other => self.wrap_in_default_conj_rule_group(other, field, field_config, None),
        }
    }
}
