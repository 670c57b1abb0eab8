//! Conjunctions and rule-group reconciliation
//!
//! Children of a conjunction are converted independently, so a rule on
//! `cars.vendor` comes back as a plain rule even when `cars` is a nested
//! collection. Reconciliation moves such rules under rule groups for their
//! collections:
//!
//! ```text
//! and(cars.vendor == "Toyota", cars.year > 2010)  ->  rule_group(cars){vendor, year}
//! and(age > 18, cars.vendor == "Toyota")          ->  group{age, rule_group(cars){vendor}}
//! ```

use super::{Attempt, Converter};
use crate::diagnostics::Diagnostics;
use qtree_core::logic::Logic;
use qtree_core::{FieldConfig, GroupNode, Node, RuleGroupNode};
use std::collections::HashMap;

/// Returns true if `path` is `prefix` or lies under it
fn is_under(path: &str, prefix: &str, separator: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some("") => true,
        Some(rest) => rest.starts_with(separator),
        None => false,
    }
}

/// Paths not nested under another path of the list, shortest first
///
/// `["a", "a.b", "x"]` gives `["a", "x"]`. Paths of equal length are all kept.
pub fn top_level_fields<S: AsRef<str>>(fields: &[S], separator: &str) -> Vec<String> {
    let mut sorted: Vec<&str> = fields.iter().map(AsRef::as_ref).collect();
    sorted.sort_by_key(|f| f.len());

    let mut kept: Vec<String> = Vec::new();
    for field in sorted {
        if !kept.iter().any(|k| is_under(field, k, separator)) {
            kept.push(field.to_string());
        }
    }
    kept
}

/// Position a child ends up in while reconciling
enum Slot {
    Node(Node),
    Wrapper(usize),
}

/// Rule group synthesized for a collection path
struct Wrapper {
    node: RuleGroupNode,
    slots: Vec<Slot>,
}

fn build(slot: Slot, wrappers: &mut Vec<Option<Wrapper>>) -> Option<Node> {
    match slot {
        Slot::Node(node) => Some(node),
        Slot::Wrapper(index) => {
            let Wrapper { mut node, slots } = wrappers.get_mut(index)?.take()?;
            node.children = slots
                .into_iter()
                .filter_map(|slot| build(slot, wrappers))
                .collect();
            Some(node.into())
        }
    }
}

impl<'a> Converter<'a> {
    /// `{"and": [...]}` as a group (or a rule group when every child sits in
    /// one collection)
    pub(crate) fn convert_conj(
        &self,
        logic: Logic<'_>,
        negated: bool,
        parent: Option<&str>,
        diags: &mut Diagnostics,
    ) -> Attempt<Node> {
        let Some(conjunction) = logic.op().and_then(|op| self.index.conjunction(op)) else {
            return Attempt::NoMatch;
        };

        let children: Vec<Node> = logic
            .args()
            .iter()
            .filter_map(|child| self.convert_rule(child, false, parent, diags))
            .collect();

        Attempt::Matched(self.reconcile(conjunction, negated, children))
    }

    /// Build the conjunction node, moving rules under rule groups for the
    /// nested collections their fields belong to
    fn reconcile(&self, conjunction: &str, negated: bool, children: Vec<Node>) -> Node {
        let separator = self.config.field_separator();

        // collections that are the direct parent of a child's field
        let mut in_rule_group = 0;
        let mut used_groups: Vec<String> = Vec::new();
        for child in &children {
            let Some((parent, _)) = child.field().and_then(|f| f.rsplit_once(separator)) else {
                continue;
            };
            if self.fields.resolve(parent).map_or(false, FieldConfig::is_group) {
                in_rule_group += 1;
                if !used_groups.iter().any(|g| g == parent) {
                    used_groups.push(parent.to_string());
                }
            }
        }

        let roots = top_level_fields(&used_groups, separator);
        let single_root = match roots.as_slice() {
            [root] if in_rule_group == children.len() => Some(root.as_str()),
            _ => None,
        };
        log::trace!(
            "Reconciling {} children of {}: groups {:?}, roots {:?}",
            children.len(),
            conjunction,
            used_groups,
            roots
        );

        let id = self.ids.next_id();
        let mut as_rule_group = false;
        let mut top: Vec<Slot> = Vec::new();
        let mut wrappers: Vec<Option<Wrapper>> = Vec::new();
        let mut by_path: HashMap<String, usize> = HashMap::new();

        for child in children {
            let group_field = match &child {
                Node::Rule(rule) => used_groups
                    .iter()
                    .filter(|g| is_under(&rule.properties.field, g, separator))
                    .max_by_key(|g| g.len())
                    .cloned(),
                Node::Group(_) | Node::RuleGroup(_) => None,
            };
            let Some(group_field) = group_field else {
                top.push(Slot::Node(child));
                continue;
            };

            let mut container: Option<usize> = None;
            let mut path = String::new();
            for segment in group_field.split(separator) {
                if !path.is_empty() {
                    path.push_str(separator);
                }
                path.push_str(segment);
                let normalized = self.fields.normalize(&path);

                if let Some(root) = single_root {
                    if is_under(root, &normalized, separator) {
                        as_rule_group = true;
                        continue;
                    }
                }

                let index = match by_path.get(&normalized) {
                    Some(&index) => index,
                    None => {
                        let mode = self.fields.resolve(&normalized).and_then(|f| f.mode);
                        let node = RuleGroupNode::new(self.ids.next_id(), normalized.as_str(), conjunction)
                            .with_mode(mode);
                        let index = wrappers.len();
                        wrappers.push(Some(Wrapper {
                            node,
                            slots: Vec::new(),
                        }));
                        slots_of(&mut top, &mut wrappers, container).push(Slot::Wrapper(index));
                        by_path.insert(normalized, index);
                        index
                    }
                };
                container = Some(index);
            }
            slots_of(&mut top, &mut wrappers, container).push(Slot::Node(child));
        }

        let children: Vec<Node> = top
            .into_iter()
            .filter_map(|slot| build(slot, &mut wrappers))
            .collect();

        match single_root.filter(|_| as_rule_group) {
            Some(root) => {
                let mode = self.fields.resolve(root).and_then(|f| f.mode);
                let mut node = RuleGroupNode::new(id, root, conjunction).with_mode(mode);
                node.properties.not = negated;
                node.children = children;
                node.into()
            }
            None => {
                let mut node = GroupNode::new(id, conjunction, negated);
                node.children = children;
                node.into()
            }
        }
    }
}

fn slots_of<'s>(
    top: &'s mut Vec<Slot>,
    wrappers: &'s mut [Option<Wrapper>],
    container: Option<usize>,
) -> &'s mut Vec<Slot> {
    if let Some(index) = container {
        if let Some(Some(wrapper)) = wrappers.get_mut(index) {
            return &mut wrapper.slots;
        }
    }
    top
}
