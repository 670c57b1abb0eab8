//! Query Tree
//!
//! The query tree is the strongly-typed result of an import:
//!
//! - `Group`: conjunction of children, optionally negated. The root is always
//!   a group.
//! - `Rule`: field + operator + value operands.
//! - `RuleGroup`: rule over a nested collection field; its children are the
//!   "having" rules evaluated against each element.
//!
//! Serialized, the tree has the plain shape consumed by tree loaders:
//!
//! ```json
//! {
//!   "type": "group",
//!   "id": "...",
//!   "properties": {"conjunction": "AND", "not": false},
//!   "children1": [
//!     {"type": "rule", "id": "...", "properties": {
//!       "field": "age", "operator": "between",
//!       "value": [18, 65], "valueSrc": ["value", "value"], "valueType": ["number", "number"]
//!     }}
//!   ]
//! }
//! ```

mod node;

pub use node::{
    GroupNode, GroupProperties, Node, NodeKind, RuleGroupNode, RuleGroupProperties, RuleNode,
    RuleProperties,
};

use serde::Serialize;

/// A rooted query tree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct QueryTree {
    root: Node,
}

impl QueryTree {
    /// Create a tree from its root group
    pub fn new(root: GroupNode) -> Self {
        Self {
            root: Node::Group(root),
        }
    }

    /// Root node (always a group)
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Consume the tree, returning the root node
    pub fn into_root(self) -> Node {
        self.root
    }

    /// Total number of nodes including the root
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.root.walk(&mut |_| count += 1);
        count
    }

    /// Find a node by id
    pub fn find(&self, id: &str) -> Option<&Node> {
        let mut found = None;
        self.root.walk(&mut |node| {
            if found.is_none() && node.id() == id {
                found = Some(node);
            }
        });
        found
    }

    /// All rules in depth-first order
    pub fn rules(&self) -> Vec<&RuleNode> {
        let mut rules = Vec::new();
        self.root.walk(&mut |node| {
            if let Node::Rule(rule) = node {
                rules.push(rule);
            }
        });
        rules
    }

    /// Compare with another tree ignoring node identifiers
    pub fn same_shape(&self, other: &QueryTree) -> bool {
        self.root.same_shape(&other.root)
    }
}
