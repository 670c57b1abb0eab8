//! Query tree node types

use crate::types::{GroupMode, Operand, OperandValue, ValueSrc};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// A query tree node
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    /// Logical grouping of children
    Group(GroupNode),
    /// Single filter rule
    Rule(RuleNode),
    /// Rule over a nested collection
    RuleGroup(RuleGroupNode),
}

/// Group node (AND / OR of children)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupNode {
    pub id: String,
    pub properties: GroupProperties,
    #[serde(rename = "children1")]
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupProperties {
    pub conjunction: String,
    pub not: bool,
}

/// Leaf rule
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleNode {
    pub id: String,
    pub properties: RuleProperties,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleProperties {
    /// Full field path
    pub field: String,
    /// Operator key
    pub operator: String,
    /// Value arguments in order
    pub args: Vec<Operand>,
    /// Values to resolve asynchronously before display
    pub async_list_values: Option<Vec<Value>>,
}

/// Rule over a nested collection ("N of cars satisfy ...")
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleGroupNode {
    pub id: String,
    pub properties: RuleGroupProperties,
    /// Having clause rules
    #[serde(rename = "children1")]
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleGroupProperties {
    pub conjunction: String,
    pub not: bool,
    /// Collection field path
    pub field: String,
    pub mode: Option<GroupMode>,
    /// Operator applied to the collection itself (count, some, all ...)
    pub operator: Option<String>,
    /// Operator arguments (only kept in `array` mode)
    pub args: Vec<Operand>,
}

/// Node type without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Group,
    Rule,
    RuleGroup,
}

impl Node {
    /// Node identifier
    pub fn id(&self) -> &str {
        match self {
            Node::Group(g) => &g.id,
            Node::Rule(r) => &r.id,
            Node::RuleGroup(rg) => &rg.id,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Group(_) => NodeKind::Group,
            Node::Rule(_) => NodeKind::Rule,
            Node::RuleGroup(_) => NodeKind::RuleGroup,
        }
    }

    /// Field path of rules and rule groups
    pub fn field(&self) -> Option<&str> {
        match self {
            Node::Group(_) => None,
            Node::Rule(r) => Some(&r.properties.field),
            Node::RuleGroup(rg) => Some(&rg.properties.field),
        }
    }

    /// Operator key of rules and rule groups
    pub fn operator(&self) -> Option<&str> {
        match self {
            Node::Group(_) => None,
            Node::Rule(r) => Some(&r.properties.operator),
            Node::RuleGroup(rg) => rg.properties.operator.as_deref(),
        }
    }

    /// Conjunction of groups and rule groups
    pub fn conjunction(&self) -> Option<&str> {
        match self {
            Node::Group(g) => Some(&g.properties.conjunction),
            Node::RuleGroup(rg) => Some(&rg.properties.conjunction),
            Node::Rule(_) => None,
        }
    }

    /// Negation flag (rules are never negated themselves)
    pub fn is_negated(&self) -> bool {
        match self {
            Node::Group(g) => g.properties.not,
            Node::RuleGroup(rg) => rg.properties.not,
            Node::Rule(_) => false,
        }
    }

    /// Child nodes (empty for rules)
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Group(g) => &g.children,
            Node::RuleGroup(rg) => &rg.children,
            Node::Rule(_) => &[],
        }
    }

    /// Returns true for groups and rule groups
    pub fn is_container(&self) -> bool {
        !matches!(self, Node::Rule(_))
    }

    /// Compare two subtrees ignoring node identifiers
    pub fn same_shape(&self, other: &Node) -> bool {
        let props_equal = match (self, other) {
            (Node::Group(a), Node::Group(b)) => a.properties == b.properties,
            (Node::Rule(a), Node::Rule(b)) => a.properties == b.properties,
            (Node::RuleGroup(a), Node::RuleGroup(b)) => a.properties == b.properties,
            _ => false,
        };
        props_equal
            && self.children().len() == other.children().len()
            && self
                .children()
                .iter()
                .zip(other.children())
                .all(|(a, b)| a.same_shape(b))
    }

    /// Visit this node and its descendants depth-first
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }
}

impl GroupNode {
    pub fn new(id: impl Into<String>, conjunction: impl Into<String>, not: bool) -> Self {
        Self {
            id: id.into(),
            properties: GroupProperties {
                conjunction: conjunction.into(),
                not,
            },
            children: Vec::new(),
        }
    }

    /// Add a child node
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }
}

impl RuleNode {
    pub fn new(id: impl Into<String>, field: impl Into<String>, operator: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            properties: RuleProperties {
                field: field.into(),
                operator: operator.into(),
                args: Vec::new(),
                async_list_values: None,
            },
        }
    }

    /// Set value arguments
    pub fn with_args(mut self, args: Vec<Operand>) -> Self {
        self.properties.args = args;
        self
    }
}

impl RuleGroupNode {
    pub fn new(id: impl Into<String>, field: impl Into<String>, conjunction: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            properties: RuleGroupProperties {
                conjunction: conjunction.into(),
                not: false,
                field: field.into(),
                mode: None,
                operator: None,
                args: Vec::new(),
            },
            children: Vec::new(),
        }
    }

    pub fn with_mode(mut self, mode: Option<GroupMode>) -> Self {
        self.properties.mode = mode;
        self
    }

    /// Add a child node
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }
}

impl From<GroupNode> for Node {
    fn from(node: GroupNode) -> Self {
        Node::Group(node)
    }
}

impl From<RuleNode> for Node {
    fn from(node: RuleNode) -> Self {
        Node::Rule(node)
    }
}

impl From<RuleGroupNode> for Node {
    fn from(node: RuleGroupNode) -> Self {
        Node::RuleGroup(node)
    }
}

// Operand lists render as parallel `value` / `valueSrc` / `valueType` arrays.
fn operand_columns(
    args: &[Operand],
) -> (Vec<&OperandValue>, Vec<ValueSrc>, Vec<Option<&str>>) {
    let values = args.iter().map(|a| &a.value).collect();
    let sources = args.iter().map(|a| a.value_src).collect();
    let types = args.iter().map(|a| a.value_type.as_deref()).collect();
    (values, sources, types)
}

impl Serialize for RuleProperties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let (values, sources, types) = operand_columns(&self.args);
        let len = if self.async_list_values.is_some() { 6 } else { 5 };
        let mut state = serializer.serialize_struct("RuleProperties", len)?;
        state.serialize_field("field", &self.field)?;
        state.serialize_field("operator", &self.operator)?;
        state.serialize_field("value", &values)?;
        state.serialize_field("valueSrc", &sources)?;
        state.serialize_field("valueType", &types)?;
        if let Some(async_values) = &self.async_list_values {
            state.serialize_field("asyncListValues", async_values)?;
        }
        state.end()
    }
}

impl Serialize for RuleGroupProperties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("RuleGroupProperties", 8)?;
        state.serialize_field("conjunction", &self.conjunction)?;
        state.serialize_field("not", &self.not)?;
        state.serialize_field("field", &self.field)?;
        state.serialize_field("mode", &self.mode)?;
        if let Some(operator) = &self.operator {
            state.serialize_field("operator", operator)?;
        }
        if !self.args.is_empty() {
            let (values, sources, types) = operand_columns(&self.args);
            state.serialize_field("value", &values)?;
            state.serialize_field("valueSrc", &sources)?;
            state.serialize_field("valueType", &types)?;
        }
        state.end()
    }
}
