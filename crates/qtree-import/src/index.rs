//! Lookup index
//!
//! Reverse lookups compiled from the schema configuration: which operator
//! keys answer to a `name/cardinality` pair, which conjunction a name refers
//! to, which function keys answer to a call name, and which keys read a field.

use qtree_core::SchemaConfig;
use std::collections::HashMap;
use std::fmt;

/// Operator signature as seen in a logic expression
///
/// Textual form `"<#?><name>/<cardinality>"`, where `#` marks operators whose
/// expression lists the value before the field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OpSignature {
    pub name: String,
    pub cardinality: usize,
    pub reversed: bool,
}

impl OpSignature {
    pub fn new(name: impl Into<String>, cardinality: usize, reversed: bool) -> Self {
        Self {
            name: name.into(),
            cardinality,
            reversed,
        }
    }
}

impl fmt::Display for OpSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = if self.reversed { "#" } else { "" };
        write!(f, "{}{}/{}", prefix, self.name, self.cardinality)
    }
}

/// Function signature as seen in a logic expression (`"<#?><name>"`, `#` for methods)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FuncSignature {
    pub name: String,
    pub method: bool,
}

impl FuncSignature {
    pub fn new(name: impl Into<String>, method: bool) -> Self {
        Self {
            name: name.into(),
            method,
        }
    }
}

impl fmt::Display for FuncSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = if self.method { "#" } else { "" };
        write!(f, "{}{}", prefix, self.name)
    }
}

/// Immutable lookup tables derived from a [`SchemaConfig`]
#[derive(Debug, Clone, Default)]
pub struct LookupIndex {
    operators: HashMap<OpSignature, Vec<String>>,
    conjunctions: HashMap<String, String>,
    funcs: HashMap<FuncSignature, Vec<String>>,
    var_keys: Vec<String>,
}

impl LookupIndex {
    /// Compile the index. Entries without an expression name are skipped.
    pub fn build(config: &SchemaConfig) -> Self {
        let mut operators: HashMap<OpSignature, Vec<String>> = HashMap::new();
        for (key, op) in &config.operators {
            let signature = match (&op.json_logic, &op.json_logic2) {
                (Some(name), _) => OpSignature::new(name, op.cardinality(), op.json_logic_is_rev_args),
                (None, Some(name)) => OpSignature::new(name, op.cardinality(), false),
                (None, None) => continue,
            };
            operators.entry(signature).or_default().push(key.clone());
        }

        let conjunctions = config
            .conjunctions
            .keys()
            .map(|key| (key.to_lowercase(), key.clone()))
            .collect();

        let mut funcs: HashMap<FuncSignature, Vec<String>> = HashMap::new();
        for (key, func) in &config.funcs {
            if let Some(name) = &func.json_logic {
                funcs
                    .entry(FuncSignature::new(name, func.json_logic_is_method))
                    .or_default()
                    .push(key.clone());
            }
        }

        let json_logic = &config.settings.json_logic;
        let mut var_keys = vec!["var".to_string()];
        for key in [&json_logic.group_var_key, &json_logic.alt_var_key] {
            if !var_keys.contains(key) {
                var_keys.push(key.clone());
            }
        }

        log::debug!(
            "Built lookup index: {} operator signatures, {} conjunctions, {} function signatures",
            operators.len(),
            config.conjunctions.len(),
            funcs.len()
        );

        Self {
            operators,
            conjunctions,
            funcs,
            var_keys,
        }
    }

    /// Candidate operator keys, in declaration order
    pub fn operators(&self, signature: &OpSignature) -> &[String] {
        self.operators
            .get(signature)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Canonical conjunction key (case-insensitive)
    pub fn conjunction(&self, name: &str) -> Option<&str> {
        self.conjunctions
            .get(&name.to_lowercase())
            .map(String::as_str)
    }

    /// Candidate function keys, in declaration order
    pub fn funcs(&self, signature: &FuncSignature) -> &[String] {
        self.funcs.get(signature).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns true if `key` reads a field (`var` and the configured aliases)
    pub fn is_var_key(&self, key: &str) -> bool {
        self.var_keys.iter().any(|k| k == key)
    }

    pub fn var_keys(&self) -> &[String] {
        &self.var_keys
    }
}
