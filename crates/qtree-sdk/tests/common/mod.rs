//! Common test utilities for SDK integration tests

#![allow(dead_code)]

use qtree_sdk::{ImportOutcome, Importer, ImporterBuilder};
use serde_json::Value;

/// Schema shared by the SDK tests
pub const SCHEMA_YAML: &str = r#"
conjunctions:
  AND: {}
  OR: {}
operators:
  equal:
    jsonLogic: "=="
    reversedOp: not_equal
  not_equal:
    jsonLogic: "!="
    reversedOp: equal
  greater:
    jsonLogic: ">"
  some:
    jsonLogic: some
    cardinality: 0
funcs:
  NOW:
    returnType: datetime
fields:
  name:
    type: text
  signup:
    type: datetime
  orders:
    type: "!group"
    mode: some
    subfields:
      total:
        type: number
widgets:
  text:
    type: text
  number:
    type: number
  datetime:
    type: datetime
    valueFormat: YYYY-MM-DD HH:mm
"#;

/// Test helper to create an Importer from the shared schema
pub struct TestImporter {
    builder: ImporterBuilder,
}

impl TestImporter {
    /// Create a new test importer with deterministic ids
    pub fn new() -> Self {
        Self {
            builder: ImporterBuilder::new()
                .with_schema_content(SCHEMA_YAML)
                .deterministic_ids(true),
        }
    }

    /// Customize the underlying builder
    pub fn configure(mut self, f: impl FnOnce(ImporterBuilder) -> ImporterBuilder) -> Self {
        self.builder = f(self.builder);
        self
    }

    /// Build the importer
    pub fn build(self) -> Importer {
        self.builder.build().expect("Failed to build importer")
    }
}

/// Import with a freshly built default test importer
pub fn import(expr: &Value) -> ImportOutcome {
    TestImporter::new().build().import(expr)
}
