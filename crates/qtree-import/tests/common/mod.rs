//! Common test utilities for import tests

#![allow(dead_code)]

use qtree_core::{ImporterHook, Node, QueryTree, SchemaConfig, SequentialIds};
use qtree_import::{Converter, ImportOutcome, SchemaLoader};
use serde_json::Value;

/// Schema used across the import tests
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
  less:
    jsonLogic: "<"
  less_or_equal:
    jsonLogic: "<="
  greater:
    jsonLogic: ">"
  greater_or_equal:
    jsonLogic: ">="
  between:
    jsonLogic: "<="
    cardinality: 2
    reversedOp: not_between
  not_between:
    cardinality: 2
    reversedOp: between
  between_exclusive:
    jsonLogic: "<"
    cardinality: 2
  is_empty:
    jsonLogic: "!"
    cardinality: 0
    reversedOp: is_not_empty
  is_not_empty:
    jsonLogic: "!!"
    cardinality: 0
    reversedOp: is_empty
  like:
    jsonLogic: in
    _jsonLogicIsRevArgs: true
    reversedOp: not_like
  not_like:
    reversedOp: like
  select_equals:
    jsonLogic: "=="
    reversedOp: select_not_equals
  select_not_equals:
    jsonLogic: "!="
    reversedOp: select_equals
  select_any_in:
    jsonLogic: in
    reversedOp: select_not_any_in
  select_not_any_in:
    reversedOp: select_any_in
  multiselect_equals:
    jsonLogic2: all-in
  some:
    jsonLogic: some
    cardinality: 0
    reversedOp: none
  all:
    jsonLogic: all
    cardinality: 0
  none:
    jsonLogic: none
    cardinality: 0
    reversedOp: some

funcs:
  LOWER:
    jsonLogic: toLowerCase
    jsonLogicIsMethod: true
    returnType: text
    args:
      str:
        type: text
  LINEAR:
    jsonLogic: linear
    returnType: number
    args:
      coef:
        type: number
        defaultValue: 1
      val:
        type: number
      bias:
        type: number
        defaultValue: 0
  TODAY:
    returnType: date

fields:
  name:
    type: text
    operators: [equal, not_equal, like, not_like, is_empty, is_not_empty]
  age:
    type: number
    operators: [equal, not_equal, less, less_or_equal, greater, greater_or_equal, between, not_between, between_exclusive]
  color:
    type: select
    operators: [select_equals, select_not_equals, select_any_in, select_not_any_in]
  tags:
    type: multiselect
    operators: [multiselect_equals, select_any_in]
    fieldSettings:
      asyncFetch: true
  birthday:
    type: date
  opening:
    type: time
  user:
    type: "!struct"
    subfields:
      login:
        type: text
      devices:
        type: "!group"
        mode: some
        subfields:
          os:
            type: select
            operators: [select_equals, select_any_in]
  cars:
    type: "!group"
    mode: array
    mainWidget: number
    operators: [some, all, none, equal, greater, less, between]
    subfields:
      vendor:
        type: select
        operators: [select_equals, select_any_in]
      year:
        type: number
  results:
    type: "!group"
    mode: some
    defaultConjunction: OR
    subfields:
      score:
        type: number
      grade:
        type: select
        operators: [select_equals, select_any_in]
      attempts:
        type: "!group"
        mode: some
        subfields:
          duration:
            type: number

widgets:
  text:
    type: text
  number:
    type: number
  select:
    type: select
  multiselect:
    type: multiselect
  date:
    type: date
    valueFormat: YYYY-MM-DD
  time:
    type: time

settings:
  defaultConjunction: AND
  defaultGroupConjunction: AND
"#;

/// Load the shared schema, with an importer on `TODAY` recognizing `{"today": true}`
pub fn schema() -> SchemaConfig {
    let mut config = SchemaLoader::from_yaml_str(SCHEMA_YAML).expect("schema fixture");
    config
        .set_func_importer(
            "TODAY",
            ImporterHook::from_fn(|expr| match expr.get("today") {
                Some(Value::Bool(true)) => Ok(Some(Vec::new())),
                _ => anyhow::bail!("not a today expression"),
            }),
        )
        .expect("TODAY is configured");
    config
}

/// Import with deterministic ids
pub fn import(config: &SchemaConfig, expr: &Value) -> ImportOutcome {
    let ids = SequentialIds::new();
    Converter::new(config).with_ids(&ids).import_tree(expr)
}

/// Import and return the tree, failing on diagnostics
pub fn import_clean(config: &SchemaConfig, expr: &Value) -> QueryTree {
    let outcome = import(config, expr);
    assert!(
        outcome.diagnostics.is_empty(),
        "unexpected diagnostics: {}",
        outcome.diagnostics
    );
    outcome.tree.expect("tree")
}

/// The single child of the root group
pub fn only_child(tree: &QueryTree) -> &Node {
    let children = tree.root().children();
    assert_eq!(children.len(), 1, "expected one child, got {:?}", children);
    &children[0]
}
