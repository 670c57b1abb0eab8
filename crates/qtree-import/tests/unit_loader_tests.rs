//! Unit tests for schema loading from files

mod common;

use common::SCHEMA_YAML;
use qtree_import::{import_tree, ImportError, SchemaLoader};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_yaml_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("schema.yaml");
    fs::write(&path, SCHEMA_YAML).unwrap();

    let config = SchemaLoader::from_file(&path).unwrap();
    assert!(config.fields.contains_key("cars"));
    assert_eq!(config.default_conjunction(), Some("AND"));
}

#[test]
fn test_load_json_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("schema.json");
    let schema = json!({
        "conjunctions": {"AND": {}},
        "operators": {"equal": {"jsonLogic": "=="}},
        "fields": {"name": {"type": "text"}},
        "widgets": {"text": {"type": "text"}}
    });
    fs::write(&path, schema.to_string()).unwrap();

    let config = SchemaLoader::from_file(&path).unwrap();
    let outcome = import_tree(&json!({"==": [{"var": "name"}, "Bob"]}), &config);
    assert!(outcome.is_clean());
    assert_eq!(outcome.tree.unwrap().rules()[0].properties.operator, "equal");
}

#[test]
fn test_load_without_extension() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("schema");
    fs::write(&path, r#"{"fields": {"age": {"type": "number"}}}"#).unwrap();

    let config = SchemaLoader::from_file(&path).unwrap();
    assert_eq!(config.fields["age"].field_type, "number");
}

#[test]
fn test_unsupported_extension() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("schema.toml");
    fs::write(&path, "fields = {}").unwrap();

    let result = SchemaLoader::from_file(&path);
    assert!(matches!(result, Err(ImportError::UnsupportedFormat(ext)) if ext == "toml"));
}

#[test]
fn test_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let result = SchemaLoader::from_file(temp_dir.path().join("missing.yaml"));
    assert!(matches!(result, Err(ImportError::IoError(_))));
}
