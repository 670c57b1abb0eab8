//! Default field resolution and widget selection backed by the schema

use super::{FieldResolver, WidgetSelector};
use crate::types::{FieldConfig, SchemaConfig};

/// Split a path on the configured separator, also accepting `.`
fn segments<'a>(path: &'a str, separator: &str) -> Vec<&'a str> {
    let parts = path.split(separator).filter(|s| !s.is_empty());
    if separator == "." {
        parts.collect()
    } else {
        parts
            .flat_map(|part| part.split('.'))
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl FieldResolver for SchemaConfig {
    fn resolve(&self, path: &str) -> Option<&FieldConfig> {
        if let Some(field) = self.fields.get(path) {
            return Some(field);
        }
        let mut parts = segments(path, self.field_separator()).into_iter();
        let mut field = self.fields.get(parts.next()?)?;
        for part in parts {
            field = field.subfields.get(part)?;
        }
        Some(field)
    }

    fn normalize(&self, path: &str) -> String {
        if self.fields.contains_key(path) {
            return path.to_string();
        }
        let separator = self.field_separator();
        segments(path, separator).join(separator)
    }
}

impl WidgetSelector for SchemaConfig {
    fn widget_for(&self, field: &str, operator: &str) -> Option<String> {
        let config = self.resolve(field)?;
        config
            .widgets
            .iter()
            .find(|(_, w)| w.operators.iter().any(|op| op == operator))
            .map(|(name, _)| name.clone())
            .or_else(|| Some(config.main_widget().to_string()))
    }
}
