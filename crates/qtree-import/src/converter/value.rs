//! Field references and literal values

use super::{Attempt, Converter, ValueTarget};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc};
use qtree_core::logic::{is_logic, is_truthy, Logic};
use qtree_core::{Operand, OperandValue, ValueSrc};
use serde_json::Value;

impl<'a> Converter<'a> {
    /// `{"var": "path"}` as a field operand
    pub(crate) fn convert_field(
        &self,
        logic: Logic<'_>,
        parent: Option<&str>,
        diags: &mut Diagnostics,
    ) -> Attempt<Operand> {
        let path = match logic {
            Logic::Operation { op, args } if self.index.is_var_key(op) => match args.first() {
                Some(Value::String(path)) => path,
                _ => return Attempt::NoMatch,
            },
            _ => return Attempt::NoMatch,
        };

        let path = self.compose_path(parent, path);
        match self.fields.resolve(&path) {
            Some(field) => Attempt::Matched(Operand::field(path, field.field_type.clone())),
            None => {
                diags.record(
                    DiagnosticKind::UnresolvedReference,
                    format!("No config for field {}", path),
                );
                Attempt::Failed
            }
        }
    }

    /// Literal value typed by the target's widget
    pub(crate) fn convert_val(
        &self,
        expr: &Value,
        target: &ValueTarget<'_>,
        diags: &mut Diagnostics,
    ) -> Attempt<Operand> {
        let Some(widget) = self.config.widget(target.widget_name()) else {
            diags.record(
                DiagnosticKind::UnresolvedReference,
                format!("No widget for type {}", target.value_type),
            );
            return Attempt::Failed;
        };

        if is_logic(expr) {
            diags.record(
                DiagnosticKind::UnrecognizedExpression,
                format!("Unexpected logic in value: {}", expr),
            );
            return Attempt::Failed;
        }

        let mut value = OperandValue::Literal(expr.clone());

        if target.value_type == "time" {
            if let Some(seconds) = expr.as_f64() {
                let time = self.time_of_day(seconds, widget.value_format.as_deref());
                value = OperandValue::Literal(Value::String(time));
            }
        }

        if matches!(target.value_type, "date" | "datetime") {
            if let Some(text) = expr.as_str().filter(|s| !s.is_empty()) {
                match parse_date(text) {
                    Some(date) if is_iso_string(&date, text) => value = OperandValue::Date(date),
                    Some(_) => {}
                    None => {
                        diags.record(
                            DiagnosticKind::MalformedValue,
                            format!("Can't convert value {} as Date", text),
                        );
                        return Attempt::Failed;
                    }
                }
            }
        }

        if let (OperandValue::Date(date), Some(format)) = (&value, &widget.value_format) {
            value = OperandValue::Literal(Value::String(self.formatter.format(date, format)));
        }

        let async_list_values = if target.async_fetch {
            let json = operand_json(&value);
            if is_truthy(&json) {
                Some(match json {
                    Value::Array(items) => items,
                    single => vec![single],
                })
            } else {
                None
            }
        } else {
            None
        };

        Attempt::Matched(Operand {
            value_src: ValueSrc::Value,
            value,
            value_type: Some(widget.value_type.clone()),
            async_list_values,
        })
    }

    /// Seconds since midnight as a time string
    fn time_of_day(&self, seconds: f64, format: Option<&str>) -> String {
        let h = (seconds / 3600.0).floor().rem_euclid(24.0);
        let m = (seconds / 60.0).floor().rem_euclid(60.0);
        let s = seconds.rem_euclid(60.0);

        if let Some(format) = format {
            let time = NaiveTime::from_hms_opt(h as u32, m as u32, s.floor() as u32);
            let date = NaiveDate::from_ymd_opt(1970, 1, 1);
            if let (Some(time), Some(date)) = (time, date) {
                let value = Utc.from_utc_datetime(&date.and_time(time));
                return self.formatter.format(&value, format);
            }
        }
        format!("{}:{}:{}", number(h), number(m), number(s))
    }
}

/// Parse ISO-8601 text (with or without time and offset)
fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// `2020-01-08T22:00:00.000Z` form
fn is_iso_string(date: &DateTime<Utc>, text: &str) -> bool {
    date.to_rfc3339_opts(SecondsFormat::Millis, true) == text
}

fn number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

fn operand_json(value: &OperandValue) -> Value {
    match value {
        OperandValue::Literal(json) => json.clone(),
        OperandValue::Date(date) => Value::String(date.to_rfc3339_opts(SecondsFormat::Millis, true)),
        OperandValue::Field(path) => Value::String(path.clone()),
        OperandValue::Func(func) => Value::String(func.func.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qtree_core::types::FieldSettings;
    use qtree_core::{FieldConfig, SchemaConfig, SequentialIds, WidgetConfig};
    use serde_json::json;

    fn widget(value_type: &str, format: Option<&str>) -> WidgetConfig {
        WidgetConfig {
            value_type: value_type.to_string(),
            value_format: format.map(str::to_string),
        }
    }

    fn config() -> SchemaConfig {
        SchemaConfig::new()
            .with_widget("text", widget("text", None))
            .with_widget("date", widget("date", None))
            .with_widget("short_date", widget("date", Some("DD.MM.YYYY")))
            .with_widget("time", widget("time", None))
            .with_widget("clock", widget("time", Some("HH:mm")))
            .with_field("name", FieldConfig::new("text"))
            .with_field("birthday", FieldConfig::new("date"))
    }

    fn convert(target: &ValueTarget<'_>, value: Value) -> (Option<Operand>, Diagnostics) {
        let config = config();
        let ids = SequentialIds::new();
        let converter = Converter::new(&config).with_ids(&ids);
        let mut diags = Diagnostics::new();
        let operand = converter.convert_value(&value, target, None, &mut diags);
        (operand, diags)
    }

    #[test]
    fn test_literal_typed_by_widget() {
        let field = FieldConfig::new("text");
        let (operand, diags) = convert(&ValueTarget::field(&field, None), json!("abc"));
        let operand = operand.unwrap();
        assert!(diags.is_empty());
        assert_eq!(operand.as_literal(), Some(&json!("abc")));
        assert_eq!(operand.value_type.as_deref(), Some("text"));
        assert!(operand.async_list_values.is_none());
    }

    #[test]
    fn test_missing_widget() {
        let field = FieldConfig::new("color");
        let (operand, diags) = convert(&ValueTarget::field(&field, None), json!("red"));
        assert!(operand.is_none());
        assert_eq!(diags.messages(), vec!["No widget for type color"]);
    }

    #[test]
    fn test_logic_in_value() {
        let field = FieldConfig::new("text");
        let (operand, diags) = convert(&ValueTarget::field(&field, None), json!({"upper": ["x"]}));
        assert!(operand.is_none());
        assert_eq!(diags.len(), 1);
        assert!(diags.messages()[0].starts_with("Unexpected logic in value"));
    }

    #[test]
    fn test_time_seconds() {
        let field = FieldConfig::new("time");
        let (operand, _) = convert(&ValueTarget::field(&field, None), json!(3725));
        assert_eq!(operand.unwrap().as_literal(), Some(&json!("1:2:5")));

        let (operand, _) = convert(
            &ValueTarget::field(&field, Some("clock".to_string())),
            json!(9 * 3600 + 30 * 60),
        );
        assert_eq!(operand.unwrap().as_literal(), Some(&json!("09:30")));
    }

    #[test]
    fn test_iso_date_round_trip() {
        let field = FieldConfig::new("date");
        let (operand, diags) =
            convert(&ValueTarget::field(&field, None), json!("2020-01-08T22:00:00.000Z"));
        let operand = operand.unwrap();
        assert!(diags.is_empty());
        assert!(matches!(operand.value, OperandValue::Date(_)));

        let (operand, _) = convert(
            &ValueTarget::field(&field, Some("short_date".to_string())),
            json!("2020-01-08T22:00:00.000Z"),
        );
        assert_eq!(operand.unwrap().as_literal(), Some(&json!("08.01.2020")));
    }

    #[test]
    fn test_non_iso_date_kept_verbatim() {
        let field = FieldConfig::new("date");
        let (operand, diags) = convert(&ValueTarget::field(&field, None), json!("2020-01-08"));
        assert!(diags.is_empty());
        assert_eq!(operand.unwrap().as_literal(), Some(&json!("2020-01-08")));
    }

    #[test]
    fn test_unparseable_date() {
        let field = FieldConfig::new("date");
        let (operand, diags) = convert(&ValueTarget::field(&field, None), json!("yesterday"));
        assert!(operand.is_none());
        assert_eq!(diags.messages(), vec!["Can't convert value yesterday as Date"]);
        assert_eq!(diags.count_of(DiagnosticKind::MalformedValue), 1);
    }

    #[test]
    fn test_async_list_values() {
        let field = FieldConfig {
            field_settings: FieldSettings { async_fetch: true },
            ..FieldConfig::new("text")
        };
        let (operand, _) = convert(&ValueTarget::field(&field, None), json!(["a", "b"]));
        assert_eq!(operand.unwrap().async_list_values, Some(vec![json!("a"), json!("b")]));

        let (operand, _) = convert(&ValueTarget::field(&field, None), json!("a"));
        assert_eq!(operand.unwrap().async_list_values, Some(vec![json!("a")]));

        let (operand, _) = convert(&ValueTarget::field(&field, None), json!(""));
        assert!(operand.unwrap().async_list_values.is_none());
    }

    #[test]
    fn test_field_reference() {
        let field = FieldConfig::new("text");
        let (operand, diags) = convert(&ValueTarget::field(&field, None), json!({"var": "name"}));
        let operand = operand.unwrap();
        assert!(diags.is_empty());
        assert_eq!(operand.value_src, ValueSrc::Field);
        assert_eq!(operand.as_field(), Some("name"));
        assert_eq!(operand.value_type.as_deref(), Some("text"));

        let (operand, diags) = convert(&ValueTarget::field(&field, None), json!({"var": "nope"}));
        assert!(operand.is_none());
        assert_eq!(diags.messages(), vec!["No config for field nope"]);
    }

    #[test]
    fn test_date_parsing() {
        assert!(parse_date("2020-01-08T22:00:00.000Z").is_some());
        assert!(parse_date("2020-01-08T22:00:00+02:00").is_some());
        assert!(parse_date("2020-01-08 10:00:00").is_some());
        assert!(parse_date("2020-01-08").is_some());
        assert!(parse_date("08/01/2020").is_none());
    }
}
