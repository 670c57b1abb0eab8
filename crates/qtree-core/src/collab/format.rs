//! Moment-style value formatting

use super::ValueFormatter;
use crate::error::{CoreError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};

/// Moment tokens and their strftime equivalents, longest first
const TOKENS: &[(&str, &str)] = &[
    ("YYYY", "%Y"),
    ("MMMM", "%B"),
    ("dddd", "%A"),
    ("MMM", "%b"),
    ("ddd", "%a"),
    ("SSS", "%3f"),
    ("YY", "%y"),
    ("MM", "%m"),
    ("DD", "%d"),
    ("HH", "%H"),
    ("hh", "%I"),
    ("mm", "%M"),
    ("ss", "%S"),
    ("ZZ", "%z"),
    ("M", "%-m"),
    ("D", "%-d"),
    ("H", "%-H"),
    ("h", "%-I"),
    ("m", "%-M"),
    ("s", "%-S"),
    ("A", "%p"),
    ("a", "%P"),
    ("Z", "%:z"),
    ("X", "%s"),
];

/// Formats values with moment-style patterns (`YYYY-MM-DD HH:mm:ss`)
///
/// Values are formatted in UTC. Text inside `[...]` is copied literally.
#[derive(Debug, Default, Clone, Copy)]
pub struct MomentFormatter;

impl MomentFormatter {
    /// Translate a moment pattern into a chrono strftime string
    pub fn to_strftime(pattern: &str) -> Result<String> {
        let mut out = String::with_capacity(pattern.len() * 2);
        let mut rest = pattern;

        'outer: while let Some(c) = rest.chars().next() {
            if c == '[' {
                let end = rest.find(']').ok_or_else(|| CoreError::InvalidFormat {
                    pattern: pattern.to_string(),
                    message: "unterminated '['".to_string(),
                })?;
                out.push_str(&rest[1..end].replace('%', "%%"));
                rest = &rest[end + 1..];
                continue;
            }
            for (token, strftime) in TOKENS {
                if let Some(tail) = rest.strip_prefix(token) {
                    out.push_str(strftime);
                    rest = tail;
                    continue 'outer;
                }
            }
            if c == '%' {
                out.push_str("%%");
            } else {
                out.push(c);
            }
            rest = &rest[c.len_utf8()..];
        }

        if StrftimeItems::new(&out).any(|item| matches!(item, Item::Error)) {
            return Err(CoreError::InvalidFormat {
                pattern: pattern.to_string(),
                message: format!("unsupported strftime '{}'", out),
            });
        }
        Ok(out)
    }
}

impl ValueFormatter for MomentFormatter {
    fn format(&self, value: &DateTime<Utc>, pattern: &str) -> String {
        match Self::to_strftime(pattern) {
            Ok(fmt) => value.format(&fmt).to_string(),
            Err(e) => {
                log::warn!("{}; falling back to ISO format", e);
                value.to_rfc3339()
            }
        }
    }
}
