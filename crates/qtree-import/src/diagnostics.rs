//! Conversion diagnostics
//!
//! Every problem met while converting is recorded here instead of aborting.
//! The failing subtree is left out of the result and conversion goes on, so a
//! single run reports every independent failure.

use serde::Serialize;
use std::fmt;

/// Diagnostic category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Field, operator, function or widget not found in the schema
    UnresolvedReference,
    /// A value failed a required coercion
    MalformedValue,
    /// No supplied value and no declared default
    MissingArgument,
    /// No converter recognized the expression
    UnrecognizedExpression,
}

impl DiagnosticKind {
    /// Stable code
    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticKind::UnresolvedReference => "E001",
            DiagnosticKind::MalformedValue => "E002",
            DiagnosticKind::MissingArgument => "E003",
            DiagnosticKind::UnrecognizedExpression => "E004",
        }
    }
}

/// A single recorded problem
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,

    /// Error code (e.g., "E001")
    pub code: &'static str,

    /// Human-readable message
    pub message: String,

    /// Serialized expression the problem was found in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: kind.code(),
            message: message.into(),
            context: None,
        }
    }

    /// Add the offending expression
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(context) = &self.context {
            write!(f, " in {}", context)?;
        }
        Ok(())
    }
}

/// Append-only diagnostics accumulator
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        log::trace!("Recorded diagnostic: {}", diagnostic);
        self.items.push(diagnostic);
    }

    /// Record a diagnostic from its parts
    pub fn record(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.push(Diagnostic::new(kind, message));
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Messages in recording order
    pub fn messages(&self) -> Vec<String> {
        self.items.iter().map(|d| d.message.clone()).collect()
    }

    /// Count of diagnostics of one kind
    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.items.iter().filter(|d| d.kind == kind).count()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, diagnostic) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", diagnostic)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
