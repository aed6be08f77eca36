//! Semantic failure: the document parsed but broke a validation rule.

use std::fmt;

use crate::{error::Diagnostic, span::LineIndex};

/// One validation problem with its 1-based source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

/// Error returned when validation finds at least one error.
///
/// Keeps every diagnostic (including warnings) for rendering, and exposes
/// the error-severity ones as positioned [`ValidationIssue`]s.
#[derive(Debug)]
pub struct ValidationError {
    diagnostics: Vec<Diagnostic>,
    issues: Vec<ValidationIssue>,
}

impl ValidationError {
    /// Create a validation error, resolving diagnostic spans against `source`.
    pub fn new(diagnostics: Vec<Diagnostic>, source: &str) -> Self {
        let index = LineIndex::new(source);
        let issues = diagnostics
            .iter()
            .filter(|diag| diag.severity().is_error())
            .map(|diag| {
                let offset = diag.primary_span().map_or(0, |span| span.start());
                let (line, column) = index.line_column(offset);
                ValidationIssue {
                    message: diag.message().to_string(),
                    line,
                    column,
                }
            })
            .collect();
        Self {
            diagnostics,
            issues,
        }
    }

    /// Get all diagnostics in this error.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Get the error-severity issues in source order of emission.
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed")?;
        if let Some(first) = self.issues.first() {
            write!(f, ": {first}")?;
            if self.issues.len() > 1 {
                write!(f, " (+{} more)", self.issues.len() - 1)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}
