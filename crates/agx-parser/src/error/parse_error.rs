//! Structural failure: the source could not be tokenized or parsed.

use std::fmt;

use crate::error::Diagnostic;

/// Error returned when the source is not a syntactically valid document.
///
/// Wraps every lexer diagnostic, or the first parser diagnostic.
#[derive(Debug)]
pub struct ParseError {
    diagnostics: Vec<Diagnostic>,
}

impl ParseError {
    /// Create a new parse error from diagnostics.
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    /// Get all diagnostics in this error.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Get one human-readable message per diagnostic.
    pub fn messages(&self) -> Vec<String> {
        self.diagnostics.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(first) = self.diagnostics.first() {
            write!(f, "{first}")?;
            if self.diagnostics.len() > 1 {
                write!(f, " (+{} more)", self.diagnostics.len() - 1)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

impl From<Diagnostic> for ParseError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostics: vec![diagnostic],
        }
    }
}

impl From<Vec<Diagnostic>> for ParseError {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_parse_error_from_diagnostic() {
        let err: ParseError = Diagnostic::error("test error")
            .with_code(ErrorCode::E100)
            .into();

        assert_eq!(err.diagnostics().len(), 1);
        assert_eq!(err.messages(), vec!["error[E100]: test error".to_string()]);
    }

    #[test]
    fn test_parse_error_display_single() {
        let err: ParseError = Diagnostic::error("unexpected token").into();

        assert_eq!(err.to_string(), "error: unexpected token");
    }

    #[test]
    fn test_parse_error_display_multiple() {
        let err: ParseError = vec![
            Diagnostic::error("first error"),
            Diagnostic::error("second error"),
            Diagnostic::error("third error"),
        ]
        .into();

        assert_eq!(err.to_string(), "error: first error (+2 more)");
    }
}
