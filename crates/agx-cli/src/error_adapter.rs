//! Error adapter for converting AgxError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! # Multi-Error Support
//!
//! Parse and validation failures can carry several diagnostics. Each
//! diagnostic is rendered independently.

use std::{error::Error as _, fmt};

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, Severity, SourceSpan};

use agx::AgxError;
use agx_parser::error::Diagnostic;

/// Adapter for a single agx diagnostic.
pub struct DiagnosticAdapter<'a> {
    /// The wrapped diagnostic
    diag: &'a Diagnostic,
    /// Source code for displaying snippets
    src: &'a str,
}

impl<'a> DiagnosticAdapter<'a> {
    /// Create a new diagnostic adapter.
    pub fn new(diag: &'a Diagnostic, src: &'a str) -> Self {
        Self { diag, src }
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diag.message())
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn severity(&self) -> Option<Severity> {
        if self.diag.severity().is_warning() {
            Some(Severity::Warning)
        } else {
            Some(Severity::Error)
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = self.diag.labels();
        if labels.is_empty() {
            return None;
        }

        Some(Box::new(labels.iter().map(|label| {
            let span = span_to_miette(label.span());
            let message = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

/// Adapter for non-diagnostic [`AgxError`] variants such as I/O and
/// configuration errors.
pub struct ErrorAdapter<'a>(pub &'a AgxError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            AgxError::Io(_) => "agx::io",
            AgxError::Config(_) => "agx::config",
            AgxError::Parse { .. } | AgxError::Validation { .. } => return None,
        };
        Some(Box::new(code))
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A rich diagnostic with source location information.
    Diagnostic(DiagnosticAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn severity(&self) -> Option<Severity> {
        match self {
            Reportable::Diagnostic(d) => d.severity(),
            Reportable::Error(e) => e.severity(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Diagnostic(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Diagnostic(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert an agx [`Span`](agx_parser::Span) to a miette [`SourceSpan`].
fn span_to_miette(span: agx_parser::Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// Convert an [`AgxError`] into a list of reportable errors.
///
/// Parse and validation failures yield one [`Reportable`] per diagnostic.
/// Other variants yield a single [`Reportable`].
pub fn to_reportables(err: &AgxError) -> Vec<Reportable<'_>> {
    match err.source_text() {
        Some(src) => err
            .diagnostics()
            .iter()
            .map(|d| Reportable::Diagnostic(DiagnosticAdapter::new(d, src)))
            .collect(),
        None => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

#[cfg(test)]
mod tests {
    use agx_parser::{
        Span,
        error::{ErrorCode, ParseError, ValidationError},
    };

    use super::*;

    fn parse_error(diagnostics: Vec<Diagnostic>, src: &str) -> AgxError {
        AgxError::Parse {
            err: ParseError::from(diagnostics),
            src: src.to_string(),
        }
    }

    #[test]
    fn test_single_diagnostic() {
        let diag = Diagnostic::error("test error")
            .with_code(ErrorCode::E100)
            .with_label(Span::new(0..5), "here")
            .with_help("try this");
        let err = parse_error(vec![diag], "hello");

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);

        match &reportables[0] {
            Reportable::Diagnostic(d) => {
                assert_eq!(d.to_string(), "test error");
                assert_eq!(d.code().map(|c| c.to_string()), Some("E100".to_string()));
                assert_eq!(d.help().map(|h| h.to_string()), Some("try this".to_string()));
            }
            Reportable::Error(_) => panic!("Expected Diagnostic"),
        }
    }

    #[test]
    fn test_multiple_diagnostics() {
        let err = parse_error(
            vec![
                Diagnostic::error("first error").with_label(Span::new(0..5), "first"),
                Diagnostic::error("second error").with_label(Span::new(10..15), "second"),
            ],
            "source code here...",
        );

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 2);
        assert_eq!(reportables[0].to_string(), "first error");
        assert_eq!(reportables[1].to_string(), "second error");
    }

    #[test]
    fn test_validation_diagnostics_keep_severity() {
        let src = "type system; A; A;";
        let err = AgxError::Validation {
            err: ValidationError::new(
                vec![
                    Diagnostic::error("Type name should start with a capital.")
                        .with_code(ErrorCode::E200)
                        .with_label(Span::new(5..11), "type name"),
                    Diagnostic::warning("Duplicate node name `A`.")
                        .with_code(ErrorCode::E203)
                        .with_label(Span::new(16..17), "duplicate"),
                ],
                src,
            ),
            src: src.to_string(),
        };

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 2);
        assert_eq!(reportables[0].severity(), Some(Severity::Error));
        assert_eq!(reportables[1].severity(), Some(Severity::Warning));
    }

    #[test]
    fn test_non_diagnostic_error() {
        let err = AgxError::Config("bad value".to_string());

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 1);
        match &reportables[0] {
            Reportable::Error(e) => {
                assert_eq!(e.to_string(), "Configuration error: bad value");
                assert_eq!(e.code().map(|c| c.to_string()), Some("agx::config".to_string()));
            }
            Reportable::Diagnostic(_) => panic!("Expected Error"),
        }
    }

    #[test]
    fn test_primary_flag_on_labels() {
        let diag = Diagnostic::error("error with labels")
            .with_label(Span::new(0..5), "primary")
            .with_secondary_label(Span::new(10..15), "secondary");

        let adapter = DiagnosticAdapter::new(&diag, "some source code");

        let labels: Vec<_> = adapter.labels().unwrap().collect();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].label(), Some("primary"));
        assert!(labels[0].primary());
        assert!(!labels[1].primary());
    }

    #[test]
    fn test_span_conversion() {
        let span = span_to_miette(Span::new(3..8));
        assert_eq!(span.offset(), 3);
        assert_eq!(span.len(), 5);
    }
}
