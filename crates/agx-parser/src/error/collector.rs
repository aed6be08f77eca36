//! Collector for accumulating diagnostics during a processing phase.
//!
//! The [`DiagnosticCollector`] lets a phase report every problem it finds
//! instead of failing on the first one.

use crate::error::{Diagnostic, ParseError};

/// A collector for accumulating diagnostics during a processing phase.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    has_errors: bool,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a diagnostic to this collector.
    ///
    /// If the diagnostic is an error, the collector is marked as failed.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity().is_error() {
            self.has_errors = true;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Finish collection as a structural phase.
    ///
    /// Returns `Err(ParseError)` with all diagnostics if any error was
    /// emitted. Warnings are dropped on success.
    pub fn finish(self) -> Result<(), ParseError> {
        if self.has_errors {
            Err(ParseError::new(self.diagnostics))
        } else {
            Ok(())
        }
    }

    /// Finish collection, keeping everything that was emitted.
    ///
    /// Returns `Ok` with the warnings when no error was emitted, or `Err`
    /// with every diagnostic otherwise.
    pub fn into_result(self) -> Result<Vec<Diagnostic>, Vec<Diagnostic>> {
        if self.has_errors {
            Err(self.diagnostics)
        } else {
            Ok(self.diagnostics)
        }
    }
}
