//! Error and diagnostic system for the AGX parser.
//!
//! Every phase reports problems as [`Diagnostic`]s: a severity, an optional
//! [`ErrorCode`], labeled source spans, and optional help. Phases that can
//! report several problems accumulate them in a [`DiagnosticCollector`].
//!
//! Two failures reach the caller of [`parse`](crate::parse):
//!
//! - [`ParseError`] when the text is not a well-formed document
//! - [`ValidationError`] when the document breaks a validation rule
//!
//! Both are wrapped by [`Error`].
//!
//! # Example
//!
//! ```
//! # use agx_parser::error::{Diagnostic, ErrorCode};
//! # use agx_parser::Span;
//!
//! let diag = Diagnostic::warning("duplicate node name `A`")
//!     .with_code(ErrorCode::E203)
//!     .with_label(Span::new(30..31), "duplicate")
//!     .with_secondary_label(Span::new(10..11), "first declared here")
//!     .with_help("references resolve to the first declaration");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;
mod validation_error;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
pub use validation_error::{ValidationError, ValidationIssue};

use thiserror::Error;

/// Failure of the whole parse pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// The source could not be tokenized or parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The document parsed but failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl Error {
    /// Get the underlying diagnostics of either failure.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Error::Parse(err) => err.diagnostics(),
            Error::Validation(err) => err.diagnostics(),
        }
    }
}
