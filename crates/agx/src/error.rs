//! Error types for agx operations.
//!
//! [`AgxError`] wraps every failure a [`GraphReader`](crate::GraphReader)
//! can report. Parse and validation variants keep the source text so callers
//! can render snippets next to diagnostics.

use std::io;

use thiserror::Error;

use agx_parser::error::{Diagnostic, ParseError, ValidationError};

/// The main error type for agx operations.
#[derive(Debug, Error)]
pub enum AgxError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("{err}")]
    Validation { err: ValidationError, src: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AgxError {
    /// Create an error from a parser failure, keeping the source text.
    pub fn from_parser(err: agx_parser::Error, src: impl Into<String>) -> Self {
        match err {
            agx_parser::Error::Parse(err) => Self::Parse {
                err,
                src: src.into(),
            },
            agx_parser::Error::Validation(err) => Self::Validation {
                err,
                src: src.into(),
            },
        }
    }

    /// Get the diagnostics behind a parse or validation failure.
    ///
    /// Returns an empty slice for the other variants.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Self::Parse { err, .. } => err.diagnostics(),
            Self::Validation { err, .. } => err.diagnostics(),
            Self::Io(_) | Self::Config(_) => &[],
        }
    }

    /// Get the source text a parse or validation failure refers to.
    pub fn source_text(&self) -> Option<&str> {
        match self {
            Self::Parse { src, .. } | Self::Validation { src, .. } => Some(src),
            Self::Io(_) | Self::Config(_) => None,
        }
    }
}
