//! Error codes for the AGX diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Lexer errors
//! - `E1xx` - Parser errors
//! - `E2xx` - Validation errors

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Lexer Errors (E0xx)
    // =========================================================================
    /// Unterminated string literal.
    ///
    /// A string was opened with a quote but not closed before the end of the
    /// line.
    E001,

    /// Unexpected character.
    E002,

    /// Unterminated block comment.
    ///
    /// A `/*` comment has no matching `*/`.
    E003,

    // =========================================================================
    // Parser Errors (E1xx)
    // =========================================================================
    /// Unexpected token.
    E100,

    /// Incomplete input.
    ///
    /// The input ended before a complete declaration was parsed.
    E101,

    // =========================================================================
    // Validation Errors (E2xx)
    // =========================================================================
    /// Type name does not start with a capital letter.
    E200,

    /// Unresolved type reference.
    ///
    /// A node kind, edge kind, or supertype names a type that is not declared.
    E201,

    /// Unresolved node reference.
    ///
    /// An edge endpoint does not name any node visible from its scope.
    E202,

    /// Duplicate sibling node name.
    ///
    /// Two nodes in the same block share a name. References resolve to the
    /// first one.
    E203,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unterminated string literal",
            ErrorCode::E002 => "unexpected character",
            ErrorCode::E003 => "unterminated block comment",
            ErrorCode::E100 => "unexpected token",
            ErrorCode::E101 => "incomplete input",
            ErrorCode::E200 => "type name not capitalized",
            ErrorCode::E201 => "unresolved type",
            ErrorCode::E202 => "unresolved node",
            ErrorCode::E203 => "duplicate node name",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E001.to_string(), "E001");
        assert_eq!(ErrorCode::E100.to_string(), "E100");
        assert_eq!(ErrorCode::E203.to_string(), "E203");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(ErrorCode::E001.description(), "unterminated string literal");
        assert_eq!(ErrorCode::E202.description(), "unresolved node");
    }
}
