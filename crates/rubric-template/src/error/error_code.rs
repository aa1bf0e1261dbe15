//! Error codes for format source problems.
//!
//! Error codes are organized by phase:
//! - `T0xx` - Lexer errors
//! - `T1xx` - Group syntax errors
//! - `T2xx` - Template body errors
//! - `T3xx` - Group check errors

use std::fmt;

/// Error codes for categorizing format load errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Lexer Errors (T0xx)
    // =========================================================================
    /// Unterminated string literal.
    T001,

    /// Unexpected character.
    T002,

    /// Invalid escape sequence.
    ///
    /// Valid escapes are: `\"`, `\\`, `\n`, `\r`, `\t`, `\<`, `\>`.
    T003,

    /// Unterminated `<< ... >>` big string.
    T004,

    /// Unterminated block comment.
    T005,

    // =========================================================================
    // Group Syntax Errors (T1xx)
    // =========================================================================
    /// Unexpected token.
    T100,

    /// Incomplete input.
    T101,

    // =========================================================================
    // Template Body Errors (T2xx)
    // =========================================================================
    /// An expression was opened with `<` but never closed with `>`.
    T200,

    /// `<if(...)>`, `<else>` and `<endif>` do not pair up.
    T201,

    /// The text between `<` and `>` is not a valid expression.
    T202,

    // =========================================================================
    // Group Check Errors (T3xx)
    // =========================================================================
    /// Duplicate template definition.
    T300,

    /// A template refers to an attribute it does not declare.
    T301,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "T001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::T001 => "T001",
            ErrorCode::T002 => "T002",
            ErrorCode::T003 => "T003",
            ErrorCode::T004 => "T004",
            ErrorCode::T005 => "T005",
            ErrorCode::T100 => "T100",
            ErrorCode::T101 => "T101",
            ErrorCode::T200 => "T200",
            ErrorCode::T201 => "T201",
            ErrorCode::T202 => "T202",
            ErrorCode::T300 => "T300",
            ErrorCode::T301 => "T301",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::T001 => "unterminated string literal",
            ErrorCode::T002 => "unexpected character",
            ErrorCode::T003 => "invalid escape sequence",
            ErrorCode::T004 => "unterminated big string",
            ErrorCode::T005 => "unterminated block comment",
            ErrorCode::T100 => "unexpected token",
            ErrorCode::T101 => "incomplete input",
            ErrorCode::T200 => "unterminated expression",
            ErrorCode::T201 => "unbalanced conditional",
            ErrorCode::T202 => "malformed expression",
            ErrorCode::T300 => "duplicate template definition",
            ErrorCode::T301 => "undeclared attribute",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
