//! The ParseError type wrapping every problem found in a format source.

use std::fmt::Write as _;

use thiserror::Error;

use crate::error::Diagnostic;

/// Error type for loading a format source. Wraps one or more diagnostics.
#[derive(Debug, Error)]
#[error("{}", summarize(.diagnostics))]
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

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// One line per diagnostic, prefixed with its `line:column` in `source`.
    ///
    /// This is the plain-text listing used when a format cannot be trusted to
    /// render its own load errors.
    pub fn describe(&self, source: &str) -> String {
        let mut out = String::new();
        for diag in &self.diagnostics {
            if let Some(span) = diag.primary_span() {
                let (line, column) = span.line_col(source);
                let _ = write!(out, "{line}:{column}: ");
            }
            let _ = write!(out, "{diag}");
            if let Some(help) = diag.help() {
                let _ = write!(out, " ({help})");
            }
            out.push('\n');
        }
        out
    }
}

fn summarize(diagnostics: &[Diagnostic]) -> String {
    match diagnostics {
        [] => String::new(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{first} (+{} more)", rest.len()),
    }
}

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
