//! Counting and one-off suppression of diagnostics.

use std::collections::HashSet;

use rubric_core::{ErrorType, Severity};

/// Outcome of classifying one occurrence of an error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Counted as a warning; report it.
    Warning,
    /// Counted as an error; report it.
    Error,
    /// Not counted and not reported.
    Suppressed,
}

impl Verdict {
    pub fn is_reported(self) -> bool {
        !matches!(self, Verdict::Suppressed)
    }
}

/// Run counters and the set of error types already raised.
///
/// Decisions depend only on the error type's severity and whether the type
/// was raised before; the diagnostic's content plays no part.
#[derive(Debug, Default)]
pub struct EmissionPolicy {
    errors: usize,
    warnings: usize,
    seen: HashSet<ErrorType>,
}

impl EmissionPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify one occurrence of `error_type` and update the counters.
    ///
    /// The type is marked as seen on every call, including the first
    /// reported one, so a one-off type is reported at most once per run.
    pub fn classify(&mut self, error_type: &ErrorType) -> Verdict {
        let first = !self.seen.contains(error_type);
        let verdict = match error_type.severity() {
            Severity::Warning => Verdict::Warning,
            Severity::WarningOnce if first => Verdict::Warning,
            Severity::Error => Verdict::Error,
            Severity::ErrorOnce if first => Verdict::Error,
            Severity::WarningOnce | Severity::ErrorOnce => Verdict::Suppressed,
        };

        match verdict {
            Verdict::Warning => self.warnings += 1,
            Verdict::Error => self.errors += 1,
            Verdict::Suppressed => {}
        }

        if first {
            self.seen.insert(error_type.clone());
        }
        verdict
    }

    pub fn error_count(&self) -> usize {
        self.errors
    }

    pub fn warning_count(&self) -> usize {
        self.warnings
    }

    pub fn has_seen(&self, error_type: &ErrorType) -> bool {
        self.seen.contains(error_type)
    }

    /// Zero both counters and forget every seen type.
    pub fn reset(&mut self) {
        self.errors = 0;
        self.warnings = 0;
        self.seen.clear();
    }
}
