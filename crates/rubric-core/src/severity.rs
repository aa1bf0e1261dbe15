//! Severity levels for diagnostics.
//!
//! A severity decides two things: which run counter a diagnostic feeds, and
//! whether repeated occurrences of the same [`ErrorType`](crate::ErrorType)
//! are reported again. The `*Once` variants are reported at most once per run.

use std::fmt;

use serde::Deserialize;

/// The severity level of a diagnostic kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    /// A warning reported on every occurrence.
    Warning,

    /// A warning reported only on the first occurrence of its error type.
    WarningOnce,

    /// An error reported on every occurrence.
    Error,

    /// An error reported only on the first occurrence of its error type.
    ErrorOnce,
}

impl Severity {
    /// Returns `true` for [`Severity::Warning`] and [`Severity::WarningOnce`].
    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning | Severity::WarningOnce)
    }

    /// Returns `true` for [`Severity::Error`] and [`Severity::ErrorOnce`].
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error | Severity::ErrorOnce)
    }

    /// Returns `true` if repeated occurrences are suppressed.
    pub fn is_one_off(&self) -> bool {
        matches!(self, Severity::WarningOnce | Severity::ErrorOnce)
    }

    /// Text shown to the user in the `type` slot of a report.
    pub fn text(&self) -> &'static str {
        if self.is_error() { "error" } else { "warning" }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(Severity::Warning.is_warning());
        assert!(Severity::WarningOnce.is_warning());
        assert!(!Severity::Warning.is_error());
        assert!(Severity::Error.is_error());
        assert!(Severity::ErrorOnce.is_error());
        assert!(!Severity::ErrorOnce.is_warning());
    }

    #[test]
    fn test_one_off() {
        assert!(Severity::WarningOnce.is_one_off());
        assert!(Severity::ErrorOnce.is_one_off());
        assert!(!Severity::Warning.is_one_off());
        assert!(!Severity::Error.is_one_off());
    }

    #[test]
    fn test_display_shares_text_with_plain_variant() {
        assert_eq!(Severity::Warning.to_string(), "warning");
        assert_eq!(Severity::WarningOnce.to_string(), "warning");
        assert_eq!(Severity::Error.to_string(), "error");
        assert_eq!(Severity::ErrorOnce.to_string(), "error");
    }
}
