//! Diagnostic kinds.
//!
//! An [`ErrorType`] is the immutable description of one kind of diagnostic:
//! its numeric code, its [`Severity`], and the message template rendered for
//! it. Two error types are the same kind exactly when their codes match.

use std::{
    borrow::Cow,
    hash::{Hash, Hasher},
};

use crate::Severity;

/// Raised by the engine when rules are mutually left-recursive.
pub const LEFT_RECURSION_CYCLES: ErrorType = ErrorType::new(
    119,
    Severity::Error,
    "The following sets of rules are mutually left-recursive <arg>",
);

/// An immutable diagnostic kind, identified by its code.
///
/// Static catalogs declare error types as constants:
///
/// ```
/// # use rubric_core::{ErrorType, Severity};
/// const CANNOT_FIND_TOKENS_FILE: ErrorType = ErrorType::new(
///     52,
///     Severity::Error,
///     "cannot find tokens file <arg>",
/// );
/// assert_eq!(CANNOT_FIND_TOKENS_FILE.code(), 52);
/// ```
#[derive(Debug, Clone)]
pub struct ErrorType {
    code: u32,
    severity: Severity,
    template: Cow<'static, str>,
}

impl ErrorType {
    /// Create an error type with a static message template.
    pub const fn new(code: u32, severity: Severity, template: &'static str) -> Self {
        Self {
            code,
            severity,
            template: Cow::Borrowed(template),
        }
    }

    /// Create an error type whose template is only known at run time.
    pub fn owned(code: u32, severity: Severity, template: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            template: Cow::Owned(template.into()),
        }
    }

    pub fn code(&self) -> u32 {
        self.code
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// The message template source, using `<arg>`, `<arg2>`, ... attributes.
    pub fn template(&self) -> &str {
        &self.template
    }
}

impl PartialEq for ErrorType {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for ErrorType {}

impl Hash for ErrorType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}
