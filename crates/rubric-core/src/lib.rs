//! Rubric Core Types and Definitions
//!
//! This crate provides the foundational types shared by every part of the
//! Rubric diagnostic engine. It includes:
//!
//! - **Severity**: How a diagnostic is counted and deduplicated ([`Severity`])
//! - **Error types**: Immutable diagnostic kinds identified by code ([`ErrorType`])
//! - **Diagnostics**: Reportable events with location and arguments ([`Diagnostic`])
//! - **Values**: Attribute values handed to templates ([`value`] module)

pub mod diagnostic;
pub mod error_type;
pub mod severity;
pub mod value;

pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use error_type::{ErrorType, LEFT_RECURSION_CYCLES};
pub use severity::Severity;
pub use value::{Attributes, Fragment, Value};
