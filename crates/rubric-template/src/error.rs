//! Error reporting for format source files.
//!
//! Loading a format never stops at the first problem. Every phase (lexing,
//! group parsing, template compilation, group checks) pushes [`Diagnostic`]s
//! into a [`DiagnosticCollector`], and a failed load returns all of them
//! wrapped in a [`ParseError`].
//!
//! # Example
//!
//! ```
//! # use rubric_template::{Diagnostic, ErrorCode, Span};
//! let diag = Diagnostic::error("template `report` is defined multiple times")
//!     .with_code(ErrorCode::T300)
//!     .with_label(Span::new(40..46), "duplicate definition")
//!     .with_secondary_label(Span::new(0..8), "first defined here")
//!     .with_help("remove one of the definitions");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
