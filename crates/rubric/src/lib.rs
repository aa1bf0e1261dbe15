//! Rubric - diagnostic reporting with pluggable message formats.
//!
//! A [`DiagnosticEngine`] counts the errors and warnings of one run,
//! suppresses repeats of one-off diagnostic types and renders what it reports
//! through a message format loaded from a template group file. When the
//! formatting layer itself is broken the engine falls back to raw text and a
//! [`Fatal`] result that the caller propagates to its top level.

pub mod config;
pub mod fatal;
pub mod format;
pub mod render;

mod engine;
mod error;
mod listener;
mod policy;
mod sink;

pub use rubric_core::{
    Attributes, Diagnostic, DiagnosticKind, ErrorType, Fragment, LEFT_RECURSION_CYCLES, Severity,
    Value,
};

pub use engine::DiagnosticEngine;
pub use error::{Fatal, FormatError, RubricError};
pub use listener::ConsoleErrorListener;
pub use policy::{EmissionPolicy, Verdict};
pub use sink::{ConsoleSink, MemorySink, Record, Sink};
