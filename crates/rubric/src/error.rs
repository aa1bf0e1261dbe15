//! Error types for the diagnostic engine.
//!
//! Three layers of failure are kept apart at the type level:
//!
//! - [`FormatError`] - a message format could not be loaded; handled inside
//!   the engine, which falls back or escalates to [`Fatal`]
//! - [`Fatal`] - the run cannot continue; raw text has already been written
//!   to the sink
//! - [`RubricError`] - failures of the surrounding run harness

use std::{io, ops::Range, path::PathBuf};

use thiserror::Error;

use rubric_template::ParseError;

/// Unrecoverable failure of the current run.
///
/// Ordinary diagnostic handling never produces or absorbs this; it is only
/// propagated to the top-level harness, which picks the exit status.
#[derive(Debug, Error)]
pub enum Fatal {
    #[error("panic: {0}")]
    Panic(String),

    #[error("installation corrupted: {0}")]
    InstallationCorrupted(String),

    #[error("internal error: {message}")]
    Internal {
        message: String,
        cause: Option<String>,
    },
}

/// Failure to load a message format.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("can't read format file {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("format `{name}` is malformed: {error}")]
    Malformed {
        name: String,
        error: ParseError,
        source_text: String,
    },

    #[error("format `{name}` is missing required template(s): {}", missing.join(", "))]
    Incomplete {
        name: String,
        missing: Vec<&'static str>,
    },
}

impl FormatError {
    /// Plain-text description written to the raw sink.
    pub fn describe(&self) -> String {
        match self {
            Self::Malformed {
                error, source_text, ..
            } => format!(
                "installation corrupted; can't load messages format file:\n{}",
                error.describe(source_text).trim_end()
            ),
            Self::Incomplete { name, .. } => {
                format!("installation corrupted; messages format file {name}.stg incomplete")
            }
            Self::Unreadable { .. } => format!("installation corrupted; {self}"),
        }
    }
}

/// Errors of the run harness.
#[derive(Debug, Error)]
pub enum RubricError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{message}")]
    Manifest {
        message: String,
        src: String,
        span: Option<Range<usize>>,
    },

    #[error(transparent)]
    Fatal(#[from] Fatal),
}

impl RubricError {
    /// Create a new `Manifest` error with the associated source text.
    pub fn new_manifest_error(
        message: impl Into<String>,
        src: impl Into<String>,
        span: Option<Range<usize>>,
    ) -> Self {
        Self::Manifest {
            message: message.into(),
            src: src.into(),
            span,
        }
    }
}
