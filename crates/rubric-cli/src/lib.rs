//! Rubric CLI library
//!
//! This module contains the run harness: it loads configuration, creates a
//! [`DiagnosticEngine`], and replays a diagnostic manifest through it.

pub mod config;
pub mod error_adapter;
pub mod manifest;

mod args;

pub use args::Args;

use std::{fs, io::Write, path::Path};

use log::{debug, info};

use rubric::{
    ConsoleErrorListener, ConsoleSink, DiagnosticEngine, RubricError, Sink,
};

use manifest::{Action, Manifest};

/// Counts at the end of a replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub errors: usize,
    pub warnings: usize,
}

impl RunSummary {
    /// Whether the run reported any error.
    pub fn failed(&self) -> bool {
        self.errors > 0
    }
}

/// Run the Rubric CLI application
///
/// Rendered diagnostics and the summary go to the console; raw syntax errors
/// go to standard error.
///
/// # Errors
///
/// Returns `RubricError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Manifest errors
/// - Fatal engine failures, whose text has already been written
pub fn run(args: &Args) -> Result<RunSummary, RubricError> {
    info!(input_path = args.input; "Replaying diagnostics");

    let config = config::message_config(args)?;
    let mut engine = DiagnosticEngine::new(ConsoleSink::stdio(), &config)?;
    let mut listener = ConsoleErrorListener::stderr();

    replay(&args.input, &mut engine, &mut listener)
}

/// Replay the manifest at `path` through `engine`.
///
/// Raw entries go to `listener` and are not counted. When anything was
/// reported a `<n> error(s), <m> warning(s)` line is sent as info.
pub fn replay<S: Sink, W: Write>(
    path: impl AsRef<Path>,
    engine: &mut DiagnosticEngine<S>,
    listener: &mut ConsoleErrorListener<W>,
) -> Result<RunSummary, RubricError> {
    let source = fs::read_to_string(path.as_ref())?;
    let actions = Manifest::parse(&source)?.into_actions(&source)?;
    debug!(entries = actions.len(); "Manifest loaded");

    for action in actions {
        match action {
            Action::Emit(diagnostic) => {
                engine.emit(diagnostic);
            }
            Action::Raw {
                line,
                column,
                message,
            } => listener.syntax_error(line, column, &message),
            Action::SetFormat(name) => engine.set_format(&name)?,
        }
    }

    let summary = RunSummary {
        errors: engine.error_count(),
        warnings: engine.warning_count(),
    };
    if summary.errors > 0 || summary.warnings > 0 {
        engine.info(&format!(
            "{} error(s), {} warning(s)",
            summary.errors, summary.warnings
        ));
    }

    info!(
        errors = summary.errors,
        warnings = summary.warnings;
        "Replay finished"
    );
    Ok(summary)
}
