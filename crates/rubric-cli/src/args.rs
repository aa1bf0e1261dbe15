//! Command-line argument definitions for the Rubric CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the manifest to replay, override the
//! message settings of the configuration file, and set logging verbosity.

use clap::Parser;

/// Command-line arguments for the Rubric diagnostic harness
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the diagnostic manifest (TOML)
    #[arg(help = "Path to the diagnostic manifest")]
    pub input: String,

    /// Message format name, resolved to `<formats-dir>/<name>.stg`
    #[arg(short = 'f', long)]
    pub message_format: Option<String>,

    /// Render the verbose form of messages
    #[arg(long)]
    pub long_messages: bool,

    /// Directory holding message format files
    #[arg(long)]
    pub formats_dir: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
