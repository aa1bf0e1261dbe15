//! Configuration types for the diagnostic engine.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! TOML file by the command line harness.
//!
//! # Example
//!
//! ```
//! # use rubric::config::{AppConfig, DEFAULT_FORMAT};
//! let config = AppConfig::default();
//! assert_eq!(config.messages().format(), DEFAULT_FORMAT);
//! assert!(!config.messages().long_messages());
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Name of the built-in message format.
pub const DEFAULT_FORMAT: &str = "rubric";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Message formatting section.
    #[serde(default)]
    messages: MessageConfig,
}

impl AppConfig {
    pub fn new(messages: MessageConfig) -> Self {
        Self { messages }
    }

    /// Returns the message configuration.
    pub fn messages(&self) -> &MessageConfig {
        &self.messages
    }

    pub fn into_messages(self) -> MessageConfig {
        self.messages
    }
}

/// Controls how diagnostics are rendered.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageConfig {
    /// Name of the message format, resolved to `<formats_dir>/<format>.stg`.
    #[serde(default = "default_format")]
    format: String,

    /// Ask message templates for their verbose form.
    #[serde(default)]
    long_messages: bool,

    /// Directory holding format files. Defaults to `formats/` beside the
    /// executable.
    #[serde(default)]
    formats_dir: Option<PathBuf>,
}

fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            long_messages: false,
            formats_dir: None,
        }
    }
}

impl MessageConfig {
    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn long_messages(&self) -> bool {
        self.long_messages
    }

    pub fn formats_dir(&self) -> Option<&Path> {
        self.formats_dir.as_deref()
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_long_messages(mut self, long_messages: bool) -> Self {
        self.long_messages = long_messages;
        self
    }

    pub fn with_formats_dir(mut self, formats_dir: impl Into<PathBuf>) -> Self {
        self.formats_dir = Some(formats_dir.into());
        self
    }
}
