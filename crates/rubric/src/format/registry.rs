use std::{
    env, fs, io,
    path::PathBuf,
};

use log::{debug, warn};

use rubric_template::parse_group;

use crate::{
    config::{DEFAULT_FORMAT, MessageConfig},
    error::FormatError,
    format::{FormatGroup, FormatOrigin},
};

/// File extension of format files.
pub const FORMAT_EXTENSION: &str = "stg";

/// Bundled copy of the default format, used when no file is installed.
pub const EMBEDDED_DEFAULT: &str = include_str!("../../formats/rubric.stg");

/// Resolves format names to files under a formats directory and loads them.
#[derive(Debug, Clone)]
pub struct FormatRegistry {
    formats_dir: PathBuf,
}

impl FormatRegistry {
    pub fn new(formats_dir: impl Into<PathBuf>) -> Self {
        Self {
            formats_dir: formats_dir.into(),
        }
    }

    /// Use the configured formats directory, or the default one.
    pub fn from_config(config: &MessageConfig) -> Self {
        match config.formats_dir() {
            Some(dir) => Self::new(dir),
            None => Self::new(Self::default_formats_dir()),
        }
    }

    /// `formats/` beside the running executable.
    pub fn default_formats_dir() -> PathBuf {
        env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join("formats")))
            .unwrap_or_else(|| PathBuf::from("formats"))
    }

    /// File a format name resolves to.
    pub fn resource_path(&self, name: &str) -> PathBuf {
        self.formats_dir.join(format!("{name}.{FORMAT_EXTENSION}"))
    }

    /// Load and verify a format.
    ///
    /// An unknown or incomplete non-default format silently falls back to
    /// the default. When the default has no file the embedded copy is used.
    /// Errors are left for the caller to escalate: they mean the default
    /// itself or a present file cannot be trusted.
    pub fn load(&self, name: &str) -> Result<FormatGroup, FormatError> {
        let path = self.resource_path(name);
        let is_default = name == DEFAULT_FORMAT;

        let (source, origin) = match fs::read_to_string(&path) {
            Ok(source) => (source, FormatOrigin::File(path)),
            // Only regular files count as installed formats
            Err(err) if err.kind() == io::ErrorKind::NotFound || path.is_dir() => {
                if !is_default {
                    debug!(format = name, path = path.display().to_string(); "No such format file, using default");
                    return self.load(DEFAULT_FORMAT);
                }
                debug!(path = path.display().to_string(); "Default format file not installed, using embedded copy");
                (EMBEDDED_DEFAULT.to_string(), FormatOrigin::Embedded)
            }
            Err(source) => return Err(FormatError::Unreadable { path, source }),
        };

        let group = parse_group(&source).map_err(|error| FormatError::Malformed {
            name: name.to_string(),
            error,
            source_text: source.clone(),
        })?;

        match FormatGroup::verify(name, origin, &group) {
            Ok(format) => {
                debug!(format = name, origin:? = format.origin(); "Message format loaded");
                Ok(format)
            }
            Err(missing) if !is_default => {
                for slot in &missing {
                    warn!(format = name, template = slot; "Format template not found");
                }
                self.load(DEFAULT_FORMAT)
            }
            Err(missing) => Err(FormatError::Incomplete {
                name: name.to_string(),
                missing,
            }),
        }
    }
}
