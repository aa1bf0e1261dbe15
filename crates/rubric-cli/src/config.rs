//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory)
//! and applying command-line overrides on top.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use rubric::{
    RubricError,
    config::{AppConfig, MessageConfig},
};

use crate::Args;

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),
}

impl From<ConfigError> for RubricError {
    fn from(err: ConfigError) -> Self {
        RubricError::Config(err.to_string())
    }
}

/// Message settings from the configuration file with CLI flags applied.
///
/// # Errors
///
/// Returns error if an explicit configuration file is missing or any
/// configuration file fails to parse.
pub fn message_config(args: &Args) -> Result<MessageConfig, RubricError> {
    let mut config = load_config(args.config.as_ref())?.into_messages();

    if let Some(format) = &args.message_format {
        config = config.with_format(format);
    }
    if args.long_messages {
        config = config.with_long_messages(true);
    }
    if let Some(dir) = &args.formats_dir {
        config = config.with_formats_dir(dir);
    }

    debug!(
        format = config.format(),
        long_messages = config.long_messages();
        "Message configuration resolved"
    );
    Ok(config)
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (rubric/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, RubricError> {
    // 1. Try the explicitly provided path first if available
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    // 2. Try the local project directory
    let local_config = Path::new("rubric/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    // 3. Try the platform-specific config directory
    if let Some(proj_dirs) = ProjectDirs::from("com", "rubric", "rubric") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    // 4. If no config is found, return default config
    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Load configuration from a TOML file
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, RubricError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_explicit_config_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
            [messages]
            format = "gnu"
            long_messages = true
            formats_dir = "/opt/rubric/formats"
            "#,
        );

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.messages().format(), "gnu");
        assert!(config.messages().long_messages());
        assert_eq!(
            config.messages().formats_dir(),
            Some(Path::new("/opt/rubric/formats"))
        );
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[messages]\nlong_messages = true\n");

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.messages().format(), rubric::config::DEFAULT_FORMAT);
        assert!(config.messages().formats_dir().is_none());
    }

    #[test]
    fn test_missing_explicit_config() {
        let err = load_config(Some("/no/such/rubric/config.toml")).unwrap_err();
        assert!(matches!(err, RubricError::Config(_)));
    }

    #[test]
    fn test_invalid_config() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[messages]\nformat = 3\n");

        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.to_string().starts_with("Configuration error: Failed to parse TOML"));
    }

    #[test]
    fn test_cli_flags_override_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[messages]\nformat = \"gnu\"\n");
        let args = Args {
            input: "m.toml".to_string(),
            message_format: Some("vs2005".to_string()),
            long_messages: true,
            formats_dir: Some("fmt".to_string()),
            config: Some(path.to_string_lossy().into_owned()),
            log_level: "off".to_string(),
        };

        let config = message_config(&args).unwrap();
        assert_eq!(config.format(), "vs2005");
        assert!(config.long_messages());
        assert_eq!(config.formats_dir(), Some(Path::new("fmt")));
    }
}
