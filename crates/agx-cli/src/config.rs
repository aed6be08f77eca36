//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory).

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use serde::Deserialize;
use thiserror::Error;

use agx::{AgxError, config::ReaderConfig, export::Format};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),
}

impl From<ConfigError> for AgxError {
    fn from(err: ConfigError) -> Self {
        AgxError::Config(err.to_string())
    }
}

/// Top-level CLI configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Reader configuration section.
    #[serde(default)]
    reader: ReaderConfig,

    /// Output configuration section.
    #[serde(default)]
    output: OutputConfig,
}

impl AppConfig {
    /// Returns the reader configuration.
    pub fn reader(&self) -> ReaderConfig {
        self.reader
    }

    /// Returns the output configuration.
    pub fn output(&self) -> &OutputConfig {
        &self.output
    }
}

/// How the finished graph is written out.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Output [`Format`].
    #[serde(default)]
    format: Format,

    /// Spaces per nesting level in XML output.
    #[serde(default = "default_indent")]
    indent: usize,
}

impl OutputConfig {
    /// Returns the configured output format.
    pub fn format(&self) -> Format {
        self.format
    }

    /// Returns the XML indentation width.
    pub fn indent(&self) -> usize {
        self.indent
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: Format::default(),
            indent: default_indent(),
        }
    }
}

fn default_indent() -> usize {
    2
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (agx/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, AgxError> {
    // 1. Try the explicitly provided path first if available
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    // 2. Try the local project directory
    let local_config = Path::new("agx/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    // 3. Try the platform-specific config directory
    if let Some(proj_dirs) = ProjectDirs::from("com", "agx", "agx") {
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

fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, AgxError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

fn parse_config(content: &str) -> Result<AppConfig, AgxError> {
    let config: AppConfig =
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();

        assert!(config.reader().validate());
        assert_eq!(config.output().format(), Format::Xml);
        assert_eq!(config.output().indent(), 2);
    }

    #[test]
    fn test_full_config() {
        let config = parse_config(
            r#"
            [reader]
            validate = false

            [output]
            format = "text"
            indent = 4
            "#,
        )
        .unwrap();

        assert!(!config.reader().validate());
        assert_eq!(config.output().format(), Format::Text);
        assert_eq!(config.output().indent(), 4);
    }

    #[test]
    fn test_invalid_config() {
        let err = parse_config("[output]\nformat = \"js\"").unwrap_err();
        assert!(matches!(err, AgxError::Config(_)));
    }

    #[test]
    fn test_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agx.toml");
        fs::write(&path, "[output]\nindent = 8").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.output().indent(), 8);
    }

    #[test]
    fn test_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(dir.path().join("missing.toml"))).unwrap_err();

        assert!(err.to_string().contains("Missing configuration file"));
    }
}
