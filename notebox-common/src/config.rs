//! Bootstrap configuration and upload folder resolution
//!
//! Configuration is resolved once at startup and handed to the service as a
//! plain value. Nothing here is consulted again while requests are served.
//!
//! # Upload Folder Priority
//!
//! 1. Command-line argument (highest priority)
//! 2. `NOTEBOX_UPLOAD_FOLDER` environment variable
//! 3. TOML config file (`upload_folder` key)
//! 4. Compiled default (`./uploads`)
//!
//! A missing or malformed TOML file never stops startup: the binary logs a
//! warning and the remaining tiers are used.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable naming the upload folder
pub const UPLOAD_FOLDER_ENV: &str = "NOTEBOX_UPLOAD_FOLDER";

/// Default request body limit (64 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Bootstrap configuration loaded from TOML file
///
/// Every field is optional; unset fields fall through to CLI/env/defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TomlConfig {
    /// Folder holding uploaded and generated archives
    #[serde(default)]
    pub upload_folder: Option<PathBuf>,

    /// Bind host
    #[serde(default)]
    pub host: Option<String>,

    /// Bind port
    #[serde(default)]
    pub port: Option<u16>,

    /// Maximum accepted request body in bytes
    #[serde(default)]
    pub max_upload_bytes: Option<usize>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
    }

    /// Load TOML config from a file path
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        Self::parse(&content)
    }
}

/// Default TOML config path for a service: `<config_dir>/notebox/<service>.toml`
pub fn default_config_path(service_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("notebox").join(format!("{}.toml", service_name)))
}

/// Upload folder resolver following the documented priority order
pub struct UploadFolderResolver<'a> {
    cli_arg: Option<PathBuf>,
    toml: Option<&'a TomlConfig>,
}

impl<'a> UploadFolderResolver<'a> {
    pub fn new() -> Self {
        Self {
            cli_arg: None,
            toml: None,
        }
    }

    /// Command-line override
    pub fn with_cli_arg(mut self, path: Option<PathBuf>) -> Self {
        self.cli_arg = path;
        self
    }

    /// TOML tier
    pub fn with_toml(mut self, config: &'a TomlConfig) -> Self {
        self.toml = Some(config);
        self
    }

    /// Resolve the upload folder (never fails; falls back to the compiled default)
    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            return path.clone();
        }

        if let Ok(path) = std::env::var(UPLOAD_FOLDER_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        if let Some(path) = self.toml.and_then(|c| c.upload_folder.clone()) {
            return path;
        }

        default_upload_folder()
    }
}

impl Default for UploadFolderResolver<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Compiled default upload folder, relative to the working directory
pub fn default_upload_folder() -> PathBuf {
    PathBuf::from("uploads")
}

/// Creates the upload folder on startup
pub struct UploadFolderInitializer {
    upload_folder: PathBuf,
}

impl UploadFolderInitializer {
    pub fn new(upload_folder: PathBuf) -> Self {
        Self { upload_folder }
    }

    /// Create the folder (and parents) if it is missing
    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.upload_folder.exists() {
            std::fs::create_dir_all(&self.upload_folder)?;
            info!("Created upload folder: {}", self.upload_folder.display());
        } else if !self.upload_folder.is_dir() {
            return Err(Error::Config(format!(
                "Upload folder is not a directory: {}",
                self.upload_folder.display()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let config = TomlConfig::parse(
            r#"
            upload_folder = "/srv/notebox"
            host = "0.0.0.0"
            port = 7000
            max_upload_bytes = 1024

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.upload_folder, Some(PathBuf::from("/srv/notebox")));
        assert_eq!(config.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(config.port, Some(7000));
        assert_eq!(config.max_upload_bytes, Some(1024));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = TomlConfig::parse("").unwrap();
        assert!(config.upload_folder.is_none());
        assert!(config.port.is_none());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn malformed_config_is_config_error() {
        let err = TomlConfig::parse("port = \"not a number\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
