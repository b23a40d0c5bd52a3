//! notebox-hook service configuration
//!
//! Merges command-line/environment overrides with the bootstrap TOML and
//! compiled defaults into one [`ServiceConfig`] value.

use std::path::PathBuf;

use notebox_common::config::{TomlConfig, UploadFolderResolver, DEFAULT_MAX_UPLOAD_BYTES};

/// Default bind host
pub const DEFAULT_HOST: &str = "localhost";

/// Default bind port
pub const DEFAULT_PORT: u16 = 6000;

/// Values supplied on the command line (clap also reads their env vars)
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub upload_folder: Option<PathBuf>,
}

/// Resolved configuration for one service instance
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub upload_folder: PathBuf,
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

impl ServiceConfig {
    /// Resolve: CLI/env → TOML → compiled default
    pub fn resolve(cli: CliOverrides, toml: &TomlConfig) -> Self {
        let upload_folder = UploadFolderResolver::new()
            .with_cli_arg(cli.upload_folder)
            .with_toml(toml)
            .resolve();

        Self {
            upload_folder,
            host: cli
                .host
                .or_else(|| toml.host.clone())
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: cli.port.or(toml.port).unwrap_or(DEFAULT_PORT),
            max_upload_bytes: toml.max_upload_bytes.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        }
    }

    /// `host:port` for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_beats_toml() {
        let toml = TomlConfig {
            host: Some("0.0.0.0".to_string()),
            port: Some(7000),
            upload_folder: Some(PathBuf::from("/toml/uploads")),
            ..Default::default()
        };
        let cli = CliOverrides {
            host: Some("127.0.0.1".to_string()),
            port: Some(8000),
            upload_folder: Some(PathBuf::from("/cli/uploads")),
        };

        let config = ServiceConfig::resolve(cli, &toml);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8000);
        assert_eq!(config.upload_folder, PathBuf::from("/cli/uploads"));
        assert_eq!(config.bind_addr(), "127.0.0.1:8000");
    }

    #[test]
    fn toml_fills_gaps() {
        let toml = TomlConfig {
            port: Some(7000),
            max_upload_bytes: Some(1024),
            ..Default::default()
        };

        let config = ServiceConfig::resolve(CliOverrides::default(), &toml);
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.port, 7000);
        assert_eq!(config.max_upload_bytes, 1024);
    }

    #[test]
    fn defaults_without_overrides() {
        let config = ServiceConfig::resolve(
            CliOverrides {
                upload_folder: Some(PathBuf::from("uploads")),
                ..Default::default()
            },
            &TomlConfig::default(),
        );
        assert_eq!(config.bind_addr(), "localhost:6000");
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
    }
}
