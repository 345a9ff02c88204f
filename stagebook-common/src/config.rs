//! Configuration loading and data folder resolution
//!
//! Each setting is resolved in priority order:
//! 1. Command-line argument or environment variable (collected by the binary)
//! 2. TOML config file
//! 3. Compiled default
//!
//! A missing or unreadable config file is logged and otherwise ignored.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Application directory name under the platform config/data directories
pub const APP_DIR_NAME: &str = "stagebook";

/// Database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "stagebook.db";

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    pub database_path: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// tracing filter directive, e.g. `info` or `stagebook_web=debug`
    pub level: Option<String>,
    /// Append log lines to this file in addition to stderr
    pub log_file: Option<PathBuf>,
}

/// Values used when neither the command line nor the config file set one
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            root_folder: default_root_folder(),
            host: "127.0.0.1".to_string(),
            port: 5000,
            log_level: "info".to_string(),
        }
    }
}

/// Settings supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub root_folder: Option<PathBuf>,
    pub database_path: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

/// Fully resolved server settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub root_folder: PathBuf,
    pub database_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl ServerConfig {
    pub fn resolve(overrides: Overrides, file: TomlConfig, defaults: CompiledDefaults) -> Self {
        let root_folder = overrides
            .root_folder
            .or(file.root_folder)
            .unwrap_or(defaults.root_folder);

        let database_path = overrides
            .database_path
            .or(file.database_path)
            .unwrap_or_else(|| root_folder.join(DATABASE_FILE_NAME));

        Self {
            database_path,
            host: overrides.host.or(file.host).unwrap_or(defaults.host),
            port: overrides.port.or(file.port).unwrap_or(defaults.port),
            log_level: overrides
                .log_level
                .or(file.logging.level)
                .unwrap_or(defaults.log_level),
            log_file: overrides.log_file.or(file.logging.log_file),
            root_folder,
        }
    }

    /// Socket address string for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Create the root folder (and the database's parent folder) if missing
    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root_folder)?;
        if let Some(parent) = self.database_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

/// Parse config file contents
pub fn parse_toml_config(contents: &str) -> Result<TomlConfig> {
    toml::from_str(contents).map_err(|e| Error::Config(e.to_string()))
}

/// Load the config file, falling back to an empty config
///
/// `explicit` wins over the platform locations. Problems are logged, never
/// returned.
pub fn load_toml_config(explicit: Option<&Path>) -> TomlConfig {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match find_config_file() {
            Some(path) => path,
            None => return TomlConfig::default(),
        },
    };

    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) => {
            warn!("Config file {} not readable ({}), using defaults", path.display(), e);
            return TomlConfig::default();
        }
    };

    match parse_toml_config(&contents) {
        Ok(config) => config,
        Err(e) => {
            warn!("Ignoring malformed config file {}: {}", path.display(), e);
            TomlConfig::default()
        }
    }
}

/// First existing config file among the platform locations
pub fn find_config_file() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join("config.toml"));
    let system_config = PathBuf::from("/etc").join(APP_DIR_NAME).join("config.toml");

    user_config
        .into_iter()
        .chain(std::iter::once(system_config))
        .find(|p| p.exists())
}

/// OS-dependent default root folder
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("./stagebook_data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> CompiledDefaults {
        CompiledDefaults {
            root_folder: PathBuf::from("/defaults"),
            host: "127.0.0.1".to_string(),
            port: 5000,
            log_level: "info".to_string(),
        }
    }

    #[test]
    fn test_defaults_only() {
        let config = ServerConfig::resolve(Overrides::default(), TomlConfig::default(), defaults());
        assert_eq!(config.root_folder, PathBuf::from("/defaults"));
        assert_eq!(config.database_path, PathBuf::from("/defaults/stagebook.db"));
        assert_eq!(config.bind_address(), "127.0.0.1:5000");
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = parse_toml_config(
            r#"
            root_folder = "/srv/stagebook"
            port = 8080

            [logging]
            level = "debug"
            log_file = "/var/log/stagebook.log"
            "#,
        )
        .unwrap();

        let config = ServerConfig::resolve(Overrides::default(), file, defaults());
        assert_eq!(config.database_path, PathBuf::from("/srv/stagebook/stagebook.db"));
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_file, Some(PathBuf::from("/var/log/stagebook.log")));
    }

    #[test]
    fn test_overrides_beat_file() {
        let file = TomlConfig {
            port: Some(8080),
            database_path: Some(PathBuf::from("/file/db.sqlite")),
            ..Default::default()
        };
        let overrides = Overrides {
            port: Some(9090),
            database_path: Some(PathBuf::from("/cli/db.sqlite")),
            ..Default::default()
        };

        let config = ServerConfig::resolve(overrides, file, defaults());
        assert_eq!(config.port, 9090);
        assert_eq!(config.database_path, PathBuf::from("/cli/db.sqlite"));
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = parse_toml_config("port = \"not a number\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
