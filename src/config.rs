use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the per-user data directory and of the log file
pub const APP_NAME: &str = "version-service";

/// Directory holding the catalog source files, relative to the working directory
pub const DEFAULT_SOURCES_DIR: &str = "sources";

/// Log level used when neither the config file nor `RUST_LOG` sets one
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Service configuration structure
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ServiceConfig {
    /// Directory the catalog is loaded from
    pub sources_dir: PathBuf,
    pub log: LogConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            sources_dir: PathBuf::from(DEFAULT_SOURCES_DIR),
            log: LogConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Read a JSON config file; missing fields take their defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LogConfig {
    /// `tracing` filter directive, e.g. `info` or `version_service=debug`
    pub level: String,
    /// Write JSON lines to [`log_path`] instead of stderr
    pub to_file: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            to_file: false,
        }
    }
}

/// Returns the path to the data directory for version-service.
/// Uses $XDG_DATA_HOME/version-service if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/version-service,
/// or ./version-service if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join(format!("{APP_NAME}.log"))
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join(APP_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn service_config_from_partial_object_uses_defaults_for_missing_fields() {
        let result = serde_json::from_value::<ServiceConfig>(json!({
            "log": { "toFile": true }
        }))
        .unwrap();

        assert_eq!(result.sources_dir, PathBuf::from(DEFAULT_SOURCES_DIR));
        assert_eq!(result.log.level, DEFAULT_LOG_LEVEL);
        assert!(result.log.to_file);
    }

    #[test]
    fn service_config_from_full_object_parses_all_fields() {
        let result = serde_json::from_value::<ServiceConfig>(json!({
            "sourcesDir": "/srv/catalog",
            "log": { "level": "debug", "toFile": false }
        }))
        .unwrap();

        assert_eq!(
            result,
            ServiceConfig {
                sources_dir: PathBuf::from("/srv/catalog"),
                log: LogConfig {
                    level: "debug".to_string(),
                    to_file: false,
                },
            }
        );
    }

    #[test]
    fn from_file_reads_json_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "sourcesDir": "catalog" }"#).unwrap();

        let config = ServiceConfig::from_file(&path).unwrap();

        assert_eq!(config.sources_dir, PathBuf::from("catalog"));
    }

    #[test]
    fn from_file_reports_missing_and_malformed_files() {
        let dir = TempDir::new().unwrap();
        let malformed = dir.path().join("config.json");
        std::fs::write(&malformed, "{ sourcesDir").unwrap();

        assert!(matches!(
            ServiceConfig::from_file(&dir.path().join("missing.json")),
            Err(ConfigError::Io { .. })
        ));
        assert!(matches!(
            ServiceConfig::from_file(&malformed),
            Err(ConfigError::Json { .. })
        ));
    }

    #[test]
    fn data_dir_with_env_uses_xdg_data_home_when_set() {
        let path = data_dir_with_env(
            Some("/tmp/test-data".to_string()),
            Some(PathBuf::from("/home/user")),
        );

        assert_eq!(path, PathBuf::from("/tmp/test-data/version-service"));
    }

    #[test]
    fn data_dir_with_env_ignores_empty_xdg_data_home() {
        let path = data_dir_with_env(Some(String::new()), Some(PathBuf::from("/home/user")));

        assert_eq!(path, PathBuf::from("/home/user/.local/share/version-service"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_current_dir_when_no_dirs_available() {
        let path = data_dir_with_env(None, None);
        assert_eq!(path, PathBuf::from("./version-service"));
    }
}
