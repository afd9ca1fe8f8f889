use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
    Argument,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
            ConfigSource::Argument => write!(f, "argument"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Path to the SQLite database
    pub database_path: ConfigValue<PathBuf>,
    /// User the CLI acts as
    pub user: ConfigValue<Option<String>>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    database_path: Option<PathBuf>,
    user: Option<String>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut database_path = ConfigValue::new(
            Self::default_data_dir().join("sharelist.db"),
            ConfigSource::Default,
        );
        let mut user = ConfigValue::new(None, ConfigSource::Default);
        let mut config_file = None;

        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(db_path) = file_config.database_path {
                // Resolve relative paths against config file's directory
                let resolved_path = if db_path.is_relative() {
                    path.parent().map(|p| p.join(&db_path)).unwrap_or(db_path)
                } else {
                    db_path
                };
                database_path = ConfigValue::new(resolved_path, ConfigSource::File);
            }
            if let Some(id) = file_config.user {
                user = ConfigValue::new(Some(id), ConfigSource::File);
            }
        }

        if let Ok(db_path) = std::env::var("SHARELIST_DATABASE_PATH") {
            database_path = ConfigValue::new(PathBuf::from(db_path), ConfigSource::Environment);
        }
        if let Ok(id) = std::env::var("SHARELIST_USER") {
            user = ConfigValue::new(Some(id), ConfigSource::Environment);
        }

        Ok(Self {
            database_path,
            user,
            config_file,
        })
    }

    /// Overrides the acting user from a command-line flag.
    pub fn with_user(mut self, user: Option<String>) -> Self {
        if let Some(id) = user {
            self.user = ConfigValue::new(Some(id), ConfigSource::Argument);
        }
        self
    }

    /// The acting user, or an error explaining how to set one.
    pub fn require_user(&self) -> Result<&str, ConfigError> {
        self.user.value.as_deref().ok_or(ConfigError::NoUser)
    }

    /// Default config file path: ~/.config/sharelist/config.yaml
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sharelist")
            .join("config.yaml")
    }

    /// Default data directory: ~/.local/share/sharelist
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sharelist")
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {}", .0.display(), .1)]
    ReadError(PathBuf, #[source] std::io::Error),
    #[error("Failed to parse config file '{}': {}", .0.display(), .1)]
    ParseError(PathBuf, #[source] serde_yaml::Error),
    #[error("No user configured. Pass --user, set SHARELIST_USER, or add 'user:' to the config file")]
    NoUser,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_load_no_file_uses_defaults() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nonexistent.yaml");

        let config = Config::load(Some(config_path)).unwrap();
        assert!(config
            .database_path
            .value
            .to_string_lossy()
            .contains("sharelist.db"));
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "database_path: /custom/path/db.sqlite").unwrap();
        writeln!(file, "user: alice").unwrap();

        let config = Config::load(Some(config_path.clone())).unwrap();
        assert_eq!(
            config.database_path.value,
            PathBuf::from("/custom/path/db.sqlite")
        );
        assert_eq!(config.database_path.source, ConfigSource::File);
        assert_eq!(config.config_file, Some(config_path));
    }

    #[test]
    fn test_relative_database_path_resolved_against_config_dir() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        std::fs::write(&config_path, "database_path: data/list.db\n").unwrap();

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(
            config.database_path.value,
            temp_dir.path().join("data/list.db")
        );
    }

    #[test]
    fn test_argument_overrides_user() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        std::fs::write(&config_path, "user: fromfile\n").unwrap();

        let config = Config::load(Some(config_path))
            .unwrap()
            .with_user(Some("fromflag".to_string()));

        assert_eq!(config.require_user().unwrap(), "fromflag");
        assert_eq!(config.user.source, ConfigSource::Argument);
    }

    #[test]
    fn test_require_user_without_user() {
        let config = Config {
            database_path: ConfigValue::new(PathBuf::from("x.db"), ConfigSource::Default),
            user: ConfigValue::new(None, ConfigSource::Default),
            config_file: None,
        };

        assert!(matches!(config.require_user(), Err(ConfigError::NoUser)));
    }

    #[test]
    fn test_invalid_yaml_error() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "invalid: yaml: content: [").unwrap();

        let result = Config::load(Some(config_path));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
