use crate::types::RxlintConfig;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Name of the project configuration file.
pub const CONFIG_FILE_NAME: &str = ".rxlint.toml";

/// Errors that can occur during config management
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Config file not found at {0}")]
    ConfigNotFound(PathBuf),

    #[error("Config file already exists at {0}")]
    ConfigExists(PathBuf),

    #[error("Unknown rule(s) in config: {}", .0.join(", "))]
    UnknownRules(Vec<String>),
}

/// Loaded configuration and where it came from.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    /// `None` when no config file was found and defaults are in use.
    config_path: Option<PathBuf>,
    config: RxlintConfig,
}

impl ConfigManager {
    /// Defaults, as if no config file existed.
    pub fn defaults() -> Self {
        Self {
            config_path: None,
            config: RxlintConfig::default(),
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: RxlintConfig = toml::from_str(&contents)?;

        let unknown = config.unknown_rules();
        if !unknown.is_empty() {
            return Err(ConfigError::UnknownRules(
                unknown.into_iter().map(str::to_string).collect(),
            ));
        }

        debug!(path = %path.display(), rules = config.rules.len(), "loaded config");
        Ok(Self {
            config_path: Some(path.to_path_buf()),
            config,
        })
    }

    /// Nearest `.rxlint.toml` in `start` or one of its ancestors.
    pub fn find_config(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .find(|candidate| candidate.is_file())
    }

    /// Load the nearest config above `start`, or defaults if there is none.
    pub fn discover(start: &Path) -> Result<Self, ConfigError> {
        match Self::find_config(start) {
            Some(path) => Self::load_from(&path),
            None => {
                debug!(start = %start.display(), "no config file found, using defaults");
                Ok(Self::defaults())
            }
        }
    }

    /// Write a config listing every built-in rule at its default level.
    pub fn init_at(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Err(ConfigError::ConfigExists(path.to_path_buf()));
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let config = RxlintConfig::with_all_rules();
        let toml_str = toml::to_string_pretty(&config)?;
        std::fs::write(path, toml_str)?;

        Ok(Self {
            config_path: Some(path.to_path_buf()),
            config,
        })
    }

    pub fn config(&self) -> &RxlintConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut RxlintConfig {
        &mut self.config
    }

    pub fn path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Directory the config's relative paths are resolved against.
    pub fn base_dir(&self) -> Option<&Path> {
        self.config_path.as_deref().and_then(Path::parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RuleLevel, RuleSetting};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_init_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);

        let created = ConfigManager::init_at(&path).unwrap();
        let loaded = ConfigManager::load_from(&path).unwrap();
        assert_eq!(loaded.config(), created.config());
        assert_eq!(loaded.path(), Some(path.as_path()));
        assert_eq!(loaded.base_dir(), Some(temp_dir.path()));
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "").unwrap();

        assert!(matches!(
            ConfigManager::init_at(&path),
            Err(ConfigError::ConfigExists(_))
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = ConfigManager::load_from(&temp_dir.path().join("missing.toml"));
        assert!(matches!(result, Err(ConfigError::ConfigNotFound(_))));
    }

    #[test]
    fn test_load_rejects_unknown_rules() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[rules]\nno-such-rule = \"error\"\n").unwrap();

        match ConfigManager::load_from(&path) {
            Err(ConfigError::UnknownRules(names)) => assert_eq!(names, vec!["no-such-rule"]),
            other => panic!("expected UnknownRules, got {:?}", other),
        }
    }

    #[test]
    fn test_load_reports_toml_errors() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[rules\n").unwrap();

        assert!(matches!(
            ConfigManager::load_from(&path),
            Err(ConfigError::TomlDe(_))
        ));
    }

    #[test]
    fn test_discover_walks_upwards() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("packages/app/src");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "[rules]\nno-create = \"warn\"\n",
        )
        .unwrap();

        let manager = ConfigManager::discover(&nested).unwrap();
        assert_eq!(
            manager.config().rules["no-create"],
            RuleSetting::Level(RuleLevel::Warn)
        );
        assert_eq!(manager.base_dir(), Some(temp_dir.path()));
    }

    #[test]
    fn test_nearest_config_wins() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("app");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), "type_information = true\n").unwrap();
        fs::write(nested.join(CONFIG_FILE_NAME), "type_information = false\n").unwrap();

        let manager = ConfigManager::discover(&nested).unwrap();
        assert!(!manager.config().type_information);
    }
}
