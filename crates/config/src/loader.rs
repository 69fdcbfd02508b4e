//! Configuration loader

use arc_swap::ArcSwap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::types::RollcallConfig;

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File not found
    #[error("config file not found: {0}")]
    NotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Validation error
    #[error("validation error: {0}")]
    Validation(String),
}

/// Configuration loader; the current config can be swapped while readers hold the old one
pub struct ConfigLoader {
    config: ArcSwap<RollcallConfig>,
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create loader with default configuration
    pub fn new() -> Self {
        Self {
            config: ArcSwap::from_pointee(RollcallConfig::default()),
            config_path: None,
        }
    }

    /// Load configuration from file
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        let config: RollcallConfig = toml::from_str(&content)?;
        Self::validate(&config)?;

        Ok(Self {
            config: ArcSwap::from_pointee(config),
            config_path: Some(path.to_path_buf()),
        })
    }

    /// Load `path` if it exists, defaults otherwise
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        match Self::load_file(path.as_ref()) {
            Err(ConfigError::NotFound(missing)) => {
                tracing::debug!(path = %missing, "no config file, using defaults");
                Ok(Self::new())
            }
            other => other,
        }
    }

    /// Load configuration from string
    pub fn load_str(content: &str) -> Result<Self, ConfigError> {
        let config: RollcallConfig = toml::from_str(content)?;
        Self::validate(&config)?;

        Ok(Self {
            config: ArcSwap::from_pointee(config),
            config_path: None,
        })
    }

    /// Get current configuration (lock-free)
    #[inline]
    pub fn get(&self) -> Arc<RollcallConfig> {
        self.config.load_full()
    }

    /// Re-read the file this loader was created from
    pub fn reload(&self) -> Result<(), ConfigError> {
        let path = self
            .config_path
            .as_ref()
            .ok_or_else(|| ConfigError::Validation("no config file path set".to_string()))?;

        let content = std::fs::read_to_string(path)?;
        let new_config: RollcallConfig = toml::from_str(&content)?;
        Self::validate(&new_config)?;

        self.config.store(Arc::new(new_config));
        tracing::info!(path = %path.display(), "configuration reloaded");
        Ok(())
    }

    /// Replace the configuration programmatically (e.g. CLI overrides)
    pub fn update(&self, new_config: RollcallConfig) -> Result<(), ConfigError> {
        Self::validate(&new_config)?;
        self.config.store(Arc::new(new_config));
        Ok(())
    }

    /// Validate configuration
    pub fn validate(config: &RollcallConfig) -> Result<(), ConfigError> {
        if config.attendance.default_limit == 0 {
            return Err(ConfigError::Validation(
                "attendance.default_limit must be greater than 0".to_string(),
            ));
        }
        if config.storage.database.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "storage.database must not be empty".to_string(),
            ));
        }
        if config.storage.roster.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "storage.roster must not be empty".to_string(),
            ));
        }
        if config.attendance.session_label_prefix.trim().is_empty() {
            return Err(ConfigError::Validation(
                "attendance.session_label_prefix must not be blank".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = ConfigLoader::load_str("").unwrap().get();
        assert_eq!(config.server.listen.to_string(), "0.0.0.0:5000");
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.storage.database.to_str(), Some("data/attendance.db"));
        assert_eq!(
            config.storage.roster.to_str(),
            Some("data/cleaned_class_list.csv")
        );
        assert_eq!(config.attendance.default_limit, 200);
        assert_eq!(config.attendance.session_label_prefix, "Lecture");
    }

    #[test]
    fn test_load_string() {
        let config_str = r#"
[server]
listen = "127.0.0.1:8080"

[attendance]
default_limit = 50
"#;

        let config = ConfigLoader::load_str(config_str).unwrap().get();
        assert_eq!(config.server.listen.port(), 8080);
        assert_eq!(config.attendance.default_limit, 50);
        assert_eq!(config.attendance.session_label_prefix, "Lecture");
    }

    #[test]
    fn test_validation_zero_limit() {
        let result = ConfigLoader::load_str("[attendance]\ndefault_limit = 0\n");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_validation_empty_database() {
        let result = ConfigLoader::load_str("[storage]\ndatabase = \"\"\n");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_parse_error() {
        let result = ConfigLoader::load_str("[server]\nlisten = \"not an address\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_port_override() {
        let config = RollcallConfig::default().with_port(8000);
        assert_eq!(config.server.listen.to_string(), "0.0.0.0:8000");
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            ConfigLoader::load_file("/nonexistent/rollcall.toml"),
            Err(ConfigError::NotFound(_))
        ));
        let loader = ConfigLoader::load_or_default("/nonexistent/rollcall.toml").unwrap();
        assert_eq!(*loader.get(), RollcallConfig::default());
        assert!(loader.reload().is_err());
    }

    #[test]
    fn test_file_reload() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[storage]\ndatabase = \"one.db\"").unwrap();

        let loader = ConfigLoader::load_file(file.path()).unwrap();
        assert_eq!(loader.get().storage.database.to_str(), Some("one.db"));

        std::fs::write(file.path(), "[storage]\ndatabase = \"two.db\"\n").unwrap();
        loader.reload().unwrap();
        assert_eq!(loader.get().storage.database.to_str(), Some("two.db"));
    }

    #[test]
    fn test_update_validates() {
        let loader = ConfigLoader::new();
        let mut config = (*loader.get()).clone();
        config.attendance.default_limit = 0;
        assert!(loader.update(config).is_err());
        assert_eq!(loader.get().attendance.default_limit, 200);
    }
}
