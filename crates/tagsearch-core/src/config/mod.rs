//! Configuration management for tagsearch.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. Every section implements `Default`, so a partial file is valid.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Classification service settings
    pub classifier: ClassifierConfig,

    /// Indexing pipeline settings
    pub indexing: IndexingConfig,

    /// Query server settings
    pub server: ServerConfig,

    /// Image list settings
    pub input: InputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// - macOS: ~/Library/Application Support/com.tagsearch.tagsearch/config.toml
    /// - Linux: ~/.config/tagsearch/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\tagsearch\config\config.toml
    ///
    /// Falls back to ~/.tagsearch/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "tagsearch", "tagsearch")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".tagsearch").join("config.toml")
            })
    }

    /// Get the resolved image list path (with ~ expansion).
    pub fn images_file(&self) -> PathBuf {
        expand_path(&self.input.images_file.to_string_lossy())
    }

    /// Get the resolved static asset directory (with ~ expansion).
    pub fn static_dir(&self) -> PathBuf {
        expand_path(&self.server.static_dir)
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

impl ClassifierConfig {
    /// Resolve the API key, following `${ENV_VAR}` references.
    pub fn api_key(&self) -> Result<String, ConfigError> {
        resolve_env_var(&self.api_key).ok_or_else(|| ConfigError::MissingApiKey(self.api_key.clone()))
    }
}

fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok().filter(|v| !v.is_empty())
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.classifier.max_batch_size, 128);
        assert_eq!(config.indexing.parallel_batches, 1);
        assert_eq!(config.indexing.failure_policy, FailurePolicy::Continue);
        assert_eq!(config.server.search_limit, 10);
        assert!(config.indexing.max_hits_per_label.is_none());
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[classifier]"));
        assert!(toml.contains("[indexing]"));
        assert!(toml.contains("failure_policy = \"continue\""));
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[indexing]\nfailure_policy = \"abort\"\nparallel_batches = 4\n\n[server]\nbind = \"127.0.0.1:8080\""
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.indexing.failure_policy, FailurePolicy::Abort);
        assert_eq!(config.indexing.parallel_batches, 4);
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.server.search_limit, 10);
        assert_eq!(config.classifier.max_batch_size, 128);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[classifier]\nmax_batch_size = 500").unwrap();

        let err = Config::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_load_rejects_malformed_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[classifier\nendpoint = ").unwrap();

        let err = Config::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_resolve_env_var() {
        // Non-env-var strings pass through
        assert_eq!(resolve_env_var("plain-key"), Some("plain-key".to_string()));
        // Empty returns None
        assert_eq!(resolve_env_var(""), None);
        // Unset env var returns None
        assert_eq!(resolve_env_var("${DEFINITELY_NOT_SET_XYZ_123}"), None);
    }

    #[test]
    fn test_api_key_missing() {
        let mut config = Config::default();
        config.classifier.api_key = "${TAGSEARCH_TEST_UNSET_KEY_987}".to_string();
        let err = config.classifier.api_key().unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey(_)));

        config.classifier.api_key = "literal-key".to_string();
        assert_eq!(config.classifier.api_key().unwrap(), "literal-key");
    }

    #[test]
    fn test_images_file_expands_tilde() {
        let mut config = Config::default();
        config.input.images_file = PathBuf::from("~/images.txt");
        let resolved = config.images_file();
        assert!(!resolved.to_string_lossy().starts_with('~'));
    }
}
