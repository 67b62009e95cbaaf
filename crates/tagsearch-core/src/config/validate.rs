//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::{Config, CLARIFAI_MAX_INPUTS};

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.classifier.max_batch_size == 0 || self.classifier.max_batch_size > CLARIFAI_MAX_INPUTS
        {
            return Err(ConfigError::ValidationError(format!(
                "classifier.max_batch_size must be between 1 and {CLARIFAI_MAX_INPUTS}"
            )));
        }
        if self.classifier.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "classifier.timeout_ms must be > 0".into(),
            ));
        }
        if self.indexing.parallel_batches == 0 {
            return Err(ConfigError::ValidationError(
                "indexing.parallel_batches must be > 0".into(),
            ));
        }
        if self.indexing.max_hits_per_label == Some(0) {
            return Err(ConfigError::ValidationError(
                "indexing.max_hits_per_label must be > 0 when set".into(),
            ));
        }
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.level must be one of {}",
                LOG_LEVELS.join(", ")
            )));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::ValidationError(
                "logging.format must be \"pretty\" or \"json\"".into(),
            ));
        }
        if self.server.search_limit == 0 {
            return Err(ConfigError::ValidationError(
                "server.search_limit must be > 0".into(),
            ));
        }
        Ok(())
    }
}
