//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Per-request image limit of the Clarifai outputs endpoint.
pub const CLARIFAI_MAX_INPUTS: usize = 128;

/// Classification service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Model outputs endpoint the batches are POSTed to
    pub endpoint: String,

    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Images per request, at most the service limit
    pub max_batch_size: usize,

    /// Bound on a single classification call in milliseconds
    pub timeout_ms: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint:
                "https://api.clarifai.com/v2/models/aaa03c23b3724a16a56b629203edc62c/outputs"
                    .to_string(),
            api_key: "${CLARIFAI_API_KEY}".to_string(),
            max_batch_size: CLARIFAI_MAX_INPUTS,
            timeout_ms: 30_000,
        }
    }
}

/// What the pipeline does when a batch cannot be classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log the failure, leave the batch unindexed, keep going
    #[default]
    Continue,
    /// Stop at the first failed batch
    Abort,
}

/// Indexing pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexingConfig {
    /// Policy for failed batches
    pub failure_policy: FailurePolicy,

    /// Batches in flight at once. 1 submits strictly in order.
    pub parallel_batches: usize,

    /// Keep only the top N hits per label after sorting.
    /// Unset means unbounded growth.
    pub max_hits_per_label: Option<usize>,
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::Continue,
            parallel_batches: 1,
            max_hits_per_label: None,
        }
    }
}

/// Query server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind: String,

    /// Directory of static web assets served at `/`
    pub static_dir: String,

    /// Maximum image references returned per search
    pub search_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3000".to_string(),
            static_dir: "./templates".to_string(),
            search_limit: crate::query::DEFAULT_SEARCH_LIMIT,
        }
    }
}

/// Image list settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Whitespace-separated list of image URLs
    pub images_file: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            images_file: PathBuf::from("./files/images.txt"),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
