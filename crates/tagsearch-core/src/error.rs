//! Error types for the tag indexing pipeline.
//!
//! Errors are split by where they arise: configuration, loading the image
//! list, talking to the classification service, and building the index.
//! Classification errors are batch-scoped; only input and config errors are
//! fatal to startup.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for tagsearch operations.
#[derive(Error, Debug)]
pub enum TagSearchError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The image list could not be loaded
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Index construction was aborted
    #[error("Indexing error: {0}")]
    Index(#[from] IndexError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// The classifier API key is unset or references an unset env var
    #[error("Classifier API key not set ({0}). Set CLARIFAI_API_KEY or classifier.api_key.")]
    MissingApiKey(String),
}

/// Failure to produce the list of image references.
#[derive(Error, Debug)]
pub enum InputError {
    /// The image list file could not be read
    #[error("Failed to read image list {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from a single classification request.
///
/// All variants are scoped to one batch. The pipeline decides whether a
/// batch failure skips that batch or aborts the run.
#[derive(Error, Debug)]
pub enum ClassifyError {
    /// The request never produced a response (connect, TLS, body read)
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// The service answered with a non-success status
    #[error("Service error {code}: {description}")]
    Service {
        code: u32,
        description: String,
        http_status: Option<u16>,
    },

    /// The response body did not match the expected shape
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// No response within the configured bound
    #[error("Classification timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The caller exceeded the per-request image limit
    #[error("Batch of {size} images exceeds the per-request limit of {limit}")]
    BatchTooLarge { size: usize, limit: usize },
}

/// Errors that stop index construction.
#[derive(Error, Debug)]
pub enum IndexError {
    /// A batch failed under the abort policy
    #[error("Batch {batch} of {total} failed: {source}")]
    BatchFailed {
        batch: usize,
        total: usize,
        #[source]
        source: ClassifyError,
    },

    /// A spawned classification task did not complete
    #[error("Classification task for batch {batch} failed: {message}")]
    TaskFailed { batch: usize, message: String },
}

/// Convenience type alias for tagsearch results.
pub type Result<T> = std::result::Result<T, TagSearchError>;
