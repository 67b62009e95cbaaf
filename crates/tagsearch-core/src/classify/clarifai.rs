//! Clarifai classifier using the model outputs API.
//!
//! One POST carries every image URL in the batch. The response echoes each
//! input URL next to its concepts, and results are matched back to the batch
//! by that URL and returned in batch order.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::classifier::Classifier;
use crate::config::{ClassifierConfig, CLARIFAI_MAX_INPUTS};
use crate::error::{ClassifyError, ConfigError};
use crate::types::{Concept, ImageRef, PerImageLabels};

/// Envelope/output status code for full success.
const STATUS_SUCCESS: u32 = 10000;
/// Envelope status code when some inputs failed and others succeeded.
const STATUS_MIXED_SUCCESS: u32 = 10010;

/// Clarifai provider for general-model concept tagging.
pub struct ClarifaiClassifier {
    endpoint: String,
    api_key: String,
    max_batch_size: usize,
    client: reqwest::Client,
}

impl ClarifaiClassifier {
    pub fn new(endpoint: &str, api_key: &str, max_batch_size: usize) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            max_batch_size: max_batch_size.clamp(1, CLARIFAI_MAX_INPUTS),
            client: reqwest::Client::new(),
        }
    }

    /// Build a classifier from config, resolving the API key.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self, ConfigError> {
        let api_key = config.api_key()?;
        Ok(Self::new(&config.endpoint, &api_key, config.max_batch_size))
    }
}

// --- Request types ---

#[derive(Serialize)]
struct OutputsRequest<'a> {
    inputs: Vec<RequestInput<'a>>,
}

#[derive(Serialize)]
struct RequestInput<'a> {
    data: RequestData<'a>,
}

#[derive(Serialize)]
struct RequestData<'a> {
    image: RequestImage<'a>,
}

#[derive(Serialize)]
struct RequestImage<'a> {
    url: &'a str,
}

impl<'a> OutputsRequest<'a> {
    fn for_batch(batch: &'a [ImageRef]) -> Self {
        Self {
            inputs: batch
                .iter()
                .map(|url| RequestInput {
                    data: RequestData {
                        image: RequestImage { url: url.as_str() },
                    },
                })
                .collect(),
        }
    }
}

// --- Response types ---

#[derive(Deserialize)]
struct OutputsResponse {
    status: Status,
    #[serde(default)]
    outputs: Vec<Output>,
}

#[derive(Deserialize)]
struct Status {
    code: u32,
    #[serde(default)]
    description: String,
}

#[derive(Deserialize)]
struct Output {
    status: Option<Status>,
    input: OutputInput,
    #[serde(default)]
    data: OutputData,
}

#[derive(Deserialize)]
struct OutputInput {
    data: OutputInputData,
}

#[derive(Deserialize)]
struct OutputInputData {
    image: OutputImage,
}

#[derive(Deserialize)]
struct OutputImage {
    url: String,
}

#[derive(Deserialize, Default)]
struct OutputData {
    #[serde(default)]
    concepts: Vec<ResponseConcept>,
}

#[derive(Deserialize)]
struct ResponseConcept {
    name: String,
    value: f64,
}

impl Status {
    fn into_error(self, http_status: Option<u16>) -> ClassifyError {
        ClassifyError::Service {
            code: self.code,
            description: self.description,
            http_status,
        }
    }
}

/// Map a response body onto the batch it answers.
///
/// Outputs whose own status is not success, or whose echoed URL is not part
/// of the batch, are dropped. An error is returned only when nothing usable
/// remains for a non-empty batch.
fn decode_response(
    body: &str,
    http_status: u16,
    batch: &[ImageRef],
) -> Result<Vec<PerImageLabels>, ClassifyError> {
    let http_ok = (200..300).contains(&http_status);
    let http_err = (!http_ok).then_some(http_status);

    let response: OutputsResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        Err(e) if http_ok => {
            return Err(ClassifyError::Decode {
                message: format!("Failed to parse Clarifai response: {e}"),
            });
        }
        Err(_) => {
            let snippet: String = body.chars().take(200).collect();
            return Err(ClassifyError::Service {
                code: 0,
                description: format!("HTTP {http_status}: {snippet}"),
                http_status: http_err,
            });
        }
    };

    let envelope = response.status;
    let envelope_ok =
        http_ok && matches!(envelope.code, STATUS_SUCCESS | STATUS_MIXED_SUCCESS);

    let submitted: HashSet<&str> = batch.iter().map(String::as_str).collect();
    let mut first_failure: Option<Status> = None;
    let mut results = Vec::with_capacity(response.outputs.len());

    for output in response.outputs {
        let url = output.input.data.image.url;
        if let Some(status) = output.status.filter(|s| s.code != STATUS_SUCCESS) {
            tracing::warn!(
                "Clarifai could not classify {url}: {} ({})",
                status.description,
                status.code
            );
            first_failure.get_or_insert(status);
            continue;
        }
        if !submitted.contains(url.as_str()) {
            tracing::warn!("Clarifai returned an output for unknown image {url}, ignoring");
            continue;
        }
        results.push(PerImageLabels {
            image: url,
            labels: output
                .data
                .concepts
                .into_iter()
                .map(|c| Concept::new(c.name, c.value))
                .collect(),
        });
    }

    if results.is_empty() && !batch.is_empty() {
        if !envelope_ok {
            return Err(envelope.into_error(http_err));
        }
        if let Some(status) = first_failure {
            return Err(status.into_error(http_err));
        }
        return Err(ClassifyError::Decode {
            message: "Clarifai response contained no outputs for the submitted images"
                .to_string(),
        });
    }

    if results.len() < batch.len() {
        tracing::debug!(
            "Clarifai classified {} of {} images in batch",
            results.len(),
            batch.len()
        );
    }

    Ok(super::order_by_batch(batch, results))
}

#[async_trait]
impl Classifier for ClarifaiClassifier {
    fn name(&self) -> &str {
        "clarifai"
    }

    fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    async fn classify(&self, batch: &[ImageRef]) -> Result<Vec<PerImageLabels>, ClassifyError> {
        if batch.len() > self.max_batch_size {
            return Err(ClassifyError::BatchTooLarge {
                size: batch.len(),
                limit: self.max_batch_size,
            });
        }
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let body = OutputsRequest::for_batch(batch);
        tracing::debug!("POST {} with {} images", self.endpoint, batch.len());

        let resp = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Key {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| ClassifyError::Transport {
                message: format!("Clarifai request failed: {e}"),
            })?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| ClassifyError::Transport {
            message: format!("Failed to read Clarifai response: {e}"),
        })?;

        decode_response(&text, status.as_u16(), batch)
    }
}
