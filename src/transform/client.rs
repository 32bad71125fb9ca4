use async_trait::async_trait;
use serde::Deserialize;
use serde_json::value::RawValue;
use std::collections::HashMap;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::config::TransformConfig;
use super::request::TransformRequest;

/// Port to the backend that executes queries and expressions
///
/// Implementations must return [`TransformError::Cancelled`] promptly once
/// `cancel` fires. One call is one logical request; implementations shared
/// across concurrent evaluations are responsible for their own isolation.
#[async_trait]
pub trait TransformClient: Send + Sync {
    async fn transform(
        &self,
        request: TransformRequest,
        cancel: CancellationToken,
    ) -> Result<TransformResponse, TransformError>;
}

/// Backend results keyed by ref id
#[derive(Debug, Clone, Default)]
pub struct TransformResponse {
    pub responses: HashMap<String, RawSeriesPayload>,
}

impl TransformResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payload(mut self, ref_id: impl Into<String>, payload: RawSeriesPayload) -> Self {
        self.responses.insert(ref_id.into(), payload);
        self
    }
}

/// Still-encoded frames returned for one ref id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSeriesPayload {
    pub frames: Vec<Vec<u8>>,
}

impl RawSeriesPayload {
    pub fn new(frames: Vec<Vec<u8>>) -> Self {
        Self { frames }
    }
}

/// Transform client over HTTP
///
/// Posts the request as JSON to `{base_url}/transform` and expects
/// `{"responses": {"<refId>": {"frames": [<frame>, ...]}}}` back. Frames are
/// kept as raw JSON text and decoded later.
#[derive(Debug, Clone)]
pub struct HttpTransformClient {
    http_client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpTransformClient {
    pub fn new(config: &TransformConfig) -> Result<Self, TransformError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TransformError::Network(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
        })
    }

    async fn post(&self, request: &TransformRequest) -> Result<TransformResponse, TransformError> {
        let url = format!("{}/transform", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransformError::Timeout(self.timeout)
                } else {
                    TransformError::Network(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(TransformError::Remote { status, message });
        }

        let body: WireResponse = response
            .json()
            .await
            .map_err(|e| TransformError::Deserialization(e.to_string()))?;

        Ok(body.into())
    }
}

#[async_trait]
impl TransformClient for HttpTransformClient {
    async fn transform(
        &self,
        request: TransformRequest,
        cancel: CancellationToken,
    ) -> Result<TransformResponse, TransformError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TransformError::Cancelled),
            result = self.post(&request) => result,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    responses: HashMap<String, WireFrames>,
}

#[derive(Debug, Deserialize)]
struct WireFrames {
    #[serde(default)]
    frames: Vec<Box<RawValue>>,
}

impl From<WireResponse> for TransformResponse {
    fn from(wire: WireResponse) -> Self {
        let responses = wire
            .responses
            .into_iter()
            .map(|(ref_id, payload)| {
                let frames = payload
                    .frames
                    .into_iter()
                    .map(|raw| raw.get().as_bytes().to_vec())
                    .collect();
                (ref_id, RawSeriesPayload { frames })
            })
            .collect();
        Self { responses }
    }
}

/// Transform backend errors
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Remote error (status {status}): {message}")]
    Remote { status: u16, message: String },

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Transform request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Transform request cancelled")]
    Cancelled,

    #[error("Transform failed: {0}")]
    Failed(String),
}

impl TransformError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, TransformError::Cancelled)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, TransformError::Timeout(_))
    }
}
