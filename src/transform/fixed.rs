use async_trait::async_trait;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use super::client::{TransformClient, TransformError, TransformResponse};
use super::request::TransformRequest;

/// Transform client answering every request with a fixed response
///
/// Records the requests it receives. Useful for running evaluations
/// against captured backend output.
pub struct FixedTransformClient {
    outcome: Result<TransformResponse, String>,
    requests: Mutex<Vec<TransformRequest>>,
}

impl FixedTransformClient {
    pub fn new(response: TransformResponse) -> Self {
        Self {
            outcome: Ok(response),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Client whose every call fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<TransformRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl TransformClient for FixedTransformClient {
    async fn transform(
        &self,
        request: TransformRequest,
        cancel: CancellationToken,
    ) -> Result<TransformResponse, TransformError> {
        if cancel.is_cancelled() {
            return Err(TransformError::Cancelled);
        }

        self.requests.lock().push(request);

        match &self.outcome {
            Ok(response) => Ok(response.clone()),
            Err(message) => Err(TransformError::Failed(message.clone())),
        }
    }
}
