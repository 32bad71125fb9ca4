//! Condition execution against the transform backend

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::error::EvalError;
use super::evaluate::evaluate_execution_result;
use super::state::EvalResults;
use crate::condition::Condition;
use crate::frame::{decode_frames, Frame};
use crate::transform::{
    translate, PluginContext, TransformClient, TransformError, TransformRequest,
    TransformResponse,
};

/// Context provided for executing a condition
#[derive(Debug, Clone)]
pub struct ExecContext {
    /// Alert definition being evaluated
    pub source_id: i64,
    pub org_id: i64,
    pub user: Option<String>,
    /// Cancels the in-flight backend call
    pub cancel: CancellationToken,
    /// Deadline for the backend call
    pub timeout: Option<Duration>,
}

impl ExecContext {
    pub fn new(source_id: i64) -> Self {
        Self {
            source_id,
            org_id: 1,
            user: None,
            cancel: CancellationToken::new(),
            timeout: None,
        }
    }

    pub fn with_org(mut self, org_id: i64) -> Self {
        self.org_id = org_id;
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn plugin_context(&self) -> PluginContext {
        PluginContext {
            org_id: self.org_id,
            user: self.user.clone(),
            source_id: self.source_id,
        }
    }
}

/// Decoded, not yet evaluated, frames of a condition's result
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub source_id: i64,
    pub frames: Vec<Frame>,
}

/// Executes and evaluates conditions through a transform client
#[derive(Clone)]
pub struct ConditionEvaluator {
    client: Arc<dyn TransformClient>,
}

impl ConditionEvaluator {
    pub fn new(client: Arc<dyn TransformClient>) -> Self {
        Self { client }
    }

    /// Run the condition's queries and expressions and decode its result
    pub async fn execute(
        &self,
        ctx: &ExecContext,
        condition: &Condition,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<ExecutionResult, EvalError> {
        let request = translate(condition, from, to, ctx.plugin_context())?;

        tracing::debug!(
            source_id = ctx.source_id,
            ref_id = %condition.ref_id,
            queries = request.queries.len(),
            "Sending transform request"
        );

        let response = self.send(ctx, request).await.map_err(|e| {
            tracing::warn!(
                source_id = ctx.source_id,
                ref_id = %condition.ref_id,
                error = %e,
                "Transform request failed"
            );
            EvalError::from(e)
        })?;

        let mut responses = response.responses;
        let frames = match responses.remove(&condition.ref_id) {
            Some(payload) => {
                decode_frames(&payload.frames).map_err(|source| EvalError::Decode {
                    ref_id: condition.ref_id.clone(),
                    source,
                })?
            }
            None => Vec::new(),
        };

        if frames.is_empty() {
            return Err(EvalError::NoResults {
                ref_id: condition.ref_id.clone(),
            });
        }

        Ok(ExecutionResult {
            source_id: ctx.source_id,
            frames,
        })
    }

    /// Execute the condition and evaluate its result
    pub async fn evaluate(
        &self,
        ctx: &ExecContext,
        condition: &Condition,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<EvalResults, EvalError> {
        let result = self.execute(ctx, condition, from, to).await?;
        evaluate_execution_result(&result)
    }

    /// Evaluate independent conditions concurrently
    ///
    /// Results come back in input order; one failure does not affect the
    /// others.
    pub async fn evaluate_all(
        &self,
        jobs: &[(ExecContext, Condition)],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Vec<Result<EvalResults, EvalError>> {
        let futures: Vec<_> = jobs
            .iter()
            .map(|(ctx, condition)| self.evaluate(ctx, condition, from, to))
            .collect();

        futures::future::join_all(futures).await
    }

    async fn send(
        &self,
        ctx: &ExecContext,
        request: TransformRequest,
    ) -> Result<TransformResponse, TransformError> {
        if ctx.cancel.is_cancelled() {
            return Err(TransformError::Cancelled);
        }

        let call = async {
            tokio::select! {
                biased;
                _ = ctx.cancel.cancelled() => Err(TransformError::Cancelled),
                result = self.client.transform(request, ctx.cancel.clone()) => result,
            }
        };

        match ctx.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .unwrap_or_else(|_| Err(TransformError::Timeout(limit))),
            None => call.await,
        }
    }
}
