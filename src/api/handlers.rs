use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::condition::Condition;
use crate::eval::{ConditionEvaluator, EvalError, EvalResult, ExecContext};
use crate::frame::encode_frame;

/// Application state shared across handlers
pub struct AppState {
    pub evaluator: ConditionEvaluator,
    /// Deadline applied to each evaluation's backend call
    pub eval_timeout: Duration,
}

// ============================================================================
// Health Check
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ============================================================================
// Evaluation
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvalRequest {
    pub condition: Condition,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    /// Alert definition the evaluation is made for
    #[serde(default)]
    pub source_id: i64,
}

#[derive(Serialize)]
pub struct EvalResponse {
    pub results: Vec<EvalResult>,
    /// Display frame in wire form
    pub frame: serde_json::Value,
}

pub async fn eval_condition(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EvalRequest>,
) -> Result<Json<EvalResponse>, ApiError> {
    let ctx = ExecContext::new(request.source_id).with_timeout(state.eval_timeout);

    let results = state
        .evaluator
        .evaluate(&ctx, &request.condition, request.from, request.to)
        .await?;

    let frame: serde_json::Value = encode_frame(&results.as_display_frame())
        .and_then(|bytes| serde_json::from_slice(&bytes))
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(EvalResponse {
        results: results.into_inner(),
        frame,
    }))
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Unprocessable(String),
    BadGateway(String),
    Timeout(String),
    Internal(String),
}

impl From<EvalError> for ApiError {
    fn from(err: EvalError) -> Self {
        let message = err.to_string();
        match err {
            EvalError::InvalidCondition(_) => ApiError::BadRequest(message),
            EvalError::NoResults { .. } => ApiError::NotFound(message),
            EvalError::Shape(_) => ApiError::Unprocessable(message),
            EvalError::Remote(e) if e.is_cancelled() || e.is_timeout() => {
                ApiError::Timeout(message)
            }
            EvalError::Remote(_) | EvalError::Decode { .. } => ApiError::BadGateway(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::Timeout(msg) => (StatusCode::GATEWAY_TIMEOUT, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}
