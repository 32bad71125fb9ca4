//! condeval: alert condition evaluation
//!
//! Executes an alert condition's queries and expressions through a transform
//! backend and classifies every returned series as `Normal` or `Alerting`.
//!
//! # Pipeline
//!
//! - **Condition**: a ref id plus the ordered queries and expressions needed
//!   to compute it
//! - **Translation**: conditions become backend requests with millisecond
//!   intervals and epoch-millisecond time ranges
//! - **Transform client**: an injected port to the backend, cancellable
//! - **Decoding**: encoded frames become typed in-memory frames
//! - **Evaluation**: each single-row, single nullable-float frame yields one
//!   instance state; malformed or ambiguous results abort the evaluation
//! - **Display**: states projected into a one-row bool frame
//!
//! # Example
//!
//! ```no_run
//! use condeval::condition::{Condition, Query, TimeRange};
//! use condeval::eval::{ConditionEvaluator, ExecContext};
//! use condeval::transform::{HttpTransformClient, TransformConfig};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpTransformClient::new(&TransformConfig::from_env())?;
//! let evaluator = ConditionEvaluator::new(Arc::new(client));
//!
//! let to = chrono::Utc::now();
//! let from = to - chrono::Duration::minutes(5);
//! let condition = Condition::new("A")
//!     .with_query(Query::new("A", serde_json::json!({"expr": "up == 0"}), TimeRange::new(from, to)));
//!
//! let results = evaluator.evaluate(&ExecContext::new(1), &condition, from, to).await?;
//! for result in &results {
//!     println!("{}: {}", result.instance, result.state);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod condition;
pub mod eval;
pub mod frame;
pub mod transform;

// Re-export commonly used types
pub use condition::{Condition, Query, TimeRange};
pub use eval::{
    evaluate_execution_result, ConditionEvaluator, EvalError, EvalResult, EvalResults,
    ExecContext, ExecutionResult, ShapeViolation, State,
};
pub use frame::{Frame, Labels};
pub use transform::{TransformClient, TransformError};
