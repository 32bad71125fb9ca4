//! Condition execution and evaluation
//!
//! The pipeline has three independently callable steps:
//!
//! 1. [`ConditionEvaluator::execute`] translates a condition, sends it to the
//!    transform backend and decodes the frames of the condition's ref id.
//! 2. [`evaluate_execution_result`] validates each frame and derives a
//!    [`State`] per uniquely labeled instance.
//! 3. [`EvalResults::as_display_frame`] projects the states into a frame
//!    for display.

pub mod display;
pub mod error;
pub mod evaluate;
pub mod executor;
pub mod state;

pub use error::{EvalError, ShapeViolation};
pub use evaluate::evaluate_execution_result;
pub use executor::{ConditionEvaluator, ExecContext, ExecutionResult};
pub use state::{EvalResult, EvalResults, State};
