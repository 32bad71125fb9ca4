use crate::frame::{DecodeError, FieldType, FrameError};
use crate::transform::TransformError;

/// Errors aborting a condition evaluation
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("Invalid condition: {0}")]
    InvalidCondition(String),

    #[error("Remote execution failed: {0}")]
    Remote(#[from] TransformError),

    #[error("Failed to decode results for {ref_id:?}: {source}")]
    Decode {
        ref_id: String,
        source: DecodeError,
    },

    #[error("No results returned for {ref_id:?}")]
    NoResults { ref_id: String },

    #[error(transparent)]
    Shape(#[from] ShapeViolation),
}

impl EvalError {
    /// True when the caller cancelled the evaluation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, EvalError::Remote(e) if e.is_cancelled())
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, EvalError::Remote(e) if e.is_timeout())
    }
}

/// A decoded frame breaking the single-row, single nullable-float field,
/// unique-labels contract
#[derive(Debug, thiserror::Error)]
pub enum ShapeViolation {
    #[error("invalid frame {frame:?}: unable to get row length: {reason}")]
    RowLength {
        frame: String,
        #[source]
        reason: FrameError,
    },

    #[error("invalid frame {frame:?}: row length {rows}, expected at most 1")]
    MultiRow { frame: String, rows: usize },

    #[error("invalid frame {frame:?}: no fields, expected 1")]
    NoFields { frame: String },

    #[error("invalid frame {frame:?}: field length {fields}, expected 1")]
    MultiField { frame: String, fields: usize },

    #[error("invalid frame {frame:?}: field type {field_type}, expected nullable_float64")]
    WrongType { frame: String, field_type: FieldType },

    #[error("invalid frame {frame:?}: frames cannot uniquely be identified by their labels: {labels:?}")]
    DuplicateLabelSet { frame: String, labels: String },
}

impl ShapeViolation {
    /// Name of the offending frame
    pub fn frame(&self) -> &str {
        match self {
            ShapeViolation::RowLength { frame, .. }
            | ShapeViolation::MultiRow { frame, .. }
            | ShapeViolation::NoFields { frame }
            | ShapeViolation::MultiField { frame, .. }
            | ShapeViolation::WrongType { frame, .. }
            | ShapeViolation::DuplicateLabelSet { frame, .. } => frame,
        }
    }
}
