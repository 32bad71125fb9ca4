//! In-memory tabular series returned by the transform backend
//!
//! A [`Frame`] is a named set of equal-length typed [`Field`]s. The codec
//! submodule turns the backend's encoded frames into this representation.

pub mod codec;
pub mod field;
pub mod labels;

pub use codec::{decode_frame, decode_frames, encode_frame, DecodeError};
pub use field::{Field, FieldType, FieldValues};
pub use labels::Labels;

/// A named collection of fields that share a row count
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub name: String,
    pub fields: Vec<Field>,
}

impl Frame {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Number of rows in the frame
    ///
    /// A frame without fields has zero rows. Fields of differing lengths
    /// make the row count undefined.
    pub fn row_len(&self) -> Result<usize, FrameError> {
        let Some(first) = self.fields.first() else {
            return Ok(0);
        };

        let len = first.len();
        for (idx, field) in self.fields.iter().enumerate().skip(1) {
            if field.len() != len {
                return Err(FrameError::MismatchedLength {
                    field: idx,
                    expected: len,
                    actual: field.len(),
                });
            }
        }
        Ok(len)
    }
}

/// Errors reading values out of a frame
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("field {field} has {actual} values, expected {expected}")]
    MismatchedLength {
        field: usize,
        expected: usize,
        actual: usize,
    },

    #[error("index {index} out of range for field of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("value at index {index} is null")]
    NullValue { index: usize },

    #[error("field of type {0} is not numeric")]
    NotNumeric(FieldType),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn float_field(values: Vec<Option<f64>>) -> Field {
        Field::new("value", Labels::new(), FieldValues::NullableFloat64(values))
    }

    #[test]
    fn test_row_len() {
        let frame = Frame::new("A")
            .with_field(float_field(vec![Some(1.0), Some(2.0)]))
            .with_field(Field::new(
                "time",
                Labels::new(),
                FieldValues::Time(vec![1000, 2000]),
            ));
        assert_eq!(frame.row_len().unwrap(), 2);
    }

    #[test]
    fn test_row_len_without_fields() {
        assert_eq!(Frame::new("empty").row_len().unwrap(), 0);
    }

    #[test]
    fn test_row_len_mismatch() {
        let frame = Frame::new("A")
            .with_field(float_field(vec![Some(1.0)]))
            .with_field(float_field(vec![Some(1.0), None]));

        let err = frame.row_len().unwrap_err();
        assert!(matches!(
            err,
            FrameError::MismatchedLength {
                field: 1,
                expected: 1,
                actual: 2
            }
        ));
    }
}
