use serde::{Deserialize, Serialize};

use super::labels::Labels;
use super::FrameError;

/// Declared element type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Bool,
    NullableBool,
    Int64,
    NullableInt64,
    Float64,
    NullableFloat64,
    String,
    NullableString,
    /// Epoch milliseconds
    Time,
    NullableTime,
}

impl FieldType {
    pub fn is_nullable(&self) -> bool {
        matches!(
            self,
            FieldType::NullableBool
                | FieldType::NullableInt64
                | FieldType::NullableFloat64
                | FieldType::NullableString
                | FieldType::NullableTime
        )
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FieldType::Bool => "bool",
            FieldType::NullableBool => "nullable_bool",
            FieldType::Int64 => "int64",
            FieldType::NullableInt64 => "nullable_int64",
            FieldType::Float64 => "float64",
            FieldType::NullableFloat64 => "nullable_float64",
            FieldType::String => "string",
            FieldType::NullableString => "nullable_string",
            FieldType::Time => "time",
            FieldType::NullableTime => "nullable_time",
        };
        write!(f, "{}", name)
    }
}

/// Typed column storage for a field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValues {
    Bool(Vec<bool>),
    NullableBool(Vec<Option<bool>>),
    Int64(Vec<i64>),
    NullableInt64(Vec<Option<i64>>),
    Float64(Vec<f64>),
    NullableFloat64(Vec<Option<f64>>),
    String(Vec<String>),
    NullableString(Vec<Option<String>>),
    Time(Vec<i64>),
    NullableTime(Vec<Option<i64>>),
}

impl FieldValues {
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValues::Bool(_) => FieldType::Bool,
            FieldValues::NullableBool(_) => FieldType::NullableBool,
            FieldValues::Int64(_) => FieldType::Int64,
            FieldValues::NullableInt64(_) => FieldType::NullableInt64,
            FieldValues::Float64(_) => FieldType::Float64,
            FieldValues::NullableFloat64(_) => FieldType::NullableFloat64,
            FieldValues::String(_) => FieldType::String,
            FieldValues::NullableString(_) => FieldType::NullableString,
            FieldValues::Time(_) => FieldType::Time,
            FieldValues::NullableTime(_) => FieldType::NullableTime,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            FieldValues::Bool(v) => v.len(),
            FieldValues::NullableBool(v) => v.len(),
            FieldValues::Int64(v) => v.len(),
            FieldValues::NullableInt64(v) => v.len(),
            FieldValues::Float64(v) => v.len(),
            FieldValues::NullableFloat64(v) => v.len(),
            FieldValues::String(v) => v.len(),
            FieldValues::NullableString(v) => v.len(),
            FieldValues::Time(v) => v.len(),
            FieldValues::NullableTime(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named, labeled column of a frame
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub labels: Labels,
    pub values: FieldValues,
}

impl Field {
    pub fn new(name: impl Into<String>, labels: Labels, values: FieldValues) -> Self {
        Self {
            name: name.into(),
            labels,
            values,
        }
    }

    pub fn field_type(&self) -> FieldType {
        self.values.field_type()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Read the value at `index` as a float
    ///
    /// Fails for out-of-range indexes, null entries and non-numeric fields.
    pub fn float_at(&self, index: usize) -> Result<f64, FrameError> {
        let len = self.len();
        let out_of_range = || FrameError::IndexOutOfRange { index, len };

        let value = match &self.values {
            FieldValues::Float64(v) => Some(*v.get(index).ok_or_else(out_of_range)?),
            FieldValues::NullableFloat64(v) => *v.get(index).ok_or_else(out_of_range)?,
            FieldValues::Int64(v) | FieldValues::Time(v) => {
                Some(*v.get(index).ok_or_else(out_of_range)? as f64)
            }
            FieldValues::NullableInt64(v) | FieldValues::NullableTime(v) => v
                .get(index)
                .ok_or_else(out_of_range)?
                .map(|i| i as f64),
            other => {
                return Err(FrameError::NotNumeric(other.field_type()));
            }
        };

        value.ok_or(FrameError::NullValue { index })
    }
}
