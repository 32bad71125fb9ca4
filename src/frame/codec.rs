//! JSON wire codec for frames
//!
//! Each encoded frame looks like:
//!
//! ```json
//! {
//!   "name": "A",
//!   "fields": [
//!     {"name": "value", "type": "nullable_float64", "labels": {"instance": "host1"}, "values": [0.0]}
//!   ]
//! }
//! ```
//!
//! Values are checked against the declared field type while decoding, so a
//! decoded [`Frame`] is always internally typed. Time values are epoch
//! milliseconds.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::field::{Field, FieldType, FieldValues};
use super::labels::Labels;
use super::Frame;

#[derive(Serialize, Deserialize)]
struct FrameWire {
    #[serde(default)]
    name: String,
    #[serde(default)]
    fields: Vec<FieldWire>,
}

#[derive(Serialize, Deserialize)]
struct FieldWire {
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    field_type: FieldType,
    #[serde(default)]
    labels: Labels,
    #[serde(default)]
    values: Vec<JsonValue>,
}

/// Decode a single encoded frame
pub fn decode_frame(bytes: &[u8]) -> Result<Frame, DecodeError> {
    let wire: FrameWire = serde_json::from_slice(bytes)?;

    let fields = wire
        .fields
        .into_iter()
        .map(decode_field)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Frame {
        name: wire.name,
        fields,
    })
}

/// Decode every frame of a payload, failing on the first malformed one
pub fn decode_frames<B: AsRef<[u8]>>(encoded: &[B]) -> Result<Vec<Frame>, DecodeError> {
    encoded
        .iter()
        .enumerate()
        .map(|(index, bytes)| {
            decode_frame(bytes.as_ref()).map_err(|e| DecodeError::Frame {
                index,
                source: Box::new(e),
            })
        })
        .collect()
}

/// Encode a frame into its wire form
pub fn encode_frame(frame: &Frame) -> Result<Vec<u8>, serde_json::Error> {
    let wire = FrameWire {
        name: frame.name.clone(),
        fields: frame
            .fields
            .iter()
            .map(|f| FieldWire {
                name: f.name.clone(),
                field_type: f.field_type(),
                labels: f.labels.clone(),
                values: values_to_json(&f.values),
            })
            .collect(),
    };
    serde_json::to_vec(&wire)
}

fn decode_field(wire: FieldWire) -> Result<Field, DecodeError> {
    let FieldWire {
        name,
        field_type,
        labels,
        values,
    } = wire;

    let reader = ValueReader {
        field: &name,
        field_type,
        raw: &values,
    };

    let values = match field_type {
        FieldType::Bool => FieldValues::Bool(reader.required(JsonValue::as_bool)?),
        FieldType::NullableBool => FieldValues::NullableBool(reader.nullable(JsonValue::as_bool)?),
        FieldType::Int64 => FieldValues::Int64(reader.required(JsonValue::as_i64)?),
        FieldType::NullableInt64 => FieldValues::NullableInt64(reader.nullable(JsonValue::as_i64)?),
        FieldType::Float64 => FieldValues::Float64(reader.required(JsonValue::as_f64)?),
        FieldType::NullableFloat64 => {
            FieldValues::NullableFloat64(reader.nullable(JsonValue::as_f64)?)
        }
        FieldType::String => FieldValues::String(reader.required(as_string)?),
        FieldType::NullableString => FieldValues::NullableString(reader.nullable(as_string)?),
        FieldType::Time => FieldValues::Time(reader.required(JsonValue::as_i64)?),
        FieldType::NullableTime => FieldValues::NullableTime(reader.nullable(JsonValue::as_i64)?),
    };

    Ok(Field {
        name,
        labels,
        values,
    })
}

fn as_string(value: &JsonValue) -> Option<String> {
    value.as_str().map(str::to_string)
}

struct ValueReader<'a> {
    field: &'a str,
    field_type: FieldType,
    raw: &'a [JsonValue],
}

impl ValueReader<'_> {
    fn required<T>(&self, read: impl Fn(&JsonValue) -> Option<T>) -> Result<Vec<T>, DecodeError> {
        self.raw
            .iter()
            .enumerate()
            .map(|(index, value)| {
                if value.is_null() {
                    return Err(DecodeError::UnexpectedNull {
                        field: self.field.to_string(),
                        index,
                        field_type: self.field_type,
                    });
                }
                read(value).ok_or_else(|| self.invalid(index))
            })
            .collect()
    }

    fn nullable<T>(
        &self,
        read: impl Fn(&JsonValue) -> Option<T>,
    ) -> Result<Vec<Option<T>>, DecodeError> {
        self.raw
            .iter()
            .enumerate()
            .map(|(index, value)| {
                if value.is_null() {
                    Ok(None)
                } else {
                    read(value).map(Some).ok_or_else(|| self.invalid(index))
                }
            })
            .collect()
    }

    fn invalid(&self, index: usize) -> DecodeError {
        DecodeError::InvalidValue {
            field: self.field.to_string(),
            index,
            field_type: self.field_type,
        }
    }
}

fn values_to_json(values: &FieldValues) -> Vec<JsonValue> {
    fn collect<T: Serialize>(v: &[T]) -> Vec<JsonValue> {
        v.iter().map(|x| serde_json::json!(x)).collect()
    }

    match values {
        FieldValues::Bool(v) => collect(v),
        FieldValues::NullableBool(v) => collect(v),
        FieldValues::Int64(v) | FieldValues::Time(v) => collect(v),
        FieldValues::NullableInt64(v) | FieldValues::NullableTime(v) => collect(v),
        FieldValues::Float64(v) => collect(v),
        FieldValues::NullableFloat64(v) => collect(v),
        FieldValues::String(v) => collect(v),
        FieldValues::NullableString(v) => collect(v),
    }
}

/// Frame decoding errors
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed frame: {0}")]
    Json(#[from] serde_json::Error),

    #[error("field {field:?}: value at index {index} is not a valid {field_type}")]
    InvalidValue {
        field: String,
        index: usize,
        field_type: FieldType,
    },

    #[error("field {field:?}: null at index {index} in non-nullable {field_type} field")]
    UnexpectedNull {
        field: String,
        index: usize,
        field_type: FieldType,
    },

    #[error("frame {index}: {source}")]
    Frame {
        index: usize,
        source: Box<DecodeError>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_nullable_float_frame() {
        let bytes = br#"{
            "name": "A",
            "fields": [
                {"name": "value", "type": "nullable_float64", "labels": {"instance": "a"}, "values": [1.5, null]}
            ]
        }"#;

        let frame = decode_frame(bytes).unwrap();
        assert_eq!(frame.name, "A");
        assert_eq!(frame.fields.len(), 1);

        let field = &frame.fields[0];
        assert_eq!(field.labels.get("instance"), Some("a"));
        assert_eq!(
            field.values,
            FieldValues::NullableFloat64(vec![Some(1.5), None])
        );
    }

    #[test]
    fn test_decode_integers_into_float_field() {
        let bytes = br#"{"fields": [{"type": "float64", "values": [0, 5]}]}"#;
        let frame = decode_frame(bytes).unwrap();
        assert_eq!(frame.fields[0].values, FieldValues::Float64(vec![0.0, 5.0]));
    }

    #[test]
    fn test_decode_rejects_type_mismatch() {
        let bytes = br#"{"fields": [{"name": "v", "type": "int64", "values": [1, "two"]}]}"#;
        let err = decode_frame(bytes).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidValue { index: 1, .. }));
    }

    #[test]
    fn test_decode_rejects_null_in_required_field() {
        let bytes = br#"{"fields": [{"name": "v", "type": "string", "values": [null]}]}"#;
        let err = decode_frame(bytes).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::UnexpectedNull {
                index: 0,
                field_type: FieldType::String,
                ..
            }
        ));
    }

    #[test]
    fn test_decode_rejects_malformed_json() {
        assert!(matches!(
            decode_frame(b"not a frame"),
            Err(DecodeError::Json(_))
        ));
        assert!(matches!(
            decode_frame(br#"{"fields": [{"type": "complex128"}]}"#),
            Err(DecodeError::Json(_))
        ));
    }

    #[test]
    fn test_decode_frames_reports_index() {
        let good = br#"{"name": "A", "fields": []}"#.to_vec();
        let bad = b"{".to_vec();

        let err = decode_frames(&[good, bad]).unwrap_err();
        assert!(matches!(err, DecodeError::Frame { index: 1, .. }));
        assert!(err.to_string().starts_with("frame 1: malformed frame"));
    }

    #[test]
    fn test_encode_then_decode_keeps_labels_and_types() {
        let frame = Frame::new("B").with_field(Field::new(
            "firing",
            Labels::new().with("instance", "host1"),
            FieldValues::Bool(vec![true]),
        ));

        let bytes = encode_frame(&frame).unwrap();
        let decoded = decode_frame(&bytes).unwrap();
        assert_eq!(decoded, frame);
    }
}
