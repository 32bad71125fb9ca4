//! Classification of executed condition results

use fxhash::FxHashSet;

use super::error::{EvalError, ShapeViolation};
use super::executor::ExecutionResult;
use super::state::{EvalResult, EvalResults, State};
use crate::frame::{Field, FieldType, Frame};

/// Evaluate every frame of an execution result into an instance state
///
/// Each frame must have at most one row and exactly one nullable float64
/// field, and no two frames may share a label set. The first frame breaking
/// any of these rules aborts the evaluation with no results.
pub fn evaluate_execution_result(result: &ExecutionResult) -> Result<EvalResults, EvalError> {
    let mut eval_results = Vec::with_capacity(result.frames.len());
    let mut seen_labels: FxHashSet<String> = FxHashSet::default();

    for frame in &result.frames {
        let field = single_value_field(frame)?;

        let labels = field.labels.to_string();
        if seen_labels.contains(&labels) {
            return Err(ShapeViolation::DuplicateLabelSet {
                frame: frame.name.clone(),
                labels,
            }
            .into());
        }
        seen_labels.insert(labels);

        eval_results.push(EvalResult {
            instance: field.labels.clone(),
            state: classify(field),
        });
    }

    let results = EvalResults::from(eval_results);
    tracing::debug!(
        source_id = result.source_id,
        instances = results.len(),
        alerting = results.alerting_count(),
        "Evaluated execution result"
    );
    Ok(results)
}

/// Check the row, field and type rules, returning the frame's only field
fn single_value_field(frame: &Frame) -> Result<&Field, ShapeViolation> {
    let rows = frame.row_len().map_err(|reason| ShapeViolation::RowLength {
        frame: frame.name.clone(),
        reason,
    })?;
    if rows > 1 {
        return Err(ShapeViolation::MultiRow {
            frame: frame.name.clone(),
            rows,
        });
    }

    let field = match frame.fields.as_slice() {
        [field] => field,
        [] => {
            return Err(ShapeViolation::NoFields {
                frame: frame.name.clone(),
            })
        }
        fields => {
            return Err(ShapeViolation::MultiField {
                frame: frame.name.clone(),
                fields: fields.len(),
            })
        }
    };

    if field.field_type() != FieldType::NullableFloat64 {
        return Err(ShapeViolation::WrongType {
            frame: frame.name.clone(),
            field_type: field.field_type(),
        });
    }

    Ok(field)
}

/// Exactly zero is Normal; anything else, including an unreadable value, alerts
fn classify(field: &Field) -> State {
    match field.float_at(0) {
        Ok(value) if value == 0.0 => State::Normal,
        _ => State::Alerting,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{FieldValues, Labels};

    fn series(name: &str, instance: &str, values: Vec<Option<f64>>) -> Frame {
        Frame::new(name).with_field(Field::new(
            "value",
            Labels::new().with("instance", instance),
            FieldValues::NullableFloat64(values),
        ))
    }

    fn exec(frames: Vec<Frame>) -> ExecutionResult {
        ExecutionResult {
            source_id: 1,
            frames,
        }
    }

    #[test]
    fn test_zero_is_normal() {
        let results = evaluate_execution_result(&exec(vec![series("A", "a", vec![Some(0.0)])]))
            .unwrap();

        assert_eq!(results.len(), 1);
        let r = results.iter().next().unwrap();
        assert_eq!(r.state, State::Normal);
        assert_eq!(r.instance, Labels::new().with("instance", "a"));
    }

    #[test]
    fn test_non_zero_is_alerting() {
        let results = evaluate_execution_result(&exec(vec![series("A", "a", vec![Some(5.0)])]))
            .unwrap();
        assert_eq!(results.iter().next().unwrap().state, State::Alerting);
    }

    #[test]
    fn test_null_and_nan_are_alerting() {
        let results = evaluate_execution_result(&exec(vec![
            series("A", "a", vec![None]),
            series("B", "b", vec![Some(f64::NAN)]),
        ]))
        .unwrap();

        let states: Vec<State> = results.iter().map(|r| r.state).collect();
        assert_eq!(states, vec![State::Alerting, State::Alerting]);
    }

    #[test]
    fn test_zero_rows_is_alerting() {
        let results =
            evaluate_execution_result(&exec(vec![series("A", "a", vec![])])).unwrap();
        assert_eq!(results.iter().next().unwrap().state, State::Alerting);
    }

    #[test]
    fn test_preserves_input_order() {
        let results = evaluate_execution_result(&exec(vec![
            series("A", "c", vec![Some(1.0)]),
            series("B", "a", vec![Some(0.0)]),
            series("C", "b", vec![Some(-2.0)]),
        ]))
        .unwrap();

        let instances: Vec<&str> = results
            .iter()
            .map(|r| r.instance.get("instance").unwrap())
            .collect();
        assert_eq!(instances, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_duplicate_labels_rejected() {
        let err = evaluate_execution_result(&exec(vec![
            series("A", "a", vec![Some(0.0)]),
            series("B", "a", vec![Some(1.0)]),
        ]))
        .unwrap_err();

        match err {
            EvalError::Shape(ShapeViolation::DuplicateLabelSet { frame, labels }) => {
                assert_eq!(frame, "B");
                assert_eq!(labels, "instance=a");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_multiple_rows_rejected() {
        let err = evaluate_execution_result(&exec(vec![series(
            "A",
            "a",
            vec![Some(0.0), Some(0.0)],
        )]))
        .unwrap_err();

        assert!(matches!(
            err,
            EvalError::Shape(ShapeViolation::MultiRow { rows: 2, .. })
        ));
        assert!(err.to_string().contains("\"A\""));
    }

    #[test]
    fn test_multiple_rows_rejected_before_field_checks() {
        let frame = Frame::new("A")
            .with_field(Field::new("s", Labels::new(), FieldValues::String(vec!["x".into(), "y".into()])))
            .with_field(Field::new("t", Labels::new(), FieldValues::Time(vec![1, 2])));

        let err = evaluate_execution_result(&exec(vec![frame])).unwrap_err();
        assert!(matches!(
            err,
            EvalError::Shape(ShapeViolation::MultiRow { rows: 2, .. })
        ));
    }

    #[test]
    fn test_multiple_fields_rejected() {
        let frame = series("A", "a", vec![Some(0.0)]).with_field(Field::new(
            "other",
            Labels::new(),
            FieldValues::NullableFloat64(vec![Some(1.0)]),
        ));

        let err = evaluate_execution_result(&exec(vec![frame])).unwrap_err();
        assert!(matches!(
            err,
            EvalError::Shape(ShapeViolation::MultiField { fields: 2, .. })
        ));
    }

    #[test]
    fn test_no_fields_rejected() {
        let err = evaluate_execution_result(&exec(vec![Frame::new("A")])).unwrap_err();
        assert!(matches!(
            err,
            EvalError::Shape(ShapeViolation::NoFields { .. })
        ));
    }

    #[test]
    fn test_wrong_type_rejected() {
        let frame = Frame::new("A").with_field(Field::new(
            "value",
            Labels::new(),
            FieldValues::String(vec!["0".into()]),
        ));

        let err = evaluate_execution_result(&exec(vec![frame])).unwrap_err();
        match err {
            EvalError::Shape(ShapeViolation::WrongType { frame, field_type }) => {
                assert_eq!(frame, "A");
                assert_eq!(field_type, FieldType::String);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_nullable_float_rejected() {
        let frame = Frame::new("A").with_field(Field::new(
            "value",
            Labels::new(),
            FieldValues::Float64(vec![0.0]),
        ));

        let err = evaluate_execution_result(&exec(vec![frame])).unwrap_err();
        assert!(matches!(
            err,
            EvalError::Shape(ShapeViolation::WrongType {
                field_type: FieldType::Float64,
                ..
            })
        ));
    }

    #[test]
    fn test_ragged_frame_rejected() {
        let frame = series("A", "a", vec![Some(0.0)]).with_field(Field::new(
            "time",
            Labels::new(),
            FieldValues::Time(vec![]),
        ));

        let err = evaluate_execution_result(&exec(vec![frame])).unwrap_err();
        assert!(matches!(
            err,
            EvalError::Shape(ShapeViolation::RowLength { .. })
        ));
    }

    #[test]
    fn test_violation_after_valid_frames_yields_nothing() {
        let bad = series("C", "c", vec![Some(0.0), Some(1.0)]);
        let result = evaluate_execution_result(&exec(vec![
            series("A", "a", vec![Some(0.0)]),
            series("B", "b", vec![Some(1.0)]),
            bad,
        ]));
        assert!(result.is_err());
    }
}
