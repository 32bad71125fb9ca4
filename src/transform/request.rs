//! Translation of a [`Condition`] into a transform backend request

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::condition::{Condition, TimeRange};
use crate::eval::EvalError;

/// Request sent to the transform backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformRequest {
    pub plugin_context: PluginContext,
    /// Evaluation window requested by the caller
    pub range: EpochRange,
    /// Queries in condition order; expressions may reference earlier ref ids
    pub queries: Vec<DataQuery>,
}

/// Caller identity forwarded to the backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginContext {
    pub org_id: i64,
    pub user: Option<String>,
    /// Alert definition the request is made for
    pub source_id: i64,
}

/// One query descriptor as the backend expects it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQuery {
    pub ref_id: String,
    pub json: serde_json::Value,
    pub interval_ms: i64,
    pub max_data_points: i64,
    pub query_type: String,
    pub time_range: EpochRange,
}

/// Time range in whole milliseconds since the epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpochRange {
    pub from_epoch_ms: i64,
    pub to_epoch_ms: i64,
}

impl EpochRange {
    pub fn new(from: &DateTime<Utc>, to: &DateTime<Utc>) -> Self {
        Self {
            from_epoch_ms: epoch_millis(from),
            to_epoch_ms: epoch_millis(to),
        }
    }
}

impl From<&TimeRange> for EpochRange {
    fn from(range: &TimeRange) -> Self {
        Self::new(&range.from, &range.to)
    }
}

/// Build the backend request for `condition`
///
/// Fails without building anything when the condition has no queries.
pub fn translate(
    condition: &Condition,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    plugin_context: PluginContext,
) -> Result<TransformRequest, EvalError> {
    if !condition.is_valid() {
        return Err(EvalError::InvalidCondition(format!(
            "condition {:?} has no queries or expressions",
            condition.ref_id
        )));
    }

    let queries = condition
        .queries
        .iter()
        .map(|q| DataQuery {
            ref_id: q.ref_id.clone(),
            json: q.model.clone(),
            interval_ms: duration_millis(q.interval),
            max_data_points: q.max_data_points,
            query_type: q.query_type.clone(),
            time_range: EpochRange::from(&q.time_range),
        })
        .collect();

    Ok(TransformRequest {
        plugin_context,
        range: EpochRange::new(&from, &to),
        queries,
    })
}

/// Nanosecond instant divided down to milliseconds, truncating toward zero
pub fn epoch_millis(instant: &DateTime<Utc>) -> i64 {
    let nanos = i128::from(instant.timestamp()) * 1_000_000_000
        + i128::from(instant.timestamp_subsec_nanos());
    (nanos / 1_000_000) as i64
}

/// Whole milliseconds, sub-millisecond remainder dropped
fn duration_millis(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Query;
    use chrono::TimeZone;

    fn instant(secs: i64, nanos: u32) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, nanos).unwrap()
    }

    fn query(ref_id: &str) -> Query {
        Query::new(
            ref_id,
            serde_json::json!({ "expr": ref_id }),
            TimeRange::new(instant(1_600_000_000, 123_456_789), instant(1_600_000_300, 999_999)),
        )
    }

    #[test]
    fn test_translate_single_query() {
        let cond = Condition::new("A").with_query(
            query("A")
                .with_interval(Duration::from_millis(1500))
                .with_max_data_points(500)
                .with_query_type("timeSeriesQuery"),
        );

        let request = translate(
            &cond,
            instant(1_600_000_000, 0),
            instant(1_600_000_300, 0),
            PluginContext::default(),
        )
        .unwrap();

        assert_eq!(request.queries.len(), 1);
        let q = &request.queries[0];
        assert_eq!(q.ref_id, "A");
        assert_eq!(q.json, serde_json::json!({ "expr": "A" }));
        assert_eq!(q.interval_ms, 1500);
        assert_eq!(q.max_data_points, 500);
        assert_eq!(q.query_type, "timeSeriesQuery");
        assert_eq!(q.time_range.from_epoch_ms, 1_600_000_000_123);
        assert_eq!(q.time_range.to_epoch_ms, 1_600_000_300_000);
        assert_eq!(
            request.range,
            EpochRange {
                from_epoch_ms: 1_600_000_000_000,
                to_epoch_ms: 1_600_000_300_000,
            }
        );
    }

    #[test]
    fn test_translate_preserves_order() {
        let cond = Condition::new("C")
            .with_query(query("B"))
            .with_query(query("A"))
            .with_query(query("C"));

        let request = translate(
            &cond,
            instant(0, 0),
            instant(60, 0),
            PluginContext::default(),
        )
        .unwrap();

        let ids: Vec<&str> = request.queries.iter().map(|q| q.ref_id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_translate_invalid_condition() {
        let err = translate(
            &Condition::new("A"),
            instant(0, 0),
            instant(60, 0),
            PluginContext::default(),
        )
        .unwrap_err();
        assert!(matches!(err, EvalError::InvalidCondition(_)));
    }

    #[test]
    fn test_interval_truncates_sub_millisecond() {
        assert_eq!(duration_millis(Duration::from_micros(1_999)), 1);
        assert_eq!(duration_millis(Duration::from_nanos(999_999)), 0);
    }

    #[test]
    fn test_epoch_millis_truncates_toward_zero() {
        assert_eq!(epoch_millis(&instant(1, 500_999)), 1000);
        // -1.5ms: truncation gives -1 where flooring would give -2
        assert_eq!(epoch_millis(&instant(-1, 998_500_000)), -1);
    }
}
