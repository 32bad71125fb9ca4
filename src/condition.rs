//! Alert condition model
//!
//! A [`Condition`] names the query or expression whose result decides the
//! alert state, together with every query and expression needed to compute
//! it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Queries and expressions plus the ref id of the one to evaluate
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Ref id of the result whose series are evaluated
    pub ref_id: String,
    /// Queries and expressions, in the order the backend receives them
    #[serde(rename = "queriesAndExpressions")]
    pub queries: Vec<Query>,
}

impl Condition {
    pub fn new(ref_id: impl Into<String>) -> Self {
        Self {
            ref_id: ref_id.into(),
            queries: Vec::new(),
        }
    }

    /// Append a query or expression
    pub fn with_query(mut self, query: Query) -> Self {
        self.queries.push(query);
        self
    }

    /// A condition is valid when it has at least one query.
    ///
    /// `ref_id` is not checked against the queries' ref ids.
    pub fn is_valid(&self) -> bool {
        !self.queries.is_empty()
    }
}

/// One query or expression of a condition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    pub ref_id: String,
    /// Opaque datasource or expression payload
    #[serde(default)]
    pub model: serde_json::Value,
    #[serde(with = "duration_serde", default)]
    pub interval: Duration,
    #[serde(default)]
    pub max_data_points: i64,
    #[serde(default)]
    pub query_type: String,
    pub time_range: TimeRange,
}

impl Query {
    pub fn new(ref_id: impl Into<String>, model: serde_json::Value, time_range: TimeRange) -> Self {
        Self {
            ref_id: ref_id.into(),
            model,
            interval: Duration::from_secs(1),
            max_data_points: 100,
            query_type: String::new(),
            time_range,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_max_data_points(mut self, max_data_points: i64) -> Self {
        self.max_data_points = max_data_points;
        self
    }

    pub fn with_query_type(mut self, query_type: impl Into<String>) -> Self {
        self.query_type = query_type.into();
        self
    }
}

/// Absolute time range of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self { from, to }
    }

    /// Range ending at `to` and spanning `span`
    pub fn last(span: chrono::Duration, to: DateTime<Utc>) -> Self {
        Self { from: to - span, to }
    }
}

/// Durations travel as `{"secs": .., "nanos": ..}`
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    #[derive(Serialize, Deserialize)]
    struct DurationHelper {
        secs: u64,
        #[serde(default)]
        nanos: u32,
    }

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        DurationHelper {
            secs: duration.as_secs(),
            nanos: duration.subsec_nanos(),
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let helper = DurationHelper::deserialize(deserializer)?;
        Ok(Duration::new(helper.secs, helper.nanos))
    }
}
