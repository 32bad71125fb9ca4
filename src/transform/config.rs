use std::time::Duration;

/// Transform backend connection settings
#[derive(Debug, Clone)]
pub struct TransformConfig {
    /// Base URL of the backend; requests go to `{base_url}/transform`
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl TransformConfig {
    /// Read settings from the environment
    ///
    /// CONDEVAL_TRANSFORM_URL=http://127.0.0.1:3000
    /// CONDEVAL_TRANSFORM_TIMEOUT_SECS=30
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let base_url = std::env::var("CONDEVAL_TRANSFORM_URL").unwrap_or(defaults.base_url);
        let timeout = std::env::var("CONDEVAL_TRANSFORM_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        Self { base_url, timeout }
    }
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}
