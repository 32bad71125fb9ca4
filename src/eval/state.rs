use serde::{Deserialize, Serialize};

use crate::frame::Labels;

/// Evaluation state of an alert instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum State {
    /// The instance's value was exactly zero
    Normal,
    /// Non-zero, missing or unreadable value
    Alerting,
}

impl State {
    pub fn as_str(&self) -> &'static str {
        match self {
            State::Normal => "Normal",
            State::Alerting => "Alerting",
        }
    }

    pub fn is_alerting(&self) -> bool {
        *self != State::Normal
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// State of one alert instance, identified by its labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalResult {
    pub instance: Labels,
    pub state: State,
}

/// Evaluated instances in the order their frames were returned
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvalResults(Vec<EvalResult>);

impl EvalResults {
    pub fn new(results: Vec<EvalResult>) -> Self {
        Self(results)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EvalResult> {
        self.0.iter()
    }

    pub fn alerting_count(&self) -> usize {
        self.0.iter().filter(|r| r.state.is_alerting()).count()
    }

    pub fn into_inner(self) -> Vec<EvalResult> {
        self.0
    }
}

impl From<Vec<EvalResult>> for EvalResults {
    fn from(results: Vec<EvalResult>) -> Self {
        Self(results)
    }
}

impl<'a> IntoIterator for &'a EvalResults {
    type Item = &'a EvalResult;
    type IntoIter = std::slice::Iter<'a, EvalResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
