use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default minimum confidence for an intent to be acted on.
pub const DEFAULT_THRESHOLD: f64 = 0.80;

/// Outcome of a single classification call against the NLU model.
///
/// Both fields are optional because the upstream model is not guaranteed to
/// report either of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ClassificationResult {
    /// Top intent label (e.g., "send_money").
    pub intent_name: Option<String>,
    /// Model confidence for the top intent (0.0 - 1.0).
    pub confidence: Option<f64>,
}

impl ClassificationResult {
    pub fn new(intent_name: impl Into<String>, confidence: f64) -> Self {
        Self {
            intent_name: Some(intent_name.into()),
            confidence: Some(confidence),
        }
    }
}

/// Rejected threshold value.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("confidence threshold must be within [0, 1], got {0}")]
pub struct ThresholdError(pub f64);

/// Minimum confidence an intent must strictly exceed to be matched.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Threshold(f64);

impl Threshold {
    /// Validate and wrap a threshold. NaN and values outside [0, 1] are rejected.
    pub fn new(value: f64) -> Result<Self, ThresholdError> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ThresholdError(value))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Whether `confidence` clears this threshold. Equal is not enough.
    pub fn accepts(self, confidence: Option<f64>) -> bool {
        confidence.is_some_and(|c| c > self.0)
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self(DEFAULT_THRESHOLD)
    }
}

impl<'de> Deserialize<'de> for Threshold {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Threshold::new(value).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Threshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
