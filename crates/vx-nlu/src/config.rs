//! NLU pipeline configuration, loadable from TOML or environment.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Deserializer};
use vx_protocol::{BackendKind, Threshold};

use crate::error::ConfigError;

/// Settings for model loading, inference and dispatch.
#[derive(Debug, Clone, Deserialize)]
pub struct NluConfig {
    /// Path to the trained model artifact.
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
    /// Minimum confidence an intent must exceed to be dispatched.
    #[serde(default)]
    pub confidence_threshold: Threshold,
    /// Upper bound on a single inference call, in seconds. Must be non-zero.
    #[serde(
        default = "default_inference_timeout_secs",
        deserialize_with = "deserialize_timeout_secs"
    )]
    pub inference_timeout_secs: u64,
    /// Which NLU backend serves the model.
    #[serde(default)]
    pub backend: BackendKind,
    /// Rasa server base URL (only used by the `rasa` backend).
    #[serde(default = "default_rasa_url")]
    pub rasa_url: String,
}

fn default_model_path() -> PathBuf {
    PathBuf::from("./models/nlu-model.json")
}

fn default_inference_timeout_secs() -> u64 {
    5
}

fn deserialize_timeout_secs<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let secs = u64::deserialize(deserializer)?;
    if secs == 0 {
        return Err(serde::de::Error::custom(
            "inference_timeout_secs must be at least 1",
        ));
    }
    Ok(secs)
}

fn default_rasa_url() -> String {
    "http://localhost:5005".into()
}

impl Default for NluConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            confidence_threshold: Threshold::default(),
            inference_timeout_secs: default_inference_timeout_secs(),
            backend: BackendKind::default(),
            rasa_url: default_rasa_url(),
        }
    }
}

impl NluConfig {
    pub fn inference_timeout(&self) -> Duration {
        Duration::from_secs(self.inference_timeout_secs)
    }

    /// Apply `VX_*` environment variable overrides.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.overlay(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn overlay(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(path) = var("VX_MODEL_PATH") {
            self.model_path = PathBuf::from(path);
        }
        if let Some(raw) = var("VX_CONFIDENCE_THRESHOLD") {
            let value: f64 = raw
                .parse()
                .map_err(|_| invalid("VX_CONFIDENCE_THRESHOLD", &raw, "not a number"))?;
            self.confidence_threshold = Threshold::new(value).map_err(|e| {
                invalid("VX_CONFIDENCE_THRESHOLD", &raw, &e.to_string())
            })?;
        }
        if let Some(raw) = var("VX_INFERENCE_TIMEOUT_SECS") {
            let secs: u64 = raw.parse().map_err(|_| {
                invalid("VX_INFERENCE_TIMEOUT_SECS", &raw, "not a whole number of seconds")
            })?;
            if secs == 0 {
                return Err(invalid("VX_INFERENCE_TIMEOUT_SECS", &raw, "must be at least 1"));
            }
            self.inference_timeout_secs = secs;
        }
        if let Some(raw) = var("VX_NLU_BACKEND") {
            self.backend = match raw.to_ascii_lowercase().as_str() {
                "artifact" => BackendKind::Artifact,
                "rasa" => BackendKind::Rasa,
                _ => return Err(invalid("VX_NLU_BACKEND", &raw, "expected artifact or rasa")),
            };
        }
        if let Some(url) = var("VX_RASA_URL") {
            self.rasa_url = url;
        }
        Ok(self)
    }
}

fn invalid(key: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError {
        key: key.into(),
        value: value.into(),
        reason: reason.into(),
    }
}
