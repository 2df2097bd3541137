use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which kind of NLU backend serves the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// JSON model bundle scored in-process.
    #[default]
    Artifact,
    /// Rasa HTTP server (`rasa run --enable-api`).
    Rasa,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Artifact => write!(f, "artifact"),
            Self::Rasa => write!(f, "rasa"),
        }
    }
}

/// Descriptive metadata for a loaded model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model name reported by the artifact or backend.
    pub name: String,
    /// Filesystem path the model was loaded from.
    pub path: String,
    pub backend: BackendKind,
    pub loaded_at: DateTime<Utc>,
}

/// Snapshot of the model lifecycle, as reported by the health endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ModelState {
    Unloaded,
    Loading { path: String },
    Ready(ModelInfo),
    Failed { error: String },
}

impl ModelState {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}
