//! NLU model abstraction.
//!
//! `NluModel` is the only capability the pipeline needs from an external NLU
//! engine: text in, intent + confidence out. `ModelLoader` turns a model
//! artifact path into a `ModelHandle`. Two backends implement both:
//! - `artifact`: JSON bundle scored in-process (`artifact.rs`)
//! - `rasa`: Rasa HTTP server (`rasa.rs`)

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use vx_protocol::{BackendKind, ModelInfo};

use crate::artifact::ArtifactLoader;
use crate::config::NluConfig;
use crate::error::{LoadResult, NluResult};
use crate::rasa::RasaLoader;

/// One intent guess from the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct IntentPrediction {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl IntentPrediction {
    pub fn new(name: impl Into<String>, confidence: f64) -> Self {
        Self {
            name: Some(name.into()),
            confidence: Some(confidence),
        }
    }
}

/// Parse output for a single utterance (same shape as Rasa's `/model/parse`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ModelParse {
    #[serde(default)]
    pub text: String,
    /// Top intent, if the model produced one.
    #[serde(default)]
    pub intent: Option<IntentPrediction>,
    /// All scored intents, best first.
    #[serde(default)]
    pub intent_ranking: Vec<IntentPrediction>,
}

/// A loaded NLU model capable of intent inference.
#[async_trait]
pub trait NluModel: Send + Sync {
    /// Run inference on `text`. Normally yields exactly one parse.
    async fn parse(&self, text: &str) -> NluResult<Vec<ModelParse>>;

    /// Model name (for logging).
    fn name(&self) -> &str;

    /// Whether `parse` may run concurrently on the same instance.
    /// Models returning false get their calls serialized by `ModelHandle`.
    fn supports_concurrent_inference(&self) -> bool {
        true
    }
}

/// Shared, read-only reference to a loaded model.
#[derive(Clone)]
pub struct ModelHandle {
    model: Arc<dyn NluModel>,
    info: ModelInfo,
    gate: Option<Arc<Mutex<()>>>,
}

impl ModelHandle {
    pub fn new(model: Arc<dyn NluModel>, info: ModelInfo) -> Self {
        let gate = if model.supports_concurrent_inference() {
            None
        } else {
            Some(Arc::new(Mutex::new(())))
        };
        Self { model, info, gate }
    }

    /// Build a handle stamped with the current time.
    pub fn loaded(
        model: Arc<dyn NluModel>,
        name: impl Into<String>,
        path: &Path,
        backend: BackendKind,
    ) -> Self {
        Self::new(
            model,
            ModelInfo {
                name: name.into(),
                path: path.display().to_string(),
                backend,
                loaded_at: Utc::now(),
            },
        )
    }

    pub fn info(&self) -> &ModelInfo {
        &self.info
    }

    /// Whether calls through this handle are serialized.
    pub fn is_serialized(&self) -> bool {
        self.gate.is_some()
    }

    /// Run inference, holding the gate for models that cannot run concurrently.
    pub async fn parse(&self, text: &str) -> NluResult<Vec<ModelParse>> {
        let _guard = match &self.gate {
            Some(gate) => Some(gate.lock().await),
            None => None,
        };
        self.model.parse(text).await
    }
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("model", &self.model.name())
            .field("info", &self.info)
            .field("serialized", &self.is_serialized())
            .finish()
    }
}

/// Loads a model artifact into a `ModelHandle`.
#[async_trait]
pub trait ModelLoader: Send + Sync {
    /// Load the artifact at `path`. Expensive; called once per process.
    async fn load(&self, path: &Path) -> LoadResult<ModelHandle>;

    fn backend(&self) -> BackendKind;
}

/// Pick the loader for the configured backend.
pub fn loader_for(config: &NluConfig) -> Box<dyn ModelLoader> {
    match config.backend {
        BackendKind::Artifact => Box::new(ArtifactLoader),
        BackendKind::Rasa => Box::new(RasaLoader::new(
            config.rasa_url.clone(),
            config.inference_timeout(),
        )),
    }
}
