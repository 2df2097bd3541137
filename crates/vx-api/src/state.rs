//! Shared application state for the Axum server.
//!
//! The command processor (and through it the model manager) is injected
//! here; handlers never reach for globals.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::task::JoinHandle;
use vx_nlu::{ActionRegistry, Classifier, CommandProcessor, ModelLoader, ModelManager, NluConfig};

/// Shared application state, wrapped in `Arc` for Axum handler sharing.
#[derive(Clone)]
pub struct AppState {
    /// NLU pipeline used by `/process_command`.
    pub processor: Arc<CommandProcessor>,
}

impl AppState {
    pub fn new(processor: CommandProcessor) -> Self {
        Self {
            processor: Arc::new(processor),
        }
    }

    /// State for the configured backend, with no model loaded yet.
    pub fn from_config(config: &NluConfig) -> Self {
        Self::new(CommandProcessor::from_config(config))
    }

    /// State backed by an explicit loader; threshold and timeout still come
    /// from `config`.
    pub fn with_loader(loader: Box<dyn ModelLoader>, config: &NluConfig) -> Self {
        Self::new(CommandProcessor::new(
            Arc::new(ModelManager::new(loader)),
            Classifier::new(config.inference_timeout()),
            config.confidence_threshold,
            ActionRegistry::with_defaults(),
        ))
    }

    /// Startup hook: load the model in the background.
    ///
    /// Requests served before the load completes see "model not available".
    /// A failed load leaves the server running in degraded mode.
    pub fn spawn_model_load(&self, model_path: PathBuf) -> JoinHandle<()> {
        let manager = self.processor.manager().clone();
        tokio::spawn(async move {
            if let Err(e) = manager.load(&model_path).await {
                tracing::warn!(
                    error = %e,
                    "continuing without NLU model; commands will be reported as unavailable"
                );
            }
        })
    }

    /// Shutdown hook: release the model.
    pub async fn shutdown(&self) {
        self.processor.manager().teardown().await;
    }
}
