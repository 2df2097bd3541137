//! Model lifecycle manager.
//!
//! Owns the process's single `ModelHandle`:
//! `Unloaded → Loading → Ready | Failed`, and `Ready → Unloaded` on teardown.
//! The lock is only held for transitions and snapshots, never across the
//! load itself or inference, so requests arriving mid-load see "unavailable".

use std::path::Path;
use std::sync::Arc;

use tokio::sync::RwLock;
use vx_protocol::ModelState;

use crate::config::NluConfig;
use crate::error::{LoadError, LoadResult};
use crate::model::{ModelHandle, ModelLoader, loader_for};

enum Slot {
    Unloaded,
    Loading { path: String },
    Ready(ModelHandle),
    Failed { error: String },
}

struct Inner {
    slot: Slot,
    /// Bumped on every load and teardown; a load only installs its handle
    /// if the generation it started with is still current.
    generation: u64,
}

const CANCELLED_LOAD: &str = "model load abandoned before completion";

/// Moves the slot out of `Loading` if a `load` future is dropped mid-flight.
struct LoadGuard {
    inner: Arc<RwLock<Inner>>,
    generation: u64,
    armed: bool,
}

impl LoadGuard {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for LoadGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Ok(mut inner) = self.inner.try_write() {
            abandon(&mut inner, self.generation);
            return;
        }
        // Lock is contended; finish the reset on the runtime instead.
        if let Ok(runtime) = tokio::runtime::Handle::try_current() {
            let inner = self.inner.clone();
            let generation = self.generation;
            runtime.spawn(async move {
                abandon(&mut *inner.write().await, generation);
            });
        }
    }
}

fn abandon(inner: &mut Inner, generation: u64) {
    if inner.generation == generation && matches!(inner.slot, Slot::Loading { .. }) {
        tracing::warn!("model load dropped before completion");
        inner.slot = Slot::Failed {
            error: CANCELLED_LOAD.to_string(),
        };
    }
}

/// Owns the loaded NLU model for the lifetime of the process.
pub struct ModelManager {
    loader: Box<dyn ModelLoader>,
    inner: Arc<RwLock<Inner>>,
}

impl ModelManager {
    pub fn new(loader: Box<dyn ModelLoader>) -> Self {
        Self {
            loader,
            inner: Arc::new(RwLock::new(Inner {
                slot: Slot::Unloaded,
                generation: 0,
            })),
        }
    }

    /// Manager using the loader for the configured backend.
    pub fn from_config(config: &NluConfig) -> Self {
        Self::new(loader_for(config))
    }

    /// Load the model artifact at `path`.
    ///
    /// Failures are recorded in the lifecycle state and returned to the
    /// caller, who decides whether to carry on without a model. Dropping the
    /// returned future mid-load leaves the manager `Failed`, so a later
    /// `load` can start over.
    pub async fn load(&self, path: impl AsRef<Path>) -> LoadResult<ModelHandle> {
        let path = path.as_ref();
        let generation = {
            let mut inner = self.inner.write().await;
            if matches!(inner.slot, Slot::Loading { .. }) {
                return Err(LoadError::AlreadyLoading);
            }
            inner.generation += 1;
            inner.slot = Slot::Loading {
                path: path.display().to_string(),
            };
            inner.generation
        };
        let guard = LoadGuard {
            inner: self.inner.clone(),
            generation,
            armed: true,
        };

        tracing::info!(
            path = %path.display(),
            backend = %self.loader.backend(),
            "loading NLU model"
        );
        let started = std::time::Instant::now();
        let result = self.loader.load(path).await;

        let mut inner = self.inner.write().await;
        guard.disarm();
        if inner.generation != generation {
            tracing::warn!(path = %path.display(), "model load finished after teardown, discarding");
            return Err(LoadError::Cancelled);
        }

        match result {
            Ok(handle) => {
                tracing::info!(
                    model = %handle.info().name,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "NLU model ready"
                );
                inner.slot = Slot::Ready(handle.clone());
                Ok(handle)
            }
            Err(e) => {
                tracing::error!(error = %e, path = %path.display(), "failed to load NLU model");
                inner.slot = Slot::Failed {
                    error: e.to_string(),
                };
                Err(e)
            }
        }
    }

    /// Release the model. Later lookups report it as unavailable.
    pub async fn teardown(&self) {
        let mut inner = self.inner.write().await;
        inner.generation += 1;
        let previous = std::mem::replace(&mut inner.slot, Slot::Unloaded);
        if let Slot::Ready(handle) = previous {
            tracing::info!(model = %handle.info().name, "NLU model released");
        }
    }

    /// The current handle, only when the model is ready.
    pub async fn handle(&self) -> Option<ModelHandle> {
        match &self.inner.read().await.slot {
            Slot::Ready(handle) => Some(handle.clone()),
            _ => None,
        }
    }

    pub async fn state(&self) -> ModelState {
        match &self.inner.read().await.slot {
            Slot::Unloaded => ModelState::Unloaded,
            Slot::Loading { path } => ModelState::Loading { path: path.clone() },
            Slot::Ready(handle) => ModelState::Ready(handle.info().clone()),
            Slot::Failed { error } => ModelState::Failed {
                error: error.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::mock::{MockLoader, MockModel};

    fn manager(loader: MockLoader) -> Arc<ModelManager> {
        Arc::new(ModelManager::new(Box::new(loader)))
    }

    #[tokio::test]
    async fn starts_unloaded() {
        let m = manager(MockLoader::ready(MockModel::intent("top_up", 0.9)));
        assert_eq!(m.state().await, ModelState::Unloaded);
        assert!(m.handle().await.is_none());
    }

    #[tokio::test]
    async fn load_success_is_ready() {
        let m = manager(MockLoader::ready(MockModel::intent("top_up", 0.9)));
        let handle = m.load("models/nlu.json").await.unwrap();
        assert_eq!(handle.info().path, "models/nlu.json");

        assert!(m.state().await.is_ready());
        assert!(m.handle().await.is_some());
    }

    #[tokio::test]
    async fn load_failure_is_failed() {
        let m = manager(MockLoader::failing("corrupt archive"));
        let err = m.load("models/broken.tar.gz").await.unwrap_err();
        assert!(err.to_string().contains("corrupt archive"));

        match m.state().await {
            ModelState::Failed { error } => assert!(error.contains("corrupt archive")),
            other => panic!("expected failed state, got {other:?}"),
        }
        assert!(m.handle().await.is_none());
    }

    #[tokio::test]
    async fn teardown_releases_handle() {
        let m = manager(MockLoader::ready(MockModel::intent("top_up", 0.9)));
        m.load("models/nlu.json").await.unwrap();
        m.teardown().await;

        assert_eq!(m.state().await, ModelState::Unloaded);
        assert!(m.handle().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn handle_absent_while_loading() {
        let loader = MockLoader::ready(MockModel::intent("top_up", 0.9))
            .with_delay(Duration::from_secs(3));
        let m = manager(loader);

        let task = tokio::spawn({
            let m = m.clone();
            async move { m.load("models/nlu.json").await }
        });
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(matches!(m.state().await, ModelState::Loading { .. }));
        assert!(m.handle().await.is_none());

        task.await.unwrap().unwrap();
        assert!(m.handle().await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_load_rejected() {
        let loader = MockLoader::ready(MockModel::intent("top_up", 0.9))
            .with_delay(Duration::from_secs(3));
        let m = manager(loader);

        let task = tokio::spawn({
            let m = m.clone();
            async move { m.load("models/nlu.json").await }
        });
        tokio::time::sleep(Duration::from_secs(1)).await;

        let err = m.load("models/other.json").await.unwrap_err();
        assert!(matches!(err, LoadError::AlreadyLoading));
        task.await.unwrap().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_during_load_discards_result() {
        let loader = MockLoader::ready(MockModel::intent("top_up", 0.9))
            .with_delay(Duration::from_secs(3));
        let m = manager(loader);

        let task = tokio::spawn({
            let m = m.clone();
            async move { m.load("models/nlu.json").await }
        });
        tokio::time::sleep(Duration::from_secs(1)).await;
        m.teardown().await;

        let err = task.await.unwrap().unwrap_err();
        assert!(matches!(err, LoadError::Cancelled));
        assert_eq!(m.state().await, ModelState::Unloaded);
        assert!(m.handle().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_load_can_be_retried() {
        let loader = MockLoader::ready(MockModel::intent("top_up", 0.9))
            .with_delay(Duration::from_secs(10));
        let loads = loader.load_counter();
        let m = manager(loader);

        let timed_out = tokio::time::timeout(Duration::from_secs(1), m.load("models/nlu.json")).await;
        assert!(timed_out.is_err());

        match m.state().await {
            ModelState::Failed { error } => assert_eq!(error, CANCELLED_LOAD),
            other => panic!("expected failed state, got {other:?}"),
        }
        assert!(m.handle().await.is_none());

        m.load("models/nlu.json").await.unwrap();
        assert!(m.state().await.is_ready());
        assert_eq!(loads.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn aborted_load_task_can_be_retried() {
        let loader = MockLoader::ready(MockModel::intent("top_up", 0.9))
            .with_delay(Duration::from_secs(10));
        let m = manager(loader);

        let task = tokio::spawn({
            let m = m.clone();
            async move { m.load("models/nlu.json").await }
        });
        tokio::time::sleep(Duration::from_secs(1)).await;
        task.abort();
        assert!(task.await.unwrap_err().is_cancelled());

        assert!(matches!(m.state().await, ModelState::Failed { .. }));
        m.load("models/nlu.json").await.unwrap();
        assert!(m.handle().await.is_some());
    }

    #[tokio::test]
    async fn reload_after_teardown() {
        let loader = MockLoader::ready(MockModel::intent("top_up", 0.9));
        let loads = loader.load_counter();
        let m = manager(loader);

        m.load("models/nlu.json").await.unwrap();
        m.teardown().await;
        m.load("models/nlu.json").await.unwrap();

        assert!(m.state().await.is_ready());
        assert_eq!(loads.load(std::sync::atomic::Ordering::SeqCst), 2);
    }
}
