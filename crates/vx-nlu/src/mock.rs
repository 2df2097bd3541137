//! Mock NLU model and loader for testing.
//!
//! `MockModel` returns a scripted response, counts calls and tracks how many
//! inferences overlap, so tests can check the serialization guarantee.
//! `MockLoader` hands out a `MockModel` (or a failure) after an optional delay.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use vx_protocol::BackendKind;

use crate::error::{LoadError, LoadResult, NluError, NluResult};
use crate::model::{IntentPrediction, ModelHandle, ModelLoader, ModelParse, NluModel};

#[derive(Debug, Clone)]
enum MockResponse {
    Parses(Vec<ModelParse>),
    Error(String),
}

/// Scripted NLU model.
#[derive(Debug)]
pub struct MockModel {
    response: MockResponse,
    delay: Option<Duration>,
    concurrent: bool,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockModel {
    fn with_response(response: MockResponse) -> Self {
        Self {
            response,
            delay: None,
            concurrent: true,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Always predict `name` with `confidence`.
    pub fn intent(name: &str, confidence: f64) -> Self {
        Self::prediction(IntentPrediction::new(name, confidence))
    }

    /// Always return a single parse with the given top intent.
    pub fn prediction(intent: IntentPrediction) -> Self {
        Self::with_response(MockResponse::Parses(vec![ModelParse {
            text: String::new(),
            intent_ranking: vec![intent.clone()],
            intent: Some(intent),
        }]))
    }

    /// Return these parses verbatim.
    pub fn parses(parses: Vec<ModelParse>) -> Self {
        Self::with_response(MockResponse::Parses(parses))
    }

    /// Return an empty result list.
    pub fn empty() -> Self {
        Self::parses(Vec::new())
    }

    /// Fail every call with a request error.
    pub fn failing(message: &str) -> Self {
        Self::with_response(MockResponse::Error(message.to_string()))
    }

    /// Sleep for `delay` inside every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Declare the model unsafe for concurrent inference.
    pub fn serialized(mut self) -> Self {
        self.concurrent = false;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of overlapping `parse` calls observed.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Wrap an already shared mock in a ready handle.
    pub fn handle(self: &Arc<Self>) -> ModelHandle {
        ModelHandle::loaded(
            self.clone(),
            "mock-model",
            Path::new("mock-model.json"),
            BackendKind::Artifact,
        )
    }
}

#[async_trait]
impl NluModel for MockModel {
    async fn parse(&self, text: &str) -> NluResult<Vec<ModelParse>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match &self.response {
            MockResponse::Parses(parses) => Ok(parses
                .iter()
                .cloned()
                .map(|mut p| {
                    p.text = text.to_string();
                    p
                })
                .collect()),
            MockResponse::Error(message) => Err(NluError::Request(message.clone())),
        }
    }

    fn name(&self) -> &str {
        "mock-model"
    }

    fn supports_concurrent_inference(&self) -> bool {
        self.concurrent
    }
}

/// Loader that returns a fixed mock model or failure.
pub struct MockLoader {
    outcome: Result<Arc<MockModel>, String>,
    delay: Option<Duration>,
    loads: Arc<AtomicUsize>,
}

impl MockLoader {
    pub fn ready(model: MockModel) -> Self {
        Self::shared(Arc::new(model))
    }

    /// Load a model the test keeps a reference to.
    pub fn shared(model: Arc<MockModel>) -> Self {
        Self {
            outcome: Ok(model),
            delay: None,
            loads: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
            delay: None,
            loads: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Counter of `load` calls, readable after the loader is boxed.
    pub fn load_counter(&self) -> Arc<AtomicUsize> {
        self.loads.clone()
    }
}

#[async_trait]
impl ModelLoader for MockLoader {
    async fn load(&self, path: &Path) -> LoadResult<ModelHandle> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.outcome {
            Ok(model) => Ok(ModelHandle::loaded(
                model.clone(),
                "mock-model",
                path,
                BackendKind::Artifact,
            )),
            Err(message) => Err(LoadError::Corrupt {
                path: path.display().to_string(),
                reason: message.clone(),
            }),
        }
    }

    fn backend(&self) -> BackendKind {
        BackendKind::Artifact
    }
}
