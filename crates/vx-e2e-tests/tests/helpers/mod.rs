//! Shared test harness for E2E integration tests.
//!
//! Drives the real Axum router and NLU pipeline through `tower::oneshot`,
//! with the model supplied by a mock loader, the bundled artifact, or a
//! wiremock-backed Rasa server.

#![allow(dead_code)]

use std::path::PathBuf;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use vx_api::routes::build_router;
use vx_api::state::AppState;
use vx_nlu::{MockLoader, MockModel, ModelLoader, NluConfig};

/// Model bundle shipped with the repository.
pub fn bundled_model_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../models/nlu-model.json")
}

/// End-to-end test harness around the API router.
pub struct TestHarness {
    /// Application state shared with the router.
    pub state: AppState,
    /// Axum router for HTTP requests via `tower::oneshot`.
    pub router: Router,
}

impl TestHarness {
    /// Harness whose loader has not been invoked yet.
    pub fn with_loader(loader: Box<dyn ModelLoader>) -> Self {
        let state = AppState::with_loader(loader, &NluConfig::default());
        let router = build_router(state.clone());
        Self { state, router }
    }

    /// Harness with a mock model already loaded.
    pub async fn with_model(model: MockModel) -> Self {
        let h = Self::with_loader(Box::new(MockLoader::ready(model)));
        h.state
            .processor
            .manager()
            .load("models/nlu-model.json")
            .await
            .unwrap();
        h
    }

    /// Harness built from config (artifact or rasa backend), model loaded
    /// from `config.model_path`.
    pub async fn from_config(config: &NluConfig) -> Self {
        let state = AppState::from_config(config);
        state
            .processor
            .manager()
            .load(&config.model_path)
            .await
            .unwrap();
        let router = build_router(state.clone());
        Self { state, router }
    }

    /// Harness serving the bundled artifact model.
    pub async fn with_bundled_model() -> Self {
        let config = NluConfig {
            model_path: bundled_model_path(),
            ..NluConfig::default()
        };
        Self::from_config(&config).await
    }

    /// POST /process_command with `{"command": command}`.
    pub async fn process(&self, command: &str) -> (StatusCode, serde_json::Value) {
        let body = serde_json::json!({ "command": command });
        self.post_raw(&serde_json::to_string(&body).unwrap()).await
    }

    /// POST /process_command with an arbitrary body.
    pub async fn post_raw(&self, body: &str) -> (StatusCode, serde_json::Value) {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::post("/process_command")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        (status, json)
    }

    /// GET an arbitrary path.
    pub async fn get(&self, path: &str) -> (StatusCode, serde_json::Value) {
        let response = self
            .router
            .clone()
            .oneshot(Request::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        (status, json)
    }

    /// Current `model.state` from GET /health.
    pub async fn model_state(&self) -> String {
        let (_, json) = self.get("/health").await;
        json["model"]["state"].as_str().unwrap().to_string()
    }
}
