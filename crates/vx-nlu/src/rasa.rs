//! Rasa HTTP server backend.
//!
//! Talks to a Rasa server started with `rasa run --enable-api`:
//! - `PUT /model` asks the server to load a trained model archive.
//! - `POST /model/parse` runs NLU on a single utterance.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use vx_protocol::BackendKind;

use crate::error::{LoadError, LoadResult, NluError, NluResult};
use crate::model::{ModelHandle, ModelLoader, ModelParse, NluModel};

/// Model loading can take far longer than a single parse call.
const LOAD_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Serialize)]
struct LoadModelRequest<'a> {
    model_file: &'a str,
}

#[derive(Serialize)]
struct ParseRequest<'a> {
    text: &'a str,
}

/// Loads models into a Rasa server and hands out `RasaModel` handles.
pub struct RasaLoader {
    base_url: String,
    request_timeout: Duration,
}

impl RasaLoader {
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            request_timeout,
        }
    }
}

#[async_trait]
impl ModelLoader for RasaLoader {
    async fn load(&self, path: &Path) -> LoadResult<ModelHandle> {
        let model_file = path.display().to_string();
        if tokio::fs::metadata(path).await.is_err() {
            return Err(LoadError::NotFound { path: model_file });
        }

        let client = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .map_err(|e| LoadError::Backend(format!("failed to build HTTP client: {e}")))?;

        let url = format!("{}/model", self.base_url);
        let response = client
            .put(&url)
            .timeout(LOAD_TIMEOUT)
            .json(&LoadModelRequest {
                model_file: &model_file,
            })
            .send()
            .await
            .map_err(|e| LoadError::Backend(format!("rasa server unreachable at {url}: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LoadError::Backend(format!(
                "rasa server rejected model {model_file} ({status}): {body}"
            )));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| model_file.clone());

        let model = RasaModel {
            client,
            base_url: self.base_url.clone(),
            name: name.clone(),
        };
        Ok(ModelHandle::loaded(
            Arc::new(model),
            name,
            path,
            BackendKind::Rasa,
        ))
    }

    fn backend(&self) -> BackendKind {
        BackendKind::Rasa
    }
}

/// A model served by a Rasa HTTP server.
pub struct RasaModel {
    client: reqwest::Client,
    base_url: String,
    name: String,
}

#[async_trait]
impl NluModel for RasaModel {
    async fn parse(&self, text: &str) -> NluResult<Vec<ModelParse>> {
        let url = format!("{}/model/parse", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&ParseRequest { text })
            .send()
            .await
            .map_err(|e| NluError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NluError::Request(format!(
                "rasa returned {}",
                response.status()
            )));
        }

        let parse: ModelParse = response
            .json()
            .await
            .map_err(|e| NluError::InvalidResponse(e.to_string()))?;

        Ok(vec![parse])
    }

    fn name(&self) -> &str {
        &self.name
    }
}
