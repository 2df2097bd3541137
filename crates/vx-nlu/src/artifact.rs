//! JSON model bundle backend.
//!
//! The bundle lists example utterances per intent. Inference scores the input
//! against every example with the Dice coefficient over lowercase word sets;
//! an intent's confidence is its best example score.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use vx_protocol::BackendKind;

use crate::error::{LoadError, LoadResult, NluResult};
use crate::model::{IntentPrediction, ModelHandle, ModelLoader, ModelParse, NluModel};

/// Bundle format this build understands.
pub const FORMAT_VERSION: u32 = 1;

/// On-disk bundle layout.
#[derive(Debug, Deserialize)]
struct Bundle {
    format_version: u32,
    name: String,
    #[serde(default)]
    language: Option<String>,
    intents: Vec<BundleIntent>,
}

#[derive(Debug, Deserialize)]
struct BundleIntent {
    name: String,
    examples: Vec<String>,
}

/// In-memory model built from a bundle.
#[derive(Debug)]
pub struct ArtifactModel {
    name: String,
    language: Option<String>,
    intents: Vec<(String, Vec<HashSet<String>>)>,
}

impl ArtifactModel {
    /// Parse and validate bundle JSON. `origin` is used in error messages.
    pub fn from_json(origin: &str, json: &str) -> LoadResult<Self> {
        let bundle: Bundle = serde_json::from_str(json).map_err(|e| LoadError::Corrupt {
            path: origin.to_string(),
            reason: e.to_string(),
        })?;

        if bundle.format_version != FORMAT_VERSION {
            return Err(LoadError::Incompatible {
                found: bundle.format_version,
                expected: FORMAT_VERSION,
            });
        }

        if bundle.intents.is_empty() {
            return Err(LoadError::Corrupt {
                path: origin.to_string(),
                reason: "bundle defines no intents".into(),
            });
        }

        let mut intents = Vec::with_capacity(bundle.intents.len());
        for intent in bundle.intents {
            let examples: Vec<HashSet<String>> = intent
                .examples
                .iter()
                .map(|e| tokenize(e))
                .filter(|tokens| !tokens.is_empty())
                .collect();
            if examples.is_empty() {
                return Err(LoadError::Corrupt {
                    path: origin.to_string(),
                    reason: format!("intent '{}' has no usable examples", intent.name),
                });
            }
            intents.push((intent.name, examples));
        }

        Ok(Self {
            name: bundle.name,
            language: bundle.language,
            intents,
        })
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn intent_names(&self) -> impl Iterator<Item = &str> {
        self.intents.iter().map(|(name, _)| name.as_str())
    }

    fn score(&self, text: &str) -> ModelParse {
        let tokens = tokenize(text);

        let mut ranking: Vec<IntentPrediction> = self
            .intents
            .iter()
            .map(|(name, examples)| {
                let best = examples
                    .iter()
                    .map(|example| dice(&tokens, example))
                    .fold(0.0_f64, f64::max);
                IntentPrediction::new(name.clone(), best)
            })
            .collect();
        ranking.sort_by(|a, b| {
            b.confidence
                .unwrap_or(0.0)
                .total_cmp(&a.confidence.unwrap_or(0.0))
        });

        let intent = match ranking.first() {
            Some(top) if top.confidence.unwrap_or(0.0) > 0.0 => top.clone(),
            _ => IntentPrediction {
                name: None,
                confidence: Some(0.0),
            },
        };

        ModelParse {
            text: text.to_string(),
            intent: Some(intent),
            intent_ranking: ranking,
        }
    }
}

#[async_trait]
impl NluModel for ArtifactModel {
    async fn parse(&self, text: &str) -> NluResult<Vec<ModelParse>> {
        Ok(vec![self.score(text)])
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Reads bundles from the local filesystem.
pub struct ArtifactLoader;

#[async_trait]
impl ModelLoader for ArtifactLoader {
    async fn load(&self, path: &Path) -> LoadResult<ModelHandle> {
        let origin = path.display().to_string();
        let json = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LoadError::NotFound {
                    path: origin.clone(),
                }
            } else {
                LoadError::Io {
                    path: origin.clone(),
                    message: e.to_string(),
                }
            }
        })?;

        let model = ArtifactModel::from_json(&origin, &json)?;
        tracing::debug!(
            model = %model.name,
            language = model.language().unwrap_or("unspecified"),
            intents = ?model.intent_names().collect::<Vec<_>>(),
            "model bundle parsed"
        );
        let name = model.name.clone();
        Ok(ModelHandle::loaded(
            Arc::new(model),
            name,
            path,
            BackendKind::Artifact,
        ))
    }

    fn backend(&self) -> BackendKind {
        BackendKind::Artifact
    }
}

/// Lowercase word set. Apostrophes stay inside words ("don't").
fn tokenize(text: &str) -> HashSet<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|w| w.trim_matches('\''))
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Dice coefficient of two word sets, in [0, 1].
fn dice(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let shared = a.intersection(b).count();
    (2 * shared) as f64 / (a.len() + b.len()) as f64
}
