//! Single-call text-to-intent inference.

use std::time::Duration;

use tokio::time::timeout;
use vx_protocol::ClassificationResult;

use crate::model::{ModelHandle, ModelParse};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Runs one inference call against a model handle, with a bounded timeout.
///
/// Every failure mode (no model, empty text, model error, timeout, empty
/// output) yields `None`; none of them is raised to the caller.
#[derive(Debug, Clone)]
pub struct Classifier {
    timeout: Duration,
}

impl Classifier {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn classify(
        &self,
        handle: Option<&ModelHandle>,
        text: &str,
    ) -> Option<ClassificationResult> {
        let Some(handle) = handle else {
            tracing::warn!("NLU model not available, cannot classify intent");
            return None;
        };

        let text = text.trim();
        if text.is_empty() {
            tracing::debug!("empty command text, skipping inference");
            return None;
        }

        match timeout(self.timeout, handle.parse(text)).await {
            Ok(Ok(parses)) => {
                let Some(first) = parses.into_iter().next() else {
                    tracing::debug!(model = %handle.info().name, "model returned no results");
                    return None;
                };
                Some(to_result(first))
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, model = %handle.info().name, "inference failed");
                None
            }
            Err(_) => {
                tracing::warn!(
                    timeout_ms = self.timeout.as_millis() as u64,
                    model = %handle.info().name,
                    "inference timed out"
                );
                None
            }
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

fn to_result(parse: ModelParse) -> ClassificationResult {
    let intent = parse.intent.unwrap_or_default();
    ClassificationResult {
        intent_name: intent.name,
        confidence: intent.confidence,
    }
}
