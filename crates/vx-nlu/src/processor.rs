//! Command processing pipeline shared by the HTTP server and the terminal.
//!
//! classify → dispatch → (handled) run action → describe the outcome.

use std::sync::Arc;

use vx_protocol::{DispatchDecision, DispatchOutcome, Threshold};

use crate::actions::ActionRegistry;
use crate::classifier::Classifier;
use crate::config::NluConfig;
use crate::dispatch::dispatch;
use crate::lifecycle::ModelManager;

/// Decision plus a human-readable description of it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedCommand {
    pub decision: DispatchDecision,
    pub message: String,
}

/// Owns everything needed to turn command text into a decision.
pub struct CommandProcessor {
    manager: Arc<ModelManager>,
    classifier: Classifier,
    threshold: Threshold,
    actions: ActionRegistry,
}

impl CommandProcessor {
    pub fn new(
        manager: Arc<ModelManager>,
        classifier: Classifier,
        threshold: Threshold,
        actions: ActionRegistry,
    ) -> Self {
        Self {
            manager,
            classifier,
            threshold,
            actions,
        }
    }

    /// Processor for the configured backend. The model is not loaded yet.
    pub fn from_config(config: &NluConfig) -> Self {
        let processor = Self::new(
            Arc::new(ModelManager::from_config(config)),
            Classifier::new(config.inference_timeout()),
            config.confidence_threshold,
            ActionRegistry::with_defaults(),
        );
        tracing::info!(
            backend = %config.backend,
            threshold = %processor.threshold,
            timeout_ms = processor.classifier.timeout().as_millis() as u64,
            actions = ?processor.actions.names(),
            "command processor initialized"
        );
        processor
    }

    pub fn manager(&self) -> &Arc<ModelManager> {
        &self.manager
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// Process `text` with the configured threshold.
    pub async fn process(&self, text: &str) -> ProcessedCommand {
        self.process_with_threshold(text, self.threshold).await
    }

    pub async fn process_with_threshold(&self, text: &str, threshold: Threshold) -> ProcessedCommand {
        let handle = self.manager.handle().await;
        let result = self.classifier.classify(handle.as_ref(), text).await;
        let decision = dispatch(result.as_ref(), threshold);

        let message = match decision.outcome {
            DispatchOutcome::Handled => match self.actions.run(&decision).await {
                Some(message) => message,
                None => format!(
                    "No handler registered for action '{}'.",
                    decision.action.as_deref().unwrap_or_default()
                ),
            },
            DispatchOutcome::Unhandled => format!(
                "Intent recognized, but no specific action is defined: {}",
                decision.intent_name.as_deref().unwrap_or("none")
            ),
            DispatchOutcome::BelowThreshold => format!(
                "Could not determine action. Confidence ({}) is below threshold ({}).",
                format_confidence(decision.confidence),
                threshold
            ),
            DispatchOutcome::Unavailable => {
                "NLU model not available. Cannot classify intent.".to_string()
            }
        };

        tracing::info!(
            outcome = ?decision.outcome,
            intent = ?decision.intent_name,
            confidence = ?decision.confidence,
            action = ?decision.action,
            "command dispatched"
        );

        ProcessedCommand { decision, message }
    }
}

/// Two-decimal confidence, or `n/a` when the model gave none.
pub fn format_confidence(confidence: Option<f64>) -> String {
    match confidence {
        Some(c) => format!("{c:.2}"),
        None => "n/a".to_string(),
    }
}
