//! Terminal rendering of a dispatch decision.

use vx_nlu::processor::format_confidence;
use vx_protocol::DispatchDecision;

/// Render the "NLU Analysis" block printed after each command.
pub fn render(decision: &DispatchDecision, message: &str) -> String {
    format!(
        "\n--- NLU Analysis ---\nIntent: {}\nConfidence: {}\nAction: {}\n",
        decision.intent_name.as_deref().unwrap_or("none"),
        format_confidence(decision.confidence),
        message,
    )
}
