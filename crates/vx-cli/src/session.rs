//! One prompt-to-report exchange.

use vx_nlu::CommandProcessor;

use crate::report;

pub const NO_COMMAND: &str = "No command entered.";

/// Text printed for the line read at the prompt (`None` when it was blank).
pub async fn respond(processor: &CommandProcessor, command: Option<&str>) -> String {
    let Some(command) = command else {
        tracing::debug!("no command entered");
        return format!("{NO_COMMAND}\n");
    };

    let processed = processor.process(command).await;
    tracing::debug!(
        outcome = ?processed.decision.outcome,
        action = ?processed.decision.action,
        "command analysed"
    );
    report::render(&processed.decision, &processed.message)
}
