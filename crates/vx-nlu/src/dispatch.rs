//! Threshold policy and intent → action mapping.

use vx_protocol::{ClassificationResult, DispatchDecision, DispatchOutcome, Threshold};

/// Recognized intents and the action flow each one starts.
pub const ACTION_TABLE: &[(&str, &str)] = &[
    ("send_money", "send_money_flow"),
    ("top_up", "top_up_flow"),
    ("card_to_card_transfer", "card_transfer_flow"),
];

/// Action identifier for a recognized intent name.
pub fn action_for_intent(intent: &str) -> Option<&'static str> {
    ACTION_TABLE
        .iter()
        .find(|(name, _)| *name == intent)
        .map(|(_, action)| *action)
}

/// Decide what to do with a classification.
///
/// Pure: the same inputs always give the same decision.
pub fn dispatch(result: Option<&ClassificationResult>, threshold: Threshold) -> DispatchDecision {
    let Some(result) = result else {
        return DispatchDecision {
            matched: false,
            outcome: DispatchOutcome::Unavailable,
            action: None,
            intent_name: None,
            confidence: None,
            threshold: threshold.value(),
        };
    };

    let intent_name = result.intent_name.clone();
    let confidence = result.confidence;

    if !threshold.accepts(confidence) {
        return DispatchDecision {
            matched: false,
            outcome: DispatchOutcome::BelowThreshold,
            action: None,
            intent_name,
            confidence,
            threshold: threshold.value(),
        };
    }

    let action = intent_name.as_deref().and_then(action_for_intent);
    DispatchDecision {
        matched: true,
        outcome: if action.is_some() {
            DispatchOutcome::Handled
        } else {
            DispatchOutcome::Unhandled
        },
        action: action.map(String::from),
        intent_name,
        confidence,
        threshold: threshold.value(),
    }
}
