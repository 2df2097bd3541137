use serde::{Deserialize, Serialize};

/// How a command was resolved.
///
/// `Handled` and `Unhandled` are the two matched cases; `BelowThreshold` and
/// `Unavailable` are unmatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// Confident match with a mapped action.
    Handled,
    /// Confident match, but no action is defined for the intent.
    Unhandled,
    /// The model answered, but not confidently enough.
    BelowThreshold,
    /// No classification was produced (no model, empty input, timeout).
    Unavailable,
}

impl DispatchOutcome {
    pub fn is_matched(self) -> bool {
        matches!(self, Self::Handled | Self::Unhandled)
    }
}

/// Result of applying the threshold policy and action table to a classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchDecision {
    /// True iff the confidence strictly exceeded the threshold.
    pub matched: bool,
    pub outcome: DispatchOutcome,
    /// Action identifier (e.g., "send_money_flow"); only set for `Handled`.
    pub action: Option<String>,
    pub intent_name: Option<String>,
    pub confidence: Option<f64>,
    /// Threshold the confidence was compared against.
    pub threshold: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_serialization() {
        assert_eq!(
            serde_json::to_string(&DispatchOutcome::BelowThreshold).unwrap(),
            r#""below_threshold""#
        );
        assert_eq!(
            serde_json::to_string(&DispatchOutcome::Unhandled).unwrap(),
            r#""unhandled""#
        );
    }

    #[test]
    fn matched_outcomes() {
        assert!(DispatchOutcome::Handled.is_matched());
        assert!(DispatchOutcome::Unhandled.is_matched());
        assert!(!DispatchOutcome::BelowThreshold.is_matched());
        assert!(!DispatchOutcome::Unavailable.is_matched());
    }

    #[test]
    fn absent_fields_serialize_as_null() {
        let decision = DispatchDecision {
            matched: false,
            outcome: DispatchOutcome::Unavailable,
            action: None,
            intent_name: None,
            confidence: None,
            threshold: 0.8,
        };
        let json = serde_json::to_value(&decision).unwrap();
        assert!(json["action"].is_null());
        assert!(json["confidence"].is_null());
        assert_eq!(json["outcome"], "unavailable");
        assert_eq!(json["threshold"], 0.8);
    }
}
