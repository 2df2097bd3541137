use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decision::DispatchDecision;

/// Body of `POST /process_command`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessCommandRequest {
    /// Natural-language command text (typed or transcribed).
    pub command: String,
}

/// Response to a processed command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessCommandResponse {
    /// Unique ID for this request (UUIDv7 for time-sortability).
    pub id: Uuid,
    /// The command text as received.
    pub command: String,
    #[serde(flatten)]
    pub decision: DispatchDecision,
    /// Human-readable description of what happened.
    pub message: String,
    pub processed_at: DateTime<Utc>,
}

impl ProcessCommandResponse {
    pub fn new(command: impl Into<String>, decision: DispatchDecision, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            command: command.into(),
            decision,
            message: message.into(),
            processed_at: Utc::now(),
        }
    }
}
