//! Action handlers, looked up by the action identifier chosen by `dispatch`.
//!
//! The business flows themselves live elsewhere; the default handlers only
//! log the hand-off and describe it.

use std::collections::HashMap;

use async_trait::async_trait;
use vx_protocol::DispatchDecision;

/// A flow started for a handled command.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    /// Action identifier (e.g., "send_money_flow").
    fn name(&self) -> &str;

    /// Human-readable flow name.
    fn description(&self) -> &str;

    /// Start the flow. Returns a message for the caller.
    async fn run(&self, decision: &DispatchDecision) -> String;
}

/// Stub that records the hand-off to a business flow.
struct FlowStub {
    name: &'static str,
    description: &'static str,
}

#[async_trait]
impl ActionHandler for FlowStub {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }

    async fn run(&self, decision: &DispatchDecision) -> String {
        tracing::info!(
            action = self.name,
            intent = ?decision.intent_name,
            confidence = ?decision.confidence,
            "initiating {} flow",
            self.description
        );
        format!("Initiating '{}' flow...", self.description)
    }
}

/// Registry of action handlers, indexed by action identifier.
pub struct ActionRegistry {
    handlers: Vec<Box<dyn ActionHandler>>,
    index: HashMap<String, usize>,
}

impl ActionRegistry {
    pub fn new(handlers: Vec<Box<dyn ActionHandler>>) -> Self {
        let index = handlers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.name().to_string(), i))
            .collect();
        Self { handlers, index }
    }

    /// Stubs for every flow in the dispatch table.
    pub fn with_defaults() -> Self {
        let stubs: [(&'static str, &'static str); 3] = [
            ("send_money_flow", "send money"),
            ("top_up_flow", "mobile top-up"),
            ("card_transfer_flow", "card to card transfer"),
        ];
        Self::new(
            stubs
                .into_iter()
                .map(|(name, description)| {
                    Box::new(FlowStub { name, description }) as Box<dyn ActionHandler>
                })
                .collect(),
        )
    }

    pub fn lookup(&self, action: &str) -> Option<&dyn ActionHandler> {
        self.index.get(action).map(|&i| self.handlers[i].as_ref())
    }

    /// Run the handler for the decision's action, if it has one registered.
    pub async fn run(&self, decision: &DispatchDecision) -> Option<String> {
        let handler = self.lookup(decision.action.as_deref()?)?;
        Some(handler.run(decision).await)
    }

    pub fn names(&self) -> Vec<&str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
