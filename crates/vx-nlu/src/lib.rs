//! VoxCommand NLU pipeline.
//!
//! Turns free-form command text into a `DispatchDecision`:
//! model lifecycle (`lifecycle`) → inference (`classifier`) →
//! threshold policy + action table (`dispatch`) → stub actions (`actions`).
//! `CommandProcessor` wires the stages together for both entry points.

pub mod actions;
pub mod artifact;
pub mod classifier;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod lifecycle;
pub mod mock;
pub mod model;
pub mod processor;
pub mod rasa;

pub use actions::{ActionHandler, ActionRegistry};
pub use classifier::Classifier;
pub use config::NluConfig;
pub use dispatch::dispatch;
pub use error::{ConfigError, LoadError, LoadResult, NluError, NluResult};
pub use lifecycle::ModelManager;
pub use mock::{MockLoader, MockModel};
pub use model::{IntentPrediction, ModelHandle, ModelLoader, ModelParse, NluModel};
pub use processor::{CommandProcessor, ProcessedCommand};
