//! NLU error types.

use thiserror::Error;

/// Errors raised while loading a model artifact.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("model artifact not found: {path}")]
    NotFound { path: String },

    #[error("failed to read model artifact {path}: {message}")]
    Io { path: String, message: String },

    #[error("corrupt model artifact {path}: {reason}")]
    Corrupt { path: String, reason: String },

    #[error("incompatible model format: version {found}, expected {expected}")]
    Incompatible { found: u32, expected: u32 },

    #[error("NLU backend error: {0}")]
    Backend(String),

    #[error("a model load is already in progress")]
    AlreadyLoading,

    #[error("model load cancelled by teardown")]
    Cancelled,
}

/// Errors raised by a model during inference.
#[derive(Debug, Error)]
pub enum NluError {
    #[error("NLU request failed: {0}")]
    Request(String),

    #[error("invalid NLU response: {0}")]
    InvalidResponse(String),
}

/// Invalid configuration value.
#[derive(Debug, Error)]
#[error("invalid value for {key} ({value:?}): {reason}")]
pub struct ConfigError {
    pub key: String,
    pub value: String,
    pub reason: String,
}

/// Convenience alias for model loading results.
pub type LoadResult<T> = Result<T, LoadError>;

/// Convenience alias for inference results.
pub type NluResult<T> = Result<T, NluError>;
