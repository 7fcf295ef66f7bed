//! Typed errors for the digest library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;

/// Errors that can occur while digesting documents.
#[derive(Debug, Error)]
pub enum DigestError {
    /// A summarization or recognition model call failed.
    ///
    /// Never retried inside the pipeline; fatal for the current document only.
    #[error("model invocation failed: {0}")]
    ModelInvocation(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Recursive reduction kept producing text above the chunk budget.
    #[error("reduction did not converge after {rounds} rounds ({tokens} tokens left)")]
    ReductionDidNotConverge { rounds: usize, tokens: usize },

    /// No factory is registered under this model name or alias
    #[error("unknown model: {name}")]
    UnknownModel { name: String },

    /// Storage operation failed
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Document retrieval failed
    #[error("retrieval error: {0}")]
    Retrieval(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// URL could not be parsed or carries no record id
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

impl DigestError {
    /// Wrap any error coming out of a model backend.
    pub fn model(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::ModelInvocation(err.into())
    }

    /// Wrap any error coming out of a storage backend.
    pub fn storage(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Storage(err.into())
    }

    /// Wrap any error coming out of a retrieval backend.
    pub fn retrieval(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Retrieval(err.into())
    }
}

/// Result type alias for digest operations.
pub type Result<T> = std::result::Result<T, DigestError>;
