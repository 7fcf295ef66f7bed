//! Model capability traits.
//!
//! The pipeline never runs a model itself. Concrete summarization and
//! recognition backends implement these traits:
//! - `Tokenizer`: token budgeting for fixed-window models
//! - `Summarizer`: one abstractive summarization pass
//! - `Recognizer`: named-entity recognition
//! - `ModelPort`: composite of both model traits

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{config::SummaryOptions, mention::Mention};

/// Tokens reserved for special tokens when deriving a chunk budget.
pub const CHUNK_SAFETY_MARGIN: usize = 10;

/// Tokenizer of a fixed-context model.
pub trait Tokenizer: Send + Sync {
    /// Split text into tokens.
    fn tokenize(&self, text: &str) -> Vec<String>;

    /// Turn tokens back into text.
    fn decode(&self, tokens: &[String]) -> String;

    /// Maximum input length of the model, in tokens.
    fn model_max_length(&self) -> usize;

    /// Chunk budget derived from the model window.
    fn max_chunk_size(&self) -> usize {
        self.model_max_length().saturating_sub(CHUNK_SAFETY_MARGIN)
    }
}

/// A summarization model.
///
/// Calls are potentially slow and not reentrant; the pipeline awaits one
/// call at a time.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize `text` in a single model pass.
    async fn summarize(&self, text: &str, options: &SummaryOptions) -> Result<String>;

    /// Tokenizer matching the model's input window.
    fn tokenizer(&self) -> &dyn Tokenizer;
}

/// A named-entity recognition model.
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Recognize entities in `text`.
    async fn recognize(&self, text: &str) -> Result<Vec<Mention>>;

    /// Tokenizer of a fixed-window model.
    ///
    /// When present, long texts are fed to `recognize` chunk by chunk.
    fn tokenizer(&self) -> Option<&dyn Tokenizer> {
        None
    }
}

/// A single backend serving both summarization and recognition.
pub trait ModelPort: Summarizer + Recognizer {}

impl<T: Summarizer + Recognizer> ModelPort for T {}
