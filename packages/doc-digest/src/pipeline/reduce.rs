//! Recursive reduction - make a fixed-window summarizer work on text of any
//! length.
//!
//! Chunks are summarized independently, the summaries are concatenated and
//! the result is chunked and summarized again until it fits the window
//! ("summarize chunks, then summarize the summaries").

use tracing::debug;

use crate::error::{DigestError, Result};
use crate::text::{chunk_tokens, normalize};
use crate::traits::model::Summarizer;
use crate::types::config::SummaryOptions;

/// Default cap on reduction rounds.
pub const DEFAULT_MAX_ROUNDS: usize = 16;

/// Result of a reduction with bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct ReductionOutcome {
    pub summary: String,

    /// Chunk/summarize/concatenate rounds (0 when one pass sufficed)
    pub rounds: usize,

    /// Summarization calls issued
    pub model_calls: usize,
}

struct SummaryState {
    text: String,
    tokens: Vec<String>,
}

/// Drives a [`Summarizer`] over arbitrarily long text.
pub struct Reducer<'a, S: Summarizer + ?Sized> {
    summarizer: &'a S,
    max_chunk_size: usize,
    max_rounds: usize,
}

impl<'a, S: Summarizer + ?Sized> Reducer<'a, S> {
    /// Create a reducer with the chunk budget derived from the model's
    /// tokenizer.
    pub fn new(summarizer: &'a S) -> Self {
        Self {
            max_chunk_size: summarizer.tokenizer().max_chunk_size(),
            summarizer,
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }

    /// Override the chunk budget.
    pub fn with_max_chunk_size(mut self, max_chunk_size: usize) -> Self {
        self.max_chunk_size = max_chunk_size;
        self
    }

    /// Set the round cap.
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    pub fn max_chunk_size(&self) -> usize {
        self.max_chunk_size
    }

    /// Summarize `text`, reducing recursively when it exceeds the budget.
    pub async fn reduce(&self, text: &str, options: &SummaryOptions) -> Result<String> {
        Ok(self.reduce_detailed(text, options).await?.summary)
    }

    /// Like [`Reducer::reduce`], also reporting rounds and model calls.
    ///
    /// Text within budget gets exactly one summarization call. Longer text
    /// ends on the concatenated chunk summaries of the last round, with no
    /// extra call on top.
    pub async fn reduce_detailed(
        &self,
        text: &str,
        options: &SummaryOptions,
    ) -> Result<ReductionOutcome> {
        let tokenizer = self.summarizer.tokenizer();
        let tokens = tokenizer.tokenize(text);

        debug!(
            "Summarizing document: {} tokens, chunk budget {}",
            tokens.len(),
            self.max_chunk_size
        );

        if tokens.len() <= self.max_chunk_size {
            let summary = self.summarizer.summarize(text, options).await?;
            return Ok(ReductionOutcome {
                summary,
                rounds: 0,
                model_calls: 1,
            });
        }

        let mut state = SummaryState {
            text: String::new(),
            tokens,
        };
        let mut rounds = 0;
        let mut model_calls = 0;

        while state.tokens.len() > self.max_chunk_size {
            if rounds == self.max_rounds {
                return Err(DigestError::ReductionDidNotConverge {
                    rounds,
                    tokens: state.tokens.len(),
                });
            }

            let chunks = chunk_tokens(&state.tokens, tokenizer, self.max_chunk_size);
            debug!(
                "Round {}: {} tokens in {} chunks",
                rounds + 1,
                state.tokens.len(),
                chunks.len()
            );

            let mut summaries = Vec::with_capacity(chunks.len());
            for chunk in chunks.iter().filter(|c| !c.is_empty()) {
                summaries.push(self.summarizer.summarize(&chunk.text, options).await?);
                model_calls += 1;
            }

            let text = normalize(&summaries.join(" "));
            state = SummaryState {
                tokens: tokenizer.tokenize(&text),
                text,
            };
            rounds += 1;

            debug!("Round {} produced {} tokens", rounds, state.tokens.len());
        }

        Ok(ReductionOutcome {
            summary: state.text,
            rounds,
            model_calls,
        })
    }
}
