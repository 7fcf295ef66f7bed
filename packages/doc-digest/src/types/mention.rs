//! Named-entity mentions as reported by a recognizer.

use serde::{Deserialize, Serialize};

/// One raw named-entity detection.
///
/// Offsets are character offsets into the text the recognizer was given.
/// When recognition runs chunk by chunk they are relative to the chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mention {
    /// Surface text of the mention
    #[serde(alias = "text")]
    pub word: String,

    /// Entity class (PER, ORG, LOC, ...) when the model reports one
    #[serde(default, alias = "label", skip_serializing_if = "Option::is_none")]
    pub entity_group: Option<String>,

    /// Confidence in `[0, 1]`; some recognizers report none
    #[serde(default)]
    pub score: Option<f64>,

    /// Start offset (inclusive)
    #[serde(alias = "start_char")]
    pub start: usize,

    /// End offset (exclusive)
    #[serde(alias = "end_char")]
    pub end: usize,
}

impl Mention {
    /// Create a mention without label or score.
    pub fn new(word: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            word: word.into(),
            entity_group: None,
            score: None,
            start,
            end,
        }
    }

    /// Set the entity class.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.entity_group = Some(label.into());
        self
    }

    /// Set the confidence score.
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    /// Trim the surface text and round the score to three decimals.
    pub fn cleaned(mut self) -> Self {
        let trimmed = self.word.trim();
        if trimmed.len() != self.word.len() {
            self.word = trimmed.to_string();
        }
        self.score = self.score.map(round_score);
        self
    }
}

// Rounds the exact binary value, so 0.0045 (stored just below) becomes 0.004
fn round_score(score: f64) -> f64 {
    format!("{score:.3}").parse().unwrap_or(score)
}
