//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the digest library
//! without loading real models or touching the network.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{DigestError, Result};
use crate::text::is_end_of_sentence;
use crate::traits::{
    model::{Recognizer, Summarizer, Tokenizer},
    store::DocumentSource,
};
use crate::types::{
    config::SummaryOptions,
    document::{Record, SourceDocument},
    mention::Mention,
};

/// Tokenizer splitting on whitespace, with sentence punctuation as separate
/// tokens. `decode` joins tokens with single spaces.
#[derive(Debug, Clone)]
pub struct WhitespaceTokenizer {
    model_max_length: usize,
}

impl WhitespaceTokenizer {
    /// Create a tokenizer for a model with the given window.
    pub fn new(model_max_length: usize) -> Self {
        Self { model_max_length }
    }
}

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        for word in text.split_whitespace() {
            let stem = word.trim_end_matches(['.', '!', '?']);
            if !stem.is_empty() {
                tokens.push(stem.to_string());
            }
            tokens.extend(word[stem.len()..].chars().map(|c| c.to_string()));
        }
        tokens
    }

    fn decode(&self, tokens: &[String]) -> String {
        tokens.join(" ")
    }

    fn model_max_length(&self) -> usize {
        self.model_max_length
    }
}

/// How the mock answers summarization calls.
#[derive(Debug, Clone)]
pub enum SummaryBehavior {
    /// Keep the first half of the words and close with a period.
    Halve,
    /// Return the input unchanged (never shrinks).
    Echo,
    /// Always return the same text.
    Fixed(String),
}

/// Record of a call made to the mock model.
#[derive(Debug, Clone, PartialEq)]
pub enum MockModelCall {
    Summarize { input: String, options: SummaryOptions },
    Recognize { input: String },
}

/// A mock model implementing both [`Summarizer`] and [`Recognizer`].
///
/// Returns deterministic, configurable responses and records every call.
pub struct MockModel {
    tokenizer: WhitespaceTokenizer,

    behavior: SummaryBehavior,

    /// Predefined mentions returned by every recognize call
    mentions: Option<Vec<Mention>>,

    /// Feed recognition chunk by chunk through the tokenizer
    chunked_recognition: bool,

    /// Inputs containing any of these fail
    failures: Vec<String>,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<MockModelCall>>>,
}

impl Default for MockModel {
    fn default() -> Self {
        Self::new()
    }
}

impl MockModel {
    /// Create a mock with a 512-token window that halves its input.
    pub fn new() -> Self {
        Self {
            tokenizer: WhitespaceTokenizer::new(512),
            behavior: SummaryBehavior::Halve,
            mentions: None,
            chunked_recognition: false,
            failures: Vec::new(),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Set the model window (the chunk budget is this minus the margin).
    pub fn with_model_max_length(mut self, max: usize) -> Self {
        self.tokenizer = WhitespaceTokenizer::new(max);
        self
    }

    /// Set the summarization behavior.
    pub fn with_behavior(mut self, behavior: SummaryBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Return these mentions from every recognize call.
    pub fn with_mentions(mut self, mentions: Vec<Mention>) -> Self {
        self.mentions = Some(mentions);
        self
    }

    /// Expose the tokenizer to the recognizer so input is chunked.
    pub fn with_chunked_recognition(mut self) -> Self {
        self.chunked_recognition = true;
        self
    }

    /// Fail any call whose input contains `needle`.
    pub fn failing_on(mut self, needle: impl Into<String>) -> Self {
        self.failures.push(needle.into());
        self
    }

    /// Get all calls made to this mock.
    pub fn calls(&self) -> Vec<MockModelCall> {
        self.calls.read().unwrap().clone()
    }

    /// Number of summarize calls so far.
    pub fn summarize_calls(&self) -> usize {
        self.calls
            .read()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, MockModelCall::Summarize { .. }))
            .count()
    }

    /// Number of recognize calls so far.
    pub fn recognize_calls(&self) -> usize {
        self.calls
            .read()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, MockModelCall::Recognize { .. }))
            .count()
    }

    /// Clear call history.
    pub fn clear_calls(&self) {
        self.calls.write().unwrap().clear();
    }

    fn check_failure(&self, input: &str) -> Result<()> {
        match self.failures.iter().find(|needle| input.contains(needle.as_str())) {
            Some(needle) => Err(DigestError::model(format!("mock failure on '{needle}'"))),
            None => Ok(()),
        }
    }

    fn halve(&self, text: &str) -> String {
        let words: Vec<String> = self
            .tokenizer
            .tokenize(text)
            .into_iter()
            .filter(|t| !is_end_of_sentence(t))
            .collect();
        let keep = (words.len() / 2).max(1).min(words.len());
        format!("{} .", self.tokenizer.decode(&words[..keep]))
    }

    /// Runs of capitalized words become one mention each.
    fn capitalized_runs(text: &str) -> Vec<Mention> {
        let mut mentions = Vec::new();
        let mut run: Option<(usize, usize)> = None;

        let mut offset = 0;
        for word in text.split_inclusive(char::is_whitespace) {
            let trimmed = word.trim_end();
            let bare = trimmed.trim_end_matches(['.', ',', '!', '?', ';', ':']);
            let capitalized = bare.chars().next().is_some_and(char::is_uppercase);
            let closes = bare.len() != trimmed.len();

            if capitalized {
                let end = offset + bare.len();
                run = Some(match run {
                    Some((start, _)) => (start, end),
                    None => (offset, end),
                });
            } else if let Some((start, end)) = run.take() {
                mentions.push(Self::mention_at(text, start, end));
            }

            if closes {
                if let Some((start, end)) = run.take() {
                    mentions.push(Self::mention_at(text, start, end));
                }
            }
            offset += word.len();
        }

        if let Some((start, end)) = run {
            mentions.push(Self::mention_at(text, start, end));
        }
        mentions
    }

    fn mention_at(text: &str, start: usize, end: usize) -> Mention {
        Mention::new(&text[start..end], start, end)
            .with_label("MISC")
            .with_score(0.9)
    }
}

#[async_trait]
impl Summarizer for MockModel {
    async fn summarize(&self, text: &str, options: &SummaryOptions) -> Result<String> {
        self.calls.write().unwrap().push(MockModelCall::Summarize {
            input: text.to_string(),
            options: options.clone(),
        });
        self.check_failure(text)?;

        Ok(match &self.behavior {
            SummaryBehavior::Halve => self.halve(text),
            SummaryBehavior::Echo => text.to_string(),
            SummaryBehavior::Fixed(summary) => summary.clone(),
        })
    }

    fn tokenizer(&self) -> &dyn Tokenizer {
        &self.tokenizer
    }
}

#[async_trait]
impl Recognizer for MockModel {
    async fn recognize(&self, text: &str) -> Result<Vec<Mention>> {
        self.calls.write().unwrap().push(MockModelCall::Recognize {
            input: text.to_string(),
        });
        self.check_failure(text)?;

        Ok(self
            .mentions
            .clone()
            .unwrap_or_else(|| Self::capitalized_runs(text)))
    }

    fn tokenizer(&self) -> Option<&dyn Tokenizer> {
        if self.chunked_recognition {
            Some(&self.tokenizer)
        } else {
            None
        }
    }
}

/// A mock document source backed by a map of record id to document.
#[derive(Default)]
pub struct MockSource {
    documents: RwLock<HashMap<String, SourceDocument>>,
    fetches: RwLock<Vec<String>>,
}

impl MockSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document served for its record id.
    pub fn with_document(self, source: SourceDocument) -> Self {
        self.documents
            .write()
            .unwrap()
            .insert(source.document.record_id.clone(), source);
        self
    }

    /// Record ids fetched so far, in order.
    pub fn fetches(&self) -> Vec<String> {
        self.fetches.read().unwrap().clone()
    }
}

#[async_trait]
impl DocumentSource for MockSource {
    async fn fetch(&self, record: &Record) -> Result<SourceDocument> {
        self.fetches.write().unwrap().push(record.record_id.clone());

        self.documents
            .read()
            .unwrap()
            .get(&record.record_id)
            .cloned()
            .ok_or_else(|| {
                DigestError::retrieval(format!("record {} not found", record.record_id))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_tokenizer_splits_punctuation() {
        let tokenizer = WhitespaceTokenizer::new(100);

        assert_eq!(
            tokenizer.tokenize("Hello world. Really?! ..."),
            vec!["Hello", "world", ".", "Really", "?", "!", ".", ".", "."]
        );
        assert_eq!(tokenizer.max_chunk_size(), 90);
    }

    #[test]
    fn test_capitalized_runs() {
        let mentions = MockModel::capitalized_runs("The World Food Programme and WFP met in Chad.");
        let words: Vec<_> = mentions.iter().map(|m| m.word.as_str()).collect();

        assert_eq!(words, vec!["The World Food Programme", "WFP", "Chad"]);
        assert_eq!(mentions[2].start, 40);
        assert_eq!(mentions[2].end, 44);
    }

    #[tokio::test]
    async fn test_halving_summary_shrinks() {
        let model = MockModel::new();
        let summary = model
            .summarize("one two three four five six.", &SummaryOptions::default())
            .await
            .unwrap();

        assert_eq!(summary, "one two three .");
        assert_eq!(model.summarize_calls(), 1);
    }

    #[tokio::test]
    async fn test_failing_on() {
        let model = MockModel::new().failing_on("boom");

        let err = model.recognize("it went boom").await.unwrap_err();
        assert!(matches!(err, DigestError::ModelInvocation(_)));
        assert_eq!(model.recognize_calls(), 1);
    }
}
