//! Configuration types for summarization and the pipeline.

use serde::{Deserialize, Serialize};
use std::env;

use crate::error::{DigestError, Result};
use crate::pipeline::reduce::DEFAULT_MAX_ROUNDS;

/// Default summarization model identifier.
pub const DEFAULT_SUMMARIZER: &str = "DistilBART-xsum";

/// Default recognition model identifier.
pub const DEFAULT_RECOGNIZER: &str = "spaCyNER";

/// Generation parameters passed to every summarization call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryOptions {
    /// Minimum summary length in tokens. Default: 30.
    pub min_length: usize,

    /// Maximum summary length in tokens. Default: 180.
    pub max_length: usize,

    /// Sample instead of greedy/beam decoding. Default: false.
    pub do_sample: bool,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            min_length: 30,
            max_length: 180,
            do_sample: false,
        }
    }
}

impl SummaryOptions {
    /// Create options with default lengths.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the length bounds.
    pub fn with_lengths(mut self, min_length: usize, max_length: usize) -> Self {
        self.min_length = min_length;
        self.max_length = max_length;
        self
    }

    /// Enable or disable sampling.
    pub fn with_sampling(mut self, do_sample: bool) -> Self {
        self.do_sample = do_sample;
        self
    }
}

/// Configuration for the document pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Run the summarization stage.
    pub summarize: bool,

    /// Run the entity recognition stage.
    pub recognize: bool,

    /// Registry name of the summarization model.
    pub summarizer: String,

    /// Registry name of the recognition model.
    pub recognizer: String,

    /// Generation parameters.
    #[serde(default)]
    pub summary: SummaryOptions,

    /// Override for the chunk budget. `None` derives it from the tokenizer.
    pub max_chunk_size: Option<usize>,

    /// Hard cap on reduction rounds before giving up. Default: 16.
    pub max_reduction_rounds: usize,

    /// Number of retrieved documents the record cache keeps. Default: 512.
    pub cache_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            summarize: true,
            recognize: true,
            summarizer: DEFAULT_SUMMARIZER.to_string(),
            recognizer: DEFAULT_RECOGNIZER.to_string(),
            summary: SummaryOptions::default(),
            max_chunk_size: None,
            max_reduction_rounds: DEFAULT_MAX_ROUNDS,
            cache_capacity: 512,
        }
    }
}

impl PipelineConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from `DIGEST_*` environment variables.
    ///
    /// A `.env` file is read first when present. Unset variables keep their
    /// defaults.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let defaults = Self::default();

        Ok(Self {
            summarize: env_parse("DIGEST_SUMMARIZE")?.unwrap_or(defaults.summarize),
            recognize: env_parse("DIGEST_RECOGNIZE")?.unwrap_or(defaults.recognize),
            summarizer: env::var("DIGEST_SUMMARIZER").unwrap_or(defaults.summarizer),
            recognizer: env::var("DIGEST_RECOGNIZER").unwrap_or(defaults.recognizer),
            summary: SummaryOptions {
                min_length: env_parse("DIGEST_SUMMARY_MIN_LENGTH")?
                    .unwrap_or(defaults.summary.min_length),
                max_length: env_parse("DIGEST_SUMMARY_MAX_LENGTH")?
                    .unwrap_or(defaults.summary.max_length),
                do_sample: env_parse("DIGEST_DO_SAMPLE")?.unwrap_or(defaults.summary.do_sample),
            },
            max_chunk_size: env_parse("DIGEST_MAX_CHUNK_SIZE")?,
            max_reduction_rounds: env_parse("DIGEST_MAX_REDUCTION_ROUNDS")?
                .unwrap_or(defaults.max_reduction_rounds),
            cache_capacity: env_parse("DIGEST_CACHE_CAPACITY")?
                .unwrap_or(defaults.cache_capacity),
        })
    }

    /// Toggle the summarization stage.
    pub fn with_summarize(mut self, enabled: bool) -> Self {
        self.summarize = enabled;
        self
    }

    /// Toggle the entity recognition stage.
    pub fn with_recognize(mut self, enabled: bool) -> Self {
        self.recognize = enabled;
        self
    }

    /// Set the summarization model name.
    pub fn with_summarizer(mut self, name: impl Into<String>) -> Self {
        self.summarizer = name.into();
        self
    }

    /// Set the recognition model name.
    pub fn with_recognizer(mut self, name: impl Into<String>) -> Self {
        self.recognizer = name.into();
        self
    }

    /// Set generation parameters.
    pub fn with_summary_options(mut self, options: SummaryOptions) -> Self {
        self.summary = options;
        self
    }

    /// Force a chunk budget instead of deriving it from the tokenizer.
    pub fn with_max_chunk_size(mut self, size: usize) -> Self {
        self.max_chunk_size = Some(size);
        self
    }

    /// Set the reduction round cap.
    pub fn with_max_reduction_rounds(mut self, rounds: usize) -> Self {
        self.max_reduction_rounds = rounds;
        self
    }

    /// Set the record cache capacity.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| DigestError::Config(format!("{key} must be valid: {e}"))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_model_settings() {
        let config = PipelineConfig::default();

        assert!(config.summarize && config.recognize);
        assert_eq!(config.summarizer, "DistilBART-xsum");
        assert_eq!(config.recognizer, "spaCyNER");
        assert_eq!(config.summary.min_length, 30);
        assert_eq!(config.summary.max_length, 180);
        assert!(!config.summary.do_sample);
        assert_eq!(config.max_chunk_size, None);
        assert_eq!(config.max_reduction_rounds, DEFAULT_MAX_ROUNDS);
    }

    #[test]
    fn test_builders() {
        let config = PipelineConfig::new()
            .with_recognize(false)
            .with_summarizer("LongT5")
            .with_max_chunk_size(500)
            .with_summary_options(SummaryOptions::new().with_lengths(10, 60).with_sampling(true));

        assert!(!config.recognize);
        assert_eq!(config.summarizer, "LongT5");
        assert_eq!(config.max_chunk_size, Some(500));
        assert_eq!(config.summary.max_length, 60);
        assert!(config.summary.do_sample);
    }

    #[test]
    fn test_from_env_reads_overrides() {
        // Only variables unique to this test are touched.
        env::set_var("DIGEST_MAX_REDUCTION_ROUNDS", "4");
        let config = PipelineConfig::from_env().unwrap();
        env::remove_var("DIGEST_MAX_REDUCTION_ROUNDS");

        assert_eq!(config.max_reduction_rounds, 4);
    }

    #[test]
    fn test_env_parse_rejects_bad_values() {
        env::set_var("DIGEST_TEST_BAD_NUMBER", "many");
        let parsed: Result<Option<usize>> = env_parse("DIGEST_TEST_BAD_NUMBER");
        env::remove_var("DIGEST_TEST_BAD_NUMBER");

        assert!(matches!(parsed, Err(DigestError::Config(_))));
    }
}
