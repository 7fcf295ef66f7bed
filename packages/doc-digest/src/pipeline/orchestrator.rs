//! The Pipeline - main entry point for digesting documents.
//!
//! Per document: normalize the text, reduce it to a summary, recognize and
//! canonicalize entities, tag countries and UN bodies, then persist.
//! Batches are processed one document at a time and a failing document
//! never aborts the rest.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::entities::{canonicalize, TagExtractor};
use crate::error::{DigestError, Result};
use crate::pipeline::recognize::recognize_mentions;
use crate::pipeline::reduce::Reducer;
use crate::registry::ModelRegistry;
use crate::stores::RecordCache;
use crate::text::normalize;
use crate::traits::{
    model::{Recognizer, Summarizer},
    store::{DocumentSource, DocumentStore},
};
use crate::types::{
    config::PipelineConfig,
    document::{Document, DocumentResult, NamedEntities, Record, SourceDocument},
};

/// What happened to one document of a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentOutcome {
    /// Enriched (as far as its text allowed) and persisted
    Processed {
        record_id: String,
        result: DocumentResult,
    },

    /// Retrieval, a model call or storage failed
    Failed { record_id: String, error: String },
}

impl DocumentOutcome {
    pub fn record_id(&self) -> &str {
        match self {
            Self::Processed { record_id, .. } | Self::Failed { record_id, .. } => record_id,
        }
    }
}

/// Result of a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// One entry per document attempted; retrieval failures come first
    pub outcomes: Vec<DocumentOutcome>,

    /// Record ids already stored (or repeated in the request)
    pub skipped: Vec<String>,

    /// Documents served from the record cache instead of retrieved
    pub cache_hits: usize,

    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Default for BatchReport {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchReport {
    /// Create a new empty report.
    pub fn new() -> Self {
        Self {
            outcomes: Vec::new(),
            skipped: Vec::new(),
            cache_hits: 0,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Results of successfully processed documents.
    pub fn results(&self) -> impl Iterator<Item = &DocumentResult> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            DocumentOutcome::Processed { result, .. } => Some(result),
            DocumentOutcome::Failed { .. } => None,
        })
    }

    /// Record ids that failed, with the error message.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            DocumentOutcome::Failed { record_id, error } => Some((record_id.as_str(), error.as_str())),
            DocumentOutcome::Processed { .. } => None,
        })
    }

    pub fn processed_count(&self) -> usize {
        self.results().count()
    }

    pub fn failed_count(&self) -> usize {
        self.failures().count()
    }

    /// Check if every attempted document was processed.
    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }

    /// True when there was nothing new to process.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    fn push_failure(&mut self, record_id: impl Into<String>, error: &DigestError) {
        self.outcomes.push(DocumentOutcome::Failed {
            record_id: record_id.into(),
            error: error.to_string(),
        });
    }

    fn finish(mut self) -> Self {
        self.finished_at = Some(Utc::now());
        self
    }
}

/// Summarizes and annotates documents, then hands them to a store.
///
/// # Example
///
/// ```rust,ignore
/// let config = PipelineConfig::from_env()?;
/// let pipeline = Pipeline::from_registry(&registry, store, config)?;
/// pipeline.check_connection().await?;
///
/// let records = vec![Record::from_url("https://digitallibrary.un.org/record/3999380")?];
/// let report = pipeline.run_records(&records, &source).await;
/// ```
pub struct Pipeline<S: DocumentStore> {
    summarizer: Arc<dyn Summarizer>,
    recognizer: Arc<dyn Recognizer>,
    store: S,
    config: PipelineConfig,
    cache: RecordCache,
    countries: TagExtractor,
    un_bodies: TagExtractor,
}

impl<S: DocumentStore> Pipeline<S> {
    /// Create a pipeline with default configuration.
    pub fn new(summarizer: Arc<dyn Summarizer>, recognizer: Arc<dyn Recognizer>, store: S) -> Self {
        Self::with_config(summarizer, recognizer, store, PipelineConfig::default())
    }

    /// Create with custom configuration.
    pub fn with_config(
        summarizer: Arc<dyn Summarizer>,
        recognizer: Arc<dyn Recognizer>,
        store: S,
        config: PipelineConfig,
    ) -> Self {
        Self {
            summarizer,
            recognizer,
            store,
            cache: RecordCache::new(config.cache_capacity),
            config,
            countries: TagExtractor::countries().clone(),
            un_bodies: TagExtractor::un_bodies().clone(),
        }
    }

    /// Create with the models named in `config`.
    pub fn from_registry(registry: &ModelRegistry, store: S, config: PipelineConfig) -> Result<Self> {
        let summarizer = registry.summarizer(&config.summarizer)?;
        let recognizer = registry.recognizer(&config.recognizer)?;

        info!(
            "Pipeline ready: summarizer {} (chunk budget {}), recognizer {}",
            config.summarizer,
            config
                .max_chunk_size
                .unwrap_or_else(|| summarizer.tokenizer().max_chunk_size()),
            config.recognizer
        );

        Ok(Self::with_config(summarizer, recognizer, store, config))
    }

    /// Replace the country and UN body vocabularies.
    pub fn with_tag_extractors(mut self, countries: TagExtractor, un_bodies: TagExtractor) -> Self {
        self.countries = countries;
        self.un_bodies = un_bodies;
        self
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Get a reference to the store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get a reference to the record cache.
    pub fn cache(&self) -> &RecordCache {
        &self.cache
    }

    /// Drop every cached document.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Verify the store is reachable. Meant to run once at start-up.
    pub async fn check_connection(&self) -> Result<()> {
        self.store.check_connection().await
    }

    /// Summarize text of any length.
    pub async fn summarize_text(&self, text: &str) -> Result<String> {
        let text = normalize(text);

        let mut reducer = Reducer::new(self.summarizer.as_ref())
            .with_max_rounds(self.config.max_reduction_rounds);
        if let Some(size) = self.config.max_chunk_size {
            reducer = reducer.with_max_chunk_size(size);
        }

        reducer.reduce(&text, &self.config.summary).await
    }

    /// Recognize, canonicalize and tag entities in text.
    pub async fn extract_entities(&self, text: &str) -> Result<NamedEntities> {
        let mentions = recognize_mentions(self.recognizer.as_ref(), text).await?;
        let list = canonicalize(&mentions);

        debug!(
            "Recognized {} mentions, {} canonical entities",
            mentions.len(),
            list.len()
        );

        Ok(NamedEntities {
            list: Some(list),
            detailed: Some(mentions),
            countries: Some(self.countries.extract(text)),
            un_bodies: Some(self.un_bodies.extract(text)),
        })
    }

    /// Run the enabled stages over a retrieved document.
    ///
    /// The summary is computed from normalized text; recognition and tagging
    /// see the text as retrieved, so mention offsets index into it. A
    /// document without usable text is returned unenriched.
    pub async fn enrich(&self, source: SourceDocument) -> Result<Document> {
        let text = match source.usable_text() {
            Some(text) => text.to_string(),
            None => {
                warn!(
                    "No text for record {}, skipping enrichment",
                    source.document.record_id
                );
                return Ok(source.document);
            }
        };

        let mut document = source.document;

        if self.config.summarize {
            let summary = self.summarize_text(&text).await?;
            document = document.with_summary(summary);
        }

        if self.config.recognize {
            let entities = self.extract_entities(&text).await?;
            document = document.with_named_entities(entities);
        }

        Ok(document)
    }

    /// Enrich a document and persist it.
    pub async fn process(&self, source: SourceDocument) -> Result<Document> {
        let document = self.enrich(source).await?;
        self.store.persist(&document).await?;
        Ok(document)
    }

    /// Process already retrieved documents.
    pub async fn run_documents(&self, batch: Vec<SourceDocument>) -> BatchReport {
        let mut report = BatchReport::new();
        self.process_batch(batch, &mut report).await;
        report.finish()
    }

    /// Retrieve and process records that are not stored yet.
    ///
    /// Stored records are skipped, cached ones reused, the rest fetched from
    /// `source` and cached. Failures are reported per record.
    pub async fn run_records<D>(&self, records: &[Record], source: &D) -> BatchReport
    where
        D: DocumentSource + ?Sized,
    {
        let mut report = BatchReport::new();
        let mut seen = HashSet::new();
        let mut batch = Vec::new();

        for record in records {
            let record_id = &record.record_id;

            if !seen.insert(record_id.as_str()) {
                report.skipped.push(record_id.clone());
                continue;
            }

            match self.store.exists(record_id).await {
                Ok(true) => {
                    debug!("Record {} already stored, skipping", record_id);
                    report.skipped.push(record_id.clone());
                    continue;
                }
                Ok(false) => {}
                Err(e) => {
                    warn!("Failed to look up record {}: {}", record_id, e);
                    report.push_failure(record_id.as_str(), &e);
                    continue;
                }
            }

            if let Some(cached) = self.cache.get(record_id) {
                report.cache_hits += 1;
                batch.push(cached);
                continue;
            }

            match source.fetch(record).await {
                Ok(fetched) => {
                    self.cache.insert(fetched.clone());
                    batch.push(fetched);
                }
                Err(e) => {
                    warn!("Failed to retrieve record {}: {}", record_id, e);
                    report.push_failure(record_id.as_str(), &e);
                }
            }
        }

        if batch.is_empty() && report.is_empty() {
            info!("No new documents found ({} skipped)", report.skipped.len());
            return report.finish();
        }

        info!(
            "Processing {} documents ({} cached, {} skipped)",
            batch.len(),
            report.cache_hits,
            report.skipped.len()
        );

        self.process_batch(batch, &mut report).await;
        report.finish()
    }

    async fn process_batch(&self, batch: Vec<SourceDocument>, report: &mut BatchReport) {
        for source in batch {
            let record_id = source.document.record_id.clone();

            match self.process(source).await {
                Ok(document) => {
                    report.outcomes.push(DocumentOutcome::Processed {
                        record_id,
                        result: DocumentResult::from(&document),
                    });
                }
                Err(e) => {
                    warn!("Failed to process record {}: {}", record_id, e);
                    report.push_failure(record_id, &e);
                }
            }
        }

        info!(
            "Batch complete: {} processed, {} failed, {} skipped",
            report.processed_count(),
            report.failed_count(),
            report.skipped.len()
        );
    }
}
