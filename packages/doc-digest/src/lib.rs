//! Document Digest Library
//!
//! Summarizes documents of any length with fixed-window models and turns
//! raw named-entity detections into a ranked list of canonical entities.
//!
//! # Design Philosophy
//!
//! - Models are capabilities behind traits; the library drives them
//! - Long text is reduced recursively: summarize chunks, then the summaries
//! - One failing document never sinks a batch
//! - Storage and retrieval stay outside, behind traits
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use doc_digest::{MemoryStore, Pipeline, Record};
//! use doc_digest::testing::{MockModel, MockSource};
//!
//! let model = Arc::new(MockModel::new());
//! let pipeline = Pipeline::new(model.clone(), model, MemoryStore::new());
//!
//! let records = vec![Record::from_url("https://digitallibrary.un.org/record/3999380")?];
//! let report = pipeline.run_records(&records, &MockSource::new()).await;
//! ```
//!
//! # Modules
//!
//! - [`text`] - Normalization and sentence-aware token chunking
//! - [`traits`] - Core trait abstractions (Summarizer, Recognizer, DocumentStore)
//! - [`pipeline`] - Reduction, recognition and batch orchestration
//! - [`entities`] - Canonical entity ranking and vocabulary tags
//! - [`registry`] - Model factories by name
//! - [`stores`] - Storage implementations (MemoryStore, RecordCache)
//! - [`types`] - Documents, mentions and configuration
//! - [`testing`] - Mock implementations for testing

pub mod entities;
pub mod error;
pub mod pipeline;
pub mod registry;
pub mod stores;
pub mod testing;
pub mod text;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{DigestError, Result};
pub use traits::{
    model::{ModelPort, Recognizer, Summarizer, Tokenizer, CHUNK_SAFETY_MARGIN},
    store::{DocumentSource, DocumentStore},
};
pub use types::{
    config::{PipelineConfig, SummaryOptions, DEFAULT_RECOGNIZER, DEFAULT_SUMMARIZER},
    document::{Document, DocumentResult, NamedEntities, Record, SourceDocument},
    mention::Mention,
};

// Re-export pipeline components
pub use pipeline::{
    recognize_mentions, BatchReport, DocumentOutcome, Pipeline, ReductionOutcome, Reducer,
};

pub use entities::{canonicalize, initials, is_valid_entity, EntityList, TagExtractor};
pub use registry::{ModelRegistry, Registry};
pub use stores::{MemoryStore, RecordCache};
pub use text::{chunk_tokens, normalize, Chunk};
