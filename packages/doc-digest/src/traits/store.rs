//! Storage and retrieval boundaries.
//!
//! Persistence (a graph database in production) and retrieval (download
//! plus text extraction) live outside this crate. The pipeline talks to them
//! through these traits only.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::document::{Document, Record, SourceDocument};

/// Destination for processed documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Verify the backend is reachable.
    async fn check_connection(&self) -> Result<()>;

    /// Whether a document for this record id is already stored.
    async fn exists(&self, record_id: &str) -> Result<bool>;

    /// Persist a document, enriched or not.
    async fn persist(&self, document: &Document) -> Result<()>;
}

/// Source of documents and their extracted text.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetch the document for a record, with its text extracted.
    async fn fetch(&self, record: &Record) -> Result<SourceDocument>;
}
