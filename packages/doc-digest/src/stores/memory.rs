//! In-memory storage implementation for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::error::Result;
use crate::traits::store::DocumentStore;
use crate::types::document::Document;

/// In-memory storage for processed documents.
///
/// Useful for testing and development. Not suitable for production
/// as data is lost on restart.
pub struct MemoryStore {
    documents: RwLock<HashMap<String, Document>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
        }
    }

    /// Get a stored document.
    pub fn get(&self, record_id: &str) -> Option<Document> {
        self.documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(record_id)
            .cloned()
    }

    /// Get the number of stored documents.
    pub fn document_count(&self) -> usize {
        self.documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Clear all stored data.
    pub fn clear(&self) {
        self.documents
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn check_connection(&self) -> Result<()> {
        Ok(())
    }

    async fn exists(&self, record_id: &str) -> Result<bool> {
        Ok(self
            .documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(record_id))
    }

    async fn persist(&self, document: &Document) -> Result<()> {
        self.documents
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(document.record_id.clone(), document.clone());
        Ok(())
    }
}
