//! Bounded cache of retrieved documents, keyed by record id.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::sync::{PoisonError, RwLock};

use crate::types::document::SourceDocument;

#[derive(Debug, Clone)]
struct CacheEntry {
    source: SourceDocument,
    inserted_at: DateTime<Utc>,
}

/// Retrieved documents kept between batches so repeated record ids are not
/// downloaded again.
///
/// Bounded; the oldest entry is evicted first.
#[derive(Debug)]
pub struct RecordCache {
    capacity: usize,
    entries: RwLock<IndexMap<String, CacheEntry>>,
}

impl RecordCache {
    /// Create a cache holding at most `capacity` documents.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: RwLock::new(IndexMap::with_capacity(capacity.min(1024))),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Cached document for a record id.
    pub fn get(&self, record_id: &str) -> Option<SourceDocument> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(record_id)
            .map(|entry| entry.source.clone())
    }

    /// When the document for a record id was cached.
    pub fn inserted_at(&self, record_id: &str) -> Option<DateTime<Utc>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(record_id)
            .map(|entry| entry.inserted_at)
    }

    /// Cache a document under its record id.
    pub fn insert(&self, source: SourceDocument) {
        if self.capacity == 0 {
            return;
        }

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let key = source.document.record_id.clone();

        if !entries.contains_key(&key) && entries.len() >= self.capacity {
            entries.shift_remove_index(0);
        }
        entries.insert(
            key,
            CacheEntry {
                source,
                inserted_at: Utc::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached document.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
