//! Document types - records, documents and per-document results.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::LazyLock;

use crate::entities::EntityList;
use crate::error::{DigestError, Result};
use crate::types::mention::Mention;

static RE_RECORD_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"record/([a-zA-Z0-9]+)").expect("valid record id regex"));

/// A record identifier, as handed out by the document library.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub record_id: String,
}

impl Record {
    /// Create a record from its id.
    pub fn new(record_id: impl Into<String>) -> Self {
        Self {
            record_id: record_id.into(),
        }
    }

    /// Extract the record id from a library URL such as
    /// `https://digitallibrary.un.org/record/3999380`.
    pub fn from_url(raw: &str) -> Result<Self> {
        let invalid = || DigestError::InvalidUrl {
            url: raw.to_string(),
        };

        let parsed = url::Url::parse(raw).map_err(|_| invalid())?;
        if parsed.host_str().is_none() {
            return Err(invalid());
        }

        RE_RECORD_ID
            .captures(parsed.path())
            .and_then(|caps| caps.get(1))
            .map(|id| Self::new(id.as_str()))
            .ok_or_else(invalid)
    }
}

/// Entity-derived enrichment of a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedEntities {
    /// Canonical entity keys ranked by frequency
    pub list: Option<EntityList>,

    /// Raw mentions, cleaned
    pub detailed: Option<Vec<Mention>>,

    /// Country names found in the text
    pub countries: Option<Vec<String>>,

    /// UN bodies and agencies found in the text
    #[serde(rename = "unBodies")]
    pub un_bodies: Option<Vec<String>>,
}

/// A document flowing through the pipeline.
///
/// Each stage takes the document by value and returns the enriched copy:
/// the summary stage owns `summary`, the entity stage owns `named_entities`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub record_id: String,
    pub title: String,
    pub url: String,
    pub summary: Option<String>,
    pub named_entities: Option<NamedEntities>,
}

impl Document {
    /// Create a new document without enrichment.
    pub fn new(
        record_id: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            record_id: record_id.into(),
            title: title.into(),
            url: url.into(),
            summary: None,
            named_entities: None,
        }
    }

    /// Attach the summary stage output.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Attach the entity stage output.
    pub fn with_named_entities(mut self, entities: NamedEntities) -> Self {
        self.named_entities = Some(entities);
        self
    }

    /// Parameters handed to the storage layer.
    pub fn to_params(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.record_id,
            "title": self.title,
            "summary": self.summary,
            "url": self.url,
        })
    }
}

/// A retrieved document together with its extracted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDocument {
    pub document: Document,

    /// Extracted plain text; `None` when extraction failed or found nothing
    pub text: Option<String>,

    /// SHA-256 of the extracted text
    pub content_hash: Option<String>,

    /// When the document was retrieved
    pub fetched_at: DateTime<Utc>,
}

impl SourceDocument {
    /// Create a source document.
    pub fn new(document: Document, text: Option<String>) -> Self {
        let content_hash = text.as_deref().map(Self::hash_content);
        Self {
            document,
            text,
            content_hash,
            fetched_at: Utc::now(),
        }
    }

    /// Calculate SHA-256 hash of content.
    pub fn hash_content(content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Text usable for enrichment, if any.
    pub fn usable_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }
}

/// JSON-shaped result produced per document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentResult {
    pub url: String,
    pub summary: Option<String>,
    pub named_entities: NamedEntities,
}

impl From<&Document> for DocumentResult {
    fn from(doc: &Document) -> Self {
        Self {
            url: doc.url.clone(),
            summary: doc.summary.clone(),
            named_entities: doc.named_entities.clone().unwrap_or_default(),
        }
    }
}
