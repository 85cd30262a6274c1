//! Provenance metadata attached to every persisted chunk.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// Flat metadata record persisted alongside each vector.
///
/// `language` and `last_updated` are always present. Every other field is
/// optional and carries `skip_serializing_if`, so serializing the record is
/// the stripping step: a field without a value is omitted entirely, never
/// written as null.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ChunkMetadata {
    pub language: String,
    pub last_updated: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clause_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ministry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beneficiary_type: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benefit_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,

    /// Chunk body, persisted with the vector for retrieval-time display.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ChunkMetadata {
    /// Base fields shared by every category: English content, stamped with
    /// the resolution-time UTC timestamp (ISO-8601, trailing `Z`).
    pub fn base() -> Self {
        Self {
            language: "en".to_string(),
            last_updated: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            ..Default::default()
        }
    }
}
