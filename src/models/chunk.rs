use serde::Serialize;

use super::metadata::ChunkMetadata;

/// A single embeddable unit: one bounded slice of a source document,
/// enriched with provenance metadata. Created during traversal, consumed
/// exactly once when embedded and upserted.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkRecord {
    pub id: String,
    pub text: String,
    pub metadata: ChunkMetadata,
}

impl ChunkRecord {
    /// Deterministic chunk id: `<basename>-chunk-<index>`.
    ///
    /// Unique within a file only. Files sharing a basename in different
    /// directories collide; the format is kept for compatibility with
    /// records persisted by earlier runs, so corpora must keep basenames
    /// unique.
    pub fn make_id(filename: &str, index: usize) -> String {
        format!("{filename}-chunk-{index}")
    }

    pub fn new(filename: &str, index: usize, text: String, metadata: ChunkMetadata) -> Self {
        Self {
            id: Self::make_id(filename, index),
            text,
            metadata,
        }
    }
}

/// Wire record for a vector upsert: identifier, embedding, and the cleaned
/// metadata map.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UpsertRecord {
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: ChunkMetadata,
}
