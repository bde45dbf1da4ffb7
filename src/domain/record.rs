use serde::Serialize;

use super::DocumentChunk;

/// The persisted form of a chunk, shaped to the search index schema. Owned by
/// the index once uploaded; never mutated, replaced only by re-indexing.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IndexedRecord {
    pub id: String,
    pub content: String,
    pub document_name: String,
    pub document_url: String,
    pub page_number: u32,
    pub paragraph_number: u32,
    pub chunk_number: u32,
}

impl IndexedRecord {
    pub fn from_chunk(chunk: &DocumentChunk, document_url: Option<&str>) -> Self {
        Self {
            id: chunk.id.clone(),
            content: chunk.text.clone(),
            document_name: chunk.document_name.clone(),
            document_url: document_url.unwrap_or_default().to_string(),
            page_number: chunk.page_number,
            paragraph_number: chunk.sequence_index as u32 + 1,
            chunk_number: chunk.sequence_index as u32,
        }
    }
}
