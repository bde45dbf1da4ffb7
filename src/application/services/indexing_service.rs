use std::sync::Arc;

use super::Chunker;
use crate::application::ports::{IndexSchema, SearchIndex, SearchIndexError};
use crate::domain::{DocumentChunk, IndexedRecord};

/// Search services cap batch sizes; 100 stays well under every tier's limit.
const UPLOAD_BATCH_SIZE: usize = 100;

/// Rough page estimate for documents without page markers.
const CHARS_PER_PAGE: usize = 3000;

#[derive(Debug, Clone, Copy, Default)]
pub struct IndexingReport {
    pub chunks: usize,
    pub uploaded: usize,
    pub failed: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum IndexingError {
    #[error("index creation failed: {0}")]
    IndexCreation(SearchIndexError),
    #[error("batch upload failed: {0}")]
    Upload(SearchIndexError),
}

/// Offline pipeline that populates the search index: ensures the schema,
/// chunks extracted text and uploads records in batches.
pub struct IndexingService<S: SearchIndex> {
    search_index: Arc<S>,
    chunker: Chunker,
    index_name: String,
}

impl<S: SearchIndex> IndexingService<S> {
    pub fn new(search_index: Arc<S>, chunker: Chunker, index_name: String) -> Self {
        Self {
            search_index,
            chunker,
            index_name,
        }
    }

    /// Creates or upgrades the index. Tries the semantic-ranking
    /// configuration first and falls back to the plain schema when the
    /// service rejects it; any other failure aborts the indexing run.
    pub async fn ensure_index(&self) -> Result<(), IndexingError> {
        let schema = IndexSchema::document_chunks(&self.index_name);

        match self.search_index.ensure_index(&schema).await {
            Ok(()) => {
                tracing::info!(index = %self.index_name, "Index created with semantic ranking");
                Ok(())
            }
            Err(SearchIndexError::SemanticConfigRejected(reason)) => {
                tracing::warn!(%reason, "Semantic configuration rejected, creating plain index");
                self.search_index
                    .ensure_index(&schema.without_semantic())
                    .await
                    .map_err(IndexingError::IndexCreation)
            }
            Err(error) => Err(IndexingError::IndexCreation(error)),
        }
    }

    /// Chunks one document and uploads its records. Per-record failures are
    /// logged and counted, but later batches still run.
    pub async fn index_document(
        &self,
        document_name: &str,
        text: &str,
        document_url: Option<&str>,
    ) -> Result<IndexingReport, IndexingError> {
        let total_pages = (text.chars().count().div_ceil(CHARS_PER_PAGE)).max(1) as u32;
        let slices = self.chunker.chunk(text, 1, total_pages);

        let records: Vec<IndexedRecord> = slices
            .into_iter()
            .enumerate()
            .map(|(i, slice)| {
                let chunk =
                    DocumentChunk::new(slice.text, document_name.to_string(), slice.page, i);
                IndexedRecord::from_chunk(&chunk, document_url)
            })
            .collect();

        let mut report = IndexingReport {
            chunks: records.len(),
            ..IndexingReport::default()
        };

        for batch in records.chunks(UPLOAD_BATCH_SIZE) {
            let outcomes = self
                .search_index
                .upload_batch(batch)
                .await
                .map_err(IndexingError::Upload)?;

            for outcome in outcomes {
                if outcome.succeeded {
                    report.uploaded += 1;
                } else {
                    report.failed += 1;
                    tracing::warn!(
                        key = %outcome.key,
                        error = outcome.error_message.as_deref().unwrap_or("unknown"),
                        "Record rejected by the index"
                    );
                }
            }
        }

        tracing::info!(
            document = %document_name,
            chunks = report.chunks,
            uploaded = report.uploaded,
            failed = report.failed,
            "Document indexed"
        );

        Ok(report)
    }
}
