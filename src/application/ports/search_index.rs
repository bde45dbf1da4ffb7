use async_trait::async_trait;
use serde_json::{Map, Value};

use super::IndexSchema;
use crate::domain::IndexedRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Simple,
    Full,
    Semantic,
}

impl QueryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Full => "full",
            Self::Semantic => "semantic",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Field names to return; empty means all fields.
    pub select: Vec<String>,
    pub top: usize,
    pub query_kind: QueryKind,
    pub semantic_configuration: Option<String>,
    pub query_language: Option<String>,
}

impl SearchOptions {
    /// The fallback query shape: no field selection, no semantic ranking.
    pub fn minimal(top: usize) -> Self {
        Self {
            select: Vec::new(),
            top,
            query_kind: QueryKind::Simple,
            semantic_configuration: None,
            query_language: None,
        }
    }
}

/// One ranked document from the index, kept as raw fields because the
/// underlying schema is not under this system's control.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub fields: Map<String, Value>,
    pub score: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub key: String,
    pub succeeded: bool,
    pub error_message: Option<String>,
}

/// The managed search index: schema management, batched record upload and
/// ranked full-text/semantic queries.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    async fn ensure_index(&self, schema: &IndexSchema) -> Result<(), SearchIndexError>;

    /// Uploads one batch of records. Per-record failures are reported in the
    /// outcome list, not as an error.
    async fn upload_batch(
        &self,
        records: &[IndexedRecord],
    ) -> Result<Vec<UploadOutcome>, SearchIndexError>;

    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<SearchHit>, SearchIndexError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SearchIndexError {
    #[error("index creation failed: {0}")]
    IndexCreationFailed(String),
    #[error("semantic configuration rejected: {0}")]
    SemanticConfigRejected(String),
    #[error("upload failed: {0}")]
    UploadFailed(String),
    #[error("search failed: {0}")]
    SearchFailed(String),
    #[error("rate limited")]
    RateLimited,
}
