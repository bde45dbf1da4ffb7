use std::sync::Arc;

use tokio::sync::RwLock;

use super::{estimate_tokens, FieldMapping, ResolvedFields};
use crate::application::ports::{QueryKind, SearchIndex, SearchOptions};
use crate::domain::RetrievedPassage;

/// Floor for the minimal fallback query; a failed primary search casts a
/// wider net, but a larger configured `top_k` still governs.
const FALLBACK_TOP_FLOOR: usize = 10;
const SIMPLIFIED_QUERY_WORDS: usize = 3;

/// Policy knobs that varied across deployments, collapsed into one
/// configuration object instead of forked code paths.
#[derive(Debug, Clone)]
pub struct RetrievalPolicy {
    pub top_k: usize,
    /// Hard character cap applied to a single passage before the token
    /// estimate, so one oversized chunk cannot consume the whole budget.
    pub per_passage_char_cap: usize,
    /// Maximum estimated tokens of assembled context (chars / 4).
    pub context_token_budget: usize,
    pub use_semantic: bool,
    pub semantic_configuration: String,
    pub query_language: String,
}

impl Default for RetrievalPolicy {
    fn default() -> Self {
        Self {
            top_k: 5,
            per_passage_char_cap: 2000,
            context_token_budget: 3000,
            use_semantic: false,
            semantic_configuration: "default".to_string(),
            query_language: "de-de".to_string(),
        }
    }
}

/// Context assembled for one chat turn; discarded after the reply.
#[derive(Debug, Clone, Default)]
pub struct RetrievedContext {
    pub context_text: String,
    pub passages: Vec<RetrievedPassage>,
    pub estimated_tokens: usize,
}

/// Queries the search index and assembles a token-budgeted context string.
/// Retrieval failures are absorbed: the worst case is an empty context, never
/// a failed chat turn.
pub struct RetrievalService<S: SearchIndex> {
    search_index: Arc<S>,
    policy: RetrievalPolicy,
    field_mapping: RwLock<FieldMapping>,
}

impl<S: SearchIndex> RetrievalService<S> {
    pub fn new(search_index: Arc<S>, policy: RetrievalPolicy) -> Self {
        Self {
            search_index,
            policy,
            field_mapping: RwLock::new(FieldMapping::default()),
        }
    }

    pub fn policy(&self) -> &RetrievalPolicy {
        &self.policy
    }

    pub async fn field_mapping(&self) -> FieldMapping {
        self.field_mapping.read().await.clone()
    }

    /// Runtime override for the canonical field names, replacing the old
    /// behavior of mutating process environment per request.
    pub async fn set_field_mapping(
        &self,
        content_field: String,
        title_field: Option<String>,
        page_field: Option<String>,
    ) -> FieldMapping {
        let mut mapping = self.field_mapping.write().await;
        mapping.override_fields(content_field, title_field, page_field);
        mapping.clone()
    }

    pub async fn resolve_fields(&self, field_names: &[String]) -> ResolvedFields {
        self.field_mapping.read().await.resolve(field_names)
    }

    /// Retrieves context for a question; when the primary query yields no
    /// passages, retries once with a simplified query built from the first
    /// few words before giving up.
    pub async fn retrieve_with_fallback(&self, question: &str) -> RetrievedContext {
        let context = self.retrieve(question).await;
        if !context.passages.is_empty() {
            return context;
        }

        let simplified: String = question
            .split_whitespace()
            .take(SIMPLIFIED_QUERY_WORDS)
            .collect::<Vec<_>>()
            .join(" ");

        if simplified.is_empty() || simplified == question {
            return context;
        }

        tracing::debug!(query = %simplified, "Retrying retrieval with simplified query");
        self.retrieve(&simplified).await
    }

    pub async fn retrieve(&self, query: &str) -> RetrievedContext {
        let mapping = self.field_mapping.read().await.clone();

        let options = SearchOptions {
            select: mapping.select_fields(),
            top: self.policy.top_k,
            query_kind: if self.policy.use_semantic {
                QueryKind::Semantic
            } else {
                QueryKind::Full
            },
            semantic_configuration: self
                .policy
                .use_semantic
                .then(|| self.policy.semantic_configuration.clone()),
            query_language: self
                .policy
                .use_semantic
                .then(|| self.policy.query_language.clone()),
        };

        let hits = match self.search_index.search(query, &options).await {
            Ok(hits) => hits,
            Err(error) => {
                tracing::warn!(%error, "Primary search failed, retrying with minimal parameters");

                match self
                    .search_index
                    .search(
                        query,
                        &SearchOptions::minimal(self.policy.top_k.max(FALLBACK_TOP_FLOOR)),
                    )
                    .await
                {
                    Ok(hits) => hits,
                    Err(error) => {
                        tracing::error!(%error, "Fallback search failed, returning empty context");
                        return RetrievedContext::default();
                    }
                }
            }
        };

        self.assemble_context(hits, &mapping)
    }

    fn assemble_context(
        &self,
        hits: Vec<crate::application::ports::SearchHit>,
        mapping: &FieldMapping,
    ) -> RetrievedContext {
        let mut context = RetrievedContext::default();

        for hit in hits {
            let mut passage = mapping.project(&hit.fields);
            if passage.content.is_empty() {
                tracing::warn!("Skipping search hit without content field");
                continue;
            }

            truncate_chars(&mut passage.content, self.policy.per_passage_char_cap);

            let entry = format!(
                "Dokument: {}\nSeite: {}\nInhalt: {}\n\n",
                passage.document_name, passage.page_number, passage.content
            );
            let entry_tokens = estimate_tokens(&entry);

            if context.estimated_tokens + entry_tokens > self.policy.context_token_budget {
                tracing::warn!(
                    used = context.estimated_tokens,
                    budget = self.policy.context_token_budget,
                    "Token budget reached, dropping remaining passages"
                );
                break;
            }

            context.context_text.push_str(&entry);
            context.estimated_tokens += entry_tokens;
            context.passages.push(passage);
        }

        tracing::info!(
            passages = context.passages.len(),
            estimated_tokens = context.estimated_tokens,
            "Context assembled"
        );

        context
    }
}

fn truncate_chars(text: &mut String, cap: usize) {
    if text.chars().count() > cap {
        let truncated: String = text.chars().take(cap).collect();
        *text = truncated;
        text.push_str("...");
    }
}
