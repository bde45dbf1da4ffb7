use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::application::ports::{ChatModel, SearchIndex, SearchOptions};
use crate::presentation::state::AppState;

const PREVIEW_CHARS: usize = 200;

#[derive(Deserialize)]
pub struct TestSearchParams {
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Serialize)]
pub struct PassagePreview {
    pub name: String,
    pub page: u32,
    pub preview: String,
}

/// Diagnostic query against the live index, returning passage previews.
pub async fn test_search_handler<S, M>(
    State(state): State<AppState<S, M>>,
    Query(params): Query<TestSearchParams>,
) -> impl IntoResponse
where
    S: SearchIndex + 'static,
    M: ChatModel + 'static,
{
    let query = params.q.unwrap_or_else(|| "test query".to_string());
    let context = state.retrieval_service.retrieve(&query).await;

    let documents: Vec<PassagePreview> = context
        .passages
        .iter()
        .map(|p| PassagePreview {
            name: p.document_name.clone(),
            page: p.page_number,
            preview: preview(&p.content),
        })
        .collect();

    Json(json!({
        "query": query,
        "document_count": documents.len(),
        "documents": documents,
    }))
}

/// Introspection of the search connection; the API key is masked.
pub async fn debug_search_config_handler<S, M>(
    State(state): State<AppState<S, M>>,
) -> impl IntoResponse
where
    S: SearchIndex + 'static,
    M: ChatModel + 'static,
{
    let search = &state.settings.search;

    Json(json!({
        "endpoint": search.endpoint,
        "index_name": search.index_name,
        "key_present": !search.api_key.is_empty(),
        "key_preview": search.masked_api_key(),
        "semantic_search_enabled": search.use_semantic,
    }))
}

/// Pulls one sample hit to show the actual index shape and which fields the
/// current mapping resolves to.
pub async fn debug_index_structure_handler<S, M>(
    State(state): State<AppState<S, M>>,
) -> impl IntoResponse
where
    S: SearchIndex + 'static,
    M: ChatModel + 'static,
{
    match state
        .search_index
        .search("*", &SearchOptions::minimal(1))
        .await
    {
        Ok(hits) => {
            let field_names: Vec<String> = hits
                .first()
                .map(|hit| hit.fields.keys().cloned().collect())
                .unwrap_or_default();
            let resolved = state.retrieval_service.resolve_fields(&field_names).await;

            Json(json!({
                "index_name": state.settings.search.index_name,
                "documents_found": hits.len(),
                "field_names": field_names,
                "identified_fields": resolved,
                "sample_document": hits.first().map(|h| &h.fields),
                "is_connected": true,
            }))
            .into_response()
        }
        Err(error) => {
            tracing::error!(%error, "Index structure check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Fehler beim Prüfen der Index-Struktur",
                    "details": error.to_string(),
                    "is_connected": false,
                })),
            )
                .into_response()
        }
    }
}

fn preview(content: &str) -> String {
    if content.chars().count() <= PREVIEW_CHARS {
        return content.to_string();
    }
    let prefix: String = content.chars().take(PREVIEW_CHARS).collect();
    format!("{}...", prefix)
}
