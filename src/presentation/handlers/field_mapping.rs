use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::application::ports::{ChatModel, SearchIndex};
use crate::presentation::state::AppState;

#[derive(Deserialize)]
pub struct FieldMappingRequest {
    #[serde(default)]
    pub content_field: Option<String>,
    #[serde(default)]
    pub title_field: Option<String>,
    #[serde(default)]
    pub page_field: Option<String>,
}

/// Runtime override of the canonical field names the retriever projects hits
/// onto. Updates the retrieval service's own mapping; nothing ambient.
pub async fn field_mapping_handler<S, M>(
    State(state): State<AppState<S, M>>,
    Json(request): Json<FieldMappingRequest>,
) -> impl IntoResponse
where
    S: SearchIndex + 'static,
    M: ChatModel + 'static,
{
    let Some(content_field) = request.content_field.filter(|f| !f.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "content_field ist erforderlich" })),
        )
            .into_response();
    };

    let mapping = state
        .retrieval_service
        .set_field_mapping(
            content_field.clone(),
            request.title_field.clone(),
            request.page_field.clone(),
        )
        .await;

    tracing::info!(
        content = %content_field,
        title = request.title_field.as_deref().unwrap_or("-"),
        page = request.page_field.as_deref().unwrap_or("-"),
        "Field mapping updated"
    );

    Json(json!({
        "success": true,
        "message": "Feldmappings erfolgreich aktualisiert",
        "mapping": {
            "content_candidates": mapping.content,
            "title_candidates": mapping.title,
            "page_candidates": mapping.page,
        },
    }))
    .into_response()
}
