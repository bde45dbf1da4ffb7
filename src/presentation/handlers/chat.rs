use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::application::ports::{ChatModel, SearchIndex};
use crate::application::services::ChatTurnError;
use crate::domain::Citation;
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::state::AppState;

#[derive(Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub sources: Vec<Citation>,
}

#[tracing::instrument(skip(state, request))]
pub async fn chat_handler<S, M>(
    State(state): State<AppState<S, M>>,
    Json(request): Json<ChatRequest>,
) -> impl IntoResponse
where
    S: SearchIndex + 'static,
    M: ChatModel + 'static,
{
    if request.message.trim().is_empty() {
        tracing::warn!("Chat request without message");
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Message is required" })),
        )
            .into_response();
    }

    tracing::info!(message = %sanitize_prompt(&request.message), "Processing chat request");

    match state.chat_service.answer(&request.message).await {
        Ok(turn) => {
            tracing::info!(sources = turn.sources.len(), "Chat turn completed");
            (
                StatusCode::OK,
                Json(ChatResponse {
                    reply: turn.reply,
                    sources: turn.sources,
                }),
            )
                .into_response()
        }
        Err(ChatTurnError::RateLimited) => {
            tracing::warn!("Rate limit persisted through all retry attempts");
            (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({
                    "error": "Anfragelimit erreicht",
                    "reply": "Ich kann derzeit leider keine Antwort geben, da das Anfragelimit \
                              erreicht ist. Bitte versuchen Sie es in einigen Minuten erneut.",
                    "retry_after": "5 minutes",
                })),
            )
                .into_response()
        }
        Err(ChatTurnError::BudgetExceeded(error)) => {
            tracing::warn!(%error, "Prompt exceeds the model context budget");
            (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(json!({
                    "error": "Zu viele Dokumente",
                    "reply": "Die Anfrage enthält zu viele Dokumente für die Verarbeitung. \
                              Bitte stellen Sie eine spezifischere Frage, um relevantere \
                              Dokumente zu erhalten.",
                    "retry_suggestion": "Stellen Sie eine spezifischere Frage",
                })),
            )
                .into_response()
        }
        Err(ChatTurnError::Completion(error)) => {
            tracing::error!(%error, "Chat turn failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Fehler bei der Antwort des Sprachmodells",
                    "details": error.to_string(),
                })),
            )
                .into_response()
        }
    }
}
