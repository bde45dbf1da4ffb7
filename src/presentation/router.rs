use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::application::ports::{ChatModel, SearchIndex};
use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    chat_handler, debug_index_structure_handler, debug_search_config_handler,
    field_mapping_handler, health_handler, test_search_handler,
};
use crate::presentation::state::AppState;

pub fn create_router<S, M>(state: AppState<S, M>) -> Router
where
    S: SearchIndex + 'static,
    M: ChatModel + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/chat", post(chat_handler::<S, M>))
        .route("/api/test-search", get(test_search_handler::<S, M>))
        .route(
            "/api/debug/search-config",
            get(debug_search_config_handler::<S, M>),
        )
        .route(
            "/api/debug/index-structure",
            get(debug_index_structure_handler::<S, M>),
        )
        .route(
            "/api/config/field-mapping",
            post(field_mapping_handler::<S, M>),
        )
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
