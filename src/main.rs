use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use quellbot::application::ports::SamplingParams;
use quellbot::application::services::{ChatService, PromptAssembler, RetrievalService};
use quellbot::infrastructure::llm::AzureOpenAiClient;
use quellbot::infrastructure::observability::{init_tracing, TracingConfig};
use quellbot::infrastructure::search::AzureSearchClient;
use quellbot::presentation::{create_router, AppState, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(error) => {
            eprintln!("Configuration error: {error}");
            eprintln!("Please check your .env file and make sure all required variables are set.");
            std::process::exit(1);
        }
    };

    let port = settings.server.port;
    init_tracing(TracingConfig::default(), port);

    let search_index = Arc::new(AzureSearchClient::new(
        settings.search.endpoint.clone(),
        settings.search.api_key.clone(),
        settings.search.index_name.clone(),
    ));

    let chat_model = Arc::new(AzureOpenAiClient::new(
        settings.model.endpoint.clone(),
        settings.model.api_key.clone(),
        settings.model.deployment.clone(),
    ));

    let retrieval_service = Arc::new(RetrievalService::new(
        Arc::clone(&search_index),
        settings.retrieval_policy(),
    ));

    let prompt_assembler = PromptAssembler::new(
        settings.chat.no_context_policy,
        settings.model.max_model_tokens,
        settings.model.reserved_completion_tokens,
    );

    let sampling = SamplingParams {
        max_tokens: settings.model.max_completion_tokens,
        temperature: settings.model.temperature,
        ..SamplingParams::default()
    };

    let chat_service = Arc::new(ChatService::new(
        Arc::clone(&retrieval_service),
        chat_model,
        prompt_assembler,
        sampling,
        settings.retry_schedule(),
        settings.chat.correction_enabled,
    ));

    tracing::info!(
        deployment = %settings.model.deployment,
        index = %settings.search.index_name,
        "Retrieval-augmented chat backend starting"
    );

    let state = AppState {
        chat_service,
        retrieval_service,
        search_index,
        settings,
    };

    let router = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
