use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use quellbot::application::services::{Chunker, IndexingService};
use quellbot::infrastructure::observability::{init_tracing, TracingConfig};
use quellbot::infrastructure::search::AzureSearchClient;
use quellbot::presentation::config::{ChunkingSettings, SearchSettings};

const SUPPORTED_EXTENSIONS: [&str; 2] = ["txt", "md"];

/// Offline document indexer: reads extracted text files from a local
/// directory, chunks them and uploads the records to the search index.
/// Text may carry `[Seite N]` markers to preserve page numbers.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let search_settings = match SearchSettings::from_env() {
        Ok(settings) => settings,
        Err(error) => {
            eprintln!("Configuration error: {error}");
            std::process::exit(1);
        }
    };
    let chunking = match ChunkingSettings::from_env() {
        Ok(settings) => settings,
        Err(error) => {
            eprintln!("Configuration error: {error}");
            std::process::exit(1);
        }
    };

    init_tracing(TracingConfig::default(), 0);

    let documents_dir =
        std::env::var("DOCUMENTS_DIR").unwrap_or_else(|_| "./documents".to_string());

    let search_index = Arc::new(AzureSearchClient::new(
        search_settings.endpoint.clone(),
        search_settings.api_key.clone(),
        search_settings.index_name.clone(),
    ));

    let indexing_service = IndexingService::new(
        search_index,
        Chunker::new(chunking.chunk_size, chunking.overlap),
        search_settings.index_name.clone(),
    );

    tracing::info!(index = %search_settings.index_name, "Starting document indexing");
    indexing_service
        .ensure_index()
        .await
        .context("index creation failed")?;

    let dir = Path::new(&documents_dir);
    if !dir.is_dir() {
        anyhow::bail!("documents directory {documents_dir} does not exist");
    }

    let mut indexed = 0usize;
    let mut skipped = 0usize;

    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("cannot read {documents_dir}"))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
            tracing::warn!(file = %path.display(), "Skipping unsupported file format");
            skipped += 1;
            continue;
        }

        let document_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        let text = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("cannot read {}", path.display()))?;

        match indexing_service
            .index_document(&document_name, &text, None)
            .await
        {
            Ok(report) => {
                tracing::info!(
                    document = %document_name,
                    uploaded = report.uploaded,
                    failed = report.failed,
                    "Indexed"
                );
                indexed += 1;
            }
            Err(error) => {
                // One broken document should not stop the whole run.
                tracing::error!(document = %document_name, %error, "Indexing failed");
                skipped += 1;
            }
        }
    }

    tracing::info!(indexed, skipped, "Indexing run finished");
    Ok(())
}
