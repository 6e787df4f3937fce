use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use wordstamp::application::services::{TranscriptionPipeline, TranscriptionService};
use wordstamp::infrastructure::alignment::CtcAlignmentEngine;
use wordstamp::infrastructure::audio::{SymphoniaAudioDecoder, TranscriptionEngineFactory};
use wordstamp::infrastructure::observability::{TracingConfig, init_tracing};
use wordstamp::infrastructure::storage::LocalScratchStore;
use wordstamp::presentation::{AppState, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("Failed to load settings")?;
    let port = settings.server.port;

    init_tracing(
        TracingConfig::default().with_logging(&settings.logging),
        port,
    );

    let service = {
        let settings = settings.clone();
        tokio::task::spawn_blocking(move || bootstrap(&settings))
            .await
            .context("Bootstrap task failed")??
    };

    let state = AppState::new(Arc::new(service), settings);
    let router = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

/// Loads every engine once. Runs off the async runtime because model downloads and the
/// blocking HTTP client must not block a reactor thread.
fn bootstrap(settings: &Settings) -> anyhow::Result<TranscriptionService> {
    let transcription = &settings.transcription;
    tracing::info!(
        provider = ?transcription.provider,
        model = %transcription.model,
        "Loading transcription engine"
    );
    let transcription_engine = TranscriptionEngineFactory::create(
        transcription.provider.into(),
        &transcription.model,
        transcription.api_key.as_deref(),
        transcription.base_url.as_deref(),
    )
    .context("Failed to load transcription engine")?;

    let alignment_engine = CtcAlignmentEngine::new(&settings.alignment.models_dir);
    alignment_engine.preload(&settings.alignment.preload);

    let scratch_store = LocalScratchStore::new(PathBuf::from(&settings.storage.scratch_dir))
        .context("Failed to prepare scratch directory")?;

    let pipeline = TranscriptionPipeline::new(
        Arc::new(SymphoniaAudioDecoder),
        transcription_engine,
        Arc::new(alignment_engine),
    );

    Ok(TranscriptionService::new(Arc::new(scratch_store), pipeline))
}
