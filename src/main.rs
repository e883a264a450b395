use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use transcript_translator::application::services::{SpeechTranslationService, TranslationService};
use transcript_translator::infrastructure::observability::{TracingConfig, init_tracing};
use transcript_translator::infrastructure::storage::LocalUploadStore;
use transcript_translator::infrastructure::transcription::AssemblyAiClient;
use transcript_translator::infrastructure::translation::MarianModelLoader;
use transcript_translator::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    init_tracing(
        TracingConfig::from_settings(environment, &settings.logging),
        settings.server.port,
    );

    if settings.transcription.api_key.is_empty() {
        tracing::warn!("APP_TRANSCRIPTION__API_KEY is not set; transcription requests will fail");
    }

    let upload_store = Arc::new(
        LocalUploadStore::new(settings.uploads.dir.clone())
            .context("Failed to create uploads directory")?,
    );

    let transcription_client = Arc::new(AssemblyAiClient::new(
        settings.transcription.api_key.clone(),
        Some(settings.transcription.base_url.clone()),
        settings.uploads.chunk_size_bytes,
    ));

    let languages = settings.translation.language_models();
    tracing::info!(
        languages = ?languages.codes().map(|c| c.as_str()).collect::<Vec<_>>(),
        "Translation models configured"
    );
    let translation_service = Arc::new(TranslationService::new(
        languages,
        Arc::new(MarianModelLoader),
    ));

    let speech_service = Arc::new(SpeechTranslationService::new(
        transcription_client,
        translation_service,
        settings.transcription.poll_policy(),
    ));

    let state = AppState {
        speech_service,
        upload_store,
        default_language: settings.translation.default_language(),
        max_upload_bytes: settings.uploads.max_body_bytes(),
    };

    let router = create_router(state);

    let ip = settings
        .server
        .host
        .parse()
        .with_context(|| format!("Invalid server host: {}", settings.server.host))?;
    let addr = SocketAddr::new(ip, settings.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
