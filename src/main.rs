use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use packliste::config::PacklisteConfig;
use packliste::export::DocumentExporter;
use packliste::generation::OpenAiBackend;
use packliste::pipeline::PackingListService;
use packliste::web;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::var_os("PACKLISTE_CONFIG").map(PathBuf::from);
    let config = PacklisteConfig::load(config_path.as_deref())?;
    config.validate()?;

    // The key must resolve before the listener binds; a missing credential
    // never shows up later as a backend authentication error.
    let api_key = config
        .generation
        .resolve_api_key()
        .context("Cannot start without a generation API key")?;

    let backend = OpenAiBackend::from_config(&config.generation, api_key)?;
    let service = Arc::new(PackingListService::new(
        Arc::new(backend),
        DocumentExporter::default(),
    ));

    tracing::info!("Starting packliste {}", packliste::VERSION);
    web::run(config.server.port, &config.server.frontend_dir, service).await
}
