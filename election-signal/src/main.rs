use anyhow::Context;
use clap::Parser;
use election_signal::{scheduler, server, AppState, ArtifactStore, Config, NewsApiClient, PipelineOrchestrator};
use interfaces::RandomLabelPolicy;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!("Starting election signal service");

    let store = ArtifactStore::new(config.artifact_paths());
    let source = NewsApiClient::new(config.news_query(), config.fetch_config(), store.clone())
        .context("failed to build news client")?;

    let orchestrator = PipelineOrchestrator::new(
        Arc::new(source),
        store,
        Arc::new(RandomLabelPolicy),
        config.trainer_config(),
    );
    let state = Arc::new(AppState::new(orchestrator));

    if config.no_schedule {
        info!("Daily update disabled");
    } else {
        tokio::spawn(scheduler::run_daily(state.clone(), config.update_at));
    }

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;
    info!("Listening on {}", address);

    axum::serve(listener, server::router(state)).await?;
    Ok(())
}
