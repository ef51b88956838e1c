use std::sync::Arc;

use anyhow::Context;
use answer_service::{
    build_app, config::AppConfig, init_tracing, run_server, store::SqliteStore, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing()?;

    let config = AppConfig::from_env();
    if config.provider.api_key.trim().is_empty() {
        tracing::warn!("OPENAI_API_KEY is not set; uploads will fail until it is configured");
    }

    let store = SqliteStore::connect(&config.database_url)
        .await
        .with_context(|| format!("failed to open database at {}", config.database_url))?;
    tracing::info!(database_url = %config.database_url, "database ready");

    let app = build_app(AppState::new(&config, Arc::new(store)));

    run_server(app, config.port).await.context("server failed")
}
