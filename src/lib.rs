pub mod api;
pub mod config;
pub mod error;
pub mod generator;
pub mod model;
pub mod pipeline;
pub mod store;
pub mod validation;

use std::sync::Arc;

use axum::Router;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::generator::AnswerGenerator;
use crate::store::QuestionRepository;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn QuestionRepository>,
    pub generator: AnswerGenerator,
}

impl AppState {
    pub fn new(config: &AppConfig, store: Arc<dyn QuestionRepository>) -> Self {
        Self {
            store,
            generator: AnswerGenerator::new(config.provider.clone()),
        }
    }
}

pub fn build_app(state: AppState) -> Router {
    api::router(state)
}

/// Installs the global fmt subscriber. `ANSWER_SERVICE_LOG` takes precedence
/// over `RUST_LOG`; without either, `info` is used.
pub fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_env("ANSWER_SERVICE_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))
}

pub async fn run_server(app: Router, port: u16) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
