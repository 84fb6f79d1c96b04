mod config;
mod documents;
mod errors;
mod job_description;
mod llm_client;
mod models;
mod routes;
mod screening;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::job_description::linkedin::LinkedInJobScraper;
use crate::job_description::renderer::HttpPageRenderer;
use crate::job_description::{JobDescriptionAcquirer, JobDescriptionSource};
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a missing API key)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume screener v{}", env!("CARGO_PKG_VERSION"));

    // Initialize model client
    let model = GeminiClient::from_config(&config).context("Failed to build model client")?;
    info!(
        "Model client initialized (model: {}, max attempts: {})",
        model.model(),
        config.llm_max_attempts
    );

    // Job description sources (LinkedIn only)
    let renderer = HttpPageRenderer::new(config.scrape_render_wait)
        .context("Failed to build job page renderer")?;
    let linkedin: Arc<dyn JobDescriptionSource> = Arc::new(LinkedInJobScraper::new(renderer));
    let job_descriptions = JobDescriptionAcquirer::new(vec![linkedin]);

    // Build app state
    let state = AppState {
        model: Arc::new(model),
        job_descriptions: Arc::new(job_descriptions),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state).layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
