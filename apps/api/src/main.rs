mod config;
mod corpus;
mod errors;
mod routes;
mod skills;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::corpus::{CsvCorpusSource, DemandCache};
use crate::routes::build_router;
use crate::skills::matcher::SkillMatcher;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Navigator API v{}", env!("CARGO_PKG_VERSION"));

    // Lexicon errors are configuration mistakes: refuse to start.
    let lexicon = Arc::new(config.load_lexicon()?);
    let matcher = SkillMatcher::new(Arc::clone(&lexicon)).context("Failed to compile skill pattern")?;
    info!(
        "Lexicon loaded: {} required, {} tracked",
        lexicon.required().len(),
        lexicon.tracked().len()
    );

    // Demand counts are computed on first request, not here.
    let source = CsvCorpusSource::new(
        config.jobs_dir.clone(),
        config.text_columns.clone(),
        matcher.clone(),
    );
    let demand = Arc::new(DemandCache::new(
        Arc::new(source),
        lexicon.required().to_vec(),
    ));
    info!("Jobs dataset directory: {}", config.jobs_dir.display());

    let state = AppState {
        config: config.clone(),
        matcher,
        demand,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS origins once the UI has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
