mod account;
mod config;
mod errors;
mod gap_fill;
mod generation;
mod intake;
mod llm_client;
mod models;
mod optimization;
mod review;
mod routes;
mod scoring;
mod sessions;
mod state;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::account::entitlements::InMemoryEntitlements;
use crate::config::Config;
use crate::generation::bullets::LlmBulletGenerator;
use crate::generation::rewriter::LlmResumeRewriter;
use crate::llm_client::LlmClient;
use crate::optimization::orchestrator::Collaborators;
use crate::review::analysis::{AdvancedProjectAnalyzer, ProjectAnalyzer, StandardProjectAnalyzer};
use crate::routes::build_router;
use crate::scoring::KeywordMatchScorer;
use crate::sessions::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Optimizer API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone(), config.external_call_timeout)?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Project analyzer (standard unless ENABLE_ADVANCED_PROJECT_SCORING is set)
    let analyzer: Arc<dyn ProjectAnalyzer> = if config.enable_advanced_project_scoring {
        Arc::new(AdvancedProjectAnalyzer(llm.clone()))
    } else {
        Arc::new(StandardProjectAnalyzer(llm.clone()))
    };
    info!("Project analyzer: {}", analyzer.backend());

    let services = Collaborators {
        rewriter: Arc::new(LlmResumeRewriter(llm.clone())),
        scorer: Arc::new(KeywordMatchScorer),
        analyzer,
        bullets: Arc::new(LlmBulletGenerator(llm)),
        entitlements: Arc::new(InMemoryEntitlements::new(config.free_optimizations)),
        call_timeout: config.external_call_timeout,
    };
    info!(
        "{} free optimizations per user, external calls bounded at {}s",
        config.free_optimizations,
        config.external_call_timeout.as_secs()
    );

    // Session store, with idle sessions swept in the background
    let sessions = SessionStore::new(config.session_ttl);
    sessions.spawn_expiry_sweep();
    info!("Idle sessions expire after {}s", config.session_ttl.as_secs());

    // Build app state
    let state = AppState { sessions, services };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
