mod config;
mod errors;
mod letter;
mod llm_client;
mod markup;
mod render;
mod routes;
mod session;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::{Config, GenerationBackend};
use crate::letter::{LetterGenerator, LlmGenerator, MockGenerator};
use crate::llm_client::LlmClient;
use crate::render::PdfRenderer;
use crate::routes::build_router;
use crate::session::{spawn_sweeper, SessionStore};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed or missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Cover Letter API v{}", env!("CARGO_PKG_VERSION"));

    let generator = build_generator(&config)?;
    info!("Letter generator: {}", generator.name());

    let renderer = Arc::new(PdfRenderer::default());

    let sessions = SessionStore::new();
    spawn_sweeper(sessions.clone(), config.session_ttl);
    info!("Session TTL: {:?}", config.session_ttl);

    let state = AppState {
        config: config.clone(),
        generator,
        renderer,
        sessions,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_generator(config: &Config) -> Result<Arc<dyn LetterGenerator>> {
    let contact = config.contact.clone();
    match config.generation_backend {
        GenerationBackend::Mock => Ok(Arc::new(MockGenerator::new(contact, config.mock_delay))),
        GenerationBackend::Anthropic => {
            let api_key = config
                .anthropic_api_key
                .clone()
                .context("ANTHROPIC_API_KEY is required for the anthropic backend")?;
            let llm = LlmClient::new(api_key).context("failed to build LLM client")?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Ok(Arc::new(LlmGenerator::new(llm, contact)))
        }
    }
}
