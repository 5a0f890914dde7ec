mod config;
mod errors;
mod qa_client;
mod routes;
mod state;
mod store;
mod wizard;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, StoreBackend};
use crate::qa_client::{QaClient, QuestionService};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{MemoryStore, RedisStore, SessionStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Wizard API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the Question/Answer Service client
    let qa: Arc<dyn QuestionService> = Arc::new(QaClient::new(
        config.qa_service_url.clone(),
        Duration::from_secs(config.qa_timeout_secs),
    ));
    info!(
        "Question/Answer service client initialized (base: {})",
        config.qa_service_url
    );

    // Initialize the session store
    let store: Arc<dyn SessionStore> = match config.session_store {
        StoreBackend::Memory => {
            info!("Session store: in-memory");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .context("REDIS_URL is required when SESSION_STORE=redis")?;
            let client = redis::Client::open(url)?;
            info!("Session store: redis (ttl {}s)", config.session_ttl_secs);
            Arc::new(RedisStore::new(client, config.session_ttl_secs))
        }
    };

    // Build app state
    let state = AppState {
        qa,
        store,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
