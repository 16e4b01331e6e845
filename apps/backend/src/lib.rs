pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, DEFAULT_MAX_DOCUMENT_BYTES};
use crate::db::Database;
use crate::services::adapter::AdaptationBackend;
use crate::services::llm::LlmClient;
use crate::services::sessions::{spawn_idle_sweeper, SessionRegistry};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub llm: Arc<LlmClient>,
    pub adapter: Arc<AdaptationBackend>,
    pub sessions: Arc<SessionRegistry>,
    /// Body limit for `/api/generate/document`.
    pub max_document_bytes: usize,
}

impl AppState {
    pub fn new(db: Database, llm: LlmClient, adapter: AdaptationBackend) -> Self {
        Self {
            db: Arc::new(db),
            llm: Arc::new(llm),
            adapter: Arc::new(adapter),
            sessions: Arc::new(SessionRegistry::new()),
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
        }
    }

    pub fn with_max_document_bytes(mut self, bytes: usize) -> Self {
        self.max_document_bytes = bytes;
        self
    }
}

/// Build the API router.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        // Generation routes
        .route("/api/generate/topic", post(routes::generate::topic))
        .route(
            "/api/generate/document",
            post(routes::generate::document)
                .layer(DefaultBodyLimit::max(state.max_document_bytes)),
        )
        .route("/api/adapt", post(routes::adapt::adapt))
        // Set routes
        .route("/api/sets", get(routes::sets::list))
        .route(
            "/api/sets/:id",
            get(routes::sets::get).delete(routes::sets::delete),
        )
        .route("/api/sets/:id/study", post(routes::sets::study))
        // Session routes
        .route("/api/sessions", post(routes::sessions::start))
        .route(
            "/api/sessions/:id",
            get(routes::sessions::get).delete(routes::sessions::end),
        )
        .route("/api/sessions/:id/flip", post(routes::sessions::flip))
        .route("/api/sessions/:id/answer", post(routes::sessions::answer))
        .route("/api/sessions/:id/navigate", post(routes::sessions::navigate))
        .route("/api/sessions/:id/save", post(routes::sessions::save))
        .layer(middleware::from_fn(routes::profile::profile_middleware));

    Router::new()
        .route("/health", get(health_check))
        .merge(api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!(path = %config.db_path.display(), "Opening database...");
    let db = Database::open(&config.db_path).context("failed to open database")?;

    let llm = LlmClient::new(&config.llm).context("failed to build model client")?;
    if config.llm.api_key.is_none() {
        tracing::warn!("LLM_API_KEY is not set; generation requests will be sent unauthenticated");
    }
    let adapter = AdaptationBackend::from_mode(config.adaptation_mode, &llm);
    tracing::info!(model = llm.model(), adapter = ?config.adaptation_mode, "Model provider configured");

    let state = AppState::new(db, llm, adapter).with_max_document_bytes(config.max_document_bytes);
    spawn_idle_sweeper(state.sessions.clone(), config.session_idle);
    let app = app(state);

    let addr = config.bind_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
