//! Procura Analysis Engine Service
//!
//! Owns analysis runs: scoring, AI categorization with local fallback, and
//! generated communications.

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

mod analyzer;
mod chat;
mod message_generator;
mod scoring;
mod service;
mod store;

use analyzer::OpenAiAnalyzer;
use chat::ChatClient;
use message_generator::LlmMessageGenerator;
use procura_database::{initialize_database, AnalysisRepository, MessageRepository, SupplierRepository};
use procura_utils::{init_logging, AppConfig};
use service::{AnalysisEngine, EngineError, RunResult};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().unwrap_or_else(|_| {
        eprintln!("Failed to load configuration, using defaults");
        AppConfig::default()
    });

    init_logging(&config.logging)?;
    info!("Starting Procura Analysis Engine");

    let db_config = procura_database::DatabaseConfig {
        postgres_url: config.database.postgres_url.clone(),
        max_connections: config.database.max_connections,
        connection_timeout: Duration::from_secs(config.database.connection_timeout_seconds),
    };
    let pool = initialize_database(&db_config).await?;
    info!("Database connection established");

    let chat = ChatClient::new(&config.ai);
    let engine = Arc::new(AnalysisEngine::new(
        Arc::new(AnalysisRepository::new(pool.clone())),
        Arc::new(SupplierRepository::new(pool.clone())),
        Arc::new(MessageRepository::new(pool)),
        Arc::new(OpenAiAnalyzer::new(chat.clone())),
        Arc::new(LlmMessageGenerator::new(chat)),
        Duration::from_secs(config.ai.timeout_seconds),
    ));

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/analyses/:id/run", post(run_analysis))
        .layer(TraceLayer::new_for_http())
        .with_state(engine);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.engine_port));
    let listener = TcpListener::bind(&addr).await?;
    info!("Analysis Engine listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "analysis-engine",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn run_analysis(
    State(engine): State<Arc<AnalysisEngine>>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<RunResult>, (StatusCode, String)> {
    let owner_id = user_id_from_headers(&headers).ok_or((
        StatusCode::UNAUTHORIZED,
        "Missing or invalid x-user-id header".to_string(),
    ))?;

    match engine.run(id, owner_id).await {
        Ok(result) => Ok(Json(result)),
        Err(EngineError::NotFound) => {
            Err((StatusCode::NOT_FOUND, EngineError::NotFound.to_string()))
        }
        Err(error @ (EngineError::NoSuppliers | EngineError::NoValidData)) => {
            Err((StatusCode::BAD_REQUEST, error.to_string()))
        }
        Err(error @ EngineError::Ai(_)) => Err((StatusCode::BAD_GATEWAY, error.to_string())),
        Err(error @ EngineError::Storage(_)) => {
            Err((StatusCode::INTERNAL_SERVER_ERROR, error.to_string()))
        }
    }
}

/// Identity comes from the upstream auth proxy, never from the body.
fn user_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get("x-user-id")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value).ok())
}
