//! Procura API Gateway
//!
//! REST surface for analyses, spreadsheet uploads, suppliers, and generated
//! messages. Authentication lives upstream; this service trusts the
//! `x-user-id` header and enforces plain ownership checks.

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    response::Json,
    routing::get,
    serve, Router,
};
use serde_json::json;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use procura_database::{initialize_database, PostgresPool};
use procura_utils::{init_logging, AppConfig};

mod handlers;
mod middleware;
mod routes;

use middleware::request_id_middleware;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load().unwrap_or_else(|_| {
        eprintln!("Failed to load configuration, using defaults");
        AppConfig::default()
    });

    // Initialize logging
    init_logging(&config.logging)?;
    info!("Starting Procura API Gateway");

    // Initialize database
    let db_config = procura_database::DatabaseConfig {
        postgres_url: config.database.postgres_url.clone(),
        max_connections: config.database.max_connections,
        connection_timeout: Duration::from_secs(config.database.connection_timeout_seconds),
    };
    let pool = initialize_database(&db_config).await?;
    info!("Database connection established");

    // Build application router
    let app = create_app(pool, &config);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = TcpListener::bind(&addr).await?;
    info!("API Gateway listening on {}", addr);

    serve(listener, app).await?;

    Ok(())
}

fn create_app(pool: PostgresPool, config: &AppConfig) -> Router {
    Router::new()
        // Health check endpoints
        .route("/health", get(health_check))
        .route("/health/detailed", get(handlers::detailed_health_check))
        .route("/metrics", get(metrics_handler))
        // API routes
        .nest("/api/v1", routes::create_api_routes())
        // Middleware stack
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods([Method::GET, Method::POST, Method::DELETE])
                        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
                )
                .layer(DefaultBodyLimit::max(config.server.max_request_size))
                .layer(axum::middleware::from_fn(request_id_middleware)),
        )
        // Application state
        .with_state(AppState {
            pool,
            config: config.clone(),
        })
}

#[derive(Clone)]
pub struct AppState {
    pub pool: PostgresPool,
    pub config: AppConfig,
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": "procura-api-gateway",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn metrics_handler() -> String {
    use prometheus::TextEncoder;

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    encoder
        .encode_to_string(&metric_families)
        .unwrap_or_else(|_| "Error encoding metrics".to_string())
}
