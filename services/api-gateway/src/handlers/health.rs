//! Detailed Health Handler
//!
//! Component-level health with a live database ping.

use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::AppState;

pub async fn detailed_health_check(State(state): State<AppState>) -> Json<Value> {
    let database = match procura_database::postgres_health_check(&state.pool).await {
        Ok(()) => "healthy",
        Err(_) => "unhealthy",
    };

    let status = if database == "healthy" {
        "healthy"
    } else {
        "degraded"
    };

    Json(json!({
        "status": status,
        "service": "procura-api-gateway",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "components": {
            "database": database
        }
    }))
}
