use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};

use crate::{handlers::*, middleware::user_context_middleware, AppState};

pub fn create_api_routes() -> Router<AppState> {
    Router::new()
        // Analyses
        .route("/analyses", post(create_analysis).get(list_analyses))
        .route("/analyses/stats", get(analysis_stats))
        .route("/analyses/:id", get(get_analysis).delete(delete_analysis))
        // Uploads
        .route("/uploads", post(upload_file))
        .route("/uploads/templates", get(get_templates))
        // Suppliers
        .route("/suppliers/analysis/:analysis_id", get(get_suppliers))
        .route("/suppliers/stats", get(supplier_stats))
        // Messages
        .route("/messages/analysis/:analysis_id", get(get_messages))
        .route(
            "/messages/analysis/:analysis_id/type/:message_type",
            get(get_messages_by_type),
        )
        .route("/messages/:id", get(get_message))
        .layer(from_fn(user_context_middleware))
}
