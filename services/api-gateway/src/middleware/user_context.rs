use axum::{
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use uuid::Uuid;

const USER_ID_HEADER: &str = "x-user-id";

/// Authenticated caller identity, resolved by the upstream auth proxy.
#[derive(Debug, Clone, Copy)]
pub struct UserContext {
    pub user_id: Uuid,
}

/// Require a valid `x-user-id` header and expose it to handlers.
///
/// Token verification happens upstream; by the time a request reaches this
/// service the proxy has already replaced credentials with the resolved
/// user id. Requests without one are rejected outright.
pub async fn user_context_middleware(
    mut request: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let user_id = request
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value).ok());

    match user_id {
        Some(user_id) => {
            request.extensions_mut().insert(UserContext { user_id });
            next.run(request).await
        }
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Missing or invalid x-user-id header",
                "code": "UNAUTHENTICATED"
            })),
        )
            .into_response(),
    }
}
