pub mod analysis;
pub mod health;
pub mod message;
pub mod supplier;
pub mod upload;

pub use analysis::*;
pub use health::*;
pub use message::*;
pub use supplier::*;
pub use upload::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use procura_utils::{ErrorResponse, ProcuraError};

/// Axum-facing wrapper mapping the shared error taxonomy onto HTTP responses.
pub struct ApiError {
    error: ProcuraError,
    details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(error: ProcuraError) -> Self {
        Self {
            error,
            details: None,
        }
    }

    pub fn with_details(error: ProcuraError, details: serde_json::Value) -> Self {
        Self {
            error,
            details: Some(details),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut body = ErrorResponse::from(self.error);
        body.details = self.details;

        (status, Json(body)).into_response()
    }
}

impl From<ProcuraError> for ApiError {
    fn from(error: ProcuraError) -> Self {
        Self::new(error)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        Self::new(ProcuraError::internal(error.to_string()))
    }
}
