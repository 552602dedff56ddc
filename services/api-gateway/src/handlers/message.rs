//! Message Handlers
//!
//! Read access to the communications generated by analysis runs.

use axum::{
    extract::{Path, State},
    response::Json,
    Extension,
};
use uuid::Uuid;

use procura_database::{AnalysisRepository, MessageRepository};
use procura_models::{GeneratedMessage, MessageType};
use procura_utils::ProcuraError;

use super::ApiError;
use crate::middleware::UserContext;
use crate::AppState;

/// GET /api/v1/messages/analysis/:analysis_id
pub async fn get_messages(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    Path(analysis_id): Path<Uuid>,
) -> Result<Json<Vec<GeneratedMessage>>, ApiError> {
    AnalysisRepository::new(state.pool.clone())
        .find_for_owner(analysis_id, user.user_id)
        .await?
        .ok_or_else(|| ProcuraError::not_found("Analysis"))?;

    let messages = MessageRepository::new(state.pool.clone())
        .find_by_analysis(analysis_id)
        .await?;

    Ok(Json(messages))
}

/// GET /api/v1/messages/analysis/:analysis_id/type/:message_type
pub async fn get_messages_by_type(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    Path((analysis_id, message_type)): Path<(Uuid, String)>,
) -> Result<Json<Vec<GeneratedMessage>>, ApiError> {
    let message_type = MessageType::from_str(&message_type).ok_or_else(|| {
        ProcuraError::validation(
            "message_type",
            format!("Unknown message type '{}'", message_type),
        )
    })?;

    AnalysisRepository::new(state.pool.clone())
        .find_for_owner(analysis_id, user.user_id)
        .await?
        .ok_or_else(|| ProcuraError::not_found("Analysis"))?;

    let messages = MessageRepository::new(state.pool.clone())
        .find_by_analysis_and_type(analysis_id, message_type)
        .await?;

    Ok(Json(messages))
}

/// GET /api/v1/messages/:id
pub async fn get_message(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<GeneratedMessage>, ApiError> {
    let message = MessageRepository::new(state.pool.clone())
        .find_for_owner(id, user.user_id)
        .await?
        .ok_or_else(|| ProcuraError::not_found("Message"))?;

    Ok(Json(message))
}
