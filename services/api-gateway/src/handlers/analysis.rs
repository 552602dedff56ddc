//! Analysis Handlers
//!
//! CRUD and statistics for analysis batches. Every query is scoped to the
//! authenticated owner.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use procura_database::{AnalysisRepository, AnalysisStats, MessageRepository, SupplierRepository};
use procura_models::{Analysis, AnalysisStatus, GeneratedMessage, NewAnalysis, SupplierRecord};
use procura_utils::{validate_model, ProcuraError};

use super::ApiError;
use crate::middleware::UserContext;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAnalysisRequest {
    #[validate(length(min = 3, max = 100, message = "Title must be between 3 and 100 characters"))]
    pub title: String,
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: Option<String>,
}

/// POST /api/v1/analyses
pub async fn create_analysis(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    Json(request): Json<CreateAnalysisRequest>,
) -> Result<(StatusCode, Json<Analysis>), ApiError> {
    validate_model(&request)?;

    let repository = AnalysisRepository::new(state.pool.clone());
    let analysis = repository
        .create(NewAnalysis {
            owner_id: user.user_id,
            title: request.title.trim().to_string(),
            description: request.description.map(|d| d.trim().to_string()),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(analysis)))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    pub status: Option<String>,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

#[derive(Debug, Serialize)]
pub struct AnalysisListResponse {
    pub analyses: Vec<Analysis>,
    pub pagination: Pagination,
}

/// GET /api/v1/analyses
pub async fn list_analyses(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    Query(query): Query<ListQuery>,
) -> Result<Json<AnalysisListResponse>, ApiError> {
    let page = query.page.max(1);
    let limit = query.limit.clamp(1, 100);

    let status = match query.status.as_deref() {
        Some(raw) => Some(AnalysisStatus::from_str(raw).ok_or_else(|| {
            ProcuraError::validation("status", format!("Unknown status filter '{}'", raw))
        })?),
        None => None,
    };

    let repository = AnalysisRepository::new(state.pool.clone());
    let (analyses, total) = repository
        .list_for_owner(user.user_id, status, page, limit)
        .await?;

    Ok(Json(AnalysisListResponse {
        analyses,
        pagination: Pagination {
            page,
            limit,
            total,
            pages: (total + limit - 1) / limit,
        },
    }))
}

#[derive(Debug, Serialize)]
pub struct AnalysisDetailResponse {
    #[serde(flatten)]
    pub analysis: Analysis,
    pub suppliers: Vec<SupplierRecord>,
    pub messages: Vec<GeneratedMessage>,
}

/// GET /api/v1/analyses/:id
pub async fn get_analysis(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<AnalysisDetailResponse>, ApiError> {
    let analysis = AnalysisRepository::new(state.pool.clone())
        .find_for_owner(id, user.user_id)
        .await?
        .ok_or_else(|| ProcuraError::not_found("Analysis"))?;

    let suppliers = SupplierRepository::new(state.pool.clone())
        .find_by_analysis(id)
        .await?;
    let messages = MessageRepository::new(state.pool.clone())
        .find_by_analysis(id)
        .await?;

    Ok(Json(AnalysisDetailResponse {
        analysis,
        suppliers,
        messages,
    }))
}

/// DELETE /api/v1/analyses/:id
pub async fn delete_analysis(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = AnalysisRepository::new(state.pool.clone())
        .delete_for_owner(id, user.user_id)
        .await?;

    if !deleted {
        return Err(ProcuraError::not_found("Analysis").into());
    }

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/analyses/stats
pub async fn analysis_stats(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
) -> Result<Json<AnalysisStats>, ApiError> {
    let stats = AnalysisRepository::new(state.pool.clone())
        .stats_for_owner(user.user_id)
        .await?;

    Ok(Json(stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_validation() {
        let request = CreateAnalysisRequest {
            title: "ab".to_string(),
            description: None,
        };
        assert!(validate_model(&request).is_err());

        let request = CreateAnalysisRequest {
            title: "Q1 supplier review".to_string(),
            description: Some("Imported from the purchasing export".to_string()),
        };
        assert!(validate_model(&request).is_ok());

        let request = CreateAnalysisRequest {
            title: "Q1 supplier review".to_string(),
            description: Some("x".repeat(501)),
        };
        assert!(validate_model(&request).is_err());
    }

    #[test]
    fn test_list_query_defaults() {
        let query: ListQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 10);
        assert!(query.status.is_none());
    }
}
