//! Supplier Handlers
//!
//! Read access to imported suppliers and owner-wide statistics.

use axum::{
    extract::{Path, State},
    response::Json,
    Extension,
};
use uuid::Uuid;

use procura_database::{AnalysisRepository, SupplierRepository, SupplierStats};
use procura_models::SupplierRecord;
use procura_utils::ProcuraError;

use super::ApiError;
use crate::middleware::UserContext;
use crate::AppState;

/// GET /api/v1/suppliers/analysis/:analysis_id
pub async fn get_suppliers(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    Path(analysis_id): Path<Uuid>,
) -> Result<Json<Vec<SupplierRecord>>, ApiError> {
    AnalysisRepository::new(state.pool.clone())
        .find_for_owner(analysis_id, user.user_id)
        .await?
        .ok_or_else(|| ProcuraError::not_found("Analysis"))?;

    let suppliers = SupplierRepository::new(state.pool.clone())
        .find_by_analysis(analysis_id)
        .await?;

    Ok(Json(suppliers))
}

/// GET /api/v1/suppliers/stats
pub async fn supplier_stats(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
) -> Result<Json<SupplierStats>, ApiError> {
    let stats = SupplierRepository::new(state.pool.clone())
        .stats_for_owner(user.user_id)
        .await?;

    Ok(Json(stats))
}
