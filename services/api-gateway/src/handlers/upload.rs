//! Upload Handler
//!
//! Receives a spreadsheet for an analysis, runs it through the ingestion
//! pipeline, and persists the batch. Nothing persists if any row fails
//! validation; the response lists the issues (display capped at 10).

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use procura_database::{AnalysisRepository, SupplierRepository};
use procura_models::NewSupplier;
use procura_utils::ingest::{self, IngestError};
use procura_utils::{validate_file_size, validate_file_type, ProcuraError};

use super::ApiError;
use crate::middleware::UserContext;
use crate::AppState;

/// Issues shown per rejected upload; the full count is still reported.
const MAX_DISPLAYED_ISSUES: usize = 10;

const ALLOWED_EXTENSIONS: [&str; 3] = ["csv", "xlsx", "xls"];

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub analysis_id: Uuid,
    pub imported_count: u64,
}

/// POST /api/v1/uploads
pub async fn upload_file(
    State(state): State<AppState>,
    Extension(user): Extension<UserContext>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let mut analysis_id: Option<Uuid> = None;
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ProcuraError::validation("multipart", e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "analysis_id" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| ProcuraError::validation("analysis_id", e.to_string()))?;
                let id = Uuid::parse_str(raw.trim()).map_err(|_| {
                    ProcuraError::validation("analysis_id", "analysis_id must be a UUID")
                })?;
                analysis_id = Some(id);
            }
            "file" => {
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| ProcuraError::validation("file", "Missing file name"))?;
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ProcuraError::validation("file", e.to_string()))?;
                upload = Some((filename, data.to_vec()));
            }
            _ => {}
        }
    }

    let analysis_id =
        analysis_id.ok_or_else(|| ProcuraError::validation("analysis_id", "Missing analysis_id field"))?;
    let (filename, data) =
        upload.ok_or_else(|| ProcuraError::validation("file", "No file provided"))?;

    // The analysis must exist and belong to the caller
    AnalysisRepository::new(state.pool.clone())
        .find_for_owner(analysis_id, user.user_id)
        .await?
        .ok_or_else(|| ProcuraError::not_found("Analysis"))?;

    validate_file_type(&filename, &ALLOWED_EXTENSIONS)?;
    validate_file_size(data.len() as u64, state.config.server.max_request_size as u64)?;
    let extension = std::path::Path::new(&filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();

    // Parse -> validate -> clean; reject the whole batch on any issue
    let rows = ingest::parse_bytes(&data, extension).map_err(ingest_error)?;

    let issues = ingest::validate(&rows);
    if !issues.is_empty() {
        let displayed: Vec<String> = issues
            .iter()
            .take(MAX_DISPLAYED_ISSUES)
            .map(|issue| format!("Row {}: {}", issue.row, issue.message))
            .collect();

        return Err(ApiError::with_details(
            ProcuraError::validation("file", "Validation errors in file"),
            json!({
                "errors": displayed,
                "total_errors": issues.len(),
            }),
        ));
    }

    let imports = ingest::clean(&rows).map_err(ingest_error)?;

    let suppliers: Vec<NewSupplier> = imports
        .into_iter()
        .map(|import| NewSupplier {
            analysis_id,
            name: import.name,
            product: import.product,
            quantity: import.quantity,
            quality: import.quality,
            delivery_delay: import.delivery_delay,
            price: import.price,
            delivery_date: import.delivery_date,
        })
        .collect();

    let imported_count = SupplierRepository::new(state.pool.clone())
        .create_many(&suppliers)
        .await?;

    tracing::info!(%analysis_id, imported_count, "Suppliers imported");

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            analysis_id,
            imported_count,
        }),
    ))
}

fn ingest_error(error: IngestError) -> ApiError {
    match &error {
        // Validator and cleaner disagreeing is a defect, not user input
        IngestError::Cleaning { supplier, field } => {
            tracing::error!(supplier = %supplier, field = %field, "Cleaning failed after validation");
            ApiError::new(ProcuraError::internal("Failed to process the uploaded file"))
        }
        _ => ApiError::new(ProcuraError::file_ingestion(error.to_string())),
    }
}

/// GET /api/v1/uploads/templates
///
/// The expected header set plus one example row per supported format.
pub async fn get_templates() -> Json<serde_json::Value> {
    Json(json!({
        "excel": {
            "headers": ["fournisseur", "produit", "quantite", "qualite", "delai", "prix", "date_livraison"],
            "example": [{
                "fournisseur": "Acme",
                "produit": "Widget",
                "quantite": 100,
                "qualite": 8.5,
                "delai": 5,
                "prix": 150.50,
                "date_livraison": "2024-01-15"
            }]
        },
        "csv": {
            "headers": "fournisseur,produit,quantite,qualite,delai,prix,date_livraison",
            "example": "Acme,Widget,100,8.5,5,150.50,2024-01-15"
        }
    }))
}
