//! Analysis Repository
//!
//! CRUD and lifecycle operations for analysis batches.
//! Uses runtime SQL queries (unchecked) to avoid requiring DATABASE_URL at compile time.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use procura_models::{Analysis, AnalysisStatus, NewAnalysis};

pub struct AnalysisRepository {
    pool: PgPool,
}

impl AnalysisRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new analysis in PENDING state
    pub async fn create(&self, analysis: NewAnalysis) -> Result<Analysis> {
        let row: AnalysisRow = sqlx::query_as(
            r#"
            INSERT INTO analyses (id, owner_id, title, description, status, fallback, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, FALSE, $6, $6)
            RETURNING id, owner_id, title, description, status, fallback, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(analysis.owner_id)
        .bind(&analysis.title)
        .bind(&analysis.description)
        .bind(AnalysisStatus::Pending.as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .context("Failed to create analysis")?;

        Ok(row.into())
    }

    /// Find an analysis owned by the given user
    pub async fn find_for_owner(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Analysis>> {
        let row: Option<AnalysisRow> = sqlx::query_as(
            r#"
            SELECT id, owner_id, title, description, status, fallback, created_at, updated_at
            FROM analyses
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch analysis")?;

        Ok(row.map(|r| r.into()))
    }

    /// List the owner's analyses, newest first, with optional status filter.
    /// Returns the page plus the total row count for pagination.
    pub async fn list_for_owner(
        &self,
        owner_id: Uuid,
        status: Option<AnalysisStatus>,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<Analysis>, i64)> {
        let offset = (page - 1) * limit;
        let status_str = status.map(|s| s.as_str().to_string());

        let rows: Vec<AnalysisRow> = sqlx::query_as(
            r#"
            SELECT id, owner_id, title, description, status, fallback, created_at, updated_at
            FROM analyses
            WHERE owner_id = $1 AND ($2::varchar IS NULL OR status = $2)
            ORDER BY created_at DESC
            OFFSET $3 LIMIT $4
            "#,
        )
        .bind(owner_id)
        .bind(&status_str)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list analyses")?;

        let total: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM analyses WHERE owner_id = $1 AND ($2::varchar IS NULL OR status = $2)",
        )
        .bind(owner_id)
        .bind(&status_str)
        .fetch_one(&self.pool)
        .await
        .context("Failed to count analyses")?;

        Ok((rows.into_iter().map(|r| r.into()).collect(), total.0))
    }

    /// Delete an owned analysis; suppliers and messages cascade
    pub async fn delete_for_owner(&self, id: Uuid, owner_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM analyses WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .context("Failed to delete analysis")?;

        Ok(result.rows_affected() > 0)
    }

    /// Set the run status
    pub async fn set_status(&self, id: Uuid, status: AnalysisStatus) -> Result<()> {
        sqlx::query("UPDATE analyses SET status = $2, updated_at = $3 WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .context("Failed to update analysis status")?;

        Ok(())
    }

    /// Mark a run finished: COMPLETED status, summary description, fallback flag
    pub async fn complete(&self, id: Uuid, summary: &str, fallback: bool) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE analyses
            SET status = $2, description = $3, fallback = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(AnalysisStatus::Completed.as_str())
        .bind(summary)
        .bind(fallback)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .context("Failed to complete analysis")?;

        Ok(())
    }

    /// Owner-wide dashboard statistics
    pub async fn stats_for_owner(&self, owner_id: Uuid) -> Result<AnalysisStats> {
        let counts: (i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COUNT(*) FILTER (WHERE status = 'COMPLETED'),
                COUNT(*) FILTER (WHERE status = 'PENDING'),
                COUNT(*) FILTER (WHERE status = 'FAILED')
            FROM analyses
            WHERE owner_id = $1
            "#,
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to aggregate analysis counts")?;

        let suppliers: (i64, Option<f64>) = sqlx::query_as(
            r#"
            SELECT COUNT(*), AVG(s.performance)
            FROM suppliers s
            JOIN analyses a ON a.id = s.analysis_id
            WHERE a.owner_id = $1
            "#,
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to aggregate supplier counts")?;

        Ok(AnalysisStats {
            total_analyses: counts.0,
            completed_analyses: counts.1,
            pending_analyses: counts.2,
            failed_analyses: counts.3,
            total_suppliers: suppliers.0,
            average_performance: suppliers.1.unwrap_or(0.0),
        })
    }
}

/// Aggregated analysis statistics for one owner
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisStats {
    pub total_analyses: i64,
    pub completed_analyses: i64,
    pub pending_analyses: i64,
    pub failed_analyses: i64,
    pub total_suppliers: i64,
    pub average_performance: f64,
}

/// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct AnalysisRow {
    id: Uuid,
    owner_id: Uuid,
    title: String,
    description: Option<String>,
    status: String,
    fallback: bool,
    created_at: chrono::DateTime<Utc>,
    updated_at: chrono::DateTime<Utc>,
}

impl From<AnalysisRow> for Analysis {
    fn from(row: AnalysisRow) -> Self {
        Self {
            id: row.id,
            owner_id: row.owner_id,
            title: row.title,
            description: row.description,
            status: AnalysisStatus::from_str(&row.status).unwrap_or(AnalysisStatus::Pending),
            fallback: row.fallback,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_conversion_parses_status() {
        let row = AnalysisRow {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            title: "Q1 suppliers".to_string(),
            description: None,
            status: "PROCESSING".to_string(),
            fallback: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let analysis: Analysis = row.into();
        assert_eq!(analysis.status, AnalysisStatus::Processing);
    }

    #[test]
    fn test_row_conversion_defaults_unknown_status() {
        let row = AnalysisRow {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            title: "Q1 suppliers".to_string(),
            description: Some("imported".to_string()),
            status: "UNKNOWN".to_string(),
            fallback: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let analysis: Analysis = row.into();
        assert_eq!(analysis.status, AnalysisStatus::Pending);
        assert!(analysis.fallback);
    }
}
