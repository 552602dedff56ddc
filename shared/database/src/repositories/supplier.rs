//! Supplier Repository
//!
//! Bulk import and evaluation updates for supplier records.
//! Uses runtime SQL queries (unchecked) to avoid requiring DATABASE_URL at compile time.

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use procura_models::{Category, NewSupplier, SupplierRecord};

pub struct SupplierRepository {
    pool: PgPool,
}

impl SupplierRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert an imported batch inside one transaction. Returns the count.
    pub async fn create_many(&self, suppliers: &[NewSupplier]) -> Result<u64> {
        let mut tx = self.pool.begin().await.context("Failed to begin import transaction")?;

        for supplier in suppliers {
            sqlx::query(
                r#"
                INSERT INTO suppliers
                    (id, analysis_id, name, product, quantity, quality,
                     delivery_delay, price, delivery_date, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(supplier.analysis_id)
            .bind(&supplier.name)
            .bind(&supplier.product)
            .bind(supplier.quantity)
            .bind(supplier.quality)
            .bind(supplier.delivery_delay)
            .bind(supplier.price)
            .bind(supplier.delivery_date)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await
            .context("Failed to insert supplier")?;
        }

        tx.commit().await.context("Failed to commit import transaction")?;

        Ok(suppliers.len() as u64)
    }

    /// Suppliers of an analysis, best performance first
    pub async fn find_by_analysis(&self, analysis_id: Uuid) -> Result<Vec<SupplierRecord>> {
        let rows: Vec<SupplierRow> = sqlx::query_as(
            r#"
            SELECT id, analysis_id, name, product, quantity, quality,
                   delivery_delay, price, delivery_date, performance, category,
                   created_at, updated_at
            FROM suppliers
            WHERE analysis_id = $1
            ORDER BY performance DESC NULLS LAST, name
            "#,
        )
        .bind(analysis_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch suppliers for analysis")?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Write performance and category together; the pair is never split
    pub async fn set_evaluation(&self, id: Uuid, performance: f64, category: Category) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE suppliers
            SET performance = $2, category = $3, updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(performance)
        .bind(category.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .context("Failed to update supplier evaluation")?;

        Ok(())
    }

    /// Owner-wide supplier statistics
    pub async fn stats_for_owner(&self, owner_id: Uuid) -> Result<SupplierStats> {
        let row: StatsRow = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE s.category = 'EXCELLENT') AS excellent,
                COUNT(*) FILTER (WHERE s.category = 'GOOD') AS good,
                COUNT(*) FILTER (WHERE s.category = 'AVERAGE') AS average,
                COUNT(*) FILTER (WHERE s.category = 'POOR') AS poor,
                COUNT(*) FILTER (WHERE s.category = 'CRITICAL') AS critical,
                AVG(s.quality) AS avg_quality,
                AVG(s.delivery_delay::float8) AS avg_delivery_delay,
                AVG(s.price) AS avg_price
            FROM suppliers s
            JOIN analyses a ON a.id = s.analysis_id
            WHERE a.owner_id = $1
            "#,
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to aggregate supplier statistics")?;

        Ok(SupplierStats {
            total_suppliers: row.total,
            excellent: row.excellent,
            good: row.good,
            average: row.average,
            poor: row.poor,
            critical: row.critical,
            avg_quality: row.avg_quality.unwrap_or(0.0),
            avg_delivery_delay: row.avg_delivery_delay.unwrap_or(0.0),
            avg_price: row.avg_price.unwrap_or(0.0),
        })
    }
}

/// Aggregated supplier statistics for one owner
#[derive(Debug, Clone, Serialize)]
pub struct SupplierStats {
    pub total_suppliers: i64,
    pub excellent: i64,
    pub good: i64,
    pub average: i64,
    pub poor: i64,
    pub critical: i64,
    pub avg_quality: f64,
    pub avg_delivery_delay: f64,
    pub avg_price: f64,
}

#[derive(Debug, FromRow)]
struct StatsRow {
    total: i64,
    excellent: i64,
    good: i64,
    average: i64,
    poor: i64,
    critical: i64,
    avg_quality: Option<f64>,
    avg_delivery_delay: Option<f64>,
    avg_price: Option<f64>,
}

/// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct SupplierRow {
    id: Uuid,
    analysis_id: Uuid,
    name: String,
    product: String,
    quantity: i32,
    quality: f64,
    delivery_delay: i32,
    price: f64,
    delivery_date: NaiveDate,
    performance: Option<f64>,
    category: Option<String>,
    created_at: chrono::DateTime<Utc>,
    updated_at: chrono::DateTime<Utc>,
}

impl From<SupplierRow> for SupplierRecord {
    fn from(row: SupplierRow) -> Self {
        Self {
            id: row.id,
            analysis_id: row.analysis_id,
            name: row.name,
            product: row.product,
            quantity: row.quantity,
            quality: row.quality,
            delivery_delay: row.delivery_delay,
            price: row.price,
            delivery_date: row.delivery_date,
            performance: row.performance,
            category: row.category.as_deref().and_then(Category::from_str),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(performance: Option<f64>, category: Option<&str>) -> SupplierRow {
        SupplierRow {
            id: Uuid::new_v4(),
            analysis_id: Uuid::new_v4(),
            name: "Acme".to_string(),
            product: "Widget".to_string(),
            quantity: 100,
            quality: 8.5,
            delivery_delay: 5,
            price: 150.50,
            delivery_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            performance,
            category: category.map(str::to_string),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_conversion_maps_category() {
        let supplier: SupplierRecord = row(Some(84.0), Some("GOOD")).into();
        assert_eq!(supplier.evaluation(), Some((84.0, Category::Good)));
    }

    #[test]
    fn test_row_conversion_unevaluated() {
        let supplier: SupplierRecord = row(None, None).into();
        assert!(supplier.evaluation().is_none());
    }
}
