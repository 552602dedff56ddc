//! Supplier record models.
//!
//! A supplier record is one imported spreadsheet row: the order facts
//! (quantity, quality, delay, price, delivery date) plus the evaluation
//! fields filled in by an analysis run. Performance and category are either
//! both unset or both set; `set_evaluation` is the only mutation path.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Discretized performance tier for a supplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Excellent,
    Good,
    Average,
    Poor,
    Critical,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "EXCELLENT",
            Self::Good => "GOOD",
            Self::Average => "AVERAGE",
            Self::Poor => "POOR",
            Self::Critical => "CRITICAL",
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "EXCELLENT" => Some(Self::Excellent),
            "GOOD" => Some(Self::Good),
            "AVERAGE" => Some(Self::Average),
            "POOR" => Some(Self::Poor),
            "CRITICAL" => Some(Self::Critical),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One imported supplier order row with its evaluation state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupplierRecord {
    pub id: Uuid,
    pub analysis_id: Uuid,
    pub name: String,
    pub product: String,
    pub quantity: i32,
    /// Quality grade in [0, 10]
    pub quality: f64,
    /// Delivery delay in days, 0 when on time
    pub delivery_delay: i32,
    pub price: f64,
    pub delivery_date: NaiveDate,
    pub performance: Option<f64>,
    pub category: Option<Category>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SupplierRecord {
    /// Both evaluation fields, or neither.
    pub fn evaluation(&self) -> Option<(f64, Category)> {
        match (self.performance, self.category) {
            (Some(performance), Some(category)) => Some((performance, category)),
            _ => None,
        }
    }

    /// Set performance and category together.
    pub fn set_evaluation(&mut self, performance: f64, category: Category) {
        self.performance = Some(performance);
        self.category = Some(category);
        self.updated_at = Utc::now();
    }

    pub fn is_evaluated(&self) -> bool {
        self.evaluation().is_some()
    }
}

/// Insert shape for an imported supplier row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSupplier {
    pub analysis_id: Uuid,
    pub name: String,
    pub product: String,
    pub quantity: i32,
    pub quality: f64,
    pub delivery_delay: i32,
    pub price: f64,
    pub delivery_date: NaiveDate,
}
