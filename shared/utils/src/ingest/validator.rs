//! Batch row validator.
//!
//! Checks every parsed row against the required-field and type/range rules
//! and accumulates all issues before anything is accepted. Callers decide
//! how many issues to show; nothing is capped here.

use super::cleaner::parse_delivery_date;
use super::parser::{CellValue, RawRow};

/// Normalized header names every import must carry.
pub const REQUIRED_FIELDS: [&str; 7] = [
    "fournisseur",
    "produit",
    "quantite",
    "qualite",
    "delai",
    "prix",
    "date_livraison",
];

/// One offending row with all of its failing-field messages joined.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ValidationIssue {
    /// 1-based spreadsheet line number, counting the header line
    pub row: usize,
    pub message: String,
}

/// Validate the whole batch. An empty result means every row is acceptable.
pub fn validate(rows: &[RawRow]) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        let mut messages = Vec::new();

        for field in REQUIRED_FIELDS {
            if value(row, field).is_empty() {
                messages.push(format!("Missing field '{}'", field));
            }
        }

        // Type and range rules apply only to present fields
        let quantity = value(row, "quantite");
        if !quantity.is_empty() && !matches!(quantity.as_number(), Some(n) if n > 0.0) {
            messages.push("Quantity must be a positive number".to_string());
        }

        let quality = value(row, "qualite");
        if !quality.is_empty()
            && !matches!(quality.as_number(), Some(n) if (0.0..=10.0).contains(&n))
        {
            messages.push("Quality must be a number between 0 and 10".to_string());
        }

        let delay = value(row, "delai");
        if !delay.is_empty() && !matches!(delay.as_number(), Some(n) if n >= 0.0) {
            messages.push("Delay must be a positive number".to_string());
        }

        let price = value(row, "prix");
        if !price.is_empty() && !matches!(price.as_number(), Some(n) if n > 0.0) {
            messages.push("Price must be a positive number".to_string());
        }

        let delivery_date = value(row, "date_livraison");
        if !delivery_date.is_empty() && parse_delivery_date(&delivery_date.to_text()).is_none() {
            messages.push("Invalid delivery date".to_string());
        }

        if !messages.is_empty() {
            issues.push(ValidationIssue {
                // Map back to the spreadsheet line number, header included
                row: index + 2,
                message: messages.join(", "),
            });
        }
    }

    issues
}

fn value<'a>(row: &'a RawRow, field: &str) -> &'a CellValue {
    row.get(field).unwrap_or(&CellValue::Empty)
}
