//! Record cleaner.
//!
//! Converts validated raw rows into the canonical typed import shape.
//! Conversion failure after validation means the parser and validator
//! disagree; that surfaces as a loud `Cleaning` error, never a default.

use chrono::{DateTime, NaiveDate};

use super::parser::{CellValue, RawRow};
use super::IngestError;

/// A cleaned supplier row, ready for persistence under an analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct SupplierImport {
    pub name: String,
    pub product: String,
    pub quantity: i32,
    pub quality: f64,
    pub delivery_delay: i32,
    pub price: f64,
    pub delivery_date: NaiveDate,
}

/// Convert rows that already passed validation.
pub fn clean(rows: &[RawRow]) -> Result<Vec<SupplierImport>, IngestError> {
    rows.iter().map(clean_row).collect()
}

fn clean_row(row: &RawRow) -> Result<SupplierImport, IngestError> {
    let name = text(row, "fournisseur");

    let cleaning = |field: &str| IngestError::Cleaning {
        supplier: name.clone(),
        field: field.to_string(),
    };

    let quantity = number(row, "quantite").ok_or_else(|| cleaning("quantite"))?;
    let quality = number(row, "qualite").ok_or_else(|| cleaning("qualite"))?;
    let delivery_delay = number(row, "delai").ok_or_else(|| cleaning("delai"))?;
    let price = number(row, "prix").ok_or_else(|| cleaning("prix"))?;
    let delivery_date = parse_delivery_date(&text(row, "date_livraison"))
        .ok_or_else(|| cleaning("date_livraison"))?;

    Ok(SupplierImport {
        product: text(row, "produit"),
        quantity: quantity as i32, // truncating, matching the original importer
        quality,
        delivery_delay: delivery_delay as i32,
        price,
        delivery_date,
        name,
    })
}

/// Parse a delivery date: ISO `%Y-%m-%d`, RFC 3339, or `%d/%m/%Y`.
pub fn parse_delivery_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.date_naive());
    }
    NaiveDate::parse_from_str(raw, "%d/%m/%Y").ok()
}

fn text(row: &RawRow, field: &str) -> String {
    row.get(field)
        .map(|cell| cell.to_text().trim().to_string())
        .unwrap_or_default()
}

fn number(row: &RawRow, field: &str) -> Option<f64> {
    row.get(field).and_then(CellValue::as_number)
}

#[cfg(test)]
mod tests {
    use super::super::validator::validate;
    use super::*;
    use proptest::prelude::*;

    fn text_cell(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn raw_row(
        name: &str,
        product: &str,
        quantity: &str,
        quality: &str,
        delay: &str,
        price: &str,
        date: &str,
    ) -> RawRow {
        [
            ("fournisseur", name),
            ("produit", product),
            ("quantite", quantity),
            ("qualite", quality),
            ("delai", delay),
            ("prix", price),
            ("date_livraison", date),
        ]
        .into_iter()
        .map(|(k, v)| {
            let cell = if v.is_empty() {
                CellValue::Empty
            } else {
                text_cell(v)
            };
            (k.to_string(), cell)
        })
        .collect()
    }

    #[test]
    fn test_clean_canonical_row() {
        let rows = vec![raw_row(
            " Acme ",
            "Widget",
            "100",
            "8.5",
            "5",
            "150.50",
            "2024-01-15",
        )];

        let imports = clean(&rows).unwrap();
        assert_eq!(imports.len(), 1);
        let import = &imports[0];
        assert_eq!(import.name, "Acme");
        assert_eq!(import.product, "Widget");
        assert_eq!(import.quantity, 100);
        assert_eq!(import.quality, 8.5);
        assert_eq!(import.delivery_delay, 5);
        assert_eq!(import.price, 150.50);
        assert_eq!(
            import.delivery_date,
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
    }

    #[test]
    fn test_integers_truncate_not_round() {
        let rows = vec![raw_row(
            "Acme", "Widget", "99.9", "8.0", "4.7", "10.0", "2024-01-15",
        )];

        let import = &clean(&rows).unwrap()[0];
        assert_eq!(import.quantity, 99);
        assert_eq!(import.delivery_delay, 4);
    }

    #[test]
    fn test_date_formats() {
        assert_eq!(
            parse_delivery_date("2024-01-15"),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
        assert_eq!(
            parse_delivery_date("2024-01-15T10:30:00Z"),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
        assert_eq!(
            parse_delivery_date("15/01/2024"),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
        assert_eq!(parse_delivery_date("not a date"), None);
        assert_eq!(parse_delivery_date("2024-13-45"), None);
    }

    #[test]
    fn test_cleaning_error_names_supplier() {
        let rows = vec![raw_row("Acme", "Widget", "abc", "8.5", "5", "150.50", "2024-01-15")];

        match clean(&rows) {
            Err(IngestError::Cleaning { supplier, field }) => {
                assert_eq!(supplier, "Acme");
                assert_eq!(field, "quantite");
            }
            other => panic!("expected cleaning error, got {:?}", other),
        }
    }

    proptest! {
        /// Cleaning a row that passed validation never fails.
        #[test]
        fn prop_validated_rows_always_clean(
            name in "[A-Za-z][A-Za-z ]{0,20}",
            product in "[A-Za-z]{1,15}",
            quantity in 1u32..100_000,
            quality in 0.0f64..=10.0,
            delay in 0u32..365,
            price in 0.01f64..50_000.0,
            day in 1u32..=28,
            month in 1u32..=12,
        ) {
            let date = format!("2024-{:02}-{:02}", month, day);
            let rows = vec![raw_row(
                &name,
                &product,
                &quantity.to_string(),
                &format!("{:.2}", quality),
                &delay.to_string(),
                &format!("{:.2}", price),
                &date,
            )];

            prop_assume!(validate(&rows).is_empty());
            prop_assert!(clean(&rows).is_ok());
        }
    }
}
