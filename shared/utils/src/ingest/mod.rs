//! Spreadsheet ingestion pipeline.
//!
//! Uploaded bytes flow parser → validator → cleaner. The parser normalizes
//! headers and cell values into [`RawRow`]s, the validator accumulates every
//! issue across the whole batch, and the cleaner converts validated rows
//! into typed [`SupplierImport`]s ready for persistence. Nothing in this
//! module touches storage.

pub mod cleaner;
pub mod parser;
pub mod validator;

pub use cleaner::{clean, parse_delivery_date, SupplierImport};
pub use parser::{parse_bytes, CellValue, FileFormat, RawRow};
pub use validator::{validate, ValidationIssue, REQUIRED_FIELDS};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("File must contain a header row and at least one data row")]
    EmptyFile,

    #[error("Unsupported file format '{extension}'. Use Excel (.xlsx, .xls) or CSV")]
    UnsupportedFormat { extension: String },

    #[error("Failed to read workbook: {0}")]
    Workbook(String),

    #[error("Failed to convert field '{field}' for supplier '{supplier}'")]
    Cleaning { supplier: String, field: String },
}
