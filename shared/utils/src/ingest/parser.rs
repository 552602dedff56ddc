//! Spreadsheet parser.
//!
//! Reads uploaded CSV or Excel bytes into loosely typed rows keyed by
//! normalized column names. The first sheet / first line is the header row.

use std::collections::HashMap;

use super::IngestError;

/// Supported upload formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Excel, // XLSX/XLS
}

impl FileFormat {
    /// Detect format from a file extension, with or without the leading dot.
    pub fn from_extension(extension: &str) -> Option<Self> {
        let ext = extension.trim_start_matches('.').to_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xls" => Some(Self::Excel),
            _ => None,
        }
    }
}

/// A single cell after parsing. Blank and absent cells collapse to `Empty`
/// so validation has one representation of "missing".
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Numeric view: numbers pass through, text is parsed, empty is None.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
            CellValue::Empty => None,
        }
    }

    /// Textual view; numbers render without a trailing `.0` for integers.
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            CellValue::Empty => String::new(),
        }
    }
}

/// One parsed data row keyed by normalized header name.
pub type RawRow = HashMap<String, CellValue>;

/// Lower-case, trim, and collapse internal whitespace runs to underscores:
/// "Date Livraison " → "date_livraison".
pub fn normalize_header(header: &str) -> String {
    header
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Parse uploaded file bytes according to the declared extension.
pub fn parse_bytes(data: &[u8], extension: &str) -> Result<Vec<RawRow>, IngestError> {
    let format = FileFormat::from_extension(extension).ok_or_else(|| {
        IngestError::UnsupportedFormat {
            extension: extension.to_string(),
        }
    })?;

    let rows = match format {
        FileFormat::Csv => parse_csv(data)?,
        FileFormat::Excel => parse_excel(data)?,
    };

    if rows.is_empty() {
        return Err(IngestError::EmptyFile);
    }

    Ok(rows)
}

fn parse_csv(data: &[u8]) -> Result<Vec<RawRow>, IngestError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(data);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| IngestError::Workbook(e.to_string()))?
        .iter()
        .map(normalize_header)
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(IngestError::EmptyFile);
    }

    let mut rows = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        match result {
            Ok(record) => {
                let row: RawRow = headers
                    .iter()
                    .enumerate()
                    .map(|(i, header)| {
                        let cell = match record.get(i).map(str::trim) {
                            Some(value) if !value.is_empty() => {
                                CellValue::Text(value.to_string())
                            }
                            _ => CellValue::Empty,
                        };
                        (header.clone(), cell)
                    })
                    .collect();

                // Skip fully blank lines
                if row.values().all(CellValue::is_empty) {
                    continue;
                }

                rows.push(row);
            }
            Err(e) => {
                // One bad line never aborts the whole parse
                tracing::warn!("Skipping malformed CSV line {}: {}", idx + 2, e);
            }
        }
    }

    Ok(rows)
}

fn parse_excel(data: &[u8]) -> Result<Vec<RawRow>, IngestError> {
    use calamine::{open_workbook_from_rs, DataType, Reader, Xlsx};

    let cursor = std::io::Cursor::new(data);
    let mut workbook: Xlsx<std::io::Cursor<&[u8]>> =
        open_workbook_from_rs(cursor).map_err(|e: calamine::XlsxError| IngestError::Workbook(e.to_string()))?;

    // First sheet only
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| IngestError::Workbook("No sheets found in workbook".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .ok_or_else(|| IngestError::Workbook(format!("Missing worksheet '{}'", sheet_name)))?
        .map_err(|e| IngestError::Workbook(e.to_string()))?;

    let mut rows_iter = range.rows();

    // First row is headers
    let headers: Vec<String> = rows_iter
        .next()
        .ok_or(IngestError::EmptyFile)?
        .iter()
        .map(|cell: &DataType| normalize_header(&cell.to_string()))
        .collect();

    let mut rows = Vec::new();

    for row in rows_iter {
        let parsed: RawRow = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let cell = row.get(i).map(convert_cell).unwrap_or(CellValue::Empty);
                (header.clone(), cell)
            })
            .collect();

        if parsed.values().all(CellValue::is_empty) {
            continue;
        }

        rows.push(parsed);
    }

    Ok(rows)
}

fn convert_cell(cell: &calamine::DataType) -> CellValue {
    use calamine::DataType;

    match cell {
        DataType::Empty => CellValue::Empty,
        DataType::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                CellValue::Empty
            } else {
                CellValue::Text(trimmed.to_string())
            }
        }
        DataType::Float(f) => CellValue::Number(*f),
        DataType::Int(i) => CellValue::Number(*i as f64),
        DataType::Bool(b) => CellValue::Text(b.to_string()),
        // Excel serial dates normalize to ISO text for the date parser
        DataType::DateTime(_) => cell
            .as_datetime()
            .map(|dt| CellValue::Text(dt.format("%Y-%m-%d").to_string()))
            .unwrap_or(CellValue::Empty),
        other => CellValue::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(FileFormat::from_extension(".csv"), Some(FileFormat::Csv));
        assert_eq!(FileFormat::from_extension("csv"), Some(FileFormat::Csv));
        assert_eq!(FileFormat::from_extension(".XLSX"), Some(FileFormat::Excel));
        assert_eq!(FileFormat::from_extension(".xls"), Some(FileFormat::Excel));
        assert_eq!(FileFormat::from_extension(".txt"), None);
        assert_eq!(FileFormat::from_extension(""), None);
    }

    #[test]
    fn test_header_normalization() {
        assert_eq!(normalize_header("Date Livraison "), "date_livraison");
        assert_eq!(normalize_header("  PRIX  "), "prix");
        assert_eq!(normalize_header("delai   de   paiement"), "delai_de_paiement");
    }

    #[test]
    fn test_csv_parsing() {
        let data = b"Fournisseur,Produit,Quantite,Date Livraison\nAcme,Widget,100,2024-01-15\nGlobex,Gadget,50,2024-02-01";

        let rows = parse_bytes(data, ".csv").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["fournisseur"], CellValue::Text("Acme".to_string()));
        assert_eq!(rows[0]["date_livraison"], CellValue::Text("2024-01-15".to_string()));
        assert_eq!(rows[1]["quantite"], CellValue::Text("50".to_string()));
    }

    #[test]
    fn test_missing_cells_become_empty() {
        let data = b"fournisseur,produit,prix\nAcme,,\n";

        let rows = parse_bytes(data, ".csv").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["produit"], CellValue::Empty);
        assert_eq!(rows[0]["prix"], CellValue::Empty);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let data = b"fournisseur,produit\nAcme,Widget\n,\nGlobex,Gadget\n";

        let rows = parse_bytes(data, ".csv").unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_header_only_is_empty_file() {
        let data = b"fournisseur,produit,quantite\n";
        assert!(matches!(parse_bytes(data, ".csv"), Err(IngestError::EmptyFile)));
    }

    #[test]
    fn test_unsupported_extension() {
        let result = parse_bytes(b"anything", ".pdf");
        assert!(matches!(
            result,
            Err(IngestError::UnsupportedFormat { extension }) if extension == ".pdf"
        ));
    }

    #[test]
    fn test_cell_value_views() {
        assert_eq!(CellValue::Number(8.5).as_number(), Some(8.5));
        assert_eq!(CellValue::Text("8.5".to_string()).as_number(), Some(8.5));
        assert_eq!(CellValue::Text("abc".to_string()).as_number(), None);
        assert_eq!(CellValue::Empty.as_number(), None);

        assert_eq!(CellValue::Number(100.0).to_text(), "100");
        assert_eq!(CellValue::Number(150.5).to_text(), "150.5");
        assert_eq!(CellValue::Empty.to_text(), "");
    }

    proptest! {
        /// Well-formed CSV with no blank lines always yields one row per
        /// data line.
        #[test]
        fn prop_row_count_matches_input(names in proptest::collection::vec("[A-Za-z]{1,12}", 1..20)) {
            let mut data = String::from("fournisseur,produit\n");
            for name in &names {
                data.push_str(&format!("{},Widget\n", name));
            }

            let rows = parse_bytes(data.as_bytes(), ".csv").unwrap();
            prop_assert_eq!(rows.len(), names.len());
        }
    }
}
