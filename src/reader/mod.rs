pub mod csv_reader;
pub mod json_reader;
pub mod xlsx_reader;

pub use csv_reader::{read_csv, read_csv_path};
pub use json_reader::{read_json, read_json_path};
pub use xlsx_reader::read_workbook_path;

use anyhow::{bail, Result};
use std::path::Path;

use crate::models::RowSet;

/// Dispatches a source file to the matching reader by extension. Any parse
/// failure here is fatal for the whole batch; no partial output is produced.
pub fn read_source(path: &Path) -> Result<RowSet> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => read_csv_path(path),
        "xlsx" | "xls" => read_workbook_path(path),
        "json" => read_json_path(path),
        other => bail!("Unsupported source file type: '{}'", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_extension_rejected() {
        assert!(read_source(Path::new("products.pdf")).is_err());
        assert!(read_source(Path::new("products")).is_err());
    }

    #[test]
    fn test_both_spreadsheet_extensions_dispatch() {
        for name in ["missing.xlsx", "missing.xls"] {
            let error = read_source(Path::new(name)).unwrap_err();
            assert!(
                format!("{:#}", error).contains("Excel"),
                "{name} should reach the workbook reader"
            );
        }
    }
}
