use anyhow::{anyhow, Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

use crate::models::{RawRow, RowSet, SourceKind};

/// Parses the first worksheet of an Excel workbook into a `RowSet`. Format
/// detection handles both OOXML (.xlsx) and legacy binary (.xls) containers.
/// The first row supplies the column names; every cell is stringified, with
/// integral floats rendered without a trailing `.0`.
pub fn read_workbook_path(path: &Path) -> Result<RowSet> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open Excel file: {}", path.display()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| anyhow!("No worksheet found in Excel file"))?
        .context("Failed to read Excel range")?;

    let mut row_iter = range.rows();
    let columns: Vec<String> = row_iter
        .next()
        .ok_or_else(|| anyhow!("Excel worksheet is empty"))?
        .iter()
        .map(cell_to_string)
        .collect();

    let mut rows = Vec::new();
    for cells in row_iter {
        let row: RawRow = columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                let value = cells.get(i).map(cell_to_string).unwrap_or_default();
                (column.clone(), value)
            })
            .collect();

        rows.push(row);
    }

    Ok(RowSet {
        source: SourceKind::Xlsx,
        columns,
        rows,
    })
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => format!("{}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_stringification() {
        assert_eq!(cell_to_string(&Data::String("Cap".to_string())), "Cap");
        assert_eq!(cell_to_string(&Data::Float(199.0)), "199");
        assert_eq!(cell_to_string(&Data::Float(19.5)), "19.5");
        assert_eq!(cell_to_string(&Data::Int(5)), "5");
        assert_eq!(cell_to_string(&Data::Empty), "");
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let result = read_workbook_path(Path::new("/nonexistent/products.xlsx"));
        assert!(result.is_err());

        // Legacy binary workbooks go through the same format-detecting open.
        let result = read_workbook_path(Path::new("/nonexistent/products.xls"));
        assert!(result.is_err());
    }
}
