use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;

use crate::models::{RawRow, RowSet, SourceKind};

/// Parses delimited text into a `RowSet`. The first record supplies the
/// column names; short rows pad missing cells with empty strings.
pub fn read_csv(input: impl Read) -> Result<RowSet> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(input);

    let columns: Vec<String> = reader
        .headers()
        .context("Failed to read CSV header row")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.context("Failed to parse CSV record")?;

        let row: RawRow = columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                let value = record.get(i).unwrap_or("").to_string();
                (column.clone(), value)
            })
            .collect();

        rows.push(row);
    }

    Ok(RowSet {
        source: SourceKind::Csv,
        columns,
        rows,
    })
}

pub fn read_csv_path(path: &Path) -> Result<RowSet> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;
    read_csv(file)
}
