pub mod csv;
pub mod fixture;

pub use self::csv::{coerce_value, load_series, read_series};
pub use fixture::{load_routes, parse_routes};

use crate::core::{Row, Series};
use crate::error::{Result, VizError};
use std::path::Path;

/// Input format detection result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Csv,
    Unknown,
}

/// Detect the format of an input file from its leading bytes
pub fn detect_format(data: &[u8]) -> InputFormat {
    let sample = match std::str::from_utf8(&data[..data.len().min(500)]) {
        Ok(text) => text,
        // a multi-byte char may be cut at the sample edge
        Err(e) if e.valid_up_to() > 0 => {
            std::str::from_utf8(&data[..e.valid_up_to()]).unwrap_or_default()
        }
        Err(_) => return InputFormat::Unknown,
    };

    let trimmed = sample.trim_start_matches('\u{feff}').trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return InputFormat::Json;
    }
    if trimmed.lines().next().is_some_and(|line| line.contains(',')) {
        return InputFormat::Csv;
    }
    InputFormat::Unknown
}

/// Load tabular data from a CSV file or a JSON array of row objects
pub fn load_table(path: &Path) -> Result<Series> {
    let data = std::fs::read(path)?;

    match detect_format(&data) {
        InputFormat::Csv => read_series(data.as_slice()),
        InputFormat::Json => {
            let rows: Vec<Row> = serde_json::from_slice(&data)?;
            Ok(series_from_rows(rows))
        }
        InputFormat::Unknown => Err(VizError::UnknownFormat(path.display().to_string())),
    }
}

/// Columns are collected in first-seen order across all rows
pub fn series_from_rows(rows: Vec<Row>) -> Series {
    let mut columns: Vec<String> = Vec::new();
    for row in &rows {
        for key in row.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }
    Series { columns, rows }
}
