use crate::core::{FieldValue, Row, Series};
use crate::error::Result;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Load a header + rows CSV file into a [`Series`]
pub fn load_series(path: &Path) -> Result<Series> {
    let file = std::fs::File::open(path)?;
    let series = read_series(file)?;
    debug!("Loaded {} rows ({} columns) from {}", series.len(), series.columns.len(), path.display());
    Ok(series)
}

pub fn read_series<R: Read>(reader: R) -> Result<Series> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let columns: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
    let mut series = Series::new(columns.clone());

    for result in rdr.records() {
        let record = result?;
        let row: Row = columns
            .iter()
            .zip(record.iter())
            .map(|(column, raw)| (column.clone(), coerce_value(raw)))
            .collect();
        series.push(row);
    }

    Ok(series)
}

/// Best-effort typing of a CSV cell.
///
/// - blank stays an empty string
/// - `null` / `none` become missing
/// - `true` / `yes` and `false` / `no` become booleans (any case)
/// - integer- or float-looking text becomes a number
/// - anything else is kept verbatim
pub fn coerce_value(raw: &str) -> FieldValue {
    let s = raw.trim();
    if s.is_empty() {
        return FieldValue::Text(String::new());
    }

    match s.to_ascii_lowercase().as_str() {
        "null" | "none" => return FieldValue::Missing,
        "true" | "yes" => return FieldValue::Bool(true),
        "false" | "no" => return FieldValue::Bool(false),
        _ => {}
    }

    if !s.contains(['.', 'e', 'E', '+']) {
        if let Ok(v) = s.parse::<i64>() {
            return FieldValue::Number(v as f64);
        }
    }

    match s.parse::<f64>() {
        Ok(v) => FieldValue::Number(v),
        Err(_) => FieldValue::Text(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_value() {
        assert_eq!(coerce_value("42"), FieldValue::Number(42.0));
        assert_eq!(coerce_value(" 3.5 "), FieldValue::Number(3.5));
        assert_eq!(coerce_value("1e-3"), FieldValue::Number(0.001));
        assert_eq!(coerce_value("-7"), FieldValue::Number(-7.0));
        assert_eq!(coerce_value("YES"), FieldValue::Bool(true));
        assert_eq!(coerce_value("False"), FieldValue::Bool(false));
        assert_eq!(coerce_value("None"), FieldValue::Missing);
        assert_eq!(coerce_value("   "), FieldValue::Text(String::new()));
        assert_eq!(coerce_value(" Route A"), FieldValue::Text(" Route A".to_string()));
    }

    #[test]
    fn test_read_series() {
        let data = "date,actualHours,predictedHours\n2025-09-01,22,21\n2025-09-02,25,\n2025-09-03,28\n";
        let series = read_series(data.as_bytes()).unwrap();

        assert_eq!(series.columns, vec!["date", "actualHours", "predictedHours"]);
        assert_eq!(series.len(), 3);
        assert_eq!(series.rows[0]["actualHours"], FieldValue::Number(22.0));
        assert_eq!(series.rows[1]["predictedHours"], FieldValue::Text(String::new()));
        // short record: trailing column absent
        assert!(series.rows[2].get("predictedHours").is_none());
    }
}
