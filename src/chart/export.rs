use crate::core::{FieldValue, Row, Series};
use crate::error::Result;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::io::Write;

fn cell(value: Option<&FieldValue>) -> String {
    match value {
        None | Some(FieldValue::Missing) => String::new(),
        Some(FieldValue::Bool(b)) => b.to_string(),
        // f64 Display already drops the fraction for integral values
        Some(FieldValue::Number(v)) => v.to_string(),
        Some(FieldValue::Text(s)) => s.clone(),
    }
}

/// Write a series as CSV: header row of `columns`, then one record per row
pub fn write_csv<W: Write>(series: &Series, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(&series.columns)?;

    for row in &series.rows {
        wtr.write_record(series.columns.iter().map(|c| cell(row.get(c))))?;
    }

    wtr.flush()?;
    Ok(())
}

/// Rows serialized as objects keyed in header order; absent cells become null
struct OrderedRows<'a>(&'a Series);

struct OrderedRow<'a> {
    columns: &'a [String],
    row: &'a Row,
}

impl Serialize for OrderedRows<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.rows.len()))?;
        for row in &self.0.rows {
            seq.serialize_element(&OrderedRow { columns: &self.0.columns, row })?;
        }
        seq.end()
    }
}

impl Serialize for OrderedRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for column in self.columns {
            map.serialize_entry(column, &self.row.get(column))?;
        }
        map.end()
    }
}

/// Write the rows as a pretty-printed JSON array, keys in header order
pub fn write_json<W: Write>(series: &Series, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, &OrderedRows(series))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Series {
        let mut series = Series::new(vec!["date".to_string(), "hours".to_string(), "note".to_string()]);
        series.push(Row::from([
            ("date".to_string(), FieldValue::from("2025-09-01")),
            ("hours".to_string(), FieldValue::Number(22.0)),
            ("note".to_string(), FieldValue::from("a, b")),
        ]));
        series.push(Row::from([
            ("date".to_string(), FieldValue::from("2025-09-02")),
            ("hours".to_string(), FieldValue::Number(24.5)),
            ("note".to_string(), FieldValue::Bool(true)),
        ]));
        series.push(Row::from([("date".to_string(), FieldValue::from("2025-09-03"))]));
        series
    }

    #[test]
    fn test_write_csv() {
        let mut out = Vec::new();
        write_csv(&sample(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "date,hours,note\n2025-09-01,22,\"a, b\"\n2025-09-02,24.5,true\n2025-09-03,,\n"
        );
    }

    #[test]
    fn test_write_json() {
        let mut out = Vec::new();
        write_json(&sample(), &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["hours"], 22.0);
        assert_eq!(value[1]["note"], true);
        assert!(value[2]["hours"].is_null());
        assert!(value[2]["note"].is_null());
        assert_eq!(value[2].as_object().unwrap().len(), 3);
    }

    #[test]
    fn test_write_json_follows_header_order() {
        let mut series = Series::new(vec!["zeta".to_string(), "alpha".to_string(), "mid".to_string()]);
        series.push(Row::from([
            ("alpha".to_string(), FieldValue::Number(1.0)),
            ("zeta".to_string(), FieldValue::from("z")),
        ]));

        let mut out = Vec::new();
        write_json(&series, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let zeta = text.find("\"zeta\"").unwrap();
        let alpha = text.find("\"alpha\"").unwrap();
        let mid = text.find("\"mid\"").unwrap();
        assert!(zeta < alpha && alpha < mid);
        assert!(text.contains("\"mid\": null"));
    }
}
