use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single cell of a tabular series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Missing,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Numeric view used by the chart heuristics. Only finite numbers count.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(v) if v.is_finite() => Some(*v),
            _ => None,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Number(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Number(v as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

/// One row of a series: field name to value. Absent keys read as missing.
pub type Row = BTreeMap<String, FieldValue>;

/// Rows plus the column order they were read in
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Series {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one column, `Missing` where a row lacks the key
    pub fn column<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a FieldValue> + 'a {
        static MISSING: FieldValue = FieldValue::Missing;
        self.rows.iter().map(move |r| r.get(key).unwrap_or(&MISSING))
    }
}

/// A plotted dependent key with its display attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisKey {
    pub key: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub name: String,
}

impl AxisKey {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            color: String::new(),
            name: key.to_string(),
        }
    }
}

/// A chart's data as handed over by the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub data_points: Vec<Row>,
    pub x_axis_key: String,
    #[serde(default)]
    pub y_axis_keys: Vec<AxisKey>,
    #[serde(default)]
    pub y_axis_unit: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_untagged_json() {
        let row: Row = serde_json::from_str(r#"{"a": 1.5, "b": "x", "c": null, "d": true}"#).unwrap();
        assert_eq!(row["a"], FieldValue::Number(1.5));
        assert_eq!(row["b"], FieldValue::Text("x".to_string()));
        assert_eq!(row["c"], FieldValue::Missing);
        assert_eq!(row["d"], FieldValue::Bool(true));
    }

    #[test]
    fn test_as_number_rejects_non_numeric() {
        assert_eq!(FieldValue::Number(2.0).as_number(), Some(2.0));
        assert_eq!(FieldValue::Number(f64::NAN).as_number(), None);
        assert_eq!(FieldValue::Text("2".to_string()).as_number(), None);
        assert_eq!(FieldValue::Bool(true).as_number(), None);
        assert_eq!(FieldValue::Missing.as_number(), None);
    }

    #[test]
    fn test_column_fills_missing() {
        let mut series = Series::new(vec!["x".to_string(), "y".to_string()]);
        series.push(Row::from([("x".to_string(), "a".into()), ("y".to_string(), 1i64.into())]));
        series.push(Row::from([("x".to_string(), "b".into())]));

        let ys: Vec<_> = series.column("y").cloned().collect();
        assert_eq!(ys, vec![FieldValue::Number(1.0), FieldValue::Missing]);
    }

    #[test]
    fn test_chart_data_camel_case() {
        let json = r##"{
            "dataPoints": [{"date": "2025-09-01", "actualHours": 22}],
            "xAxisKey": "date",
            "yAxisKeys": [{"key": "actualHours", "color": "#3B82F6", "name": "Actual"}],
            "yAxisUnit": "hours"
        }"##;
        let chart: ChartData = serde_json::from_str(json).unwrap();
        assert_eq!(chart.x_axis_key, "date");
        assert_eq!(chart.y_axis_keys[0].key, "actualHours");
        assert_eq!(chart.data_points.len(), 1);
    }
}
