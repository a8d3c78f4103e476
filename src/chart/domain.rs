use crate::core::Row;
use serde::ser::SerializeTuple;
use serde::{Serialize, Serializer};

/// Tukey fence multiplier on the interquartile range
const FENCE_IQR_MULTIPLIER: f64 = 1.5;
/// Smallest upper bound handed out, so the axis never collapses to zero height
const MIN_UPPER_BOUND: f64 = 1.0;

/// Y-axis range for a chart.
///
/// Serializes as `["auto", "auto"]` or `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisDomain {
    Auto,
    Fixed { low: f64, high: f64 },
}

impl AxisDomain {
    pub fn bounds(&self) -> Option<(f64, f64)> {
        match self {
            AxisDomain::Auto => None,
            AxisDomain::Fixed { low, high } => Some((*low, *high)),
        }
    }
}

impl Serialize for AxisDomain {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        match self {
            AxisDomain::Auto => {
                tuple.serialize_element("auto")?;
                tuple.serialize_element("auto")?;
            }
            AxisDomain::Fixed { low, high } => {
                tuple.serialize_element(low)?;
                tuple.serialize_element(high)?;
            }
        }
        tuple.end()
    }
}

/// Outlier-resistant value range over all `dependent_keys`.
///
/// Values above `Q3 + 1.5 * IQR` are left out of the upper bound; quartiles use
/// plain rank indexing without interpolation. The lower bound is always 0.
pub fn compute_domain(rows: &[Row], dependent_keys: &[String]) -> AxisDomain {
    if rows.is_empty() || dependent_keys.is_empty() {
        return AxisDomain::Auto;
    }

    let mut values: Vec<f64> = rows
        .iter()
        .flat_map(|row| {
            dependent_keys
                .iter()
                .filter_map(move |key| row.get(key).and_then(|v| v.as_number()))
        })
        .collect();

    if values.is_empty() {
        return AxisDomain::Auto;
    }

    values.sort_by(f64::total_cmp);

    let n = values.len();
    let q1 = values[n / 4];
    let q3 = values[(n * 3) / 4];
    let upper_fence = q3 + FENCE_IQR_MULTIPLIER * (q3 - q1);

    let non_outlier_max = values
        .iter()
        .rev()
        .find(|v| **v <= upper_fence)
        .copied()
        .unwrap_or(q3);

    AxisDomain::Fixed {
        low: 0.0,
        high: non_outlier_max.max(MIN_UPPER_BOUND),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FieldValue;

    fn rows(key: &str, values: &[f64]) -> Vec<Row> {
        values
            .iter()
            .map(|v| Row::from([(key.to_string(), FieldValue::Number(*v))]))
            .collect()
    }

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_outlier_excluded() {
        let domain = compute_domain(&rows("y", &[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]), &keys(&["y"]));
        assert_eq!(domain, AxisDomain::Fixed { low: 0.0, high: 5.0 });
    }

    #[test]
    fn test_empty_inputs_are_auto() {
        assert_eq!(compute_domain(&[], &keys(&["y"])), AxisDomain::Auto);
        assert_eq!(compute_domain(&rows("y", &[1.0]), &[]), AxisDomain::Auto);
    }

    #[test]
    fn test_no_numeric_values_is_auto() {
        let data = vec![Row::from([("y".to_string(), FieldValue::Text("x".to_string()))])];
        assert_eq!(compute_domain(&data, &keys(&["y"])), AxisDomain::Auto);
        assert_eq!(compute_domain(&rows("z", &[1.0]), &keys(&["y"])), AxisDomain::Auto);
    }

    #[test]
    fn test_small_values_floor_at_one() {
        let domain = compute_domain(&rows("y", &[0.0, 0.1, 0.2]), &keys(&["y"]));
        assert_eq!(domain, AxisDomain::Fixed { low: 0.0, high: 1.0 });

        let negative = compute_domain(&rows("y", &[-5.0, -3.0]), &keys(&["y"]));
        assert_eq!(negative, AxisDomain::Fixed { low: 0.0, high: 1.0 });
    }

    #[test]
    fn test_flattens_multiple_keys() {
        let mut data = rows("a", &[10.0, 20.0, 30.0]);
        for (row, b) in data.iter_mut().zip([12.0, 22.0, 32.0]) {
            row.insert("b".to_string(), FieldValue::Number(b));
        }
        let domain = compute_domain(&data, &keys(&["a", "b"]));
        assert_eq!(domain, AxisDomain::Fixed { low: 0.0, high: 32.0 });
    }

    #[test]
    fn test_mock_dwell_hours_keep_spikes() {
        // spikes of 40 and 42 sit inside the fence for this spread
        let actual = [22.0, 25.0, 28.0, 24.0, 35.0, 32.0, 26.0, 27.0, 31.0, 40.0, 29.0, 30.0, 34.0, 37.0, 33.0, 25.0, 28.0, 42.0, 36.0, 29.0, 27.0, 31.0, 38.0, 35.0];
        let domain = compute_domain(&rows("actualHours", &actual), &keys(&["actualHours"]));
        assert_eq!(domain, AxisDomain::Fixed { low: 0.0, high: 42.0 });
    }

    #[test]
    fn test_serializes_like_axis_props() {
        assert_eq!(serde_json::to_string(&AxisDomain::Auto).unwrap(), r#"["auto","auto"]"#);
        let fixed = AxisDomain::Fixed { low: 0.0, high: 5.5 };
        assert_eq!(serde_json::to_string(&fixed).unwrap(), "[0.0,5.5]");
        assert_eq!(fixed.bounds(), Some((0.0, 5.5)));
    }
}
