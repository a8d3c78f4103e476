use crate::core::Row;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Keys whose values take at most this many distinct numbers look categorical
const MAX_CATEGORICAL_DISTINCT: usize = 8;
/// More distinct numbers than this on any key looks continuous
const MIN_CONTINUOUS_DISTINCT: usize = 12;
const COUNT_INTEGRAL_FRACTION: f64 = 0.8;
const COUNT_ZERO_FRACTION: f64 = 0.2;

/// Rendering strategy for a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartKind::Line => f.write_str("line"),
            ChartKind::Bar => f.write_str("bar"),
        }
    }
}

/// Numeric profile of one dependent key
#[derive(Debug, Clone, PartialEq)]
pub struct KeyStats {
    pub key: String,
    pub count: usize,
    pub distinct: usize,
    pub zero_fraction: f64,
    pub integral_fraction: f64,
}

impl KeyStats {
    pub fn compute(rows: &[Row], key: &str) -> Self {
        let values: Vec<f64> = rows
            .iter()
            .filter_map(|row| row.get(key).and_then(|v| v.as_number()))
            .collect();

        // -0.0 and 0.0 are the same value here
        let distinct = values
            .iter()
            .map(|v| if *v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() })
            .collect::<HashSet<_>>()
            .len();
        let zeros = values.iter().filter(|v| **v == 0.0).count();
        let integral = values.iter().filter(|v| v.fract() == 0.0).count();

        let count = values.len();
        let fraction = |n: usize| if count == 0 { 0.0 } else { n as f64 / count as f64 };

        Self {
            key: key.to_string(),
            count,
            distinct,
            zero_fraction: fraction(zeros),
            integral_fraction: fraction(integral),
        }
    }

    fn looks_categorical(&self) -> bool {
        self.distinct <= MAX_CATEGORICAL_DISTINCT && self.count > 0
    }

    fn looks_continuous(&self) -> bool {
        self.distinct > MIN_CONTINUOUS_DISTINCT
    }

    fn looks_like_counts(&self) -> bool {
        self.integral_fraction > COUNT_INTEGRAL_FRACTION && self.zero_fraction > COUNT_ZERO_FRACTION
    }
}

/// Every field of the first row except the independent key
pub fn infer_dependent_keys(rows: &[Row], independent_key: &str) -> Vec<String> {
    rows.first()
        .map(|first| {
            first
                .keys()
                .filter(|k| k.as_str() != independent_key)
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

/// Decide between a continuous (line) and categorical (bar) rendering.
///
/// `dependent_keys` of `None` or an empty slice means "infer from the first row".
/// Rules, first match wins:
/// 1. every key has at most 8 distinct numbers (and at least one number): bar
/// 2. any key has more than 12 distinct numbers: line
/// 3. any key is over 80% integral and over 20% zero: bar
/// 4. otherwise: line
pub fn classify(rows: &[Row], independent_key: &str, dependent_keys: Option<&[String]>) -> ChartKind {
    if rows.is_empty() {
        return ChartKind::Line;
    }

    let inferred;
    let keys = match dependent_keys {
        Some(keys) if !keys.is_empty() => keys,
        _ => {
            inferred = infer_dependent_keys(rows, independent_key);
            inferred.as_slice()
        }
    };

    let stats: Vec<KeyStats> = keys.iter().map(|k| KeyStats::compute(rows, k)).collect();
    classify_stats(&stats)
}

pub fn classify_stats(stats: &[KeyStats]) -> ChartKind {
    // Vacuously true for no keys, as in `Iterator::all`
    if stats.iter().all(KeyStats::looks_categorical) {
        return ChartKind::Bar;
    }
    if stats.iter().any(KeyStats::looks_continuous) {
        return ChartKind::Line;
    }
    if stats.iter().any(KeyStats::looks_like_counts) {
        return ChartKind::Bar;
    }
    ChartKind::Line
}
