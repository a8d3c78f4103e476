use crate::chart::classify::{classify, infer_dependent_keys, ChartKind};
use crate::chart::domain::{compute_domain, AxisDomain};
use crate::core::{ChartData, Series};
use serde::Serialize;

/// How the dashboard should draw one chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPlan {
    pub kind: ChartKind,
    pub y_keys: Vec<String>,
    pub domain: AxisDomain,
}

impl ChartPlan {
    /// Plan used when there is no data at all
    pub fn empty() -> Self {
        Self {
            kind: ChartKind::Line,
            y_keys: Vec::new(),
            domain: AxisDomain::Auto,
        }
    }
}

/// Explicit overrides win, then the chart's declared axis keys, then the first row's fields.
pub fn resolve_y_keys(chart: &ChartData, overrides: Option<&[String]>) -> Vec<String> {
    if let Some(keys) = overrides.filter(|k| !k.is_empty()) {
        return keys.to_vec();
    }
    if !chart.y_axis_keys.is_empty() {
        return chart.y_axis_keys.iter().map(|k| k.key.clone()).collect();
    }
    infer_dependent_keys(&chart.data_points, &chart.x_axis_key)
}

pub fn plan_chart(chart: Option<&ChartData>, overrides: Option<&[String]>) -> ChartPlan {
    let Some(chart) = chart else {
        return ChartPlan::empty();
    };

    let y_keys = resolve_y_keys(chart, overrides);
    ChartPlan {
        kind: classify(&chart.data_points, &chart.x_axis_key, Some(&y_keys)),
        domain: compute_domain(&chart.data_points, &y_keys),
        y_keys,
    }
}

/// Plan a loaded series against an x column
pub fn plan_series(series: &Series, x_key: &str, overrides: Option<&[String]>) -> ChartPlan {
    let y_keys = match overrides.filter(|k| !k.is_empty()) {
        Some(keys) => keys.to_vec(),
        None => series
            .columns
            .iter()
            .filter(|c| c.as_str() != x_key)
            .cloned()
            .collect(),
    };

    ChartPlan {
        kind: classify(&series.rows, x_key, Some(&y_keys)),
        domain: compute_domain(&series.rows, &y_keys),
        y_keys,
    }
}
