pub mod classify;
pub mod domain;
pub mod export;
pub mod plan;

pub use classify::{classify, infer_dependent_keys, ChartKind, KeyStats};
pub use domain::{compute_domain, AxisDomain};
pub use export::{write_csv, write_json};
pub use plan::{plan_chart, plan_series, resolve_y_keys, ChartPlan};
