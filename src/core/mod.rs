pub mod route;
pub mod series;

pub use route::{EventKind, EventVisibility, Route, RouteCatalog, RouteEvent, RouteSummary, Severity, Waypoint};
pub use series::{AxisKey, ChartData, FieldValue, Row, Series};
