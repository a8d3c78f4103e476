//! Route playback and chart heuristics for a map/dashboard viewer.
//!
//! [`playback`] animates a vehicle along a route's waypoints on a cancellable
//! timer. [`chart`] classifies tabular series as line or bar and computes an
//! outlier-resistant y-axis range. The two share no state.

pub mod chart;
pub mod core;
pub mod error;
pub mod input;
pub mod playback;
pub mod settings;

pub use error::{Result, VizError};
