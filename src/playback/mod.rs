pub mod engine;
pub mod timer;

pub use engine::PlaybackEngine;
pub use timer::{TickControl, TimerHandle};

use crate::settings::ViewerSettings;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    /// No route bound, or the bound route has no waypoints
    Unbound,
    Stopped,
    Running,
}

/// Playback configuration
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    pub base_interval: Duration, // tick interval at 1x
    pub progress_resolution: u32,
    pub default_speed: f64,
    pub min_speed: f64,
    pub max_speed: f64,
    pub time_format: String,
    pub placeholder_label: String,
}

const FALLBACK_MIN_SPEED: f64 = 0.1;
const FALLBACK_MAX_SPEED: f64 = 10.0;

fn positive_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

impl PlaybackConfig {
    /// Ordered, positive `(min, max)` speed bounds, whatever the fields hold
    pub fn speed_range(&self) -> (f64, f64) {
        let lo = positive_or(self.min_speed, FALLBACK_MIN_SPEED);
        let hi = positive_or(self.max_speed, FALLBACK_MAX_SPEED);
        if lo <= hi {
            (lo, hi)
        } else {
            (hi, lo)
        }
    }

    /// Clamp a multiplier into the speed range. Never panics; NaN lands on the minimum.
    pub fn clamp_speed(&self, speed: f64) -> f64 {
        let (min, max) = self.speed_range();
        speed.max(min).min(max)
    }

    /// Starting multiplier: a non-positive or non-finite default falls back to 1x
    pub fn initial_speed(&self) -> f64 {
        self.clamp_speed(positive_or(self.default_speed, 1.0))
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self::from(&ViewerSettings::default())
    }
}

impl From<&ViewerSettings> for PlaybackConfig {
    fn from(s: &ViewerSettings) -> Self {
        let mut config = Self {
            base_interval: Duration::from_millis(s.base_interval_ms),
            progress_resolution: s.progress_resolution,
            default_speed: s.default_speed,
            min_speed: s.min_speed,
            max_speed: s.max_speed,
            time_format: s.time_format.clone(),
            placeholder_label: s.placeholder_label.clone(),
        };

        let (min_speed, max_speed) = config.speed_range();
        config.min_speed = min_speed;
        config.max_speed = max_speed;
        config.default_speed = config.initial_speed();
        config
    }
}

/// What the presentation layer renders after a tick or a scrub
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackFrame {
    pub index: usize,
    pub lat: f64,
    pub lng: f64,
    pub timestamp: DateTime<Utc>,
    pub label: String,
    /// Scrubber position in `0..=progress_resolution`
    pub progress: u32,
}

/// Notifications published by a [`PlaybackEngine`]
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    Frame(PlaybackFrame),
    Started { interval: Duration },
    Stopped,
    /// Reached the last waypoint and stopped on its own
    Finished,
}
