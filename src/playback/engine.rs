use crate::core::{Route, Waypoint};
use crate::playback::timer::{TickControl, TimerHandle};
use crate::playback::{PlaybackConfig, PlaybackEvent, PlaybackFrame, PlaybackStatus};
use std::fmt::Write;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// State shared between the engine and its timer task
struct Cursor {
    path: Vec<Waypoint>,
    index: usize,
    running: bool,
    /// Bumped whenever the timer is replaced or cancelled; stale ticks compare against it.
    generation: u64,
}

/// Result of one timer-driven advance
#[derive(Debug, PartialEq)]
enum Step {
    Advanced,
    /// Moved onto the final waypoint
    ReachedEnd,
    /// Already at the final waypoint, nothing to move
    AtEnd,
}

impl Cursor {
    fn last_index(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    fn advance(&mut self) -> Step {
        if self.path.is_empty() || self.index >= self.last_index() {
            self.running = false;
            return Step::AtEnd;
        }

        self.index += 1;
        if self.index == self.last_index() {
            self.running = false;
            Step::ReachedEnd
        } else {
            Step::Advanced
        }
    }

    fn frame(&self, config: &PlaybackConfig) -> Option<PlaybackFrame> {
        let point = self.path.get(self.index)?;
        Some(PlaybackFrame {
            index: self.index,
            lat: point.lat,
            lng: point.lng,
            timestamp: point.timestamp,
            label: format_time(point, &config.time_format),
            progress: progress_for(self.index, self.path.len(), config.progress_resolution),
        })
    }
}

/// Time-indexed route playback.
///
/// Advances one waypoint per tick at `base_interval / speed`, independent of how
/// the timestamps are spaced. Owns at most one live timer; every start or speed
/// change goes through `reschedule`.
pub struct PlaybackEngine {
    cursor: Arc<Mutex<Cursor>>,
    config: Arc<PlaybackConfig>,
    speed: f64,
    route_id: Option<String>,
    timer: Option<TimerHandle>,
    runtime: Handle,
    events: mpsc::UnboundedSender<PlaybackEvent>,
}

impl PlaybackEngine {
    pub fn new(config: PlaybackConfig, runtime: Handle) -> (Self, mpsc::UnboundedReceiver<PlaybackEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let speed = config.initial_speed();

        let engine = Self {
            cursor: Arc::new(Mutex::new(Cursor {
                path: Vec::new(),
                index: 0,
                running: false,
                generation: 0,
            })),
            config: Arc::new(config),
            speed,
            route_id: None,
            timer: None,
            runtime,
            events,
        };

        (engine, rx)
    }

    fn lock(&self) -> MutexGuard<'_, Cursor> {
        self.cursor.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Bind a route and rewind to its first waypoint.
    ///
    /// An empty path leaves the engine unbound with inert controls.
    pub fn reset(&mut self, route: &Route) {
        self.cancel_timer();
        {
            let mut cursor = self.lock();
            cursor.path = route.path.clone();
            cursor.index = 0;
        }
        self.route_id = Some(route.id.clone());

        if route.is_playable() {
            info!("Bound route {} ({} waypoints)", route.id, route.path.len());
        } else {
            warn!("Route {} has no waypoints, playback disabled", route.id);
        }
        self.publish_frame();
    }

    /// Back to index 0 on the current route, timer cancelled
    pub fn rewind(&mut self) {
        self.cancel_timer();
        self.lock().index = 0;
        self.publish_frame();
    }

    /// Drop the bound route
    pub fn clear(&mut self) {
        self.cancel_timer();
        {
            let mut cursor = self.lock();
            cursor.path.clear();
            cursor.index = 0;
        }
        self.route_id = None;
        debug!("Playback cleared");
    }

    /// Start ticking. No-op without waypoints or when already running.
    pub fn play(&mut self) {
        {
            let cursor = self.lock();
            if cursor.path.is_empty() || cursor.running {
                return;
            }
        }
        self.reschedule();
    }

    /// Stop ticking. Idempotent.
    pub fn pause(&mut self) {
        if self.cancel_timer() {
            debug!("Playback paused at {}", self.position());
            let _ = self.events.send(PlaybackEvent::Stopped);
        }
    }

    /// Change the speed multiplier, clamped to the configured range.
    ///
    /// A running timer is swapped for one at the new interval; the index is untouched.
    pub fn set_speed(&mut self, multiplier: f64) {
        if !multiplier.is_finite() {
            warn!("Ignoring non-finite playback speed {}", multiplier);
            return;
        }
        self.speed = self.config.clamp_speed(multiplier);
        debug!("Playback speed set to {:.2}x", self.speed);

        if self.is_running() {
            self.reschedule();
        }
    }

    /// Jump to `fraction` of the path (clamped to `[0, 1]`). Run state is left as is.
    pub fn seek(&mut self, fraction: f64) {
        {
            let mut cursor = self.lock();
            if cursor.path.is_empty() {
                return;
            }
            let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
            let last = cursor.last_index();
            let target = (fraction * last as f64).round() as usize;
            cursor.index = target.min(last);
        }
        self.publish_frame();
    }

    /// Seek from a raw scrubber value in `0..=progress_resolution`
    pub fn seek_progress(&mut self, value: u32) {
        let resolution = self.config.progress_resolution;
        let fraction = if resolution == 0 {
            0.0
        } else {
            value as f64 / resolution as f64
        };
        self.seek(fraction);
    }

    pub fn status(&self) -> PlaybackStatus {
        let cursor = self.lock();
        if cursor.path.is_empty() {
            PlaybackStatus::Unbound
        } else if cursor.running {
            PlaybackStatus::Running
        } else {
            PlaybackStatus::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.lock().running
    }

    pub fn position(&self) -> usize {
        self.lock().index
    }

    pub fn len(&self) -> usize {
        self.lock().path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().path.is_empty()
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn route_id(&self) -> Option<&str> {
        self.route_id.as_deref()
    }

    /// Tick interval at the current speed
    pub fn interval(&self) -> Duration {
        self.config.base_interval.div_f64(self.speed)
    }

    /// Marker position and label for the current index
    pub fn current_frame(&self) -> Option<PlaybackFrame> {
        self.lock().frame(&self.config)
    }

    /// Display timestamp for the current index, or the placeholder when unbound
    pub fn time_label(&self) -> String {
        let cursor = self.lock();
        match cursor.path.get(cursor.index) {
            Some(point) => format_time(point, &self.config.time_format),
            None => self.config.placeholder_label.clone(),
        }
    }

    /// Install a fresh timer at the current interval, replacing any live one.
    fn reschedule(&mut self) {
        let interval = self.interval();

        let generation = {
            let mut cursor = self.lock();
            cursor.generation += 1;
            cursor.running = true;
            cursor.generation
        };
        // Old task can no longer advance: its generation is stale
        self.timer = None;

        let cursor = Arc::clone(&self.cursor);
        let config = Arc::clone(&self.config);
        let events = self.events.clone();

        self.timer = Some(TimerHandle::spawn(&self.runtime, interval, move || {
            let mut cursor = cursor.lock().unwrap_or_else(PoisonError::into_inner);
            if cursor.generation != generation || !cursor.running {
                return TickControl::Stop;
            }

            match cursor.advance() {
                Step::Advanced => {
                    if let Some(frame) = cursor.frame(&config) {
                        let _ = events.send(PlaybackEvent::Frame(frame));
                    }
                    TickControl::Continue
                }
                Step::ReachedEnd => {
                    if let Some(frame) = cursor.frame(&config) {
                        let _ = events.send(PlaybackEvent::Frame(frame));
                    }
                    info!("Playback finished at {}", cursor.index);
                    let _ = events.send(PlaybackEvent::Finished);
                    TickControl::Stop
                }
                Step::AtEnd => {
                    let _ = events.send(PlaybackEvent::Finished);
                    TickControl::Stop
                }
            }
        }));

        debug!("Playback timer scheduled every {:?}", interval);
        let _ = self.events.send(PlaybackEvent::Started { interval });
    }

    /// Cancel the live timer. Returns whether playback was running.
    fn cancel_timer(&mut self) -> bool {
        let was_running = {
            let mut cursor = self.lock();
            cursor.generation += 1;
            std::mem::replace(&mut cursor.running, false)
        };
        self.timer = None;
        was_running
    }

    fn publish_frame(&self) {
        if let Some(frame) = self.current_frame() {
            let _ = self.events.send(PlaybackEvent::Frame(frame));
        }
    }
}

fn format_time(point: &Waypoint, pattern: &str) -> String {
    let mut label = String::new();
    if write!(label, "{}", point.timestamp.format(pattern)).is_err() {
        // Bad strftime pattern in settings
        return point.timestamp.to_rfc3339();
    }
    label
}

/// Scrubber position for `index` on a path of `len` points
fn progress_for(index: usize, len: usize, resolution: u32) -> u32 {
    if len <= 1 {
        return 0;
    }
    let fraction = index as f64 / (len - 1) as f64;
    (fraction * resolution as f64).round() as u32
}
