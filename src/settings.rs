use crate::core::EventVisibility;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Persistent viewer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    /// Tick interval at 1x speed (200ms = 5 steps per second)
    pub base_interval_ms: u64,
    /// Discrete maximum of the scrubber
    pub progress_resolution: u32,
    pub default_speed: f64,
    pub min_speed: f64,
    pub max_speed: f64,
    /// chrono strftime pattern for the time label
    pub time_format: String,
    /// Label shown when no route is bound
    pub placeholder_label: String,
    pub events: EventVisibility,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            base_interval_ms: 200,
            progress_resolution: 1000,
            default_speed: 1.0,
            min_speed: 0.1,
            max_speed: 10.0,
            time_format: "%Y-%m-%d %H:%M:%S".to_string(),
            placeholder_label: "—".to_string(),
            events: EventVisibility::default(),
        }
    }
}

impl ViewerSettings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("route-viz").join("settings.json"))
    }

    /// Load from the user config dir, falling back to defaults
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Missing file gives defaults; a malformed one is logged and ignored.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            debug!("No settings at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::read(path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Ignoring settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn save(&self) -> Result<()> {
        match Self::config_path() {
            Some(path) => self.save_to(&path),
            None => Ok(()),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
