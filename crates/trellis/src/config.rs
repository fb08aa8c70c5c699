//! # Application Configuration
//!
//! Loaded once at startup from TOML. Every field has a default, so an empty
//! file (or no file) is a valid configuration.
//!
//! ```toml
//! target_fps = 60
//! max_events_per_frame = 64
//! culling = true
//! slow_frame_ms = 33.0
//!
//! [double_click]
//! time = 0.3
//! distance = 5.0
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use trellis_ui::ClickSettings;

use crate::error::{AppError, AppResult};

/// Runtime settings for an [`Application`](crate::Application).
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Frames per second to pace the loop at. `0` runs unpaced.
    pub target_fps: u32,
    /// Pointer events, and separately keyboard/text events, dispatched per
    /// frame. The rest wait for the next frame.
    pub max_events_per_frame: usize,
    /// Skip children that fall outside their parent while rendering.
    pub culling: bool,
    /// Frames slower than this are logged as warnings.
    pub slow_frame_ms: f64,
    /// Multi-click thresholds.
    pub double_click: DoubleClickConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            max_events_per_frame: 64,
            culling: true,
            slow_frame_ms: 33.0,
            double_click: DoubleClickConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidConfig`] on malformed TOML, wrong types or
    /// unknown keys.
    pub fn from_toml_str(text: &str) -> AppResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ConfigIo`] if the file cannot be read and
    /// [`AppError::InvalidConfig`] if it does not parse.
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| AppError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Time budget of one frame, or `None` when unpaced.
    #[must_use]
    pub fn frame_budget(&self) -> Option<Duration> {
        (self.target_fps > 0).then(|| Duration::from_secs_f64(1.0 / f64::from(self.target_fps)))
    }

    /// The slow-frame threshold.
    #[must_use]
    pub fn slow_frame(&self) -> Duration {
        Duration::from_secs_f64(self.slow_frame_ms.max(0.0) / 1000.0)
    }
}

/// Multi-click thresholds as written in the configuration file.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DoubleClickConfig {
    /// Maximum seconds between presses.
    pub time: f32,
    /// Maximum pointer travel in pixels between presses.
    pub distance: f32,
}

impl Default for DoubleClickConfig {
    fn default() -> Self {
        let settings = ClickSettings::default();
        Self {
            time: settings.time,
            distance: settings.distance,
        }
    }
}

impl From<DoubleClickConfig> for ClickSettings {
    fn from(config: DoubleClickConfig) -> Self {
        Self {
            time: config.time,
            distance: config.distance,
        }
    }
}
