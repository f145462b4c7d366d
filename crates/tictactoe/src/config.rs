//! Application configuration stored as JSON.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tictactoe_game::GameConfig;
use tictactoe_vision::{BoardCalibration, CalibrationError, ChannelOrder, PerceptionParams};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("failed to load calibration: {0}")]
    Calibration(#[from] CalibrationError),
}

/// Everything needed to wire perception and the game loop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Board calibration JSON. The factory calibration is used when unset.
    pub calibration_path: Option<PathBuf>,
    pub perception: PerceptionParams,
    pub game: GameConfig,
    /// How long to wait for a camera frame before skipping a cycle.
    pub camera_timeout_ms: u64,
    pub channel_order: ChannelOrder,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            calibration_path: None,
            perception: PerceptionParams::default(),
            game: GameConfig::default(),
            camera_timeout_ms: 5_000,
            channel_order: ChannelOrder::Rgb,
        }
    }
}

impl AppConfig {
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    #[inline]
    pub fn camera_timeout(&self) -> Duration {
        Duration::from_millis(self.camera_timeout_ms)
    }

    /// Calibration named by `calibration_path`, or the factory one.
    pub fn load_calibration(&self) -> Result<BoardCalibration, ConfigError> {
        match &self.calibration_path {
            Some(path) => {
                log::info!("loading calibration from {}", path.display());
                Ok(BoardCalibration::load_json(path)?)
            }
            None => Ok(BoardCalibration::default()),
        }
    }
}
