use image::RgbImage;
use std::path::Path;
use tictactoe_core::LineSegment;
use tictactoe_vision::{
    normalize_channels, BoardReader, BoardValidityClassifier, CellClassifier, CellLayout,
    CellLocator, ChannelOrder, LineDetector, LineDetectorParams, PerceptionError,
};

use crate::config::{AppConfig, ConfigError};
use crate::perception::{CameraPerception, FrameSource};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced by the high-level helpers.
#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Perception(#[from] PerceptionError),
}

/// Load an image file as an RGB frame.
pub fn load_frame(path: impl AsRef<Path>, order: ChannelOrder) -> Result<RgbImage, DetectError> {
    let frame = image::open(path)?.to_rgb8();
    Ok(normalize_channels(frame, order))
}

/// Line segments of a whole frame.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(frame, params), fields(width = frame.width(), height = frame.height()))
)]
pub fn detect_segments(frame: &RgbImage, params: &LineDetectorParams) -> Vec<LineSegment> {
    LineDetector::new(params.clone()).detect_rgb(frame)
}

/// Cell rectangles of `frame` using the calibration and params of `config`.
pub fn locate_cells(frame: &RgbImage, config: &AppConfig) -> Result<CellLayout, DetectError> {
    let locator = CellLocator::new(&config.perception, config.load_calibration()?);
    Ok(locator.locate_cells(frame)?)
}

/// Camera-backed perception wired from `config`.
pub fn camera_perception<F, C, V>(
    frames: F,
    config: &AppConfig,
    cell_classifier: C,
    validity: V,
) -> Result<CameraPerception<F, C, V>, ConfigError>
where
    F: FrameSource,
    C: CellClassifier,
    V: BoardValidityClassifier,
{
    let reader = BoardReader::new(
        config.perception.clone(),
        config.load_calibration()?,
        cell_classifier,
        validity,
    );
    Ok(CameraPerception::new(
        frames,
        reader,
        config.channel_order,
        config.camera_timeout(),
    ))
}
