use serde::{Deserialize, Serialize};

/// Edge detection and probabilistic Hough parameters.
///
/// Defaults are tuned for a 640x480 camera looking at a dark-lined board
/// roughly 270x250 pixels wide.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineDetectorParams {
    /// Canny hysteresis low threshold on the gradient magnitude.
    pub canny_low: f32,
    /// Canny hysteresis high threshold on the gradient magnitude.
    pub canny_high: f32,
    /// Distance resolution of the accumulator, in pixels.
    pub rho_px: f32,
    /// Angle resolution of the accumulator, in degrees.
    pub theta_deg: f32,
    /// Minimum accumulator votes before a line is traced.
    pub vote_threshold: u32,
    /// Segments shorter than this (along their dominant axis) are dropped.
    pub min_line_length_px: f32,
    /// Largest run of missing edge pixels bridged while tracing a segment.
    pub max_line_gap_px: u32,
    /// Seed of the edge-point visiting order. Fixed so detection is
    /// reproducible frame to frame.
    pub seed: u64,
}

impl Default for LineDetectorParams {
    fn default() -> Self {
        Self {
            canny_low: 210.0,
            canny_high: 256.0,
            rho_px: 1.0,
            theta_deg: 1.0,
            vote_threshold: 15,
            min_line_length_px: 150.0,
            max_line_gap_px: 50,
            seed: 0,
        }
    }
}

/// Slope classification and clustering parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterParams {
    /// Segments with `|dy/dx|` below this are horizontal.
    pub horizontal_slope_max: f32,
    /// Segments with `|dy/dx|` above this are vertical.
    pub vertical_slope_min: f32,
    /// Coordinate at which lines are compared: horizontal lines by their `y`
    /// at `x = reference_px`, vertical lines by their `x` at `y = reference_px`.
    pub reference_px: f32,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            horizontal_slope_max: 0.1,
            vertical_slope_min: 2.0,
            reference_px: 200.0,
        }
    }
}

/// Parameters of the whole board reading pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerceptionParams {
    pub line_detector: LineDetectorParams,
    pub clusterer: ClusterParams,
    /// Cell readings below this confidence are treated as empty.
    pub piece_confidence_threshold: f32,
    /// Board crops must be judged valid with a confidence above this.
    pub validity_threshold: f32,
    /// When false, cells are always taken from the stored calibration.
    pub dynamic_grid: bool,
}

impl Default for PerceptionParams {
    fn default() -> Self {
        Self {
            line_detector: LineDetectorParams::default(),
            clusterer: ClusterParams::default(),
            piece_confidence_threshold: 0.9,
            validity_threshold: 0.65,
            dynamic_grid: true,
        }
    }
}
