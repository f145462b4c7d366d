use tictactoe_core::{CellRect, LineAxis};

use crate::classifier::ClassifierError;

/// Failures of the lattice geometry pipeline. Each one makes the reader
/// fall back to the stored calibration.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("no line segments detected")]
    NoSegments,
    #[error("only {found} distinct {axis:?} lines, need 4")]
    TooFewLines { axis: LineAxis, found: usize },
    #[error("{axis:?} cluster {index} has no members")]
    EmptyCluster { axis: LineAxis, index: usize },
    #[error("lattice lines {row} and {col} do not intersect")]
    ParallelLines { row: usize, col: usize },
    #[error("cell ({row}, {col}) is degenerate: {rect:?}")]
    NonPhysicalCell { row: usize, col: usize, rect: CellRect },
}

/// Failures while turning a frame into a board snapshot.
#[derive(thiserror::Error, Debug)]
pub enum PerceptionError {
    #[error("no camera frame available")]
    NoFrame,
    #[error("board crop rejected by validity check (confidence {confidence:.2})")]
    InvalidBoard { confidence: f32 },
    #[error("region {rect:?} lies outside the {width}x{height} frame")]
    RegionOutOfFrame { rect: CellRect, width: u32, height: u32 },
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
}

/// Failures loading or validating a board calibration.
#[derive(thiserror::Error, Debug)]
pub enum CalibrationError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("calibration rectangle {name} is empty: {rect:?}")]
    InvalidRect { name: String, rect: CellRect },
}
