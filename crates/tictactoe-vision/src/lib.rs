//! Board perception for the tic-tac-toe robot.
//!
//! Pipeline, per camera frame:
//! 1. crop the stored board region and gate it with a validity classifier,
//! 2. find line segments (Canny + probabilistic Hough, [`LineDetector`]),
//! 3. cluster them into four horizontal and four vertical lattice lines
//!    ([`LineClusterer`]),
//! 4. intersect the lines and compose nine cell rectangles
//!    ([`resolve_cells`]),
//! 5. classify every cell crop and reflect the grid into the human's view
//!    ([`BoardReader`]).
//!
//! Any failure in steps 2-4 falls back to the cells of a stored
//! [`BoardCalibration`].

mod calibration;
mod classifier;
mod error;
mod frame;
mod grid_resolver;
mod hough;
mod line_clusterer;
mod line_detector;
mod params;
mod reader;

pub use calibration::BoardCalibration;
pub use classifier::{
    AlwaysValid, BoardValidityClassifier, CellClassifier, CellReading, ClassifierError,
    ValidityReading,
};
pub use error::{CalibrationError, GeometryError, PerceptionError};
pub use frame::{crop, normalize_channels, ChannelOrder};
pub use grid_resolver::{compose_cells, lattice_corners, resolve_cells, translate_grid, CellGrid};
pub use hough::probabilistic_hough;
pub use line_clusterer::{AxisBuckets, LatticeLines, LineClusterer, LINES_PER_AXIS};
pub use line_detector::LineDetector;
pub use params::{ClusterParams, LineDetectorParams, PerceptionParams};
pub use reader::{BoardReader, BoardReading, CellLayout, CellLocator, LayoutSource};
