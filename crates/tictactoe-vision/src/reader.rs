use image::RgbImage;
use serde::{Deserialize, Serialize};
use tictactoe_core::{BoardSnapshot, CellValue};

use crate::calibration::BoardCalibration;
use crate::classifier::{BoardValidityClassifier, CellClassifier, CellReading};
use crate::error::{GeometryError, PerceptionError};
use crate::frame::crop;
use crate::grid_resolver::{resolve_cells, translate_grid, CellGrid};
use crate::line_clusterer::LineClusterer;
use crate::line_detector::LineDetector;
use crate::params::PerceptionParams;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Where the cell rectangles of a reading came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutSource {
    /// Recovered from the lattice lines of this frame.
    Detected,
    /// Taken from the stored calibration.
    Calibrated,
}

/// Cell rectangles in frame coordinates, camera order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellLayout {
    pub cells: CellGrid,
    pub source: LayoutSource,
}

/// Everything produced while reading one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardReading {
    /// Board in the human's orientation.
    pub snapshot: BoardSnapshot,
    pub layout: CellLayout,
    /// Raw classifier output, camera order.
    pub readings: [[CellReading; 3]; 3],
}

/// Finds the nine cell rectangles of a frame.
///
/// Needs no classifier: the lattice is searched inside the calibrated board
/// region and the calibrated cells are used when that fails.
pub struct CellLocator {
    dynamic_grid: bool,
    calibration: BoardCalibration,
    detector: LineDetector,
    clusterer: LineClusterer,
}

impl CellLocator {
    pub fn new(params: &PerceptionParams, calibration: BoardCalibration) -> Self {
        Self {
            dynamic_grid: params.dynamic_grid,
            calibration,
            detector: LineDetector::new(params.line_detector.clone()),
            clusterer: LineClusterer::new(params.clusterer.clone()),
        }
    }

    #[inline]
    pub fn calibration(&self) -> &BoardCalibration {
        &self.calibration
    }

    /// Crop of the calibrated board extent.
    pub fn board_region(&self, frame: &RgbImage) -> Result<RgbImage, PerceptionError> {
        crop(frame, self.calibration.board).ok_or(PerceptionError::RegionOutOfFrame {
            rect: self.calibration.board,
            width: frame.width(),
            height: frame.height(),
        })
    }

    /// Search the board region for the lattice and return the cells in
    /// frame coordinates.
    pub fn detect_cells(&self, region: &RgbImage) -> Result<CellGrid, GeometryError> {
        let segments = self.detector.detect_rgb(region);
        if segments.is_empty() {
            return Err(GeometryError::NoSegments);
        }
        let lines = self.clusterer.cluster(&segments)?;
        let cells = resolve_cells(&lines)?;
        for (row, rects) in cells.iter().enumerate() {
            for (col, rect) in rects.iter().enumerate() {
                if rect.clamped(region.width(), region.height()).is_none() {
                    return Err(GeometryError::NonPhysicalCell {
                        row,
                        col,
                        rect: *rect,
                    });
                }
            }
        }
        let board = self.calibration.board.normalized();
        Ok(translate_grid(&cells, board.left.max(0), board.top.max(0)))
    }

    /// Layout for an already cropped board region.
    pub fn layout_for_region(&self, region: &RgbImage) -> CellLayout {
        if self.dynamic_grid {
            match self.detect_cells(region) {
                Ok(cells) => {
                    return CellLayout {
                        cells,
                        source: LayoutSource::Detected,
                    };
                }
                Err(e) => log::info!("lattice not found ({e}), using calibrated cells"),
            }
        }
        CellLayout {
            cells: self.calibration.cells_in_frame(),
            source: LayoutSource::Calibrated,
        }
    }

    /// Cell rectangles for `frame`: detected when possible, calibrated
    /// otherwise.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, frame), fields(width = frame.width(), height = frame.height()))
    )]
    pub fn locate_cells(&self, frame: &RgbImage) -> Result<CellLayout, PerceptionError> {
        let region = self.board_region(frame)?;
        Ok(self.layout_for_region(&region))
    }
}

/// Turns camera frames into board snapshots.
pub struct BoardReader<C, V> {
    params: PerceptionParams,
    locator: CellLocator,
    cell_classifier: C,
    validity: V,
}

impl<C: CellClassifier, V: BoardValidityClassifier> BoardReader<C, V> {
    pub fn new(
        params: PerceptionParams,
        calibration: BoardCalibration,
        cell_classifier: C,
        validity: V,
    ) -> Self {
        Self {
            locator: CellLocator::new(&params, calibration),
            params,
            cell_classifier,
            validity,
        }
    }

    #[inline]
    pub fn params(&self) -> &PerceptionParams {
        &self.params
    }

    #[inline]
    pub fn calibration(&self) -> &BoardCalibration {
        self.locator.calibration()
    }

    #[inline]
    pub fn locator(&self) -> &CellLocator {
        &self.locator
    }

    pub fn locate_cells(&self, frame: &RgbImage) -> Result<CellLayout, PerceptionError> {
        self.locator.locate_cells(frame)
    }

    /// Classify each cell of `layout` and build the snapshot.
    pub fn classify_cells(
        &self,
        frame: &RgbImage,
        layout: &CellLayout,
    ) -> Result<([[CellReading; 3]; 3], BoardSnapshot), PerceptionError> {
        let threshold = self.params.piece_confidence_threshold;
        let mut readings = [[CellReading::new(CellValue::Empty, 0.0); 3]; 3];
        let mut values = [[CellValue::Empty; 3]; 3];
        for (row, rects) in layout.cells.iter().enumerate() {
            for (col, rect) in rects.iter().enumerate() {
                let cell = crop(frame, *rect).ok_or(PerceptionError::RegionOutOfFrame {
                    rect: *rect,
                    width: frame.width(),
                    height: frame.height(),
                })?;
                let reading = self.cell_classifier.classify(&cell)?;
                values[row][col] = reading.gated(threshold);
                readings[row][col] = reading;
            }
        }
        Ok((readings, BoardSnapshot::from_camera_grid(values)))
    }

    /// Full reading of an RGB frame: validity gate, cell layout and
    /// classification.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, frame), fields(width = frame.width(), height = frame.height()))
    )]
    pub fn read(&self, frame: &RgbImage) -> Result<BoardReading, PerceptionError> {
        let region = self.locator.board_region(frame)?;
        let validity = self.validity.assess(&region)?;
        if !validity.accepted(self.params.validity_threshold) {
            log::debug!(
                "board crop rejected: valid={} confidence={:.2}",
                validity.valid,
                validity.confidence
            );
            return Err(PerceptionError::InvalidBoard {
                confidence: validity.confidence,
            });
        }

        let layout = self.locator.layout_for_region(&region);
        let (readings, snapshot) = self.classify_cells(frame, &layout)?;
        log::debug!("read board {snapshot} ({:?} cells)", layout.source);
        Ok(BoardReading {
            snapshot,
            layout,
            readings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{AlwaysValid, ClassifierError, ValidityReading};
    use image::Rgb;
    use tictactoe_core::CellRect;

    /// Labels a crop by its mean red and blue levels.
    struct ColorClassifier;

    impl CellClassifier for ColorClassifier {
        fn classify(&self, cell: &RgbImage) -> Result<CellReading, ClassifierError> {
            let n = (cell.width() * cell.height()).max(1) as f32;
            let (mut r, mut b) = (0.0, 0.0);
            for p in cell.pixels() {
                r += p[0] as f32;
                b += p[2] as f32;
            }
            let (r, b) = (r / n / 255.0, b / n / 255.0);
            Ok(if r > 0.5 && b < 0.5 {
                CellReading::new(CellValue::HumanPiece, r)
            } else if b > 0.5 && r < 0.5 {
                CellReading::new(CellValue::RobotPiece, b)
            } else {
                CellReading::new(CellValue::Empty, 1.0)
            })
        }
    }

    struct Rejecting;

    impl BoardValidityClassifier for Rejecting {
        fn assess(&self, _board: &RgbImage) -> Result<ValidityReading, ClassifierError> {
            Ok(ValidityReading {
                valid: true,
                confidence: 0.4,
            })
        }
    }

    fn calibration() -> BoardCalibration {
        let cells = [0, 1, 2].map(|r| {
            [0, 1, 2].map(|c| CellRect::new(c * 30 + 2, c * 30 + 28, r * 30 + 2, r * 30 + 28))
        });
        BoardCalibration {
            board: CellRect::new(10, 100, 10, 100),
            cells,
        }
    }

    fn paint(frame: &mut RgbImage, rect: CellRect, color: Rgb<u8>) {
        for y in rect.top..rect.bottom {
            for x in rect.left..rect.right {
                frame.put_pixel(x as u32, y as u32, color);
            }
        }
    }

    fn params() -> PerceptionParams {
        PerceptionParams {
            dynamic_grid: false,
            ..PerceptionParams::default()
        }
    }

    #[test]
    fn calibrated_cells_are_reflected_into_human_view() {
        let cal = calibration();
        let mut frame = RgbImage::from_pixel(120, 120, Rgb([255, 255, 255]));
        let cells = cal.cells_in_frame();
        paint(&mut frame, cells[0][0], Rgb([250, 0, 0]));
        paint(&mut frame, cells[1][2], Rgb([0, 0, 250]));

        let reader = BoardReader::new(params(), cal, ColorClassifier, AlwaysValid);
        let reading = reader.read(&frame).expect("reading");
        assert_eq!(reading.layout.source, LayoutSource::Calibrated);
        assert_eq!(reading.snapshot.to_string(), "...|R..|..H");
        assert_eq!(reading.readings[0][0].value, CellValue::HumanPiece);
    }

    #[test]
    fn uncertain_pieces_are_dropped() {
        let cal = calibration();
        let mut frame = RgbImage::from_pixel(120, 120, Rgb([255, 255, 255]));
        // mean red about 0.8, below the 0.9 gate
        paint(&mut frame, cal.cells_in_frame()[1][1], Rgb([204, 0, 0]));
        let reader = BoardReader::new(params(), cal, ColorClassifier, AlwaysValid);
        let reading = reader.read(&frame).expect("reading");
        assert!(reading.snapshot.is_clear());
        assert_eq!(reading.readings[1][1].value, CellValue::HumanPiece);
    }

    #[test]
    fn rejected_board_is_an_error() {
        let frame = RgbImage::from_pixel(120, 120, Rgb([255, 255, 255]));
        let reader = BoardReader::new(params(), calibration(), ColorClassifier, Rejecting);
        assert!(matches!(
            reader.read(&frame),
            Err(PerceptionError::InvalidBoard { confidence }) if confidence < 0.5
        ));
    }

    #[test]
    fn board_outside_frame_is_an_error() {
        let frame = RgbImage::new(8, 8);
        let reader = BoardReader::new(params(), calibration(), ColorClassifier, AlwaysValid);
        assert!(matches!(
            reader.read(&frame),
            Err(PerceptionError::RegionOutOfFrame { .. })
        ));
    }

    #[test]
    fn blank_region_falls_back_to_calibration() {
        let frame = RgbImage::from_pixel(120, 120, Rgb([255, 255, 255]));
        let cal = calibration();
        let reader = BoardReader::new(
            PerceptionParams::default(),
            cal.clone(),
            ColorClassifier,
            AlwaysValid,
        );
        let layout = reader.locate_cells(&frame).expect("layout");
        assert_eq!(layout.source, LayoutSource::Calibrated);
        assert_eq!(layout.cells, cal.cells_in_frame());
        let region = image::imageops::crop_imm(&frame, 10, 10, 90, 90).to_image();
        assert_eq!(
            reader.locator().detect_cells(&region),
            Err(GeometryError::NoSegments)
        );
    }
}
