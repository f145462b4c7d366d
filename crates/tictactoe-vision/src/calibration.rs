//! Stored board and cell rectangles used when the lattice cannot be found.

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tictactoe_core::CellRect;

use crate::error::CalibrationError;
use crate::grid_resolver::{translate_grid, CellGrid};

/// Board region within the frame, and the nine cells relative to it
/// (camera order).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardCalibration {
    pub board: CellRect,
    pub cells: CellGrid,
}

impl Default for BoardCalibration {
    /// Factory calibration of the robot's camera mount.
    fn default() -> Self {
        Self {
            board: CellRect::new(152, 423, 352, 600),
            cells: [
                [
                    CellRect::new(24, 89, 15, 80),
                    CellRect::new(103, 170, 16, 80),
                    CellRect::new(176, 245, 19, 79),
                ],
                [
                    CellRect::new(21, 93, 87, 158),
                    CellRect::new(101, 173, 91, 159),
                    CellRect::new(183, 250, 91, 155),
                ],
                [
                    CellRect::new(16, 86, 168, 240),
                    CellRect::new(101, 176, 175, 240),
                    CellRect::new(194, 259, 168, 236),
                ],
            ],
        }
    }
}

impl BoardCalibration {
    /// Load a calibration from JSON and check it.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, CalibrationError> {
        let raw = fs::read_to_string(path)?;
        let calibration: Self = serde_json::from_str(&raw)?;
        calibration.validate()?;
        Ok(calibration)
    }

    /// Write this calibration to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), CalibrationError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Every rectangle must have positive area.
    pub fn validate(&self) -> Result<(), CalibrationError> {
        if self.board.is_empty() {
            return Err(CalibrationError::InvalidRect {
                name: "board".to_string(),
                rect: self.board,
            });
        }
        for (row, cells) in self.cells.iter().enumerate() {
            for (col, rect) in cells.iter().enumerate() {
                if rect.is_empty() {
                    return Err(CalibrationError::InvalidRect {
                        name: format!("cell ({row}, {col})"),
                        rect: *rect,
                    });
                }
            }
        }
        Ok(())
    }

    /// Cell rectangles in frame coordinates.
    pub fn cells_in_frame(&self) -> CellGrid {
        translate_grid(&self.cells, self.board.left, self.board.top)
    }
}
