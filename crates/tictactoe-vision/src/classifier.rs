//! Pluggable image classifiers used by the board reader.
//!
//! The reader only needs a label and a confidence per crop; model loading
//! and inference live behind these traits.

use image::RgbImage;
use serde::{Deserialize, Serialize};
use tictactoe_core::CellValue;

/// Inference failure reported by a classifier implementation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("classifier failed: {message}")]
pub struct ClassifierError {
    pub message: String,
}

impl ClassifierError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Label and confidence for one cell crop.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellReading {
    pub value: CellValue,
    pub confidence: f32,
}

impl CellReading {
    pub fn new(value: CellValue, confidence: f32) -> Self {
        Self { value, confidence }
    }

    /// Cell value after the confidence gate: uncertain pieces read as empty.
    #[inline]
    pub fn gated(&self, threshold: f32) -> CellValue {
        if self.confidence < threshold {
            CellValue::Empty
        } else {
            self.value
        }
    }
}

/// Verdict on whether a crop shows a usable board.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidityReading {
    pub valid: bool,
    pub confidence: f32,
}

impl ValidityReading {
    #[inline]
    pub fn accepted(&self, threshold: f32) -> bool {
        self.valid && self.confidence > threshold
    }
}

/// Classifies one cell crop as empty, human piece or robot piece.
pub trait CellClassifier {
    fn classify(&self, cell: &RgbImage) -> Result<CellReading, ClassifierError>;
}

/// Judges whether the board crop is unobstructed and well lit.
pub trait BoardValidityClassifier {
    fn assess(&self, board: &RgbImage) -> Result<ValidityReading, ClassifierError>;
}

impl<T: CellClassifier + ?Sized> CellClassifier for &T {
    fn classify(&self, cell: &RgbImage) -> Result<CellReading, ClassifierError> {
        (**self).classify(cell)
    }
}

impl<T: CellClassifier + ?Sized> CellClassifier for Box<T> {
    fn classify(&self, cell: &RgbImage) -> Result<CellReading, ClassifierError> {
        (**self).classify(cell)
    }
}

impl<T: BoardValidityClassifier + ?Sized> BoardValidityClassifier for &T {
    fn assess(&self, board: &RgbImage) -> Result<ValidityReading, ClassifierError> {
        (**self).assess(board)
    }
}

impl<T: BoardValidityClassifier + ?Sized> BoardValidityClassifier for Box<T> {
    fn assess(&self, board: &RgbImage) -> Result<ValidityReading, ClassifierError> {
        (**self).assess(board)
    }
}

/// Validity check that accepts every crop with full confidence.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysValid;

impl BoardValidityClassifier for AlwaysValid {
    fn assess(&self, _board: &RgbImage) -> Result<ValidityReading, ClassifierError> {
        Ok(ValidityReading {
            valid: true,
            confidence: 1.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_confidence_pieces_read_empty() {
        let r = CellReading::new(CellValue::HumanPiece, 0.89);
        assert_eq!(r.gated(0.9), CellValue::Empty);
        assert_eq!(r.gated(0.5), CellValue::HumanPiece);
        assert_eq!(CellReading::new(CellValue::RobotPiece, 0.9).gated(0.9), CellValue::RobotPiece);
    }

    #[test]
    fn validity_needs_label_and_strict_confidence() {
        let ok = ValidityReading { valid: true, confidence: 0.7 };
        assert!(ok.accepted(0.65));
        assert!(!ValidityReading { valid: true, confidence: 0.65 }.accepted(0.65));
        assert!(!ValidityReading { valid: false, confidence: 0.99 }.accepted(0.65));
    }
}
