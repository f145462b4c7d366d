use image::{imageops, GrayImage, RgbImage};
use imageproc::edges::canny;
use tictactoe_core::LineSegment;

use crate::hough::probabilistic_hough;
use crate::params::LineDetectorParams;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Edge detection followed by a probabilistic Hough transform.
#[derive(Clone, Debug, Default)]
pub struct LineDetector {
    params: LineDetectorParams,
}

impl LineDetector {
    pub fn new(params: LineDetectorParams) -> Self {
        Self { params }
    }

    #[inline]
    pub fn params(&self) -> &LineDetectorParams {
        &self.params
    }

    /// Binary edge map of `gray` (255 on edges).
    pub fn edges(&self, gray: &GrayImage) -> GrayImage {
        canny(gray, self.params.canny_low, self.params.canny_high)
    }

    /// Line segments of a grayscale region. Empty when nothing qualifies.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, gray), fields(width = gray.width(), height = gray.height()))
    )]
    pub fn detect(&self, gray: &GrayImage) -> Vec<LineSegment> {
        let edges = self.edges(gray);
        probabilistic_hough(&edges, &self.params)
    }

    /// Same as [`LineDetector::detect`] for an RGB region.
    pub fn detect_rgb(&self, region: &RgbImage) -> Vec<LineSegment> {
        self.detect(&imageops::grayscale(region))
    }
}
