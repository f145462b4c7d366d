//! Lattice geometry: segments, lines, corners and cell rectangles.
//!
//! All coordinates are pixels of the image region they were measured in.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Line segment with endpoints in pixel space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub p0: Point2<f32>,
    pub p1: Point2<f32>,
}

impl LineSegment {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            p0: Point2::new(x1, y1),
            p1: Point2::new(x2, y2),
        }
    }

    #[inline]
    pub fn dx(&self) -> f32 {
        self.p1.x - self.p0.x
    }

    #[inline]
    pub fn dy(&self) -> f32 {
        self.p1.y - self.p0.y
    }

    /// Segments parallel to an image axis carry no slope information and
    /// are discarded by the clusterer.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.dx() == 0.0 || self.dy() == 0.0
    }

    /// `dy / dx`, or `f32::INFINITY` for a purely vertical segment.
    pub fn slope(&self) -> f32 {
        let dx = self.dx();
        if dx == 0.0 {
            f32::INFINITY
        } else {
            self.dy() / dx
        }
    }

    /// Intercept `b` of `y = a x + b`. Not finite for vertical segments.
    pub fn intercept(&self) -> f32 {
        self.p0.y - self.slope() * self.p0.x
    }

    pub fn length(&self) -> f32 {
        (self.p1 - self.p0).norm()
    }
}

/// Which family of lattice lines a line belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineAxis {
    Horizontal,
    Vertical,
}

/// Representative line of one lattice line cluster.
///
/// Parameterised along its own axis so that exactly axis-aligned lines are
/// representable:
/// - horizontal: `y = slope * x + intercept`
/// - vertical: `x = slope * y + intercept`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrientedLine {
    pub axis: LineAxis,
    pub slope: f32,
    pub intercept: f32,
}

impl OrientedLine {
    /// Horizontal line `y = y0`.
    pub fn horizontal(y0: f32) -> Self {
        Self {
            axis: LineAxis::Horizontal,
            slope: 0.0,
            intercept: y0,
        }
    }

    /// Vertical line `x = x0`.
    pub fn vertical(x0: f32) -> Self {
        Self {
            axis: LineAxis::Vertical,
            slope: 0.0,
            intercept: x0,
        }
    }

    /// Line through a non-degenerate segment, in the parameterisation of `axis`.
    pub fn through_segment(segment: &LineSegment, axis: LineAxis) -> Option<Self> {
        if segment.is_degenerate() {
            return None;
        }
        let (slope, intercept) = match axis {
            LineAxis::Horizontal => {
                let a = segment.dy() / segment.dx();
                (a, segment.p0.y - a * segment.p0.x)
            }
            LineAxis::Vertical => {
                let c = segment.dx() / segment.dy();
                (c, segment.p0.x - c * segment.p0.y)
            }
        };
        Some(Self {
            axis,
            slope,
            intercept,
        })
    }

    /// Position where the line crosses the reference coordinate.
    ///
    /// Horizontal lines report their `y` at `x = reference`, vertical lines
    /// their `x` at `y = reference`.
    #[inline]
    pub fn position_at(&self, reference: f32) -> f32 {
        self.slope * reference + self.intercept
    }

    /// Intersection with a line of the other axis.
    ///
    /// Returns `None` for two lines of the same axis or (numerically)
    /// parallel lines.
    pub fn intersect(&self, other: &OrientedLine) -> Option<Point2<f32>> {
        let (h, v) = match (self.axis, other.axis) {
            (LineAxis::Horizontal, LineAxis::Vertical) => (self, other),
            (LineAxis::Vertical, LineAxis::Horizontal) => (other, self),
            _ => return None,
        };
        // y = a x + b and x = c y + d
        let denom = 1.0 - h.slope * v.slope;
        if denom.abs() < 1e-6 {
            return None;
        }
        let x = (v.slope * h.intercept + v.intercept) / denom;
        let y = h.slope * x + h.intercept;
        Some(Point2::new(x, y))
    }
}

/// Intersection of lattice line `row` (horizontal) and `col` (vertical).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Corner {
    pub row: usize,
    pub col: usize,
    pub position: Point2<f32>,
}

/// Axis-aligned pixel rectangle `(left, right, top, bottom)`.
///
/// Used both for board cells and for the board extent within a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRect {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

impl CellRect {
    pub const fn new(left: i32, right: i32, top: i32, bottom: i32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Swap inverted bounds so that `left <= right` and `top <= bottom`.
    pub fn normalized(self) -> Self {
        Self {
            left: self.left.min(self.right),
            right: self.left.max(self.right),
            top: self.top.min(self.bottom),
            bottom: self.top.max(self.bottom),
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Shift by a region offset, e.g. from board-relative to frame coordinates.
    pub fn translated(self, dx: i32, dy: i32) -> Self {
        Self {
            left: self.left + dx,
            right: self.right + dx,
            top: self.top + dy,
            bottom: self.bottom + dy,
        }
    }

    /// Intersection with `[0, width) x [0, height)`, or `None` when empty.
    pub fn clamped(self, width: u32, height: u32) -> Option<Self> {
        let w = i32::try_from(width).unwrap_or(i32::MAX);
        let h = i32::try_from(height).unwrap_or(i32::MAX);
        let r = self.normalized();
        let out = Self {
            left: r.left.clamp(0, w),
            right: r.right.clamp(0, w),
            top: r.top.clamp(0, h),
            bottom: r.bottom.clamp(0, h),
        };
        (!out.is_empty()).then_some(out)
    }

    /// True when the two rectangles share interior area.
    pub fn overlaps(&self, other: &CellRect) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn segment_slope_and_intercept() {
        let s = LineSegment::new(0.0, 10.0, 100.0, 20.0);
        assert_relative_eq!(s.slope(), 0.1);
        assert_relative_eq!(s.intercept(), 10.0);
        assert!(!s.is_degenerate());

        let vertical = LineSegment::new(5.0, 0.0, 5.0, 50.0);
        assert!(vertical.slope().is_infinite());
        assert!(vertical.is_degenerate());
        assert!(LineSegment::new(0.0, 3.0, 9.0, 3.0).is_degenerate());
    }

    #[test]
    fn vertical_line_through_steep_segment() {
        let s = LineSegment::new(100.0, 0.0, 110.0, 200.0);
        let line = OrientedLine::through_segment(&s, LineAxis::Vertical).expect("line");
        assert_relative_eq!(line.slope, 0.05);
        assert_relative_eq!(line.position_at(0.0), 100.0);
        assert_relative_eq!(line.position_at(200.0), 110.0);
    }

    #[test]
    fn intersection_of_tilted_lines() {
        let h = OrientedLine {
            axis: LineAxis::Horizontal,
            slope: 0.05,
            intercept: 10.0,
        };
        let v = OrientedLine {
            axis: LineAxis::Vertical,
            slope: -0.1,
            intercept: 50.0,
        };
        let p = h.intersect(&v).expect("crossing");
        assert_relative_eq!(p.y, 0.05 * p.x + 10.0, epsilon = 1e-4);
        assert_relative_eq!(p.x, -0.1 * p.y + 50.0, epsilon = 1e-4);
        assert_eq!(v.intersect(&h), Some(p));
        assert!(h.intersect(&h).is_none());
    }

    #[test]
    fn rect_normalization_and_clamp() {
        let r = CellRect::new(30, 10, 50, 20).normalized();
        assert_eq!(r, CellRect::new(10, 30, 20, 50));
        assert_eq!(r.width(), 20);
        assert_eq!(r.height(), 30);

        let clamped = CellRect::new(-5, 40, 10, 90).clamped(32, 64).expect("overlap");
        assert_eq!(clamped, CellRect::new(0, 32, 10, 64));
        assert!(CellRect::new(40, 50, 0, 10).clamped(32, 64).is_none());
        assert_eq!(r.translated(5, -5), CellRect::new(15, 35, 15, 45));
    }

    #[test]
    fn touching_rects_do_not_overlap() {
        let a = CellRect::new(0, 100, 0, 100);
        let b = CellRect::new(100, 200, 0, 100);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&CellRect::new(99, 200, 0, 100)));
    }
}
