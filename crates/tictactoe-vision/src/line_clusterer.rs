//! Slope classification and per-axis clustering of line segments into the
//! four lattice lines of each family.

use serde::{Deserialize, Serialize};
use tictactoe_core::{LineAxis, LineSegment, OrientedLine};

use crate::error::GeometryError;
use crate::params::ClusterParams;

/// Lattice lines per axis: two board borders and two inner lines.
pub const LINES_PER_AXIS: usize = 4;

/// Representative lattice lines, each family ordered by increasing position
/// (top to bottom, left to right).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatticeLines {
    pub horizontal: [OrientedLine; LINES_PER_AXIS],
    pub vertical: [OrientedLine; LINES_PER_AXIS],
}

/// Segments split by slope. Diagonal and axis-parallel segments are only
/// counted.
#[derive(Clone, Debug, Default)]
pub struct AxisBuckets {
    pub horizontal: Vec<OrientedLine>,
    pub vertical: Vec<OrientedLine>,
    pub ambiguous: usize,
    pub degenerate: usize,
}

#[derive(Clone, Debug, Default)]
pub struct LineClusterer {
    params: ClusterParams,
}

impl LineClusterer {
    pub fn new(params: ClusterParams) -> Self {
        Self { params }
    }

    #[inline]
    pub fn params(&self) -> &ClusterParams {
        &self.params
    }

    /// Sort segments into horizontal and vertical families by `|dy/dx|`.
    pub fn classify(&self, segments: &[LineSegment]) -> AxisBuckets {
        let mut buckets = AxisBuckets::default();
        for seg in segments {
            if seg.is_degenerate() {
                buckets.degenerate += 1;
                continue;
            }
            let a = seg.slope().abs();
            let axis = if a < self.params.horizontal_slope_max {
                LineAxis::Horizontal
            } else if a > self.params.vertical_slope_min {
                LineAxis::Vertical
            } else {
                buckets.ambiguous += 1;
                continue;
            };
            if let Some(line) = OrientedLine::through_segment(seg, axis) {
                match axis {
                    LineAxis::Horizontal => buckets.horizontal.push(line),
                    LineAxis::Vertical => buckets.vertical.push(line),
                }
            }
        }
        buckets
    }

    /// Reduce the segments to four horizontal and four vertical lines.
    pub fn cluster(&self, segments: &[LineSegment]) -> Result<LatticeLines, GeometryError> {
        if segments.is_empty() {
            return Err(GeometryError::NoSegments);
        }
        let buckets = self.classify(segments);
        log::debug!(
            "classified {} segments: {} horizontal, {} vertical, {} ambiguous, {} degenerate",
            segments.len(),
            buckets.horizontal.len(),
            buckets.vertical.len(),
            buckets.ambiguous,
            buckets.degenerate
        );
        Ok(LatticeLines {
            horizontal: self.cluster_axis(&buckets.horizontal, LineAxis::Horizontal)?,
            vertical: self.cluster_axis(&buckets.vertical, LineAxis::Vertical)?,
        })
    }

    fn cluster_axis(
        &self,
        lines: &[OrientedLine],
        axis: LineAxis,
    ) -> Result<[OrientedLine; LINES_PER_AXIS], GeometryError> {
        let lines: Vec<OrientedLine> = lines
            .iter()
            .copied()
            .filter(|l| l.position_at(self.params.reference_px).is_finite())
            .collect();
        let keys: Vec<f32> = lines
            .iter()
            .map(|l| l.position_at(self.params.reference_px))
            .collect();

        let distinct = distinct_count(&keys);
        if distinct < LINES_PER_AXIS {
            return Err(GeometryError::TooFewLines {
                axis,
                found: distinct,
            });
        }

        let labels = kmeans_1d(&keys, LINES_PER_AXIS);
        let mut sums = [(0.0f32, 0.0f32, 0usize); LINES_PER_AXIS];
        for (line, &label) in lines.iter().zip(&labels) {
            let s = &mut sums[label];
            s.0 += line.slope;
            s.1 += line.intercept;
            s.2 += 1;
        }

        let mut out = [OrientedLine {
            axis,
            slope: 0.0,
            intercept: 0.0,
        }; LINES_PER_AXIS];
        for (index, (slope, intercept, n)) in sums.into_iter().enumerate() {
            if n == 0 {
                return Err(GeometryError::EmptyCluster { axis, index });
            }
            out[index].slope = slope / n as f32;
            out[index].intercept = intercept / n as f32;
        }
        Ok(out)
    }
}

fn distinct_count(values: &[f32]) -> usize {
    let mut sorted = values.to_vec();
    sorted.sort_by(f32::total_cmp);
    sorted.dedup();
    sorted.len()
}

/// Optimal one-dimensional k-means by dynamic programming over sorted values.
///
/// Returns one label per input value. Labels are ordered by cluster
/// position, so label 0 holds the smallest values. Requires
/// `values.len() >= k`.
pub(crate) fn kmeans_1d(values: &[f32], k: usize) -> Vec<usize> {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut s1 = vec![0.0f64; n + 1];
    let mut s2 = vec![0.0f64; n + 1];
    for (i, &idx) in order.iter().enumerate() {
        let v = values[idx] as f64;
        s1[i + 1] = s1[i] + v;
        s2[i + 1] = s2[i] + v * v;
    }
    // within-cluster sum of squares of sorted values [i, j)
    let sse = |i: usize, j: usize| {
        let m = (j - i) as f64;
        let s = s1[j] - s1[i];
        (s2[j] - s2[i]) - s * s / m
    };

    // cost[c][j]: best cost of the first j values in c + 1 clusters
    let mut cost = vec![vec![f64::INFINITY; n + 1]; k];
    let mut start = vec![vec![0usize; n + 1]; k];
    for j in 1..=n {
        cost[0][j] = sse(0, j);
    }
    for c in 1..k {
        for j in (c + 1)..=n {
            for i in c..j {
                let v = cost[c - 1][i] + sse(i, j);
                if v < cost[c][j] {
                    cost[c][j] = v;
                    start[c][j] = i;
                }
            }
        }
    }

    let mut labels = vec![0; n];
    let mut j = n;
    for c in (0..k).rev() {
        let i = if c == 0 { 0 } else { start[c][j] };
        for &idx in &order[i..j] {
            labels[idx] = c;
        }
        j = i;
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Two nearly coincident segments per lattice line, as produced by the
    /// two edges of a drawn stroke.
    fn lattice_segments(tilt: f32) -> Vec<LineSegment> {
        let mut segs = Vec::new();
        for pos in [20.0f32, 100.0, 180.0, 260.0] {
            for offset in [-1.5f32, 1.5] {
                let p = pos + offset;
                segs.push(LineSegment::new(0.0, p, 280.0, p + 280.0 * tilt));
                segs.push(LineSegment::new(p, 0.0, p + 280.0 * tilt, 280.0));
            }
        }
        segs
    }

    #[test]
    fn classifies_by_slope() {
        let clusterer = LineClusterer::default();
        let segs = [
            LineSegment::new(0.0, 0.0, 100.0, 5.0),
            LineSegment::new(0.0, 0.0, 5.0, 100.0),
            LineSegment::new(0.0, 0.0, 100.0, 100.0),
            LineSegment::new(0.0, 3.0, 100.0, 3.0),
        ];
        let b = clusterer.classify(&segs);
        assert_eq!(b.horizontal.len(), 1);
        assert_eq!(b.vertical.len(), 1);
        assert_eq!(b.ambiguous, 1);
        assert_eq!(b.degenerate, 1);
    }

    #[test]
    fn recovers_four_ordered_lines_per_axis() {
        let mut segs = lattice_segments(0.03);
        segs.reverse();
        let lines = LineClusterer::default().cluster(&segs).expect("lattice");
        for (i, pos) in [20.0f32, 100.0, 180.0, 260.0].into_iter().enumerate() {
            let h = lines.horizontal[i];
            let v = lines.vertical[i];
            assert_eq!(h.axis, LineAxis::Horizontal);
            assert_eq!(v.axis, LineAxis::Vertical);
            assert_relative_eq!(h.intercept, pos, epsilon = 1e-3);
            assert_relative_eq!(h.slope, 0.03, epsilon = 1e-5);
            assert_relative_eq!(v.intercept, pos, epsilon = 1e-3);
            assert_relative_eq!(v.slope, 0.03, epsilon = 1e-5);
        }
    }

    #[test]
    fn missing_lines_are_reported() {
        let clusterer = LineClusterer::default();
        assert_eq!(clusterer.cluster(&[]), Err(GeometryError::NoSegments));

        // only the two left vertical edges survive
        let segs: Vec<_> = lattice_segments(0.03)
            .into_iter()
            .filter(|s| s.slope().abs() < 1.0 || s.p0.x < 50.0)
            .collect();
        assert_eq!(
            clusterer.cluster(&segs),
            Err(GeometryError::TooFewLines {
                axis: LineAxis::Vertical,
                found: 2
            })
        );
    }

    #[test]
    fn kmeans_handles_unbalanced_groups() {
        let values = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 100.0, 200.0, 201.0, 300.0];
        let labels = kmeans_1d(&values, 4);
        assert_eq!(labels, vec![0, 0, 0, 0, 0, 0, 1, 2, 2, 3]);
    }

    #[test]
    fn kmeans_labels_follow_value_order() {
        let values = [300.0, 5.0, 201.0, 100.0];
        assert_eq!(kmeans_1d(&values, 4), vec![3, 0, 2, 1]);
    }
}
