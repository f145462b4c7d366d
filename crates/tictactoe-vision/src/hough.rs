//! Progressive probabilistic Hough transform over a binary edge map.
//!
//! Edge pixels are visited in a seeded random order. Each pixel votes into
//! a `(theta, rho)` accumulator; once a bin reaches the vote threshold the
//! line is traced through the edge map in both directions, bridging gaps of
//! up to `max_line_gap_px` pixels. Traced pixels are removed from the map,
//! and when the traced segment is long enough their votes are withdrawn.

use image::GrayImage;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tictactoe_core::LineSegment;

use crate::params::LineDetectorParams;

/// Finest accumulator resolution accepted; smaller settings are clamped.
const MIN_RHO_PX: f32 = 0.1;
const MIN_THETA_DEG: f32 = 0.1;

struct Accumulator {
    data: Vec<u32>,
    rho_bins: usize,
    rho_offset: f32,
    /// `(cos, sin)` per angle bin, pre-divided by the rho resolution.
    trig: Vec<(f32, f32)>,
    theta_step: f32,
}

impl Accumulator {
    fn new(width: usize, height: usize, rho_px: f32, theta_deg: f32) -> Self {
        let rho_px = rho_px.max(MIN_RHO_PX);
        let theta_step = theta_deg.max(MIN_THETA_DEG).to_radians();
        let theta_bins = ((std::f32::consts::PI / theta_step).round() as usize).max(1);
        let diagonal = ((width + height) * 2 + 1) as f32;
        let rho_bins = ((diagonal / rho_px).round() as usize).max(1);
        let trig = (0..theta_bins)
            .map(|n| {
                let t = n as f32 * theta_step;
                (t.cos() / rho_px, t.sin() / rho_px)
            })
            .collect();
        Self {
            data: vec![0; theta_bins * rho_bins],
            rho_bins,
            rho_offset: ((rho_bins - 1) / 2) as f32,
            trig,
            theta_step,
        }
    }

    #[inline]
    fn bin(&self, theta: usize, x: usize, y: usize) -> usize {
        let (c, s) = self.trig[theta];
        let r = (x as f32 * c + y as f32 * s).round() + self.rho_offset;
        let r = (r.max(0.0) as usize).min(self.rho_bins - 1);
        theta * self.rho_bins + r
    }

    /// Add the votes of `(x, y)` and return the best `(theta, votes)`.
    fn vote(&mut self, x: usize, y: usize) -> (usize, u32) {
        let mut best = (0, 0);
        for theta in 0..self.trig.len() {
            let idx = self.bin(theta, x, y);
            self.data[idx] += 1;
            if self.data[idx] > best.1 {
                best = (theta, self.data[idx]);
            }
        }
        best
    }

    fn unvote(&mut self, x: usize, y: usize) {
        for theta in 0..self.trig.len() {
            let idx = self.bin(theta, x, y);
            self.data[idx] = self.data[idx].saturating_sub(1);
        }
    }
}

struct EdgeMask {
    data: Vec<bool>,
    voted: Vec<bool>,
    width: usize,
    height: usize,
}

impl EdgeMask {
    fn from_edges(edges: &GrayImage) -> (Self, Vec<(usize, usize)>) {
        let (width, height) = (edges.width() as usize, edges.height() as usize);
        let mut data = vec![false; width * height];
        let mut points = Vec::new();
        for (x, y, px) in edges.enumerate_pixels() {
            if px[0] > 0 {
                let (x, y) = (x as usize, y as usize);
                data[y * width + x] = true;
                points.push((x, y));
            }
        }
        let mask = Self {
            data,
            voted: vec![false; width * height],
            width,
            height,
        };
        (mask, points)
    }

    #[inline]
    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }
}

/// Walk from `start` along `step` and return the last edge pixel reached
/// before more than `max_gap` consecutive misses or the image border.
fn trace_end(mask: &EdgeMask, start: (usize, usize), step: (f32, f32), max_gap: u32) -> (i64, i64) {
    let (mut px, mut py) = (start.0 as f32, start.1 as f32);
    let mut end = (start.0 as i64, start.1 as i64);
    let mut gap = 0;
    loop {
        px += step.0;
        py += step.1;
        let (x, y) = (px.round() as i64, py.round() as i64);
        let Some(idx) = mask.index(x, y) else {
            break;
        };
        if mask.data[idx] {
            gap = 0;
            end = (x, y);
        } else {
            gap += 1;
            if gap > max_gap {
                break;
            }
        }
    }
    end
}

/// Detect line segments in a binary edge map (non-zero pixels are edges).
pub fn probabilistic_hough(edges: &GrayImage, params: &LineDetectorParams) -> Vec<LineSegment> {
    let (mut mask, mut points) = EdgeMask::from_edges(edges);
    if points.is_empty() {
        return Vec::new();
    }
    let mut acc = Accumulator::new(mask.width, mask.height, params.rho_px, params.theta_deg);
    let mut rng = StdRng::seed_from_u64(params.seed);
    points.shuffle(&mut rng);

    let threshold = params.vote_threshold.max(1);
    let max_steps = (mask.width + mask.height) * 2;
    let mut segments = Vec::new();

    for &(x, y) in &points {
        let idx = y * mask.width + x;
        // already consumed by an earlier segment
        if !mask.data[idx] {
            continue;
        }
        let (theta, votes) = acc.vote(x, y);
        mask.voted[idx] = true;
        if votes < threshold {
            continue;
        }

        // direction of the line is perpendicular to its normal
        let angle = theta as f32 * acc.theta_step;
        let (dir_x, dir_y) = (-angle.sin(), angle.cos());
        let step = if dir_x.abs() > dir_y.abs() {
            (dir_x.signum(), dir_y / dir_x.abs())
        } else {
            (dir_x / dir_y.abs(), dir_y.signum())
        };

        let ends = [
            trace_end(&mask, (x, y), step, params.max_line_gap_px),
            trace_end(&mask, (x, y), (-step.0, -step.1), params.max_line_gap_px),
        ];
        let span = (ends[0].0 - ends[1].0)
            .abs()
            .max((ends[0].1 - ends[1].1).abs());
        let good = span as f32 >= params.min_line_length_px;

        for (k, end) in ends.iter().enumerate() {
            let sign = if k == 0 { 1.0 } else { -1.0 };
            let (mut px, mut py) = (x as f32, y as f32);
            for _ in 0..max_steps {
                let (ix, iy) = (px.round() as i64, py.round() as i64);
                if let Some(i) = mask.index(ix, iy) {
                    if mask.data[i] {
                        if good && mask.voted[i] {
                            acc.unvote(ix as usize, iy as usize);
                            mask.voted[i] = false;
                        }
                        mask.data[i] = false;
                    }
                }
                if (ix, iy) == *end {
                    break;
                }
                px += sign * step.0;
                py += sign * step.1;
            }
        }

        if good {
            segments.push(LineSegment::new(
                ends[1].0 as f32,
                ends[1].1 as f32,
                ends[0].0 as f32,
                ends[0].1 as f32,
            ));
        }
    }

    log::debug!(
        "hough: {} edge pixels -> {} segments",
        points.len(),
        segments.len()
    );
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn params() -> LineDetectorParams {
        LineDetectorParams {
            min_line_length_px: 50.0,
            max_line_gap_px: 5,
            ..LineDetectorParams::default()
        }
    }

    #[test]
    fn empty_map_has_no_segments() {
        let edges = GrayImage::new(64, 64);
        assert!(probabilistic_hough(&edges, &params()).is_empty());
    }

    #[test]
    fn traces_a_diagonal_line_end_to_end() {
        let mut edges = GrayImage::new(130, 130);
        for x in 10..110u32 {
            edges.put_pixel(x, x + 10, Luma([255]));
        }
        let segments = probabilistic_hough(&edges, &params());
        assert_eq!(segments.len(), 1);
        let s = segments[0];
        let (lo, hi) = if s.p0.x < s.p1.x { (s.p0, s.p1) } else { (s.p1, s.p0) };
        assert_eq!((lo.x, lo.y), (10.0, 20.0));
        assert_eq!((hi.x, hi.y), (109.0, 119.0));
        assert!((s.slope() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn bridges_small_gaps_only() {
        let mut edges = GrayImage::new(200, 60);
        for x in (5..195u32).filter(|x| !(60..63).contains(x)) {
            edges.put_pixel(x, 30, Luma([255]));
        }
        let segments = probabilistic_hough(&edges, &params());
        assert_eq!(segments.len(), 1);
        assert!(segments[0].length() > 180.0);

        let strict = LineDetectorParams {
            max_line_gap_px: 1,
            min_line_length_px: 150.0,
            ..params()
        };
        assert!(probabilistic_hough(&edges, &strict).is_empty());
    }

    #[test]
    fn same_seed_same_output() {
        let mut edges = GrayImage::new(100, 100);
        for i in 5..95u32 {
            edges.put_pixel(i, 40, Luma([255]));
            edges.put_pixel(30, i, Luma([255]));
        }
        let a = probabilistic_hough(&edges, &params());
        let b = probabilistic_hough(&edges, &params());
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn degenerate_resolutions_are_clamped() {
        let mut edges = GrayImage::new(40, 40);
        for x in 2..38u32 {
            edges.put_pixel(x, 20, Luma([255]));
        }
        let short = LineDetectorParams {
            min_line_length_px: 20.0,
            ..params()
        };
        for (rho_px, theta_deg) in [(1000.0, 1.0), (0.0, 1.0), (1.0, 0.0), (1.0, 720.0)] {
            let p = LineDetectorParams {
                rho_px,
                theta_deg,
                ..short.clone()
            };
            let segments = probabilistic_hough(&edges, &p);
            assert!(
                segments.iter().all(|s| s.p0.y == 20.0 && s.p1.y == 20.0),
                "rho {rho_px} theta {theta_deg}: {segments:?}"
            );
        }
    }
}
