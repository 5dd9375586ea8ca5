use std::fmt::Write;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub type Point = (f64, f64);
pub type Segment = (Point, Point);

/// Hachure angle for visited countries, in degrees.
pub const VISITED_ANGLE: f64 = 60.0;
/// Hachure angle for the home country, in degrees.
pub const HOME_ANGLE: f64 = 45.0;
/// Smallest line spacing honoured; tighter gaps are raised to this.
pub const MIN_GAP: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HachureOptions {
    pub angle: f64,
    pub gap: f64,
    /// Maximum jitter in pixels applied to each stroke.
    pub roughness: f64,
}

impl Default for HachureOptions {
    fn default() -> Self {
        Self {
            angle: VISITED_ANGLE,
            gap: 4.0,
            roughness: 0.8,
        }
    }
}

fn rotate((x, y): Point, sin: f64, cos: f64) -> Point {
    (x * cos - y * sin, x * sin + y * cos)
}

/// Interior spans of a set of rings along the horizontal line `y`,
/// using the even-odd rule so holes are left empty.
fn horizontal_spans(y: f64, rings: &[Vec<Point>]) -> Vec<(f64, f64)> {
    let mut crossings = Vec::new();
    for ring in rings {
        let n = ring.len();
        if n < 3 {
            continue;
        }
        let mut j = n - 1;
        for i in 0..n {
            let (xi, yi) = ring[i];
            let (xj, yj) = ring[j];
            if (yi > y) != (yj > y) {
                crossings.push((xj - xi) * (y - yi) / (yj - yi) + xi);
            }
            j = i;
        }
    }
    crossings.sort_by(|a, b| a.total_cmp(b));
    crossings.chunks_exact(2).map(|p| (p[0], p[1])).collect()
}

/// Parallel fill lines at `angle` degrees, `gap` pixels apart, clipped to each polygon.
/// Gaps below [`MIN_GAP`] are clamped; a non-finite gap yields no lines.
pub fn hachure_lines(polygons: &[Vec<Vec<Point>>], angle: f64, gap: f64) -> Vec<Segment> {
    if !gap.is_finite() {
        return Vec::new();
    }
    let gap = gap.max(MIN_GAP);
    let (sin, cos) = angle.to_radians().sin_cos();
    let mut lines = Vec::new();

    for poly in polygons {
        // Rotate so the hachure runs horizontally, scan, rotate back
        let rotated: Vec<Vec<Point>> = poly
            .iter()
            .map(|ring| ring.iter().map(|&p| rotate(p, -sin, cos)).collect())
            .collect();

        let (min_y, max_y) = rotated
            .iter()
            .flatten()
            .fold((f64::MAX, f64::MIN), |(lo, hi), &(_, y)| (lo.min(y), hi.max(y)));
        if min_y >= max_y {
            continue;
        }

        let mut y = min_y + gap / 2.0;
        while y < max_y {
            for (x0, x1) in horizontal_spans(y, &rotated) {
                if x1 - x0 > f64::EPSILON {
                    lines.push((rotate((x0, y), sin, cos), rotate((x1, y), sin, cos)));
                }
            }
            y += gap;
        }
    }

    lines
}

/// Stable seed for a country so its sketch doesn't change between renders.
pub fn seed_for(id: &str) -> u64 {
    id.bytes()
        .fold(0xcbf2_9ce4_8422_2325_u64, |h, b| (h ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3))
}

/// Render segments as slightly wobbly strokes: jittered ends joined by a
/// quadratic curve through a displaced midpoint.
pub fn roughen(segments: &[Segment], roughness: f64, seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut d = String::new();
    let mut jitter = |r: f64| if r > 0.0 { rng.gen_range(-r..=r) } else { 0.0 };

    for &((x0, y0), (x1, y1)) in segments {
        let len = ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt();
        let r = roughness.min(len * 0.1);
        let (sx, sy) = (x0 + jitter(r), y0 + jitter(r));
        let (ex, ey) = (x1 + jitter(r), y1 + jitter(r));
        let (cx, cy) = ((x0 + x1) / 2.0 + jitter(r * 1.5), (y0 + y1) / 2.0 + jitter(r * 1.5));
        let _ = write!(d, "M{sx:.2},{sy:.2}Q{cx:.2},{cy:.2} {ex:.2},{ey:.2}");
    }
    d
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: f64) -> Vec<Vec<Vec<Point>>> {
        vec![vec![vec![(0.0, 0.0), (size, 0.0), (size, size), (0.0, size)]]]
    }

    #[test]
    fn horizontal_hachure_covers_square() {
        let lines = hachure_lines(&square(10.0), 0.0, 2.0);
        assert_eq!(lines.len(), 5);
        for ((x0, y0), (x1, y1)) in lines {
            assert!((y0 - y1).abs() < 1e-9);
            assert!(x0.abs() < 1e-9 && (x1 - 10.0).abs() < 1e-9);
        }
    }

    #[test]
    fn hachure_respects_angle() {
        for ((x0, y0), (x1, y1)) in hachure_lines(&square(20.0), 45.0, 3.0) {
            let slope = (y1 - y0) / (x1 - x0);
            assert!((slope - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn holes_stay_empty() {
        let poly = vec![vec![
            vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)],
            vec![(4.0, 4.0), (6.0, 4.0), (6.0, 6.0), (4.0, 6.0)],
        ]];
        let lines = hachure_lines(&poly, 0.0, 2.0);
        // y = 5 crosses the hole and splits into two spans
        let at_five: Vec<_> = lines.iter().filter(|((_, y), _)| (*y - 5.0).abs() < 1e-9).collect();
        assert_eq!(at_five.len(), 2);
    }

    #[test]
    fn tiny_gaps_are_clamped() {
        // 0.25, 0.75, ... 9.75
        assert_eq!(hachure_lines(&square(10.0), 0.0, 1e-20).len(), 20);
        assert_eq!(hachure_lines(&square(10.0), 0.0, 0.0).len(), 20);
        assert!(hachure_lines(&square(10.0), 60.0, f64::NAN).is_empty());
    }

    #[test]
    fn roughen_is_deterministic_per_seed() {
        let segs = hachure_lines(&square(10.0), 60.0, 2.0);
        assert_eq!(roughen(&segs, 1.0, seed_for("840")), roughen(&segs, 1.0, seed_for("840")));
        assert_ne!(seed_for("840"), seed_for("380"));
    }
}
