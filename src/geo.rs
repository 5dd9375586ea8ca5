use crate::sketch::Point;

/// A projected country outline in viewport pixels, kept for hit-testing.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    /// Each polygon is a list of rings; ring 0 = outer, rest = holes
    pub polygons: Vec<Vec<Vec<Point>>>,
    pub bbox: (f64, f64, f64, f64), // (min_x, min_y, max_x, max_y)
}

impl Shape {
    pub fn new(polygons: Vec<Vec<Vec<Point>>>) -> Self {
        let mut min_x = f64::MAX;
        let mut min_y = f64::MAX;
        let mut max_x = f64::MIN;
        let mut max_y = f64::MIN;

        for &(x, y) in polygons.iter().flatten().flatten() {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }

        Self {
            polygons,
            bbox: (min_x, min_y, max_x, max_y),
        }
    }

    /// Check if a point falls inside the shape.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let (min_x, min_y, max_x, max_y) = self.bbox;
        if x < min_x || x > max_x || y < min_y || y > max_y {
            return false;
        }
        self.polygons.iter().any(|poly| point_in_polygon(x, y, poly))
    }

    /// Absolute area of the outer rings, used to prefer small shapes on overlap.
    pub fn area(&self) -> f64 {
        self.polygons
            .iter()
            .filter_map(|p| p.first())
            .map(|ring| ring_signed_area(ring).abs())
            .sum()
    }
}

/// Signed area of a ring (positive = CCW).
fn ring_signed_area(ring: &[Point]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0;
    let mut j = n - 1;
    for i in 0..n {
        area += (ring[j].0 - ring[i].0) * (ring[j].1 + ring[i].1);
        j = i;
    }
    area / 2.0
}

/// Ray-casting point-in-ring test.
fn point_in_ring(x: f64, y: f64, ring: &[Point]) -> bool {
    let mut inside = false;
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = ring[i];
        let (xj, yj) = ring[j];
        if ((yi > y) != (yj > y)) && (x < (xj - xi) * (y - yi) / (yj - yi) + xi) {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Check if a point is inside a polygon (outer ring minus holes).
fn point_in_polygon(x: f64, y: f64, rings: &[Vec<Point>]) -> bool {
    if rings.is_empty() || !point_in_ring(x, y, &rings[0]) {
        return false;
    }
    // Must be outside all holes
    !rings[1..].iter().any(|hole| point_in_ring(x, y, hole))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn donut() -> Shape {
        Shape::new(vec![vec![
            vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)],
            vec![(4.0, 4.0), (6.0, 4.0), (6.0, 6.0), (4.0, 6.0)],
        ]])
    }

    #[test]
    fn bbox_covers_points() {
        assert_eq!(donut().bbox, (0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn holes_are_outside() {
        let s = donut();
        assert!(s.contains(2.0, 2.0));
        assert!(!s.contains(5.0, 5.0));
        assert!(!s.contains(11.0, 5.0));
    }

    #[test]
    fn area_counts_outer_rings() {
        assert!((donut().area() - 100.0).abs() < 1e-9);
    }
}
