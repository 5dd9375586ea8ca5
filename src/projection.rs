use std::fmt::Write;

use crate::dataset::Settings;

/// Ratio between the viewport width and the base projection scale.
pub const WIDTH_TO_SCALE: f64 = 5.5;

/// Geographic `(lon, lat)` in degrees to viewport pixels.
pub trait Projection {
    fn project(&self, lon: f64, lat: f64) -> Option<(f64, f64)>;
}

/// Natural Earth I pseudo-cylindrical projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NaturalEarth {
    pub scale: f64,
    pub translate: (f64, f64),
    /// Projected (unscaled) position of the centre coordinate
    center: (f64, f64),
}

fn natural_earth_raw(lambda: f64, phi: f64) -> (f64, f64) {
    let phi2 = phi * phi;
    let phi4 = phi2 * phi2;
    let x = lambda
        * (0.8707 - 0.131979 * phi2
            + phi4 * (-0.013791 + phi4 * (0.003971 * phi2 - 0.001529 * phi4)));
    let y = phi
        * (1.007226 + phi2 * (0.015085 + phi4 * (-0.044475 + 0.028874 * phi2 - 0.005916 * phi4)));
    (x, y)
}

impl NaturalEarth {
    pub fn new(scale: f64, translate: (f64, f64), center_lon: f64, center_lat: f64) -> Self {
        Self {
            scale,
            translate,
            center: natural_earth_raw(center_lon.to_radians(), center_lat.to_radians()),
        }
    }

    /// Fit to a viewport: scale proportional to width, centre coordinate at the middle.
    pub fn fit(width: f64, height: f64, settings: &Settings) -> Self {
        Self::new(
            width / WIDTH_TO_SCALE * settings.default_zoom,
            (width / 2.0, height / 2.0),
            settings.center_lon,
            settings.center_lat,
        )
    }
}

impl Projection for NaturalEarth {
    fn project(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        if !lon.is_finite() || !lat.is_finite() {
            return None;
        }
        let (x, y) = natural_earth_raw(lon.to_radians(), lat.clamp(-90.0, 90.0).to_radians());
        Some((
            self.translate.0 + self.scale * (x - self.center.0),
            self.translate.1 - self.scale * (y - self.center.1),
        ))
    }
}

/// Project every ring of every polygon. Rings with fewer than three
/// projectable points are dropped, as are polygons left without an outer ring.
pub fn project_polygons(
    projection: &dyn Projection,
    polygons: &[Vec<Vec<[f64; 2]>>],
) -> Vec<Vec<Vec<(f64, f64)>>> {
    polygons
        .iter()
        .filter_map(|poly| {
            let mut rings = poly.iter().map(|ring| {
                ring.iter()
                    .filter_map(|c| projection.project(c[0], c[1]))
                    .collect::<Vec<_>>()
            });
            let outer = rings.next().filter(|r| r.len() >= 3)?;
            Some(
                std::iter::once(outer)
                    .chain(rings.filter(|r| r.len() >= 3))
                    .collect(),
            )
        })
        .collect()
}

/// SVG path data for already-projected rings, or `None` when nothing is drawable.
pub fn rings_to_path(polygons: &[Vec<Vec<(f64, f64)>>]) -> Option<String> {
    let mut d = String::new();
    for ring in polygons.iter().flatten() {
        for (i, (x, y)) in ring.iter().enumerate() {
            let cmd = if i == 0 { 'M' } else { 'L' };
            let _ = write!(d, "{cmd}{x:.2},{y:.2}");
        }
        d.push('Z');
    }
    if d.is_empty() { None } else { Some(d) }
}

/// Project a feature's polygons straight to SVG path data.
pub fn path_data(projection: &dyn Projection, polygons: &[Vec<Vec<[f64; 2]>>]) -> Option<String> {
    rings_to_path(&project_polygons(projection, polygons))
}
