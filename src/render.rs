use crate::dataset::{CountryRecord, Dataset};
use crate::geo::Shape;
use crate::loader::WorldData;
use crate::projection::{project_polygons, rings_to_path, Projection};
use crate::sketch::{self, HachureOptions, HOME_ANGLE, VISITED_ANGLE};
use crate::surface::{DrawSurface, NodeId};
use crate::theme::ThemeColors;

/// Stroke width of unvisited country borders.
pub const DEFAULT_STROKE_WIDTH: f64 = 0.5;
/// Stroke width of the crisp border over a sketched country.
pub const BORDER_STROKE_WIDTH: f64 = 0.8;

/// How a country is drawn. Every feature gets exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountryStyle {
    Home,
    Visited,
    Default,
}

impl CountryStyle {
    /// Only sketched countries react to the pointer.
    pub fn is_interactive(self) -> bool {
        !matches!(self, CountryStyle::Default)
    }

    fn class(self) -> &'static str {
        match self {
            CountryStyle::Home => "country home",
            CountryStyle::Visited => "country visited",
            CountryStyle::Default => "country",
        }
    }
}

/// Home wins over visited; no record or an unvisited one is the default style.
pub fn classify(record: Option<&CountryRecord>) -> CountryStyle {
    match record {
        Some(r) if r.home => CountryStyle::Home,
        Some(r) if r.visited => CountryStyle::Visited,
        _ => CountryStyle::Default,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawStyle {
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
    /// Sketched fill angle; `None` means a plain solid fill.
    pub hachure_angle: Option<f64>,
}

pub fn draw_style(style: CountryStyle, colors: &ThemeColors) -> DrawStyle {
    match style {
        CountryStyle::Home => DrawStyle {
            fill: colors.home.clone(),
            stroke: colors.box_border.clone(),
            stroke_width: BORDER_STROKE_WIDTH,
            hachure_angle: Some(HOME_ANGLE),
        },
        CountryStyle::Visited => DrawStyle {
            fill: colors.link.clone(),
            stroke: colors.box_border.clone(),
            stroke_width: BORDER_STROKE_WIDTH,
            hachure_angle: Some(VISITED_ANGLE),
        },
        CountryStyle::Default => DrawStyle {
            fill: colors.background_accented.clone(),
            stroke: colors.box_border.clone(),
            stroke_width: DEFAULT_STROKE_WIDTH,
            hachure_angle: None,
        },
    }
}

/// One drawn country and the node to hit-test / raise for it.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedCountry {
    pub id: String,
    pub code: Option<String>,
    pub style: CountryStyle,
    pub node: NodeId,
    pub shape: Shape,
}

/// Everything currently drawn, in draw order. Rebuilt wholesale on every render.
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    entries: Vec<RenderedCountry>,
}

impl RenderState {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RenderedCountry> {
        self.entries.iter()
    }

    pub fn get(&self, id: &str) -> Option<&RenderedCountry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn by_code(&self, code: &str) -> Option<&RenderedCountry> {
        self.entries.iter().find(|e| e.code.as_deref() == Some(code))
    }

    /// The country under a viewport point (untransformed map coordinates).
    /// Enclaves win over the country surrounding them.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<&RenderedCountry> {
        self.entries
            .iter()
            .filter(|e| e.shape.contains(x, y))
            .min_by(|a, b| a.shape.area().total_cmp(&b.shape.area()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub drawn: usize,
    pub skipped: usize,
    pub visited: usize,
    pub home: usize,
}

pub struct RenderInput<'a> {
    pub world: &'a WorldData,
    pub dataset: &'a Dataset,
    pub projection: &'a dyn Projection,
    pub colors: &'a ThemeColors,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderEngine {
    pub hachure: HachureOptions,
}

impl RenderEngine {
    pub fn new(hachure: HachureOptions) -> Self {
        Self { hachure }
    }

    /// Clear the surface and draw every feature from scratch.
    pub fn render(
        &self,
        input: &RenderInput<'_>,
        surface: &mut dyn DrawSurface,
    ) -> (RenderState, RenderStats) {
        surface.clear();
        let root = surface.root();
        let mut state = RenderState::default();
        let mut stats = RenderStats::default();

        for (index, feature) in input.world.features.iter().enumerate() {
            // Id-less shapes still draw, keyed by their position in the topology
            let id = feature.id.clone().unwrap_or_else(|| format!("feature-{index}"));
            let code = input.world.code_of(feature);
            let record = code.and_then(|c| input.dataset.get(c));
            let style = classify(record);
            let draw = draw_style(style, input.colors);

            let projected = project_polygons(input.projection, &feature.polygons);
            let Some(d) = rings_to_path(&projected) else {
                tracing::debug!(%id, "skipping feature without projectable geometry");
                stats.skipped += 1;
                continue;
            };

            let node = match draw.hachure_angle {
                None => {
                    let path = surface.create_path(root, &d);
                    surface.set_attribute(path, "class", style.class());
                    surface.set_attribute(path, "fill", &draw.fill);
                    surface.set_attribute(path, "stroke", &draw.stroke);
                    surface.set_attribute(path, "stroke-width", &draw.stroke_width.to_string());
                    path
                }
                Some(angle) => {
                    let group = surface.create_group(root);
                    surface.set_attribute(group, "class", style.class());
                    surface.set_attribute(group, "data-hachure", &angle.to_string());
                    if let Some(code) = code {
                        surface.set_attribute(group, "data-code", code);
                    }
                    if let Some(record) = record {
                        surface.set_attribute(group, "data-name", &record.name);
                    }

                    // Layer 1: sketchy fill, no border
                    let lines = sketch::hachure_lines(&projected, angle, self.hachure.gap);
                    let fill_d = sketch::roughen(&lines, self.hachure.roughness, sketch::seed_for(&id));
                    if !fill_d.is_empty() {
                        let fill = surface.create_path(group, &fill_d);
                        surface.set_attribute(fill, "class", "hachure");
                        surface.set_attribute(fill, "fill", "none");
                        surface.set_attribute(fill, "stroke", &draw.fill);
                        surface.set_attribute(fill, "stroke-width", "1");
                    }

                    // Layer 2: exact border on top
                    let border = surface.create_path(group, &d);
                    surface.set_attribute(border, "class", "border");
                    surface.set_attribute(border, "fill", "none");
                    surface.set_attribute(border, "stroke", &draw.stroke);
                    surface.set_attribute(border, "stroke-width", &draw.stroke_width.to_string());

                    match style {
                        CountryStyle::Home => stats.home += 1,
                        _ => stats.visited += 1,
                    }
                    group
                }
            };

            stats.drawn += 1;
            state.entries.push(RenderedCountry {
                id,
                code: code.map(str::to_string),
                style,
                node,
                shape: Shape::new(projected),
            });
        }

        tracing::debug!(
            drawn = stats.drawn,
            skipped = stats.skipped,
            visited = stats.visited,
            home = stats.home,
            "render pass complete"
        );
        (state, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(visited: bool, home: bool) -> CountryRecord {
        CountryRecord {
            name: "X".into(),
            visited,
            home,
            trips: Vec::new(),
        }
    }

    #[test]
    fn classification_is_total() {
        assert_eq!(classify(None), CountryStyle::Default);
        assert_eq!(classify(Some(&record(false, false))), CountryStyle::Default);
        assert_eq!(classify(Some(&record(true, false))), CountryStyle::Visited);
        assert_eq!(classify(Some(&record(false, true))), CountryStyle::Home);
        assert_eq!(classify(Some(&record(true, true))), CountryStyle::Home);
    }

    #[test]
    fn only_sketched_styles_are_interactive() {
        assert!(CountryStyle::Home.is_interactive());
        assert!(CountryStyle::Visited.is_interactive());
        assert!(!CountryStyle::Default.is_interactive());
    }
}
