mod common;

use std::collections::HashSet;

use travels_map::render::{classify, draw_style, RenderEngine, RenderInput};
use travels_map::sketch::{HOME_ANGLE, VISITED_ANGLE};
use travels_map::theme::{ColorScheme, DefaultTheme, ThemeColors, HOME_COLOR};
use travels_map::{CountryStyle, DrawSurface, SvgSurface};

#[test]
fn scenario_styles_each_country() {
    let mut map = common::scenario_map();
    let mut surface = SvgSurface::new(common::WIDTH, common::HEIGHT);
    let stats = map.render(&mut surface);

    assert_eq!(stats.drawn, 4);
    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.home, 1);
    assert_eq!(stats.visited, 1);

    let rs = &map.state().render_state;
    let ita = rs.by_code("ITA").unwrap();
    let usa = rs.by_code("USA").unwrap();
    let fra = rs.by_code("FRA").unwrap();
    assert_eq!(ita.style, CountryStyle::Home);
    assert_eq!(usa.style, CountryStyle::Visited);
    assert_eq!(fra.style, CountryStyle::Default);

    assert_eq!(surface.attribute(ita.node, "data-hachure"), Some("45"));
    assert_eq!(surface.attribute(usa.node, "data-hachure"), Some("60"));
    assert_eq!(surface.attribute(fra.node, "data-hachure"), None);

    let colors = &map.state().colors;
    assert_eq!(surface.attribute(fra.node, "fill"), Some(colors.background_accented.as_str()));

    // Layer 1 carries the fill colour as hachure strokes, layer 2 is a bare border
    let ita_layers = surface.children(ita.node);
    assert_eq!(ita_layers.len(), 2);
    assert_eq!(surface.attribute(ita_layers[0], "stroke"), Some(HOME_COLOR));
    assert_eq!(surface.attribute(ita_layers[1], "fill"), Some("none"));
    let usa_layers = surface.children(usa.node);
    assert_eq!(surface.attribute(usa_layers[0], "stroke"), Some(colors.link.as_str()));
}

#[test]
fn every_feature_gets_exactly_one_style() {
    let world = common::world();
    let payload = common::scenario_payload();
    for feature in &world.features {
        let record = world.code_of(feature).and_then(|c| payload.countries.get(c));
        let style = classify(record);
        let matches = [CountryStyle::Home, CountryStyle::Visited, CountryStyle::Default]
            .iter()
            .filter(|s| **s == style)
            .count();
        assert_eq!(matches, 1, "feature {:?}", feature.id);
    }
}

#[test]
fn unmapped_and_unrecorded_ids_fall_back_to_default() {
    let mut map = common::scenario_map();
    let mut surface = SvgSurface::new(common::WIDTH, common::HEIGHT);
    map.render(&mut surface);

    let unmapped = map.state().render_state.get("999").unwrap();
    assert_eq!(unmapped.code, None);
    assert_eq!(unmapped.style, CountryStyle::Default);
}

#[test]
fn degenerate_geometry_is_skipped() {
    let mut map = common::scenario_map();
    let mut surface = SvgSurface::new(common::WIDTH, common::HEIGHT);
    map.render(&mut surface);
    assert!(map.state().render_state.get("010").is_none());
}

#[test]
fn rerender_replaces_nodes_instead_of_adding() {
    let mut map = common::scenario_map();
    let mut surface = SvgSurface::new(common::WIDTH, common::HEIGHT);

    map.render(&mut surface);
    let nodes = surface.node_count();
    let first: Vec<_> = map
        .state()
        .render_state
        .iter()
        .map(|e| (e.id.clone(), e.style))
        .collect();

    map.render(&mut surface);
    let second: Vec<_> = map
        .state()
        .render_state
        .iter()
        .map(|e| (e.id.clone(), e.style))
        .collect();

    assert_eq!(nodes, 8);
    assert_eq!(surface.node_count(), nodes);
    assert_eq!(first, second);
    assert_eq!(surface.children(surface.root()).len(), 4);
}

#[test]
fn one_entry_per_drawn_feature() {
    let world = common::world();
    let payload = common::scenario_payload();
    let colors = ThemeColors::resolve(&DefaultTheme, ColorScheme::Dark);
    let projection = travels_map::projection::NaturalEarth::fit(400.0, 200.0, &payload.settings);
    let input = RenderInput {
        world: &world,
        dataset: &payload.countries,
        projection: &projection,
        colors: &colors,
    };
    let mut surface = SvgSurface::new(400.0, 200.0);
    let (state, stats) = RenderEngine::default().render(&input, &mut surface);

    let ids: HashSet<_> = state.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids.len(), state.len());
    assert_eq!(state.len(), stats.drawn);
}

#[test]
fn draw_styles_use_theme_colours() {
    let colors = ThemeColors::resolve(&DefaultTheme, ColorScheme::Light);
    let home = draw_style(CountryStyle::Home, &colors);
    let visited = draw_style(CountryStyle::Visited, &colors);
    let plain = draw_style(CountryStyle::Default, &colors);

    assert_eq!(home.fill, HOME_COLOR);
    assert_eq!(home.hachure_angle, Some(HOME_ANGLE));
    assert_eq!(visited.fill, colors.link);
    assert_eq!(visited.hachure_angle, Some(VISITED_ANGLE));
    assert_eq!(plain.fill, colors.background_accented);
    assert_eq!(plain.hachure_angle, None);
}

#[test]
fn svg_output_marks_sketched_countries() {
    let mut map = common::scenario_map();
    let mut surface = SvgSurface::new(common::WIDTH, common::HEIGHT);
    map.render(&mut surface);
    let svg = surface.to_svg();

    assert!(svg.contains(r#"class="country home""#));
    assert!(svg.contains(r#"data-code="USA""#));
    assert!(svg.contains(r#"data-name="United States""#));
    assert!(svg.contains(r#"transform="translate(0.000,0.000) scale(1.0000)""#));
}

#[test]
fn features_without_id_draw_in_default_style() {
    let topology = r#"{"type": "Topology", "arcs": [[[20, 42], [24, 42], [24, 46], [20, 46], [20, 42]]],
        "objects": {"countries": {"type": "GeometryCollection", "geometries": [
            {"type": "Polygon", "properties": {"name": "Kosovo"}, "arcs": [[0]]}
        ]}}}"#;
    let world = travels_map::WorldData::from_json(common::MAPPING_JSON, topology, "countries").unwrap();
    let payload = common::scenario_payload();
    let colors = ThemeColors::resolve(&DefaultTheme, ColorScheme::Light);
    let projection =
        travels_map::projection::NaturalEarth::fit(common::WIDTH, common::HEIGHT, &payload.settings);
    let input = RenderInput {
        world: &world,
        dataset: &payload.countries,
        projection: &projection,
        colors: &colors,
    };
    let mut surface = SvgSurface::new(common::WIDTH, common::HEIGHT);
    let (state, stats) = RenderEngine::default().render(&input, &mut surface);

    assert_eq!(stats.drawn, 1);
    let entry = state.iter().next().unwrap();
    assert_eq!(entry.code, None);
    assert_eq!(entry.style, CountryStyle::Default);
    assert_eq!(surface.attribute(entry.node, "fill"), Some(colors.background_accented.as_str()));
}
