#![allow(dead_code)]

use travels_map::theme::DefaultTheme;
use travels_map::{ColorScheme, TravelsMap, TravelsPayload, WorldData};

pub const WIDTH: f64 = 960.0;
pub const HEIGHT: f64 = 500.0;

fn square(lon: f64, lat: f64, size: f64) -> String {
    format!(
        "[[{lon},{lat}],[{},{lat}],[{},{}],[{lon},{}],[{lon},{lat}]]",
        lon + size,
        lon + size,
        lat + size,
        lat + size
    )
}

/// Four square countries, one unmapped id and one degenerate shape.
pub fn topology_json() -> String {
    format!(
        r#"{{
  "type": "Topology",
  "objects": {{
    "countries": {{
      "type": "GeometryCollection",
      "geometries": [
        {{"type": "Polygon", "id": "380", "arcs": [[0]]}},
        {{"type": "MultiPolygon", "id": 840, "arcs": [[[1]], [[5]]]}},
        {{"type": "Polygon", "id": "250", "arcs": [[2]]}},
        {{"type": "Polygon", "id": "999", "arcs": [[3]]}},
        {{"type": "Polygon", "id": 10, "arcs": [[4]]}},
        {{"type": "Point", "coordinates": [0, 0]}}
      ]
    }}
  }},
  "arcs": [{}, {}, {}, {}, [[30,30],[31,31]], {}]
}}"#,
        square(10.0, 40.0, 4.0),
        square(-100.0, 35.0, 10.0),
        square(0.0, 44.0, 5.0),
        square(20.0, 0.0, 5.0),
        square(-160.0, 19.0, 3.0),
    )
}

pub const MAPPING_JSON: &str = r#"{"380": "ITA", "840": "USA", "250": "FRA", "10": "ATA"}"#;

pub const SCENARIO_JSON: &str = r#"{
  "countries": {
    "ITA": { "name": "Italy", "home": true },
    "USA": { "name": "United States", "visited": true },
    "FRA": { "name": "France" }
  },
  "settings": { "defaultZoom": 1.0, "centerLon": 0, "centerLat": 20 }
}"#;

pub fn world() -> WorldData {
    WorldData::from_json(MAPPING_JSON, &topology_json(), "countries").unwrap()
}

pub fn scenario_payload() -> TravelsPayload {
    TravelsPayload::from_json(SCENARIO_JSON).unwrap()
}

pub fn scenario_map() -> TravelsMap {
    TravelsMap::new(
        scenario_payload(),
        world(),
        Box::new(DefaultTheme),
        (WIDTH, HEIGHT),
        ColorScheme::Light,
    )
}

/// Screen position of a geographic point on a freshly fitted map.
pub fn screen_point(map: &TravelsMap, lon: f64, lat: f64) -> (f64, f64) {
    use travels_map::projection::Projection;
    map.state().projection.project(lon, lat).unwrap()
}
