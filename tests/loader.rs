mod common;

use std::io::Write;

use travels_map::loader::load_world;
use travels_map::topology::load_features;
use travels_map::{Error, Source, WorldData};

fn temp_json(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn loads_both_resources() {
    let mapping = temp_json(common::MAPPING_JSON);
    let topology = temp_json(&common::topology_json());

    let world = load_world(
        &Source::File(mapping.path().to_path_buf()),
        &Source::File(topology.path().to_path_buf()),
        "countries",
    )
    .unwrap();

    assert_eq!(world.features.len(), 5);
    assert_eq!(world.alpha3("380"), Some("ITA"));
    assert_eq!(world.alpha3("010"), Some("ATA"));
    let usa = world.features.iter().find(|f| f.id.as_deref() == Some("840")).unwrap();
    assert_eq!(usa.polygons.len(), 2);
}

#[test]
fn one_failed_resource_fails_the_load() {
    let mapping = temp_json(common::MAPPING_JSON);
    let result = load_world(
        &Source::File(mapping.path().to_path_buf()),
        &Source::File("/nonexistent/world.json".into()),
        "countries",
    );
    assert!(matches!(result, Err(Error::Io { .. })));
}

#[test]
fn invalid_topology_fails_the_load() {
    let mapping = temp_json(common::MAPPING_JSON);
    let topology = temp_json(r#"{"type": "FeatureCollection", "objects": {}, "arcs": []}"#);
    let result = load_world(
        &Source::File(mapping.path().to_path_buf()),
        &Source::File(topology.path().to_path_buf()),
        "countries",
    );
    assert!(matches!(result, Err(Error::Topology(_))));
}

#[test]
fn quantized_topology_is_decoded() {
    let json = r#"{
      "type": "Topology",
      "transform": {"scale": [0.1, 0.1], "translate": [-10, 40]},
      "objects": {"land": {"type": "GeometryCollection", "geometries": [
        {"type": "Polygon", "id": 56, "properties": {"name": "Belgium"}, "arcs": [[0]]}
      ]}},
      "arcs": [[[0, 0], [10, 0], [0, 10], [-10, 0], [0, -10]]]
    }"#;
    // Missing object name falls back to the first object
    let features = load_features(json, "countries").unwrap();
    assert_eq!(features.len(), 1);
    assert_eq!(features[0].id.as_deref(), Some("056"));
    assert_eq!(features[0].name.as_deref(), Some("Belgium"));

    let ring = &features[0].polygons[0][0];
    assert_eq!(ring.len(), 5);
    let [x, y] = ring[2];
    assert!((x - -9.0).abs() < 1e-9 && (y - 41.0).abs() < 1e-9);
}

#[test]
fn out_of_range_arcs_are_rejected() {
    let json = r#"{"type": "Topology", "objects": {"countries": {"type": "GeometryCollection",
        "geometries": [{"type": "Polygon", "id": "1", "arcs": [[7]]}]}}, "arcs": []}"#;
    assert!(matches!(load_features(json, "countries"), Err(Error::Topology(_))));
}

const MIXED_TOPOLOGY: &str = r#"{
  "type": "Topology",
  "objects": {"countries": {"type": "GeometryCollection", "geometries": [
    {"type": "Polygon", "id": "250", "arcs": [[0]]},
    {"type": null, "id": "999"},
    {"type": "Polygon", "properties": {"name": "Kosovo"}, "arcs": [[1]]}
  ]}},
  "arcs": [
    [[0, 44], [5, 44], [5, 49], [0, 49], [0, 44]],
    [[20, 42], [21, 42], [21, 43], [20, 43], [20, 42]]
  ]
}"#;

#[test]
fn null_geometries_do_not_fail_the_load() {
    let world = WorldData::from_json(common::MAPPING_JSON, MIXED_TOPOLOGY, "countries").unwrap();
    assert_eq!(world.features.len(), 2);
    assert_eq!(world.features[0].id.as_deref(), Some("250"));
}

#[test]
fn features_without_id_are_kept_unmapped() {
    let world = WorldData::from_json("{}", MIXED_TOPOLOGY, "countries").unwrap();
    let kosovo = world
        .features
        .iter()
        .find(|f| f.name.as_deref() == Some("Kosovo"))
        .unwrap();
    assert_eq!(kosovo.id, None);
    assert_eq!(world.code_of(kosovo), None);
}
