use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// Width numeric country ids are padded to before mapping lookup.
pub const ID_WIDTH: usize = 3;

#[derive(Debug, Deserialize)]
struct Topology {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    transform: Option<Transform>,
    objects: BTreeMap<String, TopoGeometry>,
    arcs: Vec<Vec<Vec<f64>>>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct Transform {
    scale: [f64; 2],
    translate: [f64; 2],
}

/// A geometry object; `None` for `null` and any type other than the three below.
#[derive(Debug, Deserialize)]
#[serde(try_from = "Value")]
struct TopoGeometry(Option<Geometry>);

impl TryFrom<Value> for TopoGeometry {
    type Error = serde_json::Error;

    fn try_from(value: Value) -> std::result::Result<Self, Self::Error> {
        match value.get("type").and_then(Value::as_str) {
            Some("GeometryCollection" | "Polygon" | "MultiPolygon") => {
                serde_json::from_value(value).map(|g| TopoGeometry(Some(g)))
            }
            _ => Ok(TopoGeometry(None)),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    GeometryCollection {
        geometries: Vec<TopoGeometry>,
    },
    Polygon {
        #[serde(default)]
        id: Option<Value>,
        #[serde(default)]
        properties: Option<Properties>,
        arcs: Vec<Vec<i64>>,
    },
    MultiPolygon {
        #[serde(default)]
        id: Option<Value>,
        #[serde(default)]
        properties: Option<Properties>,
        arcs: Vec<Vec<Vec<i64>>>,
    },
}

#[derive(Debug, Default, Deserialize)]
struct Properties {
    #[serde(default)]
    name: Option<String>,
}

/// One country shape decoded from the world topology.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoFeature {
    /// Numeric id padded to [`ID_WIDTH`] digits. Some shapes (disputed
    /// territories in world-atlas) carry none and can never map to a code.
    pub id: Option<String>,
    pub name: Option<String>,
    /// Each polygon is a list of rings; ring 0 = outer, rest = holes
    pub polygons: Vec<Vec<Vec<[f64; 2]>>>,
}

/// Left-pad a numeric id with zeros ("4" -> "004").
pub fn pad_id(raw: &str) -> String {
    let raw = raw.trim();
    if raw.len() >= ID_WIDTH || raw.is_empty() {
        return raw.to_string();
    }
    format!("{raw:0>width$}", width = ID_WIDTH)
}

fn id_string(id: &Value) -> Option<String> {
    match id {
        Value::String(s) => Some(pad_id(s)),
        Value::Number(n) => Some(pad_id(&n.to_string())),
        _ => None,
    }
}

/// Decode the arc table into absolute `[lon, lat]` positions.
fn decode_arcs(arcs: &[Vec<Vec<f64>>], transform: Option<Transform>) -> Result<Vec<Vec<[f64; 2]>>> {
    arcs.iter()
        .enumerate()
        .map(|(i, arc)| {
            let mut x = 0.0;
            let mut y = 0.0;
            arc.iter()
                .map(|pos| {
                    if pos.len() < 2 {
                        return Err(Error::Topology(format!("arc {i} has a short position")));
                    }
                    Ok(match transform {
                        Some(t) => {
                            x += pos[0];
                            y += pos[1];
                            [x * t.scale[0] + t.translate[0], y * t.scale[1] + t.translate[1]]
                        }
                        None => [pos[0], pos[1]],
                    })
                })
                .collect()
        })
        .collect()
}

/// Stitch arc references into a ring. Negative indices are `!i`, i.e. arc `i` reversed.
fn stitch_ring(refs: &[i64], arcs: &[Vec<[f64; 2]>]) -> Result<Vec<[f64; 2]>> {
    let mut ring: Vec<[f64; 2]> = Vec::new();
    for &r in refs {
        let (index, reversed) = if r < 0 { (!r as usize, true) } else { (r as usize, false) };
        let arc = arcs
            .get(index)
            .ok_or_else(|| Error::Topology(format!("arc index {r} out of range")))?;

        let points: Vec<[f64; 2]> = if reversed {
            arc.iter().rev().copied().collect()
        } else {
            arc.clone()
        };
        // Consecutive arcs share their joint point
        let skip = usize::from(!ring.is_empty());
        ring.extend(points.into_iter().skip(skip));
    }
    Ok(ring)
}

fn stitch_polygon(rings: &[Vec<i64>], arcs: &[Vec<[f64; 2]>]) -> Result<Vec<Vec<[f64; 2]>>> {
    rings.iter().map(|r| stitch_ring(r, arcs)).collect()
}

fn collect_features(
    geometry: &TopoGeometry,
    arcs: &[Vec<[f64; 2]>],
    out: &mut Vec<GeoFeature>,
) -> Result<()> {
    let Some(geometry) = &geometry.0 else {
        return Ok(());
    };
    match geometry {
        Geometry::GeometryCollection { geometries } => {
            for g in geometries {
                collect_features(g, arcs, out)?;
            }
        }
        Geometry::Polygon { id, properties, arcs: refs } => out.push(GeoFeature {
            id: id.as_ref().and_then(id_string),
            name: properties.as_ref().and_then(|p| p.name.clone()),
            polygons: vec![stitch_polygon(refs, arcs)?],
        }),
        Geometry::MultiPolygon { id, properties, arcs: refs } => out.push(GeoFeature {
            id: id.as_ref().and_then(id_string),
            name: properties.as_ref().and_then(|p| p.name.clone()),
            polygons: refs
                .iter()
                .map(|p| stitch_polygon(p, arcs))
                .collect::<Result<_>>()?,
        }),
    }
    Ok(())
}

/// Decode the named object of a TopoJSON document into features.
/// Falls back to the first object when `object` is absent.
pub fn load_features(json: &str, object: &str) -> Result<Vec<GeoFeature>> {
    let topo: Topology = serde_json::from_str(json).map_err(|err| Error::Json {
        context: "world topology".into(),
        err,
    })?;
    if topo.kind != "Topology" {
        return Err(Error::Topology(format!("expected type Topology, got {}", topo.kind)));
    }

    let root = match topo.objects.get(object) {
        Some(root) => root,
        None => {
            let (name, root) = topo
                .objects
                .iter()
                .next()
                .ok_or_else(|| Error::Topology("topology has no objects".into()))?;
            tracing::debug!(wanted = object, using = %name, "topology object not found, using first");
            root
        }
    };

    let arcs = decode_arcs(&topo.arcs, topo.transform)?;
    let mut features = Vec::new();
    collect_features(root, &arcs, &mut features)?;
    Ok(features)
}
