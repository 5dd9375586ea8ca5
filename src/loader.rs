use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::topology::{self, pad_id, GeoFeature};

/// Where a JSON resource comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(String),
    File(PathBuf),
}

impl Source {
    pub fn parse(s: &str) -> Self {
        if s.starts_with("http://") || s.starts_with("https://") {
            Source::Url(s.to_string())
        } else {
            Source::File(PathBuf::from(s))
        }
    }

    fn describe(&self) -> String {
        match self {
            Source::Url(url) => url.clone(),
            Source::File(path) => path.display().to_string(),
        }
    }

    pub fn read_to_string(&self) -> Result<String> {
        match self {
            Source::File(path) => std::fs::read_to_string(path).map_err(|err| Error::Io {
                path: path.display().to_string(),
                err,
            }),
            Source::Url(url) => fetch(url),
        }
    }
}

#[cfg(feature = "fetch")]
fn fetch(url: &str) -> Result<String> {
    let fail = |message: String| Error::Fetch {
        source_name: url.to_string(),
        message,
    };
    let resp = reqwest::blocking::get(url).map_err(|e| fail(format!("HTTP request failed: {e}")))?;
    if !resp.status().is_success() {
        return Err(fail(format!("server returned {}", resp.status())));
    }
    resp.text().map_err(|e| fail(format!("failed to read body: {e}")))
}

#[cfg(not(feature = "fetch"))]
fn fetch(url: &str) -> Result<String> {
    Err(Error::FetchDisabled(url.to_string()))
}

/// Numeric (zero-padded) country id to ISO alpha-3 code.
pub type CodeMapping = HashMap<String, String>;

#[derive(Debug, Deserialize)]
struct MappingRow {
    #[serde(alias = "country-code")]
    numeric: Value,
    #[serde(alias = "alpha-3")]
    alpha3: String,
}

/// Parse a mapping resource: either `{"004": "AFG"}` or a list of ISO-3166 rows.
pub fn parse_mapping(json: &str) -> Result<CodeMapping> {
    let value: Value = serde_json::from_str(json).map_err(|err| Error::Json {
        context: "country mapping".into(),
        err,
    })?;

    match value {
        Value::Object(map) => map
            .into_iter()
            .map(|(k, v)| match v {
                Value::String(code) => Ok((pad_id(&k), code)),
                other => Err(Error::Mapping(format!("value for {k} is not a string: {other}"))),
            })
            .collect(),
        Value::Array(_) => {
            let rows: Vec<MappingRow> = serde_json::from_value(value).map_err(|err| Error::Json {
                context: "country mapping rows".into(),
                err,
            })?;
            rows.into_iter()
                .map(|row| {
                    let numeric = match &row.numeric {
                        Value::String(s) => s.clone(),
                        Value::Number(n) => n.to_string(),
                        other => {
                            return Err(Error::Mapping(format!("bad numeric code {other}")));
                        }
                    };
                    Ok((pad_id(&numeric), row.alpha3))
                })
                .collect()
        }
        other => Err(Error::Mapping(format!(
            "expected an object or array, got {}",
            match other {
                Value::Null => "null",
                Value::Bool(_) => "a boolean",
                Value::Number(_) => "a number",
                _ => "a string",
            }
        ))),
    }
}

/// Both external datasets. Written once by [`load_world`], read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct WorldData {
    pub mapping: CodeMapping,
    pub features: Vec<GeoFeature>,
}

impl WorldData {
    pub fn from_json(mapping_json: &str, topology_json: &str, object: &str) -> Result<Self> {
        Ok(Self {
            mapping: parse_mapping(mapping_json)?,
            features: topology::load_features(topology_json, object)?,
        })
    }

    pub fn alpha3(&self, feature_id: &str) -> Option<&str> {
        self.mapping.get(feature_id).map(String::as_str)
    }

    /// Alpha-3 code of a feature; `None` when it has no id or the id is unmapped.
    pub fn code_of(&self, feature: &GeoFeature) -> Option<&str> {
        feature.id.as_deref().and_then(|id| self.alpha3(id))
    }
}

fn joined(result: std::thread::Result<Result<String>>, what: &Source) -> Result<String> {
    result.unwrap_or_else(|_| {
        Err(Error::Fetch {
            source_name: what.describe(),
            message: "loader thread panicked".into(),
        })
    })
}

/// Fetch the mapping and the topology in parallel; succeeds only when both do.
pub fn load_world(mapping: &Source, topology: &Source, object: &str) -> Result<WorldData> {
    tracing::info!(mapping = %mapping.describe(), topology = %topology.describe(), "loading world data");

    let (mapping_json, topology_json) = std::thread::scope(|s| {
        let m = s.spawn(|| mapping.read_to_string());
        let t = s.spawn(|| topology.read_to_string());
        (joined(m.join(), mapping), joined(t.join(), topology))
    });

    let world = WorldData::from_json(&mapping_json?, &topology_json?, object)?;
    tracing::info!(
        features = world.features.len(),
        codes = world.mapping.len(),
        "world data loaded"
    );
    Ok(world)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_parse_distinguishes_urls() {
        assert_eq!(
            Source::parse("https://x.org/a.json"),
            Source::Url("https://x.org/a.json".into())
        );
        assert_eq!(Source::parse("data/a.json"), Source::File("data/a.json".into()));
    }

    #[test]
    fn mapping_object_keys_are_padded() {
        let m = parse_mapping(r#"{"4": "AFG", "840": "USA"}"#).unwrap();
        assert_eq!(m.get("004").map(String::as_str), Some("AFG"));
        assert_eq!(m.get("840").map(String::as_str), Some("USA"));
    }

    #[test]
    fn mapping_rows_accept_iso_column_names() {
        let m = parse_mapping(
            r#"[{"country-code": "380", "alpha-3": "ITA"}, {"numeric": 76, "alpha3": "BRA"}]"#,
        )
        .unwrap();
        assert_eq!(m.get("380").map(String::as_str), Some("ITA"));
        assert_eq!(m.get("076").map(String::as_str), Some("BRA"));
    }

    #[test]
    fn mapping_rejects_scalars() {
        assert!(matches!(parse_mapping("42"), Err(Error::Mapping(_))));
    }
}
