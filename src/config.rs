use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sketch::HachureOptions;
use crate::theme::ColorScheme;

pub const DEFAULT_TOPOLOGY_URL: &str = "https://cdn.jsdelivr.net/npm/world-atlas@2/countries-110m.json";
pub const DEFAULT_MAPPING_URL: &str =
    "https://raw.githubusercontent.com/lukes/ISO-3166-Countries-with-Regional-Codes/master/all/all.json";

/// Rendering options, loadable from a JSON file and overridden by CLI flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub width: f64,
    pub height: f64,
    pub scheme: ColorScheme,
    pub mapping: String,
    pub topology: String,
    /// Object inside the topology holding the countries.
    pub topology_object: String,
    /// Id of the `<script>` element carrying the payload in an HTML page.
    pub payload_id: String,
    pub hachure_gap: f64,
    pub roughness: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 500.0,
            scheme: ColorScheme::Light,
            mapping: DEFAULT_MAPPING_URL.to_string(),
            topology: DEFAULT_TOPOLOGY_URL.to_string(),
            topology_object: "countries".to_string(),
            payload_id: "travels-data".to_string(),
            hachure_gap: 4.0,
            roughness: 0.8,
        }
    }
}

impl MapConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|err| Error::Io {
            path: path.display().to_string(),
            err,
        })?;
        serde_json::from_str(&content).map_err(|err| Error::Json {
            context: path.display().to_string(),
            err,
        })
    }

    pub fn hachure(&self) -> HachureOptions {
        HachureOptions {
            gap: self.hachure_gap,
            roughness: self.roughness,
            ..HachureOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_files_keep_defaults() {
        let cfg: MapConfig = serde_json::from_str(r#"{"width": 640, "scheme": "dark"}"#).unwrap();
        assert_eq!(cfg.width, 640.0);
        assert_eq!(cfg.scheme, ColorScheme::Dark);
        assert_eq!(cfg.height, 500.0);
        assert_eq!(cfg.payload_id, "travels-data");
    }
}
