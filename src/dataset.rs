use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One visit to a country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripEntry {
    pub dates: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cities: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRecord {
    pub name: String,
    #[serde(default)]
    pub visited: bool,
    #[serde(default)]
    pub home: bool,
    #[serde(default)]
    pub trips: Vec<TripEntry>,
}

/// Map-wide settings embedded next to the country data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_zoom")]
    pub default_zoom: f64,
    #[serde(default)]
    pub center_lon: f64,
    #[serde(default)]
    pub center_lat: f64,
}

fn default_zoom() -> f64 {
    1.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_zoom: default_zoom(),
            center_lon: 0.0,
            center_lat: 0.0,
        }
    }
}

/// Countries keyed by ISO-3166 alpha-3 code.
pub type Dataset = BTreeMap<String, CountryRecord>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TravelsPayload {
    #[serde(default)]
    pub countries: Dataset,
    #[serde(default)]
    pub settings: Settings,
}

/// Problems found by [`TravelsPayload::validate`]. None of them stop rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetIssue {
    MultipleHomes(Vec<String>),
    EmptyTripDates { code: String, index: usize },
    LowercaseCode(String),
}

impl std::fmt::Display for DatasetIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetIssue::MultipleHomes(codes) => {
                write!(f, "more than one home country: {}", codes.join(", "))
            }
            DatasetIssue::EmptyTripDates { code, index } => {
                write!(f, "{code}: trip #{} has no dates", index + 1)
            }
            DatasetIssue::LowercaseCode(code) => write!(f, "{code}: codes must be upper case"),
        }
    }
}

impl TravelsPayload {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|err| Error::Json {
            context: "travel payload".into(),
            err,
        })
    }

    /// Read the payload out of a page's `<script id="...">` element.
    pub fn from_html(html: &str, element_id: &str) -> Result<Self> {
        let text = script_text(html, element_id)
            .ok_or_else(|| Error::PayloadNotFound(element_id.to_string()))?;
        Self::from_json(text)
    }

    /// Accepts either a bare JSON payload or an HTML page embedding one.
    pub fn from_document(text: &str, element_id: &str) -> Result<Self> {
        if text.trim_start().starts_with('{') {
            Self::from_json(text)
        } else {
            Self::from_html(text, element_id)
        }
    }

    pub fn homes(&self) -> Vec<&str> {
        self.countries
            .iter()
            .filter(|(_, c)| c.home)
            .map(|(code, _)| code.as_str())
            .collect()
    }

    pub fn home(&self) -> Option<(&str, &CountryRecord)> {
        self.countries
            .iter()
            .find(|(_, c)| c.home)
            .map(|(code, c)| (code.as_str(), c))
    }

    pub fn visited_count(&self) -> usize {
        self.countries.values().filter(|c| c.visited && !c.home).count()
    }

    pub fn trip_count(&self) -> usize {
        self.countries.values().map(|c| c.trips.len()).sum()
    }

    pub fn validate(&self) -> Vec<DatasetIssue> {
        let mut issues = Vec::new();

        let homes = self.homes();
        if homes.len() > 1 {
            issues.push(DatasetIssue::MultipleHomes(
                homes.iter().map(|c| c.to_string()).collect(),
            ));
        }

        for (code, record) in &self.countries {
            if code.chars().any(|ch| ch.is_ascii_lowercase()) {
                issues.push(DatasetIssue::LowercaseCode(code.clone()));
            }
            for (index, trip) in record.trips.iter().enumerate() {
                if trip.dates.trim().is_empty() {
                    issues.push(DatasetIssue::EmptyTripDates {
                        code: code.clone(),
                        index,
                    });
                }
            }
        }

        issues
    }
}

/// Text content of the `<script>` element carrying the given id.
fn script_text<'a>(html: &'a str, element_id: &str) -> Option<&'a str> {
    let mut rest = html;
    while let Some(start) = rest.find("<script") {
        let after = &rest[start..];
        let tag_end = after.find('>')?;
        let tag = &after[..tag_end];
        let body = &after[tag_end + 1..];
        let close = body.find("</script>")?;

        let wanted_double = format!("id=\"{element_id}\"");
        let wanted_single = format!("id='{element_id}'");
        if tag.contains(&wanted_double) || tag.contains(&wanted_single) {
            return Some(body[..close].trim());
        }
        rest = &body[close..];
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_script_by_id() {
        let html = r#"<html><script src="x.js"></script>
<script type="application/json" id="travels-data">{"countries":{}}</script></html>"#;
        assert_eq!(script_text(html, "travels-data"), Some(r#"{"countries":{}}"#));
        assert_eq!(script_text(html, "other"), None);
    }

    #[test]
    fn single_quoted_id() {
        let html = "<script id='t'> {} </script>";
        assert_eq!(script_text(html, "t"), Some("{}"));
    }
}
