use travels_map::dataset::DatasetIssue;
use travels_map::{Error, TravelsPayload};

const SHIPPED: &str = include_str!("../data/travels.json");

#[test]
fn shipped_dataset_has_at_most_one_home() {
    let payload = TravelsPayload::from_json(SHIPPED).unwrap();
    assert!(payload.homes().len() <= 1);
    assert!(payload.validate().is_empty());
}

#[test]
fn optional_fields_default() {
    let payload = TravelsPayload::from_json(r#"{"countries": {"GRC": {"name": "Greece"}}}"#).unwrap();
    let greece = &payload.countries["GRC"];
    assert!(!greece.visited);
    assert!(!greece.home);
    assert!(greece.trips.is_empty());
    assert_eq!(payload.settings.default_zoom, 1.0);
}

#[test]
fn settings_use_camel_case_keys() {
    let payload = TravelsPayload::from_json(
        r#"{"countries": {}, "settings": {"defaultZoom": 1.4, "centerLon": 12.5, "centerLat": 41.9}}"#,
    )
    .unwrap();
    assert_eq!(payload.settings.default_zoom, 1.4);
    assert_eq!(payload.settings.center_lon, 12.5);
    assert_eq!(payload.settings.center_lat, 41.9);
}

#[test]
fn payload_is_read_from_page_script() {
    let page = format!(
        "<!doctype html><body><div id=\"map\"></div>\n<script type=\"application/json\" id=\"travels-data\">\n{SHIPPED}\n</script></body>"
    );
    let payload = TravelsPayload::from_document(&page, "travels-data").unwrap();
    assert_eq!(payload.home().map(|(code, _)| code), Some("ITA"));

    let missing = TravelsPayload::from_document("<html></html>", "travels-data");
    assert!(matches!(missing, Err(Error::PayloadNotFound(_))));
}

#[test]
fn validation_reports_problems() {
    let payload = TravelsPayload::from_json(
        r#"{"countries": {
            "ITA": {"name": "Italy", "home": true},
            "bra": {"name": "Brazil", "home": true, "trips": [{"dates": " "}]}
        }}"#,
    )
    .unwrap();
    let issues = payload.validate();
    assert!(issues.contains(&DatasetIssue::MultipleHomes(vec!["ITA".into(), "bra".into()])));
    assert!(issues.contains(&DatasetIssue::LowercaseCode("bra".into())));
    assert!(issues.contains(&DatasetIssue::EmptyTripDates { code: "bra".into(), index: 0 }));
}

#[test]
fn malformed_json_is_an_error() {
    assert!(matches!(TravelsPayload::from_json("{"), Err(Error::Json { .. })));
}
