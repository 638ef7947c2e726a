//! GeoJSON feed parsing.
//!
//! Turns the bytes of a USGS-style `FeatureCollection` into [`Earthquake`]s.
//! This is a pure function (no I/O) so that tests can exercise it without
//! hitting the network.
//!
//! Only the envelope is mandatory: a JSON object with a `features` array.
//! Each feature is decoded on its own and dropped if it lacks a numeric
//! `mag`, a string `place`, or an integer `time`, so one bad entry never
//! costs the rest of the feed.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::error::Category;
use serde_json::value::RawValue;
use serde_json::Value;

use super::{Earthquake, ParseError};

/// The outcome of parsing one feed document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedFeed {
    /// Well-formed entries, in feed order.
    pub earthquakes: Vec<Earthquake>,
    /// Number of entries dropped for missing or malformed fields.
    pub skipped: usize,
}

#[derive(Deserialize)]
struct Feature {
    properties: Properties,
}

#[derive(Deserialize)]
struct Properties {
    mag: Option<f64>,
    place: Option<String>,
    time: Option<i64>,
    #[serde(default)]
    url: Option<Value>,
}

/// Parse a feed into its well-formed records.
pub fn parse(raw: &[u8]) -> Result<Vec<Earthquake>, ParseError> {
    parse_feed(raw).map(|feed| feed.earthquakes)
}

/// Parse a feed, also reporting how many entries were skipped.
pub fn parse_feed(raw: &[u8]) -> Result<ParsedFeed, ParseError> {
    // Members stay raw until needed, so values inside a feature (an
    // out-of-range number, say) are only checked when that feature is.
    let root: HashMap<String, &RawValue> = serde_json::from_slice(raw).map_err(envelope_error)?;

    let features = root
        .get("features")
        .ok_or_else(|| ParseError::Envelope("missing field `features`".into()))?;
    let entries: Vec<&RawValue> = serde_json::from_str(features.get())
        .map_err(|e| ParseError::Envelope(format!("`features`: {e}")))?;

    let mut feed = ParsedFeed {
        earthquakes: Vec::with_capacity(entries.len()),
        skipped: 0,
    };

    for entry in entries {
        match earthquake_from_feature(entry) {
            Some(quake) => feed.earthquakes.push(quake),
            None => feed.skipped += 1,
        }
    }

    Ok(feed)
}

fn envelope_error(err: serde_json::Error) -> ParseError {
    match err.classify() {
        Category::Data => ParseError::Envelope(err.to_string()),
        Category::Io | Category::Syntax | Category::Eof => ParseError::Malformed(err.to_string()),
    }
}

fn earthquake_from_feature(entry: &RawValue) -> Option<Earthquake> {
    let Feature { properties } = serde_json::from_str(entry.get()).ok()?;

    let detail_url = match properties.url {
        Some(Value::String(url)) => url,
        _ => String::new(),
    };

    Some(Earthquake::new(
        properties.mag?,
        properties.place?,
        properties.time?,
        detail_url,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_feature() {
        let json = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "properties": {
        "mag": 4.3,
        "place": "10km N of X",
        "time": 1300000000000,
        "url": "http://example/1"
      }
    }
  ]
}"#;

        let quakes = parse(json.as_bytes()).unwrap();

        assert_eq!(quakes.len(), 1);
        assert_eq!(quakes[0].magnitude(), 4.3);
        assert_eq!(quakes[0].location(), "10km N of X");
        assert_eq!(quakes[0].occurred_at_millis(), 1_300_000_000_000);
        assert_eq!(quakes[0].detail_url(), "http://example/1");
    }

    #[test]
    fn skips_feature_missing_time() {
        let json = r#"{"features": [
  {"properties": {"mag": 2.1, "place": "No time here", "url": "http://example/a"}},
  {"properties": {"mag": 3.2, "place": "Has time", "time": 5, "url": "http://example/b"}}
]}"#;

        let feed = parse_feed(json.as_bytes()).unwrap();

        assert_eq!(feed.earthquakes.len(), 1);
        assert_eq!(feed.earthquakes[0].location(), "Has time");
        assert_eq!(feed.skipped, 1);
    }

    #[test]
    fn keeps_well_formed_entries_in_feed_order() {
        let json = r#"{"features": [
  {"properties": {"mag": 1.0, "place": "first", "time": 30}},
  {"properties": {"mag": "big", "place": "bad mag", "time": 20}},
  {"properties": {"mag": 2.0, "place": "second", "time": 40}},
  {"properties": {"mag": null, "place": "null mag", "time": 10}},
  {"properties": {"mag": 3.0, "time": 10}},
  {"properties": {"mag": 3.0, "place": "float time", "time": 1.5}},
  {"geometry": {}},
  "not an object",
  {"properties": {"mag": 0.5, "place": "third", "time": -1}}
]}"#;

        let feed = parse_feed(json.as_bytes()).unwrap();
        let places: Vec<&str> = feed.earthquakes.iter().map(|q| q.location()).collect();

        assert_eq!(places, ["first", "second", "third"]);
        assert_eq!(feed.skipped, 6);
    }

    #[test]
    fn missing_url_defaults_to_empty() {
        let json = r#"{"features": [{"properties": {"mag": 6.1, "place": "Fiji", "time": 0}}]}"#;
        let quakes = parse(json.as_bytes()).unwrap();
        assert_eq!(quakes[0].detail_url(), "");
    }

    #[test]
    fn out_of_range_number_only_costs_its_own_entry() {
        let json = br#"{"features": [
  {"properties": {"mag": 1e400, "place": "overflow", "time": 1}},
  {"properties": {"mag": 4.3, "place": "good", "time": 2}}
]}"#;

        let feed = parse_feed(json).unwrap();

        assert_eq!(feed.earthquakes.len(), 1);
        assert_eq!(feed.earthquakes[0].location(), "good");
        assert_eq!(feed.skipped, 1);
    }

    #[test]
    fn non_string_url_defaults_to_empty() {
        let json = br#"{"features": [
  {"properties": {"mag": 4.3, "place": "numeric url", "time": 2, "url": 17}},
  {"properties": {"mag": 2.0, "place": "null url", "time": 1, "url": null}}
]}"#;

        let feed = parse_feed(json).unwrap();

        assert_eq!(feed.earthquakes.len(), 2);
        assert_eq!(feed.skipped, 0);
        assert_eq!(feed.earthquakes[0].detail_url(), "");
        assert_eq!(feed.earthquakes[1].detail_url(), "");
    }

    #[test]
    fn integer_magnitude_is_accepted() {
        let json = r#"{"features": [{"properties": {"mag": 7, "place": "Chile", "time": 0}}]}"#;
        let quakes = parse(json.as_bytes()).unwrap();
        assert_eq!(quakes[0].magnitude(), 7.0);
    }

    #[test]
    fn empty_feature_list_is_ok() {
        let feed = parse_feed(br#"{"type": "FeatureCollection", "features": []}"#).unwrap();
        assert!(feed.earthquakes.is_empty());
        assert_eq!(feed.skipped, 0);
    }

    #[test]
    fn top_level_array_is_rejected() {
        let err = parse(b"[1, 2, 3]").unwrap_err();
        assert!(matches!(err, ParseError::Envelope(_)));
    }

    #[test]
    fn missing_features_is_rejected() {
        let err = parse(br#"{"type": "FeatureCollection"}"#).unwrap_err();
        assert!(matches!(err, ParseError::Envelope(_)));
    }

    #[test]
    fn non_array_features_is_rejected() {
        let err = parse(br#"{"features": {"mag": 1}}"#).unwrap_err();
        assert!(matches!(err, ParseError::Envelope(_)));
    }

    #[test]
    fn non_json_is_rejected() {
        let err = parse(b"<rss version=\"2.0\"></rss>").unwrap_err();
        assert!(matches!(err, ParseError::Malformed(_)));
    }

    #[test]
    fn empty_body_is_rejected() {
        let err = parse(b"").unwrap_err();
        assert!(matches!(err, ParseError::Malformed(_)));
    }
}
