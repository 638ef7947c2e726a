//! The record type produced by every load cycle.
//!
//! `Earthquake` is one parsed feed entry.  It is a plain value: fields are
//! fixed at construction and equality is field-wise.  A load cycle hands the
//! presentation layer a fresh `Vec<Earthquake>` in feed order.

use chrono::{DateTime, Utc};

/// Separator between the offset ("10km N") and the named place in a
/// feed location string.
const LOCATION_SEPARATOR: &str = " of ";

/// A single earthquake event.
#[derive(Debug, Clone, PartialEq)]
pub struct Earthquake {
    magnitude: f64,
    location: String,
    occurred_at_millis: i64,
    detail_url: String,
}

impl Earthquake {
    pub fn new(
        magnitude: f64,
        location: impl Into<String>,
        occurred_at_millis: i64,
        detail_url: impl Into<String>,
    ) -> Self {
        Self {
            magnitude,
            location: location.into(),
            occurred_at_millis,
            detail_url: detail_url.into(),
        }
    }

    /// Magnitude as reported by the feed.  Not clamped.
    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    /// Free-form location, e.g. `"10km N of Ridgecrest, CA"`.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Milliseconds since the Unix epoch.  May be zero or negative.
    pub fn occurred_at_millis(&self) -> i64 {
        self.occurred_at_millis
    }

    /// Link to the event's detail page.  May be empty.
    pub fn detail_url(&self) -> &str {
        &self.detail_url
    }

    /// Occurrence time as a UTC timestamp.
    ///
    /// `None` only when the millisecond count is outside chrono's
    /// representable range.
    pub fn occurred_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.occurred_at_millis)
    }

    /// Split the location into `(offset, primary)` on the first `" of "`.
    ///
    /// `"10km N of Ridgecrest, CA"` yields `(Some("10km N"), "Ridgecrest, CA")`;
    /// a location without the separator yields `(None, location)`.
    pub fn location_parts(&self) -> (Option<&str>, &str) {
        match self.location.split_once(LOCATION_SEPARATOR) {
            Some((offset, primary)) => (Some(offset), primary),
            None => (None, &self.location),
        }
    }
}
