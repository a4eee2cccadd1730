//! Calendar events derived from source records.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::location::Coordinates;

/// Radius in meters announced for Apple structured locations.
pub const STRUCTURED_LOCATION_RADIUS: &str = "70";

/// A fully built event, ready to serialize.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub uid: String,
    pub summary: String,
    pub description: String,
    /// `"{venue}\n{address}"`, or just the venue without an address
    pub location: String,
    pub start: EventTime,
    pub end: EventTime,
    /// Build time; differs between otherwise identical conversions
    pub dtstamp: DateTime<Utc>,
    pub geo: Option<Coordinates>,
    pub structured_location: Option<StructuredLocation>,
}

/// Start or end of an event: a civil date for all-day events,
/// a zoned instant otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventTime {
    Date(NaiveDate),
    Zoned(DateTime<Tz>),
}

impl EventTime {
    pub fn is_date(&self) -> bool {
        matches!(self, EventTime::Date(_))
    }
}

/// `X-APPLE-STRUCTURED-LOCATION` payload.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredLocation {
    pub coordinates: Coordinates,
    pub address: String,
    pub title: String,
    pub radius: String,
}

impl StructuredLocation {
    pub fn new(coordinates: Coordinates, address: &str, title: &str) -> Self {
        StructuredLocation {
            coordinates,
            address: address.to_string(),
            title: title.to_string(),
            radius: STRUCTURED_LOCATION_RADIUS.to_string(),
        }
    }

    /// The `geo:` URI carried as the property value.
    pub fn uri(&self) -> String {
        format!(
            "geo:{},{}",
            self.coordinates.latitude, self.coordinates.longitude
        )
    }
}
