//! Core of csvcal: turns CSV event lists into iCalendar documents.
//!
//! - `record` reads CSV rows, `duration` and `location` interpret their cells
//! - `builder` turns one row into a [`CalendarEvent`], geocoding its venue
//! - `assembler` converts a whole file and `ics` serializes the result

pub mod assembler;
pub mod builder;
pub mod calendars;
pub mod duration;
pub mod error;
pub mod event;
pub mod ics;
pub mod location;
pub mod record;
pub mod settings;

pub use assembler::{build_events, calendar_from_reader, csv_to_ical};
pub use builder::{EntryBuilder, event_uid};
pub use calendars::{calendar_path, list_calendars};
pub use duration::EntryDuration;
pub use error::{CsvCalError, CsvCalResult};
pub use event::{CalendarEvent, EventTime, StructuredLocation};
pub use location::{
    CacheInfo, Coordinates, GeocodeProvider, GeocodingCache, NominatimProvider, format_address,
};
pub use record::SourceRecord;
pub use settings::Settings;
