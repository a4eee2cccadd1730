//! CSV file to ICS document conversion.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::builder::EntryBuilder;
use crate::error::CsvCalResult;
use crate::event::CalendarEvent;
use crate::ics::generate_ics;
use crate::location::{GeocodeProvider, GeocodingCache};
use crate::record::read_records;
use crate::settings::Settings;

/// Convert the CSV file at `path` into an ICS document named `calendar_name`.
pub async fn csv_to_ical<P: GeocodeProvider>(
    path: &Path,
    calendar_name: &str,
    settings: &Settings,
    geocoder: &GeocodingCache<P>,
) -> CsvCalResult<Vec<u8>> {
    let file = BufReader::new(File::open(path)?);
    calendar_from_reader(file, calendar_name, settings, geocoder).await
}

/// Convert CSV data into an ICS document.
///
/// Events keep the order of the rows. Any failing row aborts the
/// conversion and nothing is returned.
pub async fn calendar_from_reader<R: Read, P: GeocodeProvider>(
    reader: R,
    calendar_name: &str,
    settings: &Settings,
    geocoder: &GeocodingCache<P>,
) -> CsvCalResult<Vec<u8>> {
    let events = build_events(reader, calendar_name, settings, geocoder).await?;
    let ics = generate_ics(calendar_name, &events, &settings.project_name)?;

    tracing::debug!(calendar = calendar_name, events = events.len(), "calendar generated");
    Ok(ics.into_bytes())
}

/// Parse and build every event without serializing.
pub async fn build_events<R: Read, P: GeocodeProvider>(
    reader: R,
    calendar_name: &str,
    settings: &Settings,
    geocoder: &GeocodingCache<P>,
) -> CsvCalResult<Vec<CalendarEvent>> {
    let records = read_records(reader)?;
    let builder = EntryBuilder::new(settings, geocoder, calendar_name);

    let mut events = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        events.push(builder.build(record, index + 1).await?);
    }
    Ok(events)
}
