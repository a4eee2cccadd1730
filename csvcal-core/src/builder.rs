//! Turns source records into calendar events.

use chrono::{DateTime, Days, LocalResult, NaiveDateTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

use crate::duration::EntryDuration;
use crate::error::{CsvCalError, CsvCalResult};
use crate::event::{CalendarEvent, EventTime, StructuredLocation};
use crate::location::{GeocodeProvider, GeocodingCache, format_address};
use crate::record::SourceRecord;
use crate::settings::Settings;

const DATETIME_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Builds the events of one calendar.
pub struct EntryBuilder<'a, P> {
    settings: &'a Settings,
    geocoder: &'a GeocodingCache<P>,
    calendar_name: &'a str,
}

impl<'a, P: GeocodeProvider> EntryBuilder<'a, P> {
    pub fn new(
        settings: &'a Settings,
        geocoder: &'a GeocodingCache<P>,
        calendar_name: &'a str,
    ) -> Self {
        EntryBuilder {
            settings,
            geocoder,
            calendar_name,
        }
    }

    /// Build the event for `record`, the `index`-th (1-based) row of the file.
    pub async fn build(&self, record: &SourceRecord, index: usize) -> CsvCalResult<CalendarEvent> {
        record.check_required(index)?;

        let duration = EntryDuration::parse(&record.duration);
        let venue = record.location_name().unwrap_or(record.name.as_str());
        let place = record.place().unwrap_or(self.settings.default_place.as_str());
        let full_address = format_address(&record.location, place);

        let location = if full_address.is_empty() {
            venue.to_string()
        } else {
            format!("{venue}\n{full_address}")
        };

        // Only rows with a street address are geocoded. This happens before
        // the date is parsed, so a row with a bad date still warms the cache.
        let geo = if record.location.is_empty() {
            None
        } else {
            self.geocoder.resolve(&full_address).await
        };
        let structured_location =
            geo.map(|coordinates| StructuredLocation::new(coordinates, &full_address, venue));

        let start = self.start_time(record, index)?;

        let (start, end) = match duration {
            EntryDuration::AllDay(days) => {
                let start_date = start.date_naive();
                let end_date = start_date
                    .checked_add_days(Days::new(u64::from(days)))
                    .ok_or_else(|| out_of_range(record, index))?;
                (EventTime::Date(start_date), EventTime::Date(end_date))
            }
            EntryDuration::Timed(span) => {
                let end = start
                    .checked_add_signed(span)
                    .ok_or_else(|| out_of_range(record, index))?;
                (EventTime::Zoned(start), EventTime::Zoned(end))
            }
        };

        Ok(CalendarEvent {
            uid: event_uid(
                &record.name,
                &record.date,
                &record.time,
                self.calendar_name,
                &self.settings.project_name,
            ),
            summary: record.name.clone(),
            description: record.description.clone(),
            location,
            start,
            end,
            dtstamp: Utc::now(),
            geo,
            structured_location,
        })
    }

    fn start_time(&self, record: &SourceRecord, index: usize) -> CsvCalResult<DateTime<Tz>> {
        let tz_name = record.timezone().unwrap_or(self.settings.tz.as_str());
        let tz: Tz = tz_name.parse().map_err(|_| CsvCalError::InvalidTimezone {
            record: index,
            timezone: tz_name.to_string(),
        })?;

        let input = format!("{} {}", record.date, record.time);
        let naive = NaiveDateTime::parse_from_str(&input, DATETIME_FORMAT).map_err(|e| {
            CsvCalError::InvalidDateTime {
                record: index,
                input: input.clone(),
                message: e.to_string(),
            }
        })?;

        localize(tz, naive).ok_or_else(|| CsvCalError::InvalidDateTime {
            record: index,
            input,
            message: format!("does not exist in {tz_name}"),
        })
    }
}

/// Attach `tz` to a wall-clock time.
///
/// Ambiguous times (clocks turned back) resolve to the later, standard-time
/// instant. Times skipped by a DST jump move forward by an hour.
pub fn localize(tz: Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(_, later) => Some(later),
        LocalResult::None => tz
            .from_local_datetime(&(naive + TimeDelta::hours(1)))
            .earliest(),
    }
}

/// Stable event id: MD5 of the identifying fields, namespaced by project.
///
/// Calendar clients use it to match updated events to ones they already have.
pub fn event_uid(
    name: &str,
    date: &str,
    time: &str,
    calendar_name: &str,
    namespace: &str,
) -> String {
    let seed = format!("{name}-{date}-{time}-{calendar_name}");
    format!("{:x}@{namespace}", md5::compute(seed.as_bytes()))
}

fn out_of_range(record: &SourceRecord, index: usize) -> CsvCalError {
    CsvCalError::InvalidDateTime {
        record: index,
        input: format!("{} {} +{}", record.date, record.time, record.duration),
        message: "end is out of range".into(),
    }
}
