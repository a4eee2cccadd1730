//! ICS document generation.

use crate::error::CsvCalResult;
use crate::event::{CalendarEvent, EventTime};
use icalendar::{Calendar, Component, EventLike, Property, ValueType};

/// Render a whole calendar with its events, in order.
pub fn generate_ics(
    calendar_name: &str,
    events: &[CalendarEvent],
    project_name: &str,
) -> CsvCalResult<String> {
    let mut cal = Calendar::new();
    cal.append_property(Property::new("X-WR-CALNAME", calendar_name));

    for event in events {
        cal.push(to_ics_event(event));
    }

    let cal = cal.done();

    Ok(clean_ics_output(&cal.to_string(), &prodid(project_name)))
}

/// `-//<project>//mxm.dk//`, the PRODID all csvcal calendars carry.
pub fn prodid(project_name: &str) -> String {
    format!("-//{project_name}//mxm.dk//")
}

fn to_ics_event(event: &CalendarEvent) -> icalendar::Event {
    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&event.uid);
    ics_event.summary(&event.summary);
    ics_event.description(&event.description);

    // DTSTAMP - required by RFC 5545, non-deterministic across conversions
    ics_event.timestamp(event.dtstamp);

    add_datetime_property(&mut ics_event, "DTSTART", &event.start);
    add_datetime_property(&mut ics_event, "DTEND", &event.end);

    ics_event.location(&event.location);

    if let Some(geo) = event.geo {
        ics_event.add_property("GEO", format!("{};{}", geo.latitude, geo.longitude));
    }

    if let Some(ref structured) = event.structured_location {
        let mut prop = Property::new("X-APPLE-STRUCTURED-LOCATION", structured.uri());
        prop.add_parameter("VALUE", "URI");
        prop.add_parameter("X-ADDRESS", &param_value(&structured.address));
        prop.add_parameter("X-TITLE", &param_value(&structured.title));
        prop.add_parameter("X-APPLE-RADIUS", &structured.radius);
        ics_event.append_property(prop);
    }

    ics_event.done()
}

/// Parameter values are quoted as a whole and may not contain `"` themselves.
fn param_value(value: &str) -> String {
    value.replace('"', "'")
}

/// Clean up ICS output from the icalendar crate
/// - Replace PRODID with the project's own
/// - Remove CALSCALE:GREGORIAN (it's the default)
fn clean_ics_output(ics: &str, prodid: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:");
            result.push_str(prodid);
            result.push_str("\r\n");
            continue;
        }

        // Skip CALSCALE:GREGORIAN (it's the default)
        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}

/// Add a datetime property with proper formatting based on EventTime variant
fn add_datetime_property(ics_event: &mut icalendar::Event, name: &str, time: &EventTime) {
    match time {
        EventTime::Date(d) => {
            let mut prop = Property::new(name, d.format("%Y%m%d").to_string());
            prop.append_parameter(ValueType::Date);
            ics_event.append_property(prop);
        }
        EventTime::Zoned(dt) => {
            // Local wall time with a TZID parameter
            let mut prop = Property::new(name, dt.format("%Y%m%dT%H%M%S").to_string());
            prop.add_parameter("TZID", dt.timezone().name());
            ics_event.append_property(prop);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::StructuredLocation;
    use crate::location::Coordinates;
    use chrono::{NaiveDate, TimeZone, Utc};

    /// Undo RFC 5545 line folding so assertions can look at whole lines.
    fn unfold(ics: &str) -> String {
        ics.replace("\r\n ", "").replace("\r\n\t", "")
    }

    fn make_test_event() -> CalendarEvent {
        let start = chrono_tz::Europe::Berlin
            .with_ymd_and_hms(2026, 4, 11, 9, 0, 0)
            .unwrap();
        CalendarEvent {
            uid: "abc123@csvcal".to_string(),
            summary: "Test Event".to_string(),
            description: "Test Desc".to_string(),
            location: "Some Venue".to_string(),
            start: EventTime::Zoned(start),
            end: EventTime::Zoned(start + chrono::TimeDelta::hours(8)),
            dtstamp: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
            geo: None,
            structured_location: None,
        }
    }

    #[test]
    fn test_generate_ics_calendar_metadata() {
        let ics = generate_ics("Test Cal", &[], "csvcal").unwrap();

        assert!(ics.starts_with("BEGIN:VCALENDAR\r\n"), "ICS:\n{}", ics);
        assert!(ics.trim_end().ends_with("END:VCALENDAR"), "ICS:\n{}", ics);
        assert!(ics.contains("VERSION:2.0"));
        assert!(ics.contains("PRODID:-//csvcal//mxm.dk//"), "ICS:\n{}", ics);
        assert!(ics.contains("X-WR-CALNAME:Test Cal"));
        assert!(!ics.contains("CALSCALE"));
        assert!(!ics.contains("BEGIN:VEVENT"));
    }

    #[test]
    fn test_generate_ics_timed_event_has_tzid() {
        let ics = unfold(&generate_ics("Test Cal", &[make_test_event()], "csvcal").unwrap());

        assert!(
            ics.contains("DTSTART;TZID=Europe/Berlin:20260411T090000"),
            "DTSTART should carry TZID. ICS:\n{}",
            ics
        );
        assert!(
            ics.contains("DTEND;TZID=Europe/Berlin:20260411T170000"),
            "DTEND should carry TZID. ICS:\n{}",
            ics
        );
        assert!(ics.contains("UID:abc123@csvcal"));
        assert!(ics.contains("SUMMARY:Test Event"));
        assert!(ics.contains("DTSTAMP:20260102T030405Z"));
        assert_eq!(ics.matches("DTSTAMP:").count(), 1, "ICS:\n{}", ics);
    }

    #[test]
    fn test_generate_ics_all_day_event_has_value_date() {
        let mut event = make_test_event();
        event.start = EventTime::Date(NaiveDate::from_ymd_opt(2024, 5, 12).unwrap());
        event.end = EventTime::Date(NaiveDate::from_ymd_opt(2024, 5, 13).unwrap());

        let ics = generate_ics("Test Cal", &[event], "csvcal").unwrap();

        assert!(
            ics.contains("DTSTART;VALUE=DATE:20240512"),
            "DTSTART should have VALUE=DATE parameter. ICS:\n{}",
            ics
        );
        assert!(
            ics.contains("DTEND;VALUE=DATE:20240513"),
            "DTEND should have VALUE=DATE parameter. ICS:\n{}",
            ics
        );
    }

    #[test]
    fn test_generate_ics_geo_and_structured_location() {
        let coordinates = Coordinates {
            latitude: 52.52,
            longitude: 13.405,
        };
        let mut event = make_test_event();
        event.geo = Some(coordinates);
        event.structured_location = Some(StructuredLocation::new(
            coordinates,
            "Musterstraße 123, 12345 Musterstadt, Germany",
            "Bäckerei Musterstadt",
        ));

        let ics = unfold(&generate_ics("Test Cal", &[event], "csvcal").unwrap());

        let geo_line = ics.lines().find(|l| l.starts_with("GEO:")).unwrap();
        assert!(geo_line.starts_with("GEO:52.52"), "Got: {}", geo_line);
        assert!(geo_line.ends_with("13.405"), "Got: {}", geo_line);
        let apple_line = ics
            .lines()
            .find(|l| l.starts_with("X-APPLE-STRUCTURED-LOCATION"))
            .expect("Should have X-APPLE-STRUCTURED-LOCATION line");
        assert!(apple_line.contains(":geo:52.52"), "Got: {}", apple_line);
        assert!(apple_line.ends_with("13.405"), "Got: {}", apple_line);
        assert!(apple_line.contains("VALUE=URI"), "Got: {}", apple_line);
        assert!(apple_line.contains("X-APPLE-RADIUS=70"), "Got: {}", apple_line);
        assert!(apple_line.contains("Bäckerei Musterstadt"), "Got: {}", apple_line);
        assert!(apple_line.contains("12345 Musterstadt"), "Got: {}", apple_line);
    }

    #[test]
    fn test_generate_ics_quotes_in_structured_location_params() {
        let coordinates = Coordinates {
            latitude: 52.52,
            longitude: 13.405,
        };
        let mut event = make_test_event();
        event.geo = Some(coordinates);
        event.structured_location = Some(StructuredLocation::new(
            coordinates,
            "Hauptstraße \"Hinterhof\" 7, 12345 Musterstadt",
            "Café: \"Zur Post\"",
        ));

        let ics = unfold(&generate_ics("Test Cal", &[event], "csvcal").unwrap());

        let apple_line = ics
            .lines()
            .find(|l| l.starts_with("X-APPLE-STRUCTURED-LOCATION"))
            .expect("Should have X-APPLE-STRUCTURED-LOCATION line");
        assert!(apple_line.contains("X-TITLE=\"Café: 'Zur Post'\""), "Got: {}", apple_line);
        assert!(apple_line.contains("Hauptstraße 'Hinterhof' 7"), "Got: {}", apple_line);
        // Only the delimiting quotes around X-ADDRESS and X-TITLE remain
        assert_eq!(apple_line.matches('"').count(), 4, "Got: {}", apple_line);
        assert!(apple_line.ends_with("13.405"), "Got: {}", apple_line);
    }

    #[test]
    fn test_generate_ics_without_geo_has_no_annotations() {
        let ics = generate_ics("Test Cal", &[make_test_event()], "csvcal").unwrap();

        assert!(!ics.contains("GEO:"));
        assert!(!ics.contains("X-APPLE-STRUCTURED-LOCATION"));
        assert!(ics.contains("LOCATION:Some Venue"));
    }

    #[test]
    fn test_generate_ics_keeps_event_order() {
        let mut first = make_test_event();
        first.uid = "first@csvcal".into();
        let mut second = make_test_event();
        second.uid = "second@csvcal".into();

        let ics = generate_ics("Test Cal", &[first, second], "csvcal").unwrap();

        let first_at = ics.find("UID:first@csvcal").unwrap();
        let second_at = ics.find("UID:second@csvcal").unwrap();
        assert!(first_at < second_at);
        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 2);
    }
}
