//! One row of a calendar source file.

use std::io::Read;

use serde::Deserialize;

use crate::error::{CsvCalError, CsvCalResult};

/// A CSV row, matched to columns by header name.
///
/// `date` is `DD.MM.YYYY`, `time` is `HH:MM`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SourceRecord {
    pub date: String,
    pub time: String,
    pub duration: String,
    pub name: String,
    pub description: String,
    /// Free-text street address, may be empty
    pub location: String,
    /// Venue display name; the event name is used when absent
    #[serde(default)]
    pub location_name: Option<String>,
    /// Region/country suffix for the address
    #[serde(default)]
    pub place: Option<String>,
    /// IANA zone overriding the configured default
    #[serde(default)]
    pub timezone: Option<String>,
}

impl SourceRecord {
    /// Reject rows whose mandatory cells are empty.
    pub fn check_required(&self, record: usize) -> CsvCalResult<()> {
        let required = [("date", &self.date), ("time", &self.time), ("name", &self.name)];
        for (field, value) in required {
            if value.is_empty() {
                return Err(CsvCalError::MissingField { record, field });
            }
        }
        Ok(())
    }

    pub fn location_name(&self) -> Option<&str> {
        non_empty(self.location_name.as_deref())
    }

    pub fn place(&self) -> Option<&str> {
        non_empty(self.place.as_deref())
    }

    pub fn timezone(&self) -> Option<&str> {
        non_empty(self.timezone.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Read every record up front; the first bad row fails the whole file.
pub fn read_records<R: Read>(reader: R) -> CsvCalResult<Vec<SourceRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (index, row) in csv_reader.deserialize::<SourceRecord>().enumerate() {
        let record = row?;
        record.check_required(index + 1)?;
        records.push(record);
    }
    Ok(records)
}
