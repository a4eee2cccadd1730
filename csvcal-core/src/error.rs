//! Error types for csvcal.

use thiserror::Error;

/// Errors that abort a calendar conversion or the process setup.
#[derive(Error, Debug)]
pub enum CsvCalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Calendar not found: {0}")]
    CalendarNotFound(String),

    #[error("CSV error in record {record}: {message}")]
    Csv { record: usize, message: String },

    #[error("Record {record}: missing required field '{field}'")]
    MissingField { record: usize, field: &'static str },

    #[error("Record {record}: invalid date/time '{input}': {message}")]
    InvalidDateTime {
        record: usize,
        input: String,
        message: String,
    },

    #[error("Record {record}: unknown timezone '{timezone}'")]
    InvalidTimezone { record: usize, timezone: String },

    #[error("ICS generation error: {0}")]
    IcsGenerate(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for CsvCalError {
    fn from(err: csv::Error) -> Self {
        // csv counts the header as record 0, so the position already is 1-based for data rows
        let record = err
            .position()
            .map(|pos| pos.record() as usize)
            .unwrap_or_default();
        CsvCalError::Csv {
            record,
            message: err.to_string(),
        }
    }
}

/// Result type alias for csvcal operations.
pub type CsvCalResult<T> = Result<T, CsvCalError>;
