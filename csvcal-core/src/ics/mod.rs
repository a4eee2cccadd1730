//! ICS file generation.
//!
//! This module writes calendars according to RFC 5545.

mod generate;

pub use generate::{generate_ics, prodid};
