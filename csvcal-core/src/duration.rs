//! Compact duration tokens from the `duration` column.

use chrono::TimeDelta;

/// How long an entry lasts: a timed span, or a number of whole days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryDuration {
    Timed(TimeDelta),
    AllDay(u32),
}

impl EntryDuration {
    pub const ZERO: EntryDuration = EntryDuration::Timed(TimeDelta::zero());

    /// Parse tokens like `30min`, `2h` or `3d`.
    ///
    /// Never fails. Unknown units and unparseable `min`/`h` counts give a
    /// zero-length timed span; an unparseable day count gives one day.
    pub fn parse(token: &str) -> Self {
        let token = token.trim();

        if let Some(count) = token.strip_suffix("min") {
            return count
                .parse::<u32>()
                .map(|n| EntryDuration::Timed(TimeDelta::minutes(i64::from(n))))
                .unwrap_or(Self::ZERO);
        }

        if let Some(count) = token.strip_suffix('h') {
            return count
                .parse::<u32>()
                .map(|n| EntryDuration::Timed(TimeDelta::hours(i64::from(n))))
                .unwrap_or(Self::ZERO);
        }

        if let Some(count) = token.strip_suffix('d') {
            return EntryDuration::AllDay(count.parse::<u32>().unwrap_or(1));
        }

        Self::ZERO
    }

    pub fn is_all_day(&self) -> bool {
        matches!(self, EntryDuration::AllDay(_))
    }
}
