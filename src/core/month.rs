use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate};

use crate::prelude::*;

/// Calendar month, for example `2025-11`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, derive_more::Display)]
#[display("{year:04}-{month:02}")]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(date: &impl Datelike) -> Self {
        Self { year: date.year(), month: date.month() }
    }

    /// Month of today's local date.
    pub fn current() -> Self {
        Self::of(&Local::now().date_naive())
    }

    /// Check whether the date falls in the month, in the date's own calendar.
    #[must_use]
    pub fn contains(self, date: &impl Datelike) -> bool {
        Self::of(date) == self
    }
}

impl FromStr for YearMonth {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let date = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")
            .with_context(|| format!("`{s}` is not a `YYYY-MM` month"))?;
        Ok(Self::of(&date))
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;

    #[test]
    fn test_from_str_ok() -> Result {
        assert_eq!("2025-11".parse::<YearMonth>()?, YearMonth { year: 2025, month: 11 });
        Ok(())
    }

    #[test]
    fn test_from_str_invalid() {
        assert!("2025-13".parse::<YearMonth>().is_err());
        assert!("november".parse::<YearMonth>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(YearMonth { year: 2025, month: 3 }.to_string(), "2025-03");
    }

    #[test]
    fn test_contains_uses_own_offset() -> Result {
        let month = YearMonth { year: 2025, month: 12 };
        // Still November in UTC, but December in Stockholm.
        assert!(month.contains(&DateTime::parse_from_rfc3339("2025-12-01T00:00:00+01:00")?));
        assert!(!month.contains(&DateTime::parse_from_rfc3339("2025-11-30T23:00:00+00:00")?));
        Ok(())
    }
}
