//! Inclusive calendar-day ranges.

use chrono::{Days, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::error::{Result, TallyError};

/// Date format accepted by the `count` command.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// An inclusive range of calendar days, interpreted in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Parses two `YYYY-MM-DD` dates.
    ///
    /// A start date after the end date is accepted; such a range simply
    /// matches nothing.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Ok(Self {
            start: parse_date(start)?,
            end: parse_date(end)?,
        })
    }

    /// Resolves the range to a half-open timestamp interval
    /// `[midnight(start), midnight(end + 1 day))` in UTC seconds.
    pub fn bounds(&self) -> Result<(f64, f64)> {
        let after_end = self
            .end
            .checked_add_days(Days::new(1))
            .ok_or_else(|| TallyError::malformed(format!("end date {} is out of range", self.end)))?;
        Ok((midnight_utc(self.start), midnight_utc(after_end)))
    }

    /// Whether a timestamp falls inside the range.
    pub fn contains(&self, timestamp: f64) -> Result<bool> {
        let (start, end) = self.bounds()?;
        Ok(start <= timestamp && timestamp < end)
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|e| TallyError::malformed(format!("invalid date '{}': {}", raw, e)))
}

fn midnight_utc(date: NaiveDate) -> f64 {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
        .timestamp() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-01-05T00:00:00Z
    const JAN_5: f64 = 1_704_412_800.0;
    const DAY: f64 = 86_400.0;

    #[test]
    fn test_single_day_bounds() {
        let range = DateRange::parse("2024-01-05", "2024-01-05").unwrap();
        assert_eq!(range.bounds().unwrap(), (JAN_5, JAN_5 + DAY));
    }

    #[test]
    fn test_end_is_exclusive_at_next_midnight() {
        let range = DateRange::parse("2024-01-05", "2024-01-05").unwrap();
        assert!(range.contains(JAN_5).unwrap());
        assert!(range.contains(JAN_5 + DAY - 0.001).unwrap());
        assert!(!range.contains(JAN_5 + DAY).unwrap());
        assert!(!range.contains(JAN_5 - 1.0).unwrap());
    }

    #[test]
    fn test_rejects_bad_format() {
        assert!(DateRange::parse("05/01/2024", "2024-01-06").unwrap_err().is_malformed());
        assert!(DateRange::parse("2024-02-30", "2024-03-01").unwrap_err().is_malformed());
    }

    #[test]
    fn test_inverted_range_matches_nothing() {
        let range = DateRange::parse("2024-01-06", "2024-01-05").unwrap();
        assert!(!range.contains(JAN_5 + DAY / 2.0).unwrap());
    }
}
