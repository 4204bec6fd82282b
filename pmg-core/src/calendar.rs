//! Parliamentary sitting-day calendar
//!
//! Bills reports measure how long a bill took to pass in *parliamentary*
//! days, i.e. days on which Parliament actually sat. The list of sitting
//! days is maintained as a plain text file:
//!
//! ```text
//! # 2015 first term
//! 2015-02-03
//! 2015-02-04
//! ```
//!
//! Without a file the calendar treats every weekday as a sitting day.

use std::fs;
use std::path::Path;

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::error::{PmgError, Result};

#[derive(Debug, Clone)]
pub enum ParliamentaryCalendar {
    /// Explicit sitting days, sorted and de-duplicated
    SittingDays(Vec<NaiveDate>),
    /// Every Monday to Friday
    Weekdays,
}

impl Default for ParliamentaryCalendar {
    fn default() -> Self {
        Self::Weekdays
    }
}

impl ParliamentaryCalendar {
    /// Build a calendar from an arbitrary list of sitting days.
    pub fn from_days(mut days: Vec<NaiveDate>) -> Self {
        days.sort_unstable();
        days.dedup();
        Self::SittingDays(days)
    }

    /// Parse the one-date-per-line format.
    pub fn parse(content: &str) -> Result<Self> {
        let mut days = Vec::new();

        for (idx, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let day = NaiveDate::parse_from_str(line, "%Y-%m-%d")
                .map_err(|e| PmgError::invalid_date(line, idx + 1, e.to_string()))?;
            days.push(day);
        }

        Ok(Self::from_days(days))
    }

    /// Load sitting days from a file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PmgError::path_not_found(path));
        }
        let content = fs::read_to_string(path)?;
        let calendar = Self::parse(&content)?;
        tracing::info!(
            path = %path.display(),
            days = calendar.len().unwrap_or(0),
            "Loaded parliamentary calendar"
        );
        Ok(calendar)
    }

    /// Load from an optional path, falling back to weekdays.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::Weekdays),
        }
    }

    /// Number of explicit sitting days, `None` for the weekday calendar.
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::SittingDays(days) => Some(days.len()),
            Self::Weekdays => None,
        }
    }

    pub fn is_sitting_day(&self, day: NaiveDate) -> bool {
        match self {
            Self::SittingDays(days) => days.binary_search(&day).is_ok(),
            Self::Weekdays => !matches!(day.weekday(), Weekday::Sat | Weekday::Sun),
        }
    }

    /// Count sitting days in the inclusive range `[from, to]`.
    pub fn count_parliamentary_days(&self, from: NaiveDate, to: NaiveDate) -> u32 {
        if to < from {
            return 0;
        }

        match self {
            Self::SittingDays(days) => {
                let start = days.partition_point(|d| *d < from);
                let end = days.partition_point(|d| *d <= to);
                (end - start) as u32
            }
            Self::Weekdays => count_weekdays(from, to),
        }
    }
}

fn count_weekdays(from: NaiveDate, to: NaiveDate) -> u32 {
    let total = (to - from).num_days() + 1;
    let full_weeks = total / 7;
    let mut count = full_weeks * 5;

    // Walk the leftover partial week
    let mut day = from + Duration::days(full_weeks * 7);
    while day <= to {
        if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            count += 1;
        }
        day += Duration::days(1);
    }

    count as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn counts_inclusive_range() {
        let cal = ParliamentaryCalendar::from_days(vec![
            d("2015-02-03"),
            d("2015-02-04"),
            d("2015-02-10"),
            d("2015-03-01"),
        ]);

        assert_eq!(cal.count_parliamentary_days(d("2015-02-03"), d("2015-02-10")), 3);
        assert_eq!(cal.count_parliamentary_days(d("2015-02-01"), d("2015-02-05")), 2);
        assert_eq!(cal.count_parliamentary_days(d("2015-02-05"), d("2015-02-09")), 0);
        assert_eq!(cal.count_parliamentary_days(d("2015-02-04"), d("2015-02-04")), 1);
    }

    #[test]
    fn reversed_range_is_zero() {
        let cal = ParliamentaryCalendar::Weekdays;
        assert_eq!(cal.count_parliamentary_days(d("2015-02-10"), d("2015-02-03")), 0);
    }

    #[test]
    fn weekday_calendar() {
        let cal = ParliamentaryCalendar::default();
        // Mon 2 Feb 2015 .. Sun 15 Feb 2015
        assert_eq!(cal.count_parliamentary_days(d("2015-02-02"), d("2015-02-15")), 10);
        // Sat .. Sun
        assert_eq!(cal.count_parliamentary_days(d("2015-02-07"), d("2015-02-08")), 0);
        // Fri .. Tue
        assert_eq!(cal.count_parliamentary_days(d("2015-02-06"), d("2015-02-10")), 3);
        assert!(cal.is_sitting_day(d("2015-02-06")));
        assert!(!cal.is_sitting_day(d("2015-02-07")));
    }

    #[test]
    fn parse_skips_comments_and_duplicates() {
        let cal = ParliamentaryCalendar::parse("# term one\n2015-02-04\n\n2015-02-03\n2015-02-04\n")
            .unwrap();
        assert_eq!(cal.len(), Some(2));
        assert!(cal.is_sitting_day(d("2015-02-03")));
    }

    #[test]
    fn parse_reports_bad_line() {
        let err = ParliamentaryCalendar::parse("2015-02-03\nnot-a-date\n").unwrap_err();
        assert!(matches!(err, PmgError::InvalidDate { line: 2, .. }));
    }

    #[test]
    fn load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "2016-05-17").unwrap();
        writeln!(file, "2016-05-18").unwrap();

        let cal = ParliamentaryCalendar::load(file.path()).unwrap();
        assert_eq!(cal.count_parliamentary_days(d("2016-05-01"), d("2016-05-31")), 2);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = ParliamentaryCalendar::load(Path::new("/nonexistent/sitting-days.txt"))
            .unwrap_err();
        assert!(matches!(err, PmgError::PathNotFound { .. }));
    }
}
