//! Display formatting for API values

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const PRETTY_DATE: &str = "%d %b %Y";

/// Formats the API and the database emit dates in
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d, %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"];
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%B %d, %Y"];

/// Parse a date or datetime string in any of the formats the API uses.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.date());
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
}

/// `2015-03-17, 15:43:41` -> `17 Mar 2015`. Unparseable input is
/// returned unchanged.
pub fn pretty_date(s: &str) -> String {
    match parse_date(s) {
        Some(d) => d.format(PRETTY_DATE).to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_api_dates() {
        assert_eq!(pretty_date("2015-03-17, 15:43:41"), "17 Mar 2015");
        assert_eq!(pretty_date("March 17, 2015"), "17 Mar 2015");
        assert_eq!(pretty_date("2015-03-17"), "17 Mar 2015");
    }

    #[test]
    fn formats_iso_datetimes() {
        assert_eq!(pretty_date("2015-03-05T09:00:00+02:00"), "05 Mar 2015");
        assert_eq!(pretty_date("2015-03-05T09:00:00"), "05 Mar 2015");
    }

    #[test]
    fn leaves_garbage_alone() {
        assert_eq!(pretty_date("sometime"), "sometime");
        assert_eq!(pretty_date(""), "");
    }
}
