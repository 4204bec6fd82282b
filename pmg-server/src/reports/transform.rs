//! Report transforms

use chrono::NaiveDate;
use pmg_core::ParliamentaryCalendar;

use super::{Cell, ResultSet};

/// Column added by [`add_bill_parliament_days`]
pub const DAYS_TO_ADOPTION: &str = "pm_days_to_adoption";

/// Add the number of parliamentary days from a bill's introduction to its
/// adoption. Rows missing either date (or with an unparseable one) get
/// null.
pub fn add_bill_parliament_days(mut rows: ResultSet, calendar: &ParliamentaryCalendar) -> ResultSet {
    let introduced = rows.column("date_of_introduction");
    let adopted = rows.column("date_of_adoption");

    rows.push_column(DAYS_TO_ADOPTION, |row| {
        let date_at = |idx: Option<usize>| {
            idx.and_then(|i| row.get(i))
                .and_then(Cell::as_text)
                .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        };

        match (date_at(introduced), date_at(adopted)) {
            (Some(from), Some(to)) => Cell::Int(calendar.count_parliamentary_days(from, to).into()),
            _ => Cell::Null,
        }
    });

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn counts_days_when_both_dates_present() {
        let rows = ResultSet {
            keys: vec![
                "id".into(),
                "date_of_introduction".into(),
                "date_of_adoption".into(),
            ],
            rows: vec![
                // Mon 2 Feb .. Fri 13 Feb 2015: ten weekdays
                vec![Cell::Int(1), text("2015-02-02"), text("2015-02-13")],
                vec![Cell::Int(2), text("2015-02-02"), Cell::Null],
                vec![Cell::Int(3), Cell::Null, text("2015-02-13")],
                vec![Cell::Int(4), text("garbage"), text("2015-02-13")],
            ],
        };

        let out = add_bill_parliament_days(rows, &ParliamentaryCalendar::Weekdays);

        assert_eq!(out.keys.last().map(String::as_str), Some(DAYS_TO_ADOPTION));
        assert_eq!(out.rows[0][3], Cell::Int(10));
        assert!(out.rows[1][3].is_null());
        assert!(out.rows[2][3].is_null());
        assert!(out.rows[3][3].is_null());
    }

    #[test]
    fn uses_sitting_days() {
        let day = |s| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        let calendar = ParliamentaryCalendar::from_days(vec![day("2016-03-01"), day("2016-03-08")]);
        let rows = ResultSet {
            keys: vec!["date_of_introduction".into(), "date_of_adoption".into()],
            rows: vec![vec![text("2016-02-01"), text("2016-03-31")]],
        };

        let out = add_bill_parliament_days(rows, &calendar);
        assert_eq!(out.rows[0][2], Cell::Int(2));
    }

    #[test]
    fn missing_columns_give_nulls() {
        let rows = ResultSet {
            keys: vec!["id".into()],
            rows: vec![vec![Cell::Int(1)]],
        };
        let out = add_bill_parliament_days(rows, &ParliamentaryCalendar::Weekdays);
        assert_eq!(out.keys, vec!["id", DAYS_TO_ADOPTION]);
        assert!(out.rows[0][1].is_null());
    }
}
