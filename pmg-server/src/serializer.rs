//! JSON encoding shared by every API resource
//!
//! Collections are wrapped in a `{count, next, results}` envelope whose
//! `next` link points at the following 0-indexed page. Single resources
//! are serialized with their related resources included.
//!
//! Dates and datetimes use the formats the frontend has always consumed:
//! `2015-03-17, 15:43:41` and `March 17, 2015`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Serialize, Serializer};

use crate::models::Pagination;

const DATETIME_FORMAT: &str = "%Y-%m-%d, %H:%M:%S";
const DATE_FORMAT: &str = "%B %d, %Y";

/// Collection envelope
#[derive(Debug, Clone, Serialize)]
pub struct ListEnvelope<T> {
    pub count: i64,
    pub next: Option<String>,
    pub results: Vec<T>,
}

impl<T> ListEnvelope<T> {
    /// Wrap one page of `resource` results.
    ///
    /// `base_url` is the externally visible API root. The `next` link
    /// repeats the page size whenever it is not `default_per_page`.
    pub fn new(
        results: Vec<T>,
        count: i64,
        page: Pagination,
        default_per_page: u32,
        base_url: &str,
        resource: &str,
    ) -> Self {
        let next = if page.has_more(count) {
            let mut link = format!(
                "{}/{}/?page={}",
                base_url.trim_end_matches('/'),
                resource,
                page.page + 1
            );
            if page.per_page != default_per_page {
                link.push_str(&format!("&per_page={}", page.per_page));
            }
            Some(link)
        } else {
            None
        };

        Self {
            count,
            next,
            results,
        }
    }

    /// Envelope holding a complete, unpaginated collection.
    pub fn complete(results: Vec<T>) -> Self {
        Self {
            count: results.len() as i64,
            next: None,
            results,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> ListEnvelope<U> {
        ListEnvelope {
            count: self.count,
            next: self.next,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

/// `serialize_with` helpers for `DateTime<Utc>`
pub mod api_datetime {
    use super::*;

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&dt.format(DATETIME_FORMAT))
    }

    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(
            dt: &Option<DateTime<Utc>>,
            s: S,
        ) -> Result<S::Ok, S::Error> {
            match dt {
                Some(dt) => s.collect_str(&dt.format(DATETIME_FORMAT)),
                None => s.serialize_none(),
            }
        }
    }
}

/// `serialize_with` helpers for `NaiveDate`
pub mod api_date {
    use super::*;

    pub fn serialize<S: Serializer>(d: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&d.format(DATE_FORMAT))
    }

    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(d: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
            match d {
                Some(d) => s.collect_str(&d.format(DATE_FORMAT)),
                None => s.serialize_none(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[derive(Serialize)]
    struct Dated {
        #[serde(serialize_with = "api_datetime::serialize")]
        at: DateTime<Utc>,
        #[serde(serialize_with = "api_date::option::serialize")]
        on: Option<NaiveDate>,
        #[serde(serialize_with = "api_date::option::serialize")]
        never: Option<NaiveDate>,
    }

    #[test]
    fn date_formats() {
        let value = serde_json::to_value(Dated {
            at: Utc.with_ymd_and_hms(2015, 3, 17, 15, 43, 41).unwrap(),
            on: NaiveDate::from_ymd_opt(2015, 3, 5),
            never: None,
        })
        .unwrap();

        assert_eq!(
            value,
            json!({"at": "2015-03-17, 15:43:41", "on": "March 05, 2015", "never": null})
        );
    }

    #[test]
    fn next_link_when_more_pages() {
        let env = ListEnvelope::new(vec![1, 2], 5, Pagination::new(0, 2), 2, "http://api.test/", "bill");
        assert_eq!(env.next.as_deref(), Some("http://api.test/bill/?page=1"));
        assert_eq!(env.count, 5);
    }

    #[test]
    fn next_link_keeps_page_size() {
        let env = ListEnvelope::new(vec![1, 2, 3], 10, Pagination::new(1, 3), 50, "http://api.test", "member");
        assert_eq!(
            env.next.as_deref(),
            Some("http://api.test/member/?page=2&per_page=3")
        );
    }

    #[test]
    fn no_next_link_on_last_page() {
        let env = ListEnvelope::new(vec![5], 5, Pagination::new(2, 2), 2, "http://api.test", "bill");
        assert!(env.next.is_none());

        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json, json!({"count": 5, "next": null, "results": [5]}));
    }

    #[test]
    fn complete_envelope() {
        let env = ListEnvelope::complete(vec!["a", "b", "c"]).map(str::to_uppercase);
        assert_eq!(env.count, 3);
        assert!(env.next.is_none());
        assert_eq!(env.results, vec!["A", "B", "C"]);
    }
}
