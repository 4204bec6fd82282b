//! Bootstrap pagination widget
//!
//! Renders the `<li>` items for a window of up to 15 page links around
//! the current page. Pages are 0-indexed in URLs and labelled from 1.

/// Number of page links shown at once
const RANGE_LENGTH: i64 = 15;

/// Number of pages needed for `count` items.
pub fn num_pages(count: u64, per_page: u32) -> u32 {
    if per_page == 0 {
        return 0;
    }
    count.div_ceil(u64::from(per_page)) as u32
}

/// Render page links as `<li>` items.
///
/// Each link is `{url}/{page}/{?query}`; the current page is marked
/// `active`. The window is centred on the current page and shifted to
/// stay within `1..=page_count`.
pub fn pagination(page_count: u32, current_page: u32, url: &str, query_string: &str) -> String {
    if page_count == 0 {
        return String::new();
    }

    let page_count = i64::from(page_count);
    let current = i64::from(current_page);
    let span = RANGE_LENGTH.min(page_count) - 1;

    let mut range_min = (current - span / 2 + 1).max(1);
    let mut range_max = (current + span / 2 + 1).min(page_count);
    let diff = range_max - range_min;
    if diff < span {
        let shift = span - diff;
        if range_min - shift > 0 {
            range_min -= shift;
        } else {
            range_max += shift;
        }
    }

    let query = if query_string.is_empty() {
        String::new()
    } else {
        format!("?{}", query_string)
    };

    let mut out = String::new();
    for i in range_min..=range_max {
        let active = if i - 1 == current { "active" } else { "" };
        out.push_str(&format!(
            "<li class='{}'><a href='{}/{}/{}'>{}</a></li>",
            active,
            url,
            i - 1,
            query,
            i
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(html: &str) -> Vec<u32> {
        html.split("</a></li>")
            .filter_map(|item| item.rsplit('>').next())
            .filter_map(|label| label.parse().ok())
            .collect()
    }

    #[test]
    fn page_counts() {
        assert_eq!(num_pages(0, 50), 0);
        assert_eq!(num_pages(50, 50), 1);
        assert_eq!(num_pages(51, 50), 2);
        assert_eq!(num_pages(10, 0), 0);
    }

    #[test]
    fn few_pages_are_all_shown() {
        let html = pagination(3, 1, "/members", "");
        assert_eq!(labels(&html), vec![1, 2, 3]);
        assert!(html.contains("<li class='active'><a href='/members/1/'>2</a></li>"));
        assert!(html.contains("<li class=''><a href='/members/0/'>1</a></li>"));
    }

    #[test]
    fn window_is_fifteen_wide() {
        let html = pagination(100, 50, "/committee-meetings", "");
        let pages = labels(&html);
        assert_eq!(pages.len(), 15);
        assert!(pages.contains(&51));
        assert_eq!(pages.first(), Some(&44));
        assert_eq!(pages.last(), Some(&58));
    }

    #[test]
    fn window_shifts_at_edges() {
        assert_eq!(labels(&pagination(100, 0, "/m", "")), (1..=15).collect::<Vec<_>>());
        assert_eq!(labels(&pagination(100, 99, "/m", "")), (86..=100).collect::<Vec<_>>());
    }

    #[test]
    fn keeps_query_string() {
        let html = pagination(2, 0, "/search", "q=water");
        assert!(html.contains("href='/search/1/?q=water'"));
    }

    #[test]
    fn no_pages_renders_nothing() {
        assert_eq!(pagination(0, 0, "/members", ""), "");
    }
}
