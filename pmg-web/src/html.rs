//! HTML building blocks
//!
//! Pages are assembled from small string builders. Everything that comes
//! from the API goes through [`escape`] unless it is stored HTML (meeting
//! reports, bios, hansard bodies), which is inserted as-is.

use serde_json::Value;

/// Escape text for use in element content and quoted attributes.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Escaped string field of a JSON object, or empty.
pub fn text(doc: &Value, key: &str) -> String {
    match doc.get(key) {
        Some(Value::String(s)) => escape(s),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Raw string field of a JSON object.
pub fn str_field<'a>(doc: &'a Value, key: &str) -> Option<&'a str> {
    doc.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Array field of a JSON object, or an empty slice.
pub fn items<'a>(doc: &'a Value, key: &str) -> &'a [Value] {
    doc.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Full page with the site chrome around `body`.
pub fn layout(title: &str, flashes: &[String], body: &str) -> String {
    let mut flash_html = String::new();
    for message in flashes {
        flash_html.push_str(&format!(
            "<div class=\"alert alert-danger\" role=\"alert\">{}</div>\n",
            escape(message)
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | PMG</title>
</head>
<body>
<nav class="navbar navbar-default">
<div class="container">
<a class="navbar-brand" href="/">PMG</a>
<ul class="nav navbar-nav">
<li><a href="/committees/">Committees</a></li>
<li><a href="/committee-meetings/">Committee meetings</a></li>
<li><a href="/bills/">Bills</a></li>
<li><a href="/members/">Members</a></li>
</ul>
<form class="navbar-form navbar-right" action="/search/" method="get">
<input type="text" name="q" class="form-control" placeholder="Search">
</form>
</div>
</nav>
<div class="container">
{flashes}{body}
</div>
</body>
</html>
"#,
        title = escape(title),
        flashes = flash_html,
        body = body,
    )
}

/// `<h2>` section with a list of items, or a note when empty.
pub fn section(heading: &str, entries: &[String]) -> String {
    let mut out = format!("<h2>{}</h2>\n", escape(heading));
    if entries.is_empty() {
        out.push_str("<p class=\"text-muted\">None yet.</p>\n");
        return out;
    }
    out.push_str("<ul class=\"list-unstyled\">\n");
    for entry in entries {
        out.push_str("<li>");
        out.push_str(entry);
        out.push_str("</li>\n");
    }
    out.push_str("</ul>\n");
    out
}

/// `<a href>` with escaped label.
pub fn link(href: &str, label: &str) -> String {
    format!("<a href=\"{}\">{}</a>", escape(href), escape(label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape("Private Member & Committee <Bills> \"q\" 'a'"),
            "Private Member &amp; Committee &lt;Bills&gt; &quot;q&quot; &#39;a&#39;"
        );
    }

    #[test]
    fn reads_json_fields() {
        let doc = json!({"title": "A & B", "id": 7, "none": null, "list": [1, 2]});
        assert_eq!(text(&doc, "title"), "A &amp; B");
        assert_eq!(text(&doc, "id"), "7");
        assert_eq!(text(&doc, "none"), "");
        assert_eq!(items(&doc, "list").len(), 2);
        assert!(items(&doc, "missing").is_empty());
        assert_eq!(str_field(&doc, "title"), Some("A & B"));
    }

    #[test]
    fn layout_shows_flashes() {
        let page = layout("Bills", &["Oops (500)".to_string()], "<p>body</p>");
        assert!(page.contains("<title>Bills | PMG</title>"));
        assert!(page.contains("Oops (500)"));
        assert!(page.contains("<p>body</p>"));
    }

    #[test]
    fn empty_section_says_so() {
        assert!(section("Tabled reports", &[]).contains("None yet."));
        let s = section("Bills", &[link("/bill/1/", "Sport Bill")]);
        assert!(s.contains("<li><a href=\"/bill/1/\">Sport Bill</a></li>"));
    }
}
