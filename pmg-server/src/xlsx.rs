//! Minimal xlsx writer
//!
//! Produces a single-sheet Office Open XML workbook: a zip archive of
//! the handful of XML parts Excel and LibreOffice require. Text is
//! written as inline strings so no shared-string table is needed.

use std::fmt::Write as _;
use std::io::{Cursor, Write};

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::reports::{Cell, ResultSet};

pub const CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Excel's limit on sheet name length
const MAX_SHEET_NAME: usize = 31;

#[derive(Debug, thiserror::Error)]
pub enum XlsxError {
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
</Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

const WORKBOOK_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
</Relationships>"#;

pub struct XlsxBuilder {
    sheet_name: String,
}

impl XlsxBuilder {
    pub fn new(sheet_name: &str) -> Self {
        Self {
            sheet_name: sanitize_sheet_name(sheet_name),
        }
    }

    /// Header row of keys, then one row per result row.
    pub fn from_result_set(&self, results: &ResultSet) -> Result<Vec<u8>, XlsxError> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(CONTENT_TYPES_XML.as_bytes())?;

        zip.start_file("_rels/.rels", options)?;
        zip.write_all(ROOT_RELS_XML.as_bytes())?;

        zip.start_file("xl/workbook.xml", options)?;
        zip.write_all(self.workbook_xml().as_bytes())?;

        zip.start_file("xl/_rels/workbook.xml.rels", options)?;
        zip.write_all(WORKBOOK_RELS_XML.as_bytes())?;

        zip.start_file("xl/worksheets/sheet1.xml", options)?;
        zip.write_all(sheet_xml(results).as_bytes())?;

        Ok(zip.finish()?.into_inner())
    }

    fn workbook_xml(&self) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets>
</workbook>"#,
            escape_xml(&self.sheet_name)
        )
    }
}

fn sheet_xml(results: &ResultSet) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );

    let header: Vec<Cell> = results.keys.iter().cloned().map(Cell::Text).collect();
    let rows = std::iter::once(&header).chain(results.rows.iter());

    for (r, row) in rows.enumerate() {
        let row_num = r + 1;
        let _ = write!(xml, r#"<row r="{}">"#, row_num);
        for (c, cell) in row.iter().enumerate() {
            let reference = format!("{}{}", column_name(c), row_num);
            match cell {
                Cell::Null => {}
                Cell::Text(s) => {
                    let _ = write!(
                        xml,
                        r#"<c r="{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                        reference,
                        escape_xml(s)
                    );
                }
                Cell::Int(n) => {
                    let _ = write!(xml, r#"<c r="{}"><v>{}</v></c>"#, reference, n);
                }
                Cell::Float(f) if f.is_finite() => {
                    let _ = write!(xml, r#"<c r="{}"><v>{}</v></c>"#, reference, f);
                }
                Cell::Float(_) => {}
                Cell::Bool(b) => {
                    let _ = write!(xml, r#"<c r="{}" t="b"><v>{}</v></c>"#, reference, u8::from(*b));
                }
            }
        }
        xml.push_str("</row>");
    }

    xml.push_str("</sheetData></worksheet>");
    xml
}

/// 0 -> A, 25 -> Z, 26 -> AA
fn column_name(mut idx: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (idx % 26) as u8);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }
    name.reverse();
    String::from_utf8(name).unwrap_or_default()
}

/// Escape markup and drop characters XML 1.0 cannot carry.
fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(c),
            c if (c as u32) < 0x20 => {}
            c => out.push(c),
        }
    }
    out
}

fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(MAX_SHEET_NAME)
        .collect();
    if cleaned.trim().is_empty() {
        "Sheet1".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut out = String::new();
        file.read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn column_names() {
        assert_eq!(column_name(0), "A");
        assert_eq!(column_name(25), "Z");
        assert_eq!(column_name(26), "AA");
        assert_eq!(column_name(27), "AB");
        assert_eq!(column_name(701), "ZZ");
        assert_eq!(column_name(702), "AAA");
    }

    #[test]
    fn escapes_text() {
        assert_eq!(escape_xml("R&D <draft> \"x\""), "R&amp;D &lt;draft&gt; &quot;x&quot;");
        assert_eq!(escape_xml("a\u{1}b"), "ab");
    }

    #[test]
    fn sheet_names_are_sanitized() {
        assert_eq!(sanitize_sheet_name("Bills [2015]"), "Bills 2015");
        assert_eq!(sanitize_sheet_name("???"), "Sheet1");
        assert_eq!(sanitize_sheet_name(&"x".repeat(40)).len(), MAX_SHEET_NAME);
    }

    #[test]
    fn workbook_contains_header_and_rows() {
        let results = ResultSet {
            keys: vec!["committee".into(), "subscriptions".into()],
            rows: vec![
                vec![Cell::Text("Health & Welfare".into()), Cell::Int(12)],
                vec![Cell::Null, Cell::Float(2.5)],
            ],
        };

        let bytes = XlsxBuilder::new("Committee alert subscriptions")
            .from_result_set(&results)
            .unwrap();

        let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml");
        assert!(sheet.contains(r#"<c r="A1" t="inlineStr"><is><t xml:space="preserve">committee</t></is></c>"#));
        assert!(sheet.contains("Health &amp; Welfare"));
        assert!(sheet.contains(r#"<c r="B2"><v>12</v></c>"#));
        assert!(!sheet.contains(r#"r="A3""#));
        assert!(sheet.contains(r#"<c r="B3"><v>2.5</v></c>"#));

        let workbook = read_part(&bytes, "xl/workbook.xml");
        assert!(workbook.contains(r#"name="Committee alert subscriptions""#));

        let types = read_part(&bytes, "[Content_Types].xml");
        assert!(types.contains("/xl/worksheets/sheet1.xml"));
    }

    #[test]
    fn empty_result_set_still_produces_a_workbook() {
        let bytes = XlsxBuilder::new("Empty").from_result_set(&ResultSet::default()).unwrap();
        let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml");
        assert!(sheet.contains(r#"<row r="1"></row>"#));
    }
}
