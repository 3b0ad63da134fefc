//! Minimal Office Open XML spreadsheet writer.
//!
//! Produces a single-worksheet `.xlsx` package: content types, package and
//! workbook relationships, a default stylesheet and one sheet whose cells are
//! either inline strings or integers. Every zip entry carries the same fixed
//! timestamp, so identical rows always serialize to identical bytes.

use crate::error::MarkerError;
use roxmltree::Document;
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

/// MIME type of the produced package.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const SHEET_PART: &str = "xl/worksheets/sheet1.xml";
const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PKG_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// One spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Int(u32),
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<u32> for Cell {
    fn from(n: u32) -> Self {
        Cell::Int(n)
    }
}

fn ser_err(e: impl std::fmt::Display) -> MarkerError {
    MarkerError::SerializationFailure(e.to_string())
}

fn read_err(e: impl std::fmt::Display) -> MarkerError {
    MarkerError::MalformedReport(e.to_string())
}

/// Spreadsheet column letters for a 1-based index: 1 → `A`, 27 → `AA`.
pub fn column_name(mut index: usize) -> String {
    let mut name = Vec::new();
    while index > 0 {
        let rem = (index - 1) % 26;
        name.push(b'A' + rem as u8);
        index = (index - 1) / 26;
    }
    name.reverse();
    String::from_utf8(name).unwrap_or_default()
}

fn escape_xml(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

fn validate_sheet_name(name: &str) -> Result<(), MarkerError> {
    const FORBIDDEN: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];
    if name.is_empty() || name.chars().count() > 31 || name.contains(&FORBIDDEN[..]) {
        return Err(ser_err(format!("invalid worksheet name `{name}`")));
    }
    Ok(())
}

/// Characters XML 1.0 can carry, escaped or not.
fn is_xml_char(ch: char) -> bool {
    matches!(ch, '\t' | '\n' | '\r') || (ch >= ' ' && !matches!(ch, '\u{FFFE}' | '\u{FFFF}'))
}

fn sheet_xml(rows: &[Vec<Cell>]) -> Result<String, MarkerError> {
    let mut xml = format!(r#"{XML_DECL}<worksheet xmlns="{MAIN_NS}"><sheetData>"#);
    for (r, row) in rows.iter().enumerate() {
        let row_no = r + 1;
        xml.push_str(&format!(r#"<row r="{row_no}">"#));
        for (c, cell) in row.iter().enumerate() {
            let cell_ref = format!("{}{row_no}", column_name(c + 1));
            match cell {
                Cell::Int(n) => xml.push_str(&format!(r#"<c r="{cell_ref}"><v>{n}</v></c>"#)),
                Cell::Text(s) => {
                    if let Some(bad) = s.chars().find(|c| !is_xml_char(*c)) {
                        return Err(ser_err(format!(
                            "cell {cell_ref} contains U+{:04X}, which a worksheet cannot hold",
                            u32::from(bad)
                        )));
                    }
                    let space = if s.trim() != s.as_str() { r#" xml:space="preserve""# } else { "" };
                    xml.push_str(&format!(
                        r#"<c r="{cell_ref}" t="inlineStr"><is><t{space}>{}</t></is></c>"#,
                        escape_xml(s)
                    ));
                }
            }
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    Ok(xml)
}

fn package_parts(
    sheet_name: &str,
    rows: &[Vec<Cell>],
) -> Result<Vec<(&'static str, String)>, MarkerError> {
    let sheet = sheet_xml(rows)?;
    let content_types = format!(
        r#"{XML_DECL}<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/{SHEET_PART}" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/></Types>"#
    );
    let root_rels = format!(
        r#"{XML_DECL}<Relationships xmlns="{PKG_REL_NS}"><Relationship Id="rId1" Type="{REL_NS}/officeDocument" Target="xl/workbook.xml"/></Relationships>"#
    );
    let workbook = format!(
        r#"{XML_DECL}<workbook xmlns="{MAIN_NS}" xmlns:r="{REL_NS}"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        escape_xml(sheet_name)
    );
    let workbook_rels = format!(
        r#"{XML_DECL}<Relationships xmlns="{PKG_REL_NS}"><Relationship Id="rId1" Type="{REL_NS}/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="{REL_NS}/styles" Target="styles.xml"/></Relationships>"#
    );
    let styles = format!(
        r#"{XML_DECL}<styleSheet xmlns="{MAIN_NS}"><fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts><fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills><borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs><cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles></styleSheet>"#
    );

    Ok(vec![
        ("[Content_Types].xml", content_types),
        ("_rels/.rels", root_rels),
        ("xl/workbook.xml", workbook),
        ("xl/_rels/workbook.xml.rels", workbook_rels),
        ("xl/styles.xml", styles),
        (SHEET_PART, sheet),
    ])
}

/// Serialize `rows` into an `.xlsx` package with one worksheet named `sheet_name`.
///
/// # Errors
///
/// Returns [`MarkerError::SerializationFailure`] for an invalid sheet name, for
/// text containing characters XML cannot represent, or when the zip container
/// cannot be written.
pub fn write_single_sheet(sheet_name: &str, rows: &[Vec<Cell>]) -> Result<Vec<u8>, MarkerError> {
    validate_sheet_name(sheet_name)?;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());

    for (name, body) in package_parts(sheet_name, rows)? {
        zip.start_file(name, options).map_err(ser_err)?;
        zip.write_all(body.as_bytes()).map_err(ser_err)?;
    }

    let cursor = zip.finish().map_err(ser_err)?;
    Ok(cursor.into_inner())
}

/// Read back the cell text of the first worksheet, row by row.
///
/// Integer cells come back as their decimal text. Intended for checking
/// packages produced by [`write_single_sheet`].
///
/// # Errors
///
/// Returns [`MarkerError::MalformedReport`] when the bytes are not a readable
/// package.
pub fn read_sheet_rows(bytes: &[u8]) -> Result<Vec<Vec<String>>, MarkerError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(read_err)?;
    let mut xml = String::new();
    archive
        .by_name(SHEET_PART)
        .map_err(read_err)?
        .read_to_string(&mut xml)
        .map_err(read_err)?;

    let doc = Document::parse(&xml).map_err(read_err)?;
    let rows: Vec<Vec<String>> = doc
        .descendants()
        .filter(|n| n.has_tag_name("row"))
        .map(|row| {
            row.children()
                .filter(|c| c.has_tag_name("c"))
                .map(|cell| {
                    cell.descendants()
                        .find(|n| n.has_tag_name("t") || n.has_tag_name("v"))
                        .and_then(|n| n.text())
                        .unwrap_or_default()
                        .to_string()
                })
                .collect()
        })
        .collect();
    Ok(rows)
}
