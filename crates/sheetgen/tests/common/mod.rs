//! Minimal `.xlsx` fixtures written with inline-string cells

#![allow(dead_code)]

use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use quick_xml::escape::escape;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// An in-memory workbook of text sheets
#[derive(Debug, Default)]
pub struct WorkbookFixture {
    sheets: Vec<(String, Vec<Vec<String>>)>,
}

impl WorkbookFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheet(mut self, name: &str, rows: &[&[&str]]) -> Self {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect();
        self.sheets.push((name.to_string(), rows));
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut buf));
            let options = SimpleFileOptions::default();

            zip.start_file("[Content_Types].xml", options).unwrap();
            zip.write_all(br#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#).unwrap();

            let mut sheets = String::new();
            let mut rels = String::new();
            for (i, (name, _)) in self.sheets.iter().enumerate() {
                let n = i + 1;
                sheets.push_str(&format!(
                    r#"<sheet name="{}" sheetId="{n}" r:id="rId{n}"/>"#,
                    escape(name.as_str())
                ));
                rels.push_str(&format!(
                    r#"<Relationship Id="rId{n}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{n}.xml"/>"#
                ));
            }

            zip.start_file("xl/workbook.xml", options).unwrap();
            zip.write_all(format!(
                r#"<?xml version="1.0" encoding="UTF-8"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>{sheets}</sheets></workbook>"#
            ).as_bytes()).unwrap();

            zip.start_file("xl/_rels/workbook.xml.rels", options).unwrap();
            zip.write_all(format!(
                r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{rels}</Relationships>"#
            ).as_bytes()).unwrap();

            for (i, (_, rows)) in self.sheets.iter().enumerate() {
                zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1), options)
                    .unwrap();
                zip.write_all(worksheet_xml(rows).as_bytes()).unwrap();
            }

            zip.finish().unwrap();
        }
        buf
    }

    pub fn write_to(&self, path: &Path) -> PathBuf {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).unwrap();
        }
        fs::write(path, self.to_bytes()).unwrap();
        path.to_path_buf()
    }
}

fn worksheet_xml(rows: &[Vec<String>]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for (r, row) in rows.iter().enumerate() {
        xml.push_str(&format!(r#"<row r="{}">"#, r + 1));
        for (c, text) in row.iter().enumerate() {
            if text.is_empty() {
                continue;
            }
            xml.push_str(&format!(
                r#"<c r="{}{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                column_letters(c),
                r + 1,
                escape(text.as_str())
            ));
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

fn column_letters(mut col: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (col % 26) as u8);
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap()
}

/// The horizontal sheet used across the build tests
pub const ITEMS: &[&[&str]] = &[
    &["item table"],
    &["", "id", "price", "", "tags"],
    &["", "id", "", "icon", "tags"],
    &["", "number", "number", "string", "array"],
    &["START"],
    &["", "1", "9.5", "sword.png", r#"["melee"]"#],
    &["#", "99", "0", "unused.png", "[]"],
    &["", "2", "12", "shield.png", "[]"],
    &["END"],
    &["", "3", "1", "after-end.png", "[]"],
];

/// The vertical sheet used across the build tests
pub const SETTINGS: &[&[&str]] = &[
    &["global settings"],
    &["START"],
    &["", "", "max_level", "maxLevel", "number", "60"],
    &["", "", "motd", "", "string", "hello"],
    &["", "", "", "theme", "object", r#"{"color":"red"}"#],
    &["END"],
];
