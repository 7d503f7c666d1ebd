//! XLSX reader

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use sheetgen_core::Sheet;

mod cell_ref;

use cell_ref::parse_cell_ref;

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// Excel uses this format to encode special characters in XML:
/// - `_x000d_` = CR (carriage return)
/// - `_x000a_` = LF (line feed)
/// - `_x0009_` = Tab
/// - `_x005f_` = Underscore (escaped underscore)
fn decode_excel_escapes(s: &str) -> String {
    if !s.contains("_x") {
        return s.to_string();
    }

    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '_' || chars.peek() != Some(&'x') {
            result.push(c);
            continue;
        }
        chars.next(); // consume 'x'

        // Try to read 4 hex digits
        let mut hex_chars = String::new();
        while hex_chars.len() < 4 {
            match chars.peek() {
                Some(&ch) if ch.is_ascii_hexdigit() => {
                    hex_chars.push(ch);
                    chars.next();
                }
                _ => break,
            }
        }

        // Check for closing underscore
        if hex_chars.len() == 4 && chars.peek() == Some(&'_') {
            let decoded = u32::from_str_radix(&hex_chars, 16)
                .ok()
                .and_then(char::from_u32);
            if let Some(ch) = decoded {
                chars.next(); // consume closing '_'
                result.push(ch);
                continue;
            }
        }

        // Not a valid escape sequence, output what we consumed
        result.push_str("_x");
        result.push_str(&hex_chars);
    }

    result
}

/// A sheet declared in `workbook.xml`
#[derive(Debug, Clone)]
struct SheetEntry {
    name: String,
    /// Archive path of the worksheet part, when the relationship resolves
    part: Option<String>,
}

/// An open XLSX archive.
///
/// Sheets are listed eagerly; their cells are read on demand with
/// [`XlsxWorkbook::read_sheet`]. Dropping the workbook releases the file.
pub struct XlsxWorkbook<R> {
    archive: zip::ZipArchive<R>,
    shared_strings: Vec<String>,
    sheets: Vec<SheetEntry>,
}

/// XLSX file reader
pub struct XlsxReader;

impl XlsxReader {
    /// Open a workbook from a file path
    pub fn open<P: AsRef<Path>>(path: P) -> XlsxResult<XlsxWorkbook<BufReader<File>>> {
        let file = File::open(path)?;
        Self::read(BufReader::new(file))
    }

    /// Open a workbook from a reader
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<XlsxWorkbook<R>> {
        let mut archive = zip::ZipArchive::new(reader)?;

        // Verify this is an XLSX file
        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let shared_strings = read_shared_strings(&mut archive)?;
        let sheet_info = read_workbook_xml(&mut archive)?;
        let sheet_paths = read_workbook_rels(&mut archive)?;

        let sheets = sheet_info
            .into_iter()
            .map(|(name, r_id)| SheetEntry {
                part: sheet_paths.get(&r_id).cloned(),
                name,
            })
            .collect();

        Ok(XlsxWorkbook {
            archive,
            shared_strings,
            sheets,
        })
    }
}

impl<R: Read + Seek> XlsxWorkbook<R> {
    /// Number of sheets declared by the workbook
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Sheet names in workbook order
    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|s| s.name.as_str())
    }

    /// Read the cells of the sheet at `index`
    pub fn read_sheet(&mut self, index: usize) -> XlsxResult<Sheet> {
        let entry = self
            .sheets
            .get(index)
            .ok_or(XlsxError::SheetOutOfBounds(index, self.sheets.len()))?;

        let part = entry
            .part
            .clone()
            .ok_or_else(|| XlsxError::MissingPart(format!("worksheet '{}'", entry.name)))?;
        let name = entry.name.clone();

        let rows = read_worksheet(&mut self.archive, &part, &self.shared_strings)?;
        log::trace!("read sheet '{}' ({} rows) from {}", name, rows.len(), part);
        Ok(Sheet::from_rows(name, rows))
    }

    /// Read the cells of the sheet called `name`
    pub fn read_sheet_by_name(&mut self, name: &str) -> XlsxResult<Sheet> {
        let index = self
            .sheets
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| XlsxError::SheetNotFound(name.to_string()))?;
        self.read_sheet(index)
    }
}

fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|s| s.to_string()))
}

/// Read the shared strings table
fn read_shared_strings<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
) -> XlsxResult<Vec<String>> {
    let mut strings = Vec::new();

    let file = match archive.by_name("xl/sharedStrings.xml") {
        Ok(f) => f,
        Err(_) => return Ok(strings), // No shared strings is valid
    };

    let mut xml_reader = Reader::from_reader(BufReader::new(file));

    let mut buf = Vec::new();
    let mut current = String::new();
    let mut in_si = false;
    let mut in_t = false;
    // Phonetic runs carry reading hints, not cell text
    let mut in_phonetic = false;

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"si" => {
                    in_si = true;
                    current.clear();
                }
                b"rPh" => in_phonetic = true,
                b"t" if in_si && !in_phonetic => in_t = true,
                _ => {}
            },
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"si" => {
                strings.push(String::new());
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"si" => {
                    strings.push(decode_excel_escapes(&current));
                    current.clear();
                    in_si = false;
                }
                b"rPh" => in_phonetic = false,
                b"t" => in_t = false,
                _ => {}
            },
            Ok(Event::Text(e)) if in_t => {
                current.push_str(&e.unescape()?);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(strings)
}

/// Read workbook.xml to get sheet names and rIds
fn read_workbook_xml<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
) -> XlsxResult<Vec<(String, String)>> {
    let file = archive
        .by_name("xl/workbook.xml")
        .map_err(|_| XlsxError::MissingPart("xl/workbook.xml".into()))?;

    let mut xml_reader = Reader::from_reader(BufReader::new(file));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut sheets = Vec::new();

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.local_name().as_ref() == b"sheet" => {
                if let (Some(name), Some(r_id)) = (attr_value(&e, b"name"), attr_value(&e, b"r:id"))
                {
                    sheets.push((name, r_id));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(sheets)
}

/// Read workbook.xml.rels to get sheet file paths
fn read_workbook_rels<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
) -> XlsxResult<HashMap<String, String>> {
    let file = archive
        .by_name("xl/_rels/workbook.xml.rels")
        .map_err(|_| XlsxError::MissingPart("xl/_rels/workbook.xml.rels".into()))?;

    let mut xml_reader = Reader::from_reader(BufReader::new(file));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut rels = HashMap::new();

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e)) | Ok(Event::Start(e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let id = attr_value(&e, b"Id");
                let target = attr_value(&e, b"Target");
                let rel_type = attr_value(&e, b"Type");

                // Only include worksheet relationships
                if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                    if rel_type.ends_with("/worksheet") {
                        // Target is relative to xl/ folder
                        let full_path = match target.strip_prefix('/') {
                            Some(absolute) => absolute.to_string(),
                            None => format!("xl/{}", target),
                        };
                        rels.insert(id, full_path);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(rels)
}

/// Cell being accumulated between `<c>` and `</c>`
#[derive(Debug, Default)]
struct PendingCell {
    row: usize,
    col: usize,
    cell_type: Option<String>,
    value: Option<String>,
    inline: Option<String>,
}

/// Read a worksheet part into a row-major text matrix.
///
/// Gaps are filled with empty strings; nothing is stored past the last
/// non-empty cell of a row, or past the last row holding one.
fn read_worksheet<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
    path: &str,
    shared_strings: &[String],
) -> XlsxResult<Vec<Vec<String>>> {
    let file = archive
        .by_name(path)
        .map_err(|_| XlsxError::MissingPart(path.to_string()))?;

    let mut xml_reader = Reader::from_reader(BufReader::new(file));

    let mut buf = Vec::new();
    let mut rows: Vec<Vec<String>> = Vec::new();

    let mut next_row = 0usize;
    let mut current_row = 0usize;
    let mut next_col = 0usize;

    let mut cell: Option<PendingCell> = None;
    let mut in_value = false;
    let mut in_inline_str = false;
    let mut in_inline_text = false;
    let mut in_phonetic = false;

    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"row" => {
                    current_row = row_index(&e, next_row)?;
                    next_row = current_row + 1;
                    next_col = 0;
                }
                b"c" => {
                    let (row, col) = cell_position(&e, current_row, next_col)?;
                    next_col = col + 1;
                    cell = Some(PendingCell {
                        row,
                        col,
                        cell_type: attr_value(&e, b"t"),
                        ..PendingCell::default()
                    });
                }
                b"v" if cell.is_some() => in_value = true,
                b"is" if cell.is_some() => in_inline_str = true,
                b"rPh" if in_inline_str => in_phonetic = true,
                b"t" if in_inline_str && !in_phonetic => in_inline_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"row" => {
                    current_row = row_index(&e, next_row)?;
                    next_row = current_row + 1;
                    next_col = 0;
                }
                b"c" => {
                    // Styled but valueless cell; only advances the cursor
                    let (_, col) = cell_position(&e, current_row, next_col)?;
                    next_col = col + 1;
                }
                _ => {}
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"c" => {
                    if let Some(done) = cell.take() {
                        let text = cell_text(&done, shared_strings)?;
                        place(&mut rows, done.row, done.col, text);
                    }
                }
                b"v" => in_value = false,
                b"is" => in_inline_str = false,
                b"rPh" => in_phonetic = false,
                b"t" => in_inline_text = false,
                _ => {}
            },
            Ok(Event::Text(e)) if in_value || in_inline_text => {
                let text = e.unescape()?;
                if let Some(pending) = cell.as_mut() {
                    let slot = if in_value {
                        &mut pending.value
                    } else {
                        &mut pending.inline
                    };
                    slot.get_or_insert_with(String::new).push_str(&text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(rows)
}

fn row_index(e: &BytesStart<'_>, fallback: usize) -> XlsxResult<usize> {
    match attr_value(e, b"r") {
        Some(r) => {
            let n: usize = r
                .parse()
                .map_err(|_| XlsxError::Parse(format!("Invalid row number '{}'", r)))?;
            // 1-based to 0-based
            Ok(n.saturating_sub(1))
        }
        None => Ok(fallback),
    }
}

fn cell_position(
    e: &BytesStart<'_>,
    current_row: usize,
    next_col: usize,
) -> XlsxResult<(usize, usize)> {
    match attr_value(e, b"r") {
        Some(r) => parse_cell_ref(&r)
            .ok_or_else(|| XlsxError::Parse(format!("Invalid cell reference '{}'", r))),
        None => Ok((current_row, next_col)),
    }
}

/// Text of a finished cell, as a designer would see it
fn cell_text(cell: &PendingCell, shared_strings: &[String]) -> XlsxResult<String> {
    let value = cell.value.as_deref();
    let text = match cell.cell_type.as_deref() {
        // Shared string
        Some("s") => match value {
            Some(v) => {
                let idx: usize = v.trim().parse().map_err(|_| {
                    XlsxError::Parse(format!("Invalid shared string index: {}", v))
                })?;
                shared_strings
                    .get(idx)
                    .cloned()
                    .ok_or_else(|| {
                        XlsxError::Parse(format!("Shared string index {} out of bounds", idx))
                    })?
            }
            None => String::new(),
        },

        // Boolean
        Some("b") => match value {
            Some(v) if v == "1" || v.eq_ignore_ascii_case("true") => "TRUE".to_string(),
            Some(_) => "FALSE".to_string(),
            None => String::new(),
        },

        // Inline string - decode Excel escape sequences
        Some("inlineStr") => {
            decode_excel_escapes(cell.inline.as_deref().or(value).unwrap_or_default())
        }

        // Formula string result
        Some("str") => decode_excel_escapes(value.unwrap_or_default()),

        // Numbers, errors, dates: stored text
        _ => value.unwrap_or_default().to_string(),
    };
    Ok(text)
}

fn place(rows: &mut Vec<Vec<String>>, row: usize, col: usize, text: String) {
    if text.is_empty() {
        return;
    }
    if rows.len() <= row {
        rows.resize_with(row + 1, Vec::new);
    }
    let cells = &mut rows[row];
    if cells.len() <= col {
        cells.resize_with(col + 1, String::new);
    }
    cells[col] = text;
}
