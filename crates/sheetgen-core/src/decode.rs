//! Schema-directed sheet decoding.
//!
//! A horizontal sheet carries its schema in fixed header rows:
//!
//! | row | meaning |
//! |-----|---------|
//! | 0 | free-form description |
//! | 1 | server field names |
//! | 2 | client field names |
//! | 3 | type tags |
//! | 4.. | data |
//!
//! A vertical (`_single`) sheet carries one field per row, with the server
//! name, client name, type tag and value in columns 2 to 5.
//!
//! In both layouts column 0 is the control column: rows are ignored until a
//! `START` row, `#` rows are skipped, and an `END` row stops decoding.

use std::fmt;

use crate::error::{CellLocator, Error, Result};
use crate::sheet::{Orientation, Sheet};
use crate::types::TypeTag;
use crate::value::{Record, Value};
use crate::{COMMENT_MARKER, END_MARKER, START_MARKER};

const SERVER_NAME_ROW: usize = 1;
const CLIENT_NAME_ROW: usize = 2;
const TYPE_ROW: usize = 3;
const FIRST_DATA_ROW: usize = 4;

const SERVER_NAME_COL: usize = 2;
const CLIENT_NAME_COL: usize = 3;
const TYPE_COL: usize = 4;
const VALUE_COL: usize = 5;

/// Which consumer a view is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Audience {
    Client,
    Server,
}

impl Audience {
    pub const ALL: [Audience; 2] = [Audience::Client, Audience::Server];

    /// Output subdirectory name
    pub fn dir_name(&self) -> &'static str {
        match self {
            Audience::Client => "client",
            Audience::Server => "server",
        }
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// The two projections of a decoded sheet.
///
/// Both sequences always have the same length, and index `k` of each was
/// decoded from the same source row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetViews {
    pub server: Vec<Record>,
    pub client: Vec<Record>,
}

impl SheetViews {
    /// Records for one audience
    pub fn view(&self, audience: Audience) -> &[Record] {
        match audience {
            Audience::Client => &self.client,
            Audience::Server => &self.server,
        }
    }

    /// Number of records in each view
    pub fn len(&self) -> usize {
        self.server.len()
    }

    pub fn is_empty(&self) -> bool {
        self.server.is_empty()
    }

    fn push(&mut self, server: Record, client: Record) {
        self.server.push(server);
        self.client.push(client);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowAction {
    Skip,
    Data,
    Stop,
}

/// START/END/# state machine over the control column
#[derive(Debug, Default)]
struct Control {
    started: bool,
}

impl Control {
    fn classify(&mut self, control: &str) -> RowAction {
        if control == COMMENT_MARKER {
            return RowAction::Skip;
        }
        if !self.started {
            self.started = control == START_MARKER;
            return RowAction::Skip;
        }
        if control == END_MARKER {
            return RowAction::Stop;
        }
        RowAction::Data
    }
}

/// Decode a sheet into its server and client views.
///
/// `workbook` only appears in diagnostics.
pub fn decode_sheet(workbook: &str, sheet: &Sheet) -> Result<SheetViews> {
    let views = match sheet.orientation() {
        Orientation::Horizontal => decode_horizontal(workbook, sheet)?,
        Orientation::Vertical => decode_vertical(workbook, sheet)?,
    };
    log::debug!(
        "decoded {} sheet:{} ({} records)",
        workbook,
        sheet.name(),
        views.len()
    );
    Ok(views)
}

fn decode_horizontal(workbook: &str, sheet: &Sheet) -> Result<SheetViews> {
    let mut views = SheetViews::default();
    let mut control = Control::default();

    for (i, row) in sheet.rows().iter().enumerate().skip(FIRST_DATA_ROW) {
        let Some(first) = row.first() else {
            continue;
        };
        match control.classify(first) {
            RowAction::Skip => continue,
            RowAction::Stop => break,
            RowAction::Data => {}
        }

        let mut server = Record::new();
        let mut client = Record::new();
        for (j, raw) in row.iter().enumerate().skip(1) {
            let tag = lookup_tag(sheet.cell(TYPE_ROW, j), workbook, sheet, TYPE_ROW, j)?;
            let value = decode_cell(tag, raw, workbook, sheet, i, j)?;
            assign(
                &mut server,
                &mut client,
                sheet.cell(SERVER_NAME_ROW, j),
                sheet.cell(CLIENT_NAME_ROW, j),
                value,
            );
        }
        views.push(server, client);
    }

    Ok(views)
}

fn decode_vertical(workbook: &str, sheet: &Sheet) -> Result<SheetViews> {
    let mut server = Record::new();
    let mut client = Record::new();
    let mut control = Control::default();

    for (i, row) in sheet.rows().iter().enumerate() {
        let Some(first) = row.first() else {
            continue;
        };
        match control.classify(first) {
            RowAction::Skip => continue,
            RowAction::Stop => break,
            RowAction::Data => {}
        }

        if row.len() <= VALUE_COL {
            return Err(Error::ShortRow {
                workbook: workbook.to_string(),
                sheet: sheet.name().to_string(),
                row: i,
                len: row.len(),
                required: VALUE_COL,
            });
        }

        let tag = lookup_tag(&row[TYPE_COL], workbook, sheet, i, TYPE_COL)?;
        let value = decode_cell(tag, &row[VALUE_COL], workbook, sheet, i, VALUE_COL)?;
        assign(
            &mut server,
            &mut client,
            &row[SERVER_NAME_COL],
            &row[CLIENT_NAME_COL],
            value,
        );
    }

    let mut views = SheetViews::default();
    views.push(server, client);
    Ok(views)
}

fn lookup_tag(
    text: &str,
    workbook: &str,
    sheet: &Sheet,
    row: usize,
    col: usize,
) -> Result<TypeTag> {
    TypeTag::from_name(text).ok_or_else(|| Error::UnknownType {
        at: CellLocator::new(workbook, sheet.name(), row, col),
        tag: text.to_string(),
    })
}

fn decode_cell(
    tag: TypeTag,
    raw: &str,
    workbook: &str,
    sheet: &Sheet,
    row: usize,
    col: usize,
) -> Result<Value> {
    tag.decode(raw).map_err(|source| Error::InvalidValue {
        at: CellLocator::new(workbook, sheet.name(), row, col),
        value: raw.to_string(),
        source,
    })
}

/// Place a value under each audience that names the field.
fn assign(
    server: &mut Record,
    client: &mut Record,
    server_name: &str,
    client_name: &str,
    value: Value,
) {
    match (server_name.is_empty(), client_name.is_empty()) {
        (false, false) => {
            client.insert(client_name.to_string(), value.clone());
            server.insert(server_name.to_string(), value);
        }
        (false, true) => {
            server.insert(server_name.to_string(), value);
        }
        (true, false) => {
            client.insert(client_name.to_string(), value);
        }
        (true, true) => {}
    }
}
