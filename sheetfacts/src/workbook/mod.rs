//! Workbook sheet extraction.
//!
//! A [`WorkbookSource`] lists sheets and hands back each one as a grid of
//! [`Cell`]s. [`extract_sheets`] turns the requested sheets into tables
//! whose names and columns are sanitized identifiers.
//!
//! ```text
//! ┌──────────────────┐     ┌────────────────┐     ┌──────────────────────┐
//! │ WorkbookSource   │────▶│ extract_sheets │────▶│ TableSet + warnings  │
//! │ (calamine, mem)  │     │ (sanitize)     │     │ TenantEPG, DHCPRelay │
//! └──────────────────┘     └────────────────┘     └──────────────────────┘
//! ```
//!
//! Grid rules: the first row is the header, rows that are entirely empty are
//! skipped, short rows are padded with "" and cells beyond the header are
//! dropped.

#[cfg(feature = "workbook")]
mod reader;

#[cfg(feature = "workbook")]
pub use self::reader::CalamineWorkbook;

use indexmap::IndexMap;
use std::fmt;
use std::path::Path;

use crate::error::{WorkbookError, WorkbookResult};
use crate::models::{Row, Table, TableSet};
use crate::sanitize::sanitize;

// =============================================================================
// Cells and sources
// =============================================================================

/// One spreadsheet cell, as read. Converted to text when a table is built.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Date or time, already rendered by the backend.
    DateTime(String),
    /// Formula error such as `#DIV/0!`.
    Error(String),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Cell::Text(s) | Cell::DateTime(s) | Cell::Error(s) => s,
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) | Cell::DateTime(s) | Cell::Error(s) => f.write_str(s),
            Cell::Int(i) => write!(f, "{}", i),
            Cell::Float(v) => write!(f, "{}", v),
            Cell::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }
}

/// Anything that can enumerate sheets and read one as a cell grid.
pub trait WorkbookSource {
    /// Sheet names in workbook order.
    fn sheet_names(&self) -> Vec<String>;

    /// All rows of `sheet`, header row first.
    fn read_sheet(&mut self, sheet: &str) -> WorkbookResult<Vec<Vec<Cell>>>;
}

/// Workbook held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    sheets: IndexMap<String, Vec<Vec<Cell>>>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(mut self, name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        self.sheets.insert(name.into(), rows);
        self
    }
}

impl WorkbookSource for MemoryWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.keys().cloned().collect()
    }

    fn read_sheet(&mut self, sheet: &str) -> WorkbookResult<Vec<Vec<Cell>>> {
        self.sheets
            .get(sheet)
            .cloned()
            .ok_or_else(|| WorkbookError::Sheet {
                sheet: sheet.to_string(),
                message: "no such sheet".to_string(),
            })
    }
}

/// Open the workbook at `path` with the compiled-in backend.
#[cfg(feature = "workbook")]
pub fn open_workbook<P: AsRef<Path>>(path: P) -> WorkbookResult<Box<dyn WorkbookSource>> {
    Ok(Box::new(CalamineWorkbook::open(path)?))
}

/// Open the workbook at `path` with the compiled-in backend.
#[cfg(not(feature = "workbook"))]
pub fn open_workbook<P: AsRef<Path>>(_path: P) -> WorkbookResult<Box<dyn WorkbookSource>> {
    Err(WorkbookError::Unavailable)
}

/// Whether a workbook backend is compiled in.
pub fn workbook_support() -> bool {
    cfg!(feature = "workbook")
}

// =============================================================================
// Extraction
// =============================================================================

/// Tables for the requested sheets plus skip warnings.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub tables: TableSet,
    pub warnings: Vec<String>,
}

/// Extract the `requested` sheets from `source`.
///
/// With `warn`, every sheet present but not requested (and every requested
/// sheet that is absent) produces a warning. An empty `requested` list with
/// `warn` set is discovery mode: no tables, one warning per sheet.
pub fn extract_sheets(
    source: &mut dyn WorkbookSource,
    requested: &[String],
    warn: bool,
) -> WorkbookResult<Extraction> {
    let present = source.sheet_names();
    let mut extraction = Extraction::default();

    for sheet in &present {
        if !requested.contains(sheet) {
            if warn {
                extraction
                    .warnings
                    .push(format!("sheet \"{}\" found in source file, skipping", sheet));
            }
            continue;
        }

        let table = sheet_to_table(sheet, source.read_sheet(sheet)?);
        let name = table.name().to_string();

        if extraction.tables.insert(table).is_err() {
            let first = present
                .iter()
                .find(|s| requested.contains(s) && sanitize(s) == name)
                .cloned()
                .unwrap_or_default();
            return Err(WorkbookError::NameCollision {
                first,
                second: sheet.clone(),
                table: name,
            });
        }
    }

    if warn {
        for sheet in requested.iter().filter(|s| !present.contains(s)) {
            extraction.warnings.push(format!(
                "sheet \"{}\" requested but not found in source file",
                sheet
            ));
        }
    }

    Ok(extraction)
}

/// Build a table from a sheet grid, sanitizing the sheet and column names.
pub fn sheet_to_table(sheet: &str, grid: Vec<Vec<Cell>>) -> Table {
    let mut grid = grid
        .into_iter()
        .filter(|cells| !cells.iter().all(Cell::is_empty));

    let headers = match grid.next() {
        Some(header_row) => unique_columns(header_row.iter().map(|c| sanitize(&c.to_string()))),
        None => Vec::new(),
    };

    let rows: Vec<Row> = grid
        .map(|cells| {
            let mut cells = cells.into_iter();
            headers
                .iter()
                .map(|header| {
                    let text = cells.next().map(Cell::into_text).unwrap_or_default();
                    (header.clone(), text)
                })
                .collect()
        })
        .collect();

    Table::new(sanitize(sheet), headers, rows)
}

/// Suffix repeated names with `_2`, `_3`, ... so row keys stay unique.
fn unique_columns(names: impl Iterator<Item = String>) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for name in names {
        let mut candidate = name.clone();
        let mut n = 2;
        while columns.contains(&candidate) {
            candidate = format!("{}_{}", name, n);
            n += 1;
        }
        columns.push(candidate);
    }
    columns
}
