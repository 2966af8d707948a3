//! calamine-backed workbook reading (xlsx, xlsm, xlsb, xls, ods).

use calamine::{open_workbook_auto, Data, ExcelDateTime, Reader, Sheets};
use chrono::Timelike;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::{Cell, WorkbookSource};
use crate::error::{WorkbookError, WorkbookResult};

/// A workbook file opened through calamine; the format is picked from the
/// file extension.
pub struct CalamineWorkbook {
    sheets: Sheets<BufReader<File>>,
}

impl CalamineWorkbook {
    pub fn open<P: AsRef<Path>>(path: P) -> WorkbookResult<Self> {
        let path = path.as_ref();
        let sheets = open_workbook_auto(path).map_err(|e| WorkbookError::Open {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { sheets })
    }
}

impl WorkbookSource for CalamineWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names()
    }

    fn read_sheet(&mut self, sheet: &str) -> WorkbookResult<Vec<Vec<Cell>>> {
        let range = self
            .sheets
            .worksheet_range(sheet)
            .map_err(|e| WorkbookError::Sheet {
                sheet: sheet.to_string(),
                message: e.to_string(),
            })?;

        Ok(range
            .rows()
            .map(|row| row.iter().map(to_cell).collect())
            .collect())
    }
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::DateTime(s.clone()),
        Data::DateTime(dt) => Cell::DateTime(iso_datetime(dt)),
        Data::Error(e) => Cell::Error(e.to_string()),
    }
}

/// Excel serial date as `YYYY-MM-DD`, or `YYYY-MM-DDTHH:MM:SS` when it
/// carries a time of day. Durations and out-of-range serials keep the raw
/// number.
fn iso_datetime(dt: &ExcelDateTime) -> String {
    if !dt.is_datetime() {
        return dt.as_f64().to_string();
    }
    match dt.as_datetime() {
        Some(value) if value.num_seconds_from_midnight() == 0 => {
            value.format("%Y-%m-%d").to_string()
        }
        Some(value) => value.format("%Y-%m-%dT%H:%M:%S").to_string(),
        None => dt.as_f64().to_string(),
    }
}
