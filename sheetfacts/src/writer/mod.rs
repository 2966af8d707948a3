//! CSV output.
//!
//! Two writers share the same row rules (header from the first row, every
//! row carries the same columns, empty cells become a single space):
//!
//! - [`to_csv`] - Plain text, fields joined with `,` and no quoting. A cell
//!   that contains a comma or a newline breaks the layout; callers that can
//!   hit that should write files instead.
//! - [`write_tables`] - One `<table>.csv` file per table, written through a
//!   quoting CSV writer and encoded in the requested character set.

use encoding_rs::Encoding;
use std::fs;
use std::path::Path;

use crate::error::{SchemaResult, WriteError, WriteResult};
use crate::models::{check_row, Row, Table, TableSet};

/// Extension of every written file.
pub const EXTENSION: &str = ".csv";

/// Stand-in for empty cells.
pub const EMPTY_CELL: &str = " ";

fn cell(value: &str) -> &str {
    if value.is_empty() {
        EMPTY_CELL
    } else {
        value
    }
}

// =============================================================================
// Plain text
// =============================================================================

/// Format rows as CSV text: a header line built from the first row's keys,
/// then one line per row.
///
/// # Example
/// ```
/// use sheetfacts::{to_csv, Row};
///
/// let row: Row = [("name", "web"), ("descr", "")]
///     .into_iter()
///     .map(|(k, v)| (k.to_string(), v.to_string()))
///     .collect();
///
/// assert_eq!(to_csv(&[row]).unwrap(), "name,descr\nweb, \n");
/// ```
pub fn to_csv(rows: &[Row]) -> SchemaResult<String> {
    let Some(first) = rows.first() else {
        return Ok(String::new());
    };
    let headers: Vec<String> = first.keys().cloned().collect();

    let mut text = join_line(headers.iter().map(String::as_str));
    for (index, row) in rows.iter().enumerate() {
        check_row(&headers, row, index + 1)?;
        text.push_str(&join_line(headers.iter().map(|h| row[h].as_str())));
    }
    Ok(text)
}

fn join_line<'a>(values: impl Iterator<Item = &'a str>) -> String {
    let mut line = values.map(cell).collect::<Vec<_>>().join(",");
    line.push('\n');
    line
}

// =============================================================================
// Files
// =============================================================================

/// Files written by [`write_tables`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteOutcome {
    /// Names of the written files, relative to the destination.
    pub filenames: Vec<String>,
    /// True iff at least one file was written.
    pub changed: bool,
}

/// Write every table to `<dest>/<table>.csv`, stopping at the first failure.
///
/// Existing files are overwritten. The destination directory must exist.
pub fn write_tables(
    tables: &TableSet,
    dest: &Path,
    encoding: &'static Encoding,
) -> WriteResult<WriteOutcome> {
    let mut outcome = WriteOutcome::default();

    for table in tables.iter() {
        outcome.filenames.push(write_table(table, dest, encoding)?);
        outcome.changed = true;
    }

    Ok(outcome)
}

/// Write one table to `<dest>/<table>.csv` and return the file name.
pub fn write_table(table: &Table, dest: &Path, encoding: &'static Encoding) -> WriteResult<String> {
    let filename = format!("{}{}", table.name(), EXTENSION);
    let path = dest.join(&filename);

    let bytes = encode_table(table, encoding)?;
    fs::write(&path, bytes).map_err(|e| WriteError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(filename)
}

/// Render `table` through a quoting CSV writer and encode the result.
pub fn encode_table(table: &Table, encoding: &'static Encoding) -> WriteResult<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    if !table.headers().is_empty() {
        check_encodable(table, 0, table.headers(), encoding)?;
        writer.write_record(table.headers())?;
    }

    for (index, row) in table.rows().iter().enumerate() {
        check_row(table.headers(), row, index + 1).map_err(|source| WriteError::Schema {
            table: table.name().to_string(),
            source,
        })?;

        let values: Vec<&str> = table.headers().iter().map(|h| cell(&row[h])).collect();
        check_encodable(table, index + 1, &values, encoding)?;
        writer.write_record(&values)?;
    }

    let buffer = writer.into_inner().map_err(|e| WriteError::Io {
        path: table.name().to_string(),
        source: e.into_error(),
    })?;

    if encoding == encoding_rs::UTF_8 {
        return Ok(buffer);
    }
    let text = String::from_utf8_lossy(&buffer);
    Ok(encoding.encode(&text).0.into_owned())
}

/// `row` is 0 for the header.
fn check_encodable<S: AsRef<str>>(
    table: &Table,
    row: usize,
    values: &[S],
    encoding: &'static Encoding,
) -> WriteResult<()> {
    if encoding == encoding_rs::UTF_8 {
        return Ok(());
    }
    let unmappable = values
        .iter()
        .any(|value| encoding.encode(value.as_ref()).2);
    if unmappable {
        return Err(WriteError::Encoding {
            table: table.name().to_string(),
            row,
            encoding: encoding.name().to_string(),
        });
    }
    Ok(())
}
