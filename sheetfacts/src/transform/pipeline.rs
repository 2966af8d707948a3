//! High-level entry points, one per host module.
//!
//! - [`csv_to_facts`] - CSV file → primary table + virtual sheets
//! - [`xls_to_csv`] - Workbook → one CSV file per selected sheet
//!
//! Each takes one immutable argument struct and either completes the whole
//! conversion or fails without partial results.
//!
//! # Example
//!
//! ```rust,ignore
//! use sheetfacts::{csv_to_facts, CsvToFactsArgs, VirtualSheet};
//!
//! let mut args = CsvToFactsArgs::new("f5_nodes.csv");
//! args.table = "f5".to_string();
//! args.vsheets = vec![VirtualSheet::new("NAMEs", ["name"])];
//!
//! let tables = csv_to_facts(&args)?;
//! println!("{} unique node names", tables.get("NAMEs").unwrap().len());
//! ```

use serde::Serialize;
use std::path::Path;

use super::projection::{build_table_set, validate_requests};
use crate::api::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::config::{CsvToFactsArgs, XlsToCsvArgs};
use crate::error::ConversionResult;
use crate::models::TableSet;
use crate::parser::read_table_file;
use crate::workbook::{extract_sheets, open_workbook, WorkbookSource};
use crate::writer::write_tables;

/// Result of [`xls_to_csv`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct XlsToCsvOutcome {
    /// Names of the files written into the destination directory.
    pub sheet_filenames: Vec<String>,
    /// One message per skipped sheet (only when `warn` is set).
    pub warnings: Vec<String>,
    /// True iff at least one file was written.
    pub changed: bool,
}

/// Read `args.src` and derive the requested virtual sheets.
///
/// The returned set holds the primary table under `args.table`, followed by
/// one table per virtual sheet in request order.
pub fn csv_to_facts(args: &CsvToFactsArgs) -> ConversionResult<TableSet> {
    let options = args.reader_options()?;
    validate_requests(&args.table, &args.vsheets)?;

    log_info(format!("📖 Reading CSV file {}", args.src.display()));
    let table = read_table_file(&args.src, &args.table, &options)?;
    log_success(format!(
        "Read {} rows, columns: {}",
        table.len(),
        table.headers().join(", ")
    ));

    let tables = build_table_set(table, &args.vsheets)?;
    for sheet in &args.vsheets {
        if let Some(projection) = tables.get(&sheet.name) {
            log_info_indent(
                format!("{}: {} unique rows", sheet.name, projection.len()),
                1,
            );
        }
    }

    Ok(tables)
}

/// Open `args.src` with the compiled-in workbook backend and export the
/// requested sheets.
pub fn xls_to_csv(args: &XlsToCsvArgs) -> ConversionResult<XlsToCsvOutcome> {
    let dest = args.destination()?;
    let encoding = args.output_encoding()?;

    log_info(format!("📖 Reading workbook {}", args.src.display()));
    let mut workbook = open_workbook(&args.src)?;

    export_sheets(workbook.as_mut(), args, dest, encoding)
}

/// [`xls_to_csv`] against an already opened workbook.
pub fn xls_to_csv_with(
    workbook: &mut dyn WorkbookSource,
    args: &XlsToCsvArgs,
) -> ConversionResult<XlsToCsvOutcome> {
    let dest = args.destination()?;
    let encoding = args.output_encoding()?;
    export_sheets(workbook, args, dest, encoding)
}

fn export_sheets(
    workbook: &mut dyn WorkbookSource,
    args: &XlsToCsvArgs,
    dest: &Path,
    encoding: &'static encoding_rs::Encoding,
) -> ConversionResult<XlsToCsvOutcome> {
    let extraction = extract_sheets(workbook, &args.sheets, args.warn)?;
    for warning in &extraction.warnings {
        log_warning(warning.as_str());
    }

    let written = write_tables(&extraction.tables, dest, encoding)?;
    for filename in &written.filenames {
        log_success(format!("Wrote {}", dest.join(filename).display()));
    }

    Ok(XlsToCsvOutcome {
        sheet_filenames: written.filenames,
        warnings: extraction.warnings,
        changed: written.changed,
    })
}
