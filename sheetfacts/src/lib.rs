//! # sheetfacts - CSV and workbook conversions for automation hosts
//!
//! sheetfacts reads CSV files and spreadsheet workbooks into row-records
//! that an automation host stores as facts, and writes tables back out as
//! CSV.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│ Projection  │────▶│    Facts    │
//! │  (any enc)  │     │  (header)   │     │  (distinct) │     │   (JSON)    │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//!
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Workbook   │────▶│  Extractor  │────▶│   Writer    │────▶  <sheet>.csv
//! │ (xlsx, ods) │     │ (sanitize)  │     │  (quoting)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sheetfacts::{csv_to_facts, CsvToFactsArgs, VirtualSheet};
//!
//! let mut args = CsvToFactsArgs::new("nodes.csv");
//! args.vsheets = vec![VirtualSheet::new("NAMEs", ["name"])];
//! let tables = csv_to_facts(&args)?;
//! println!("{}", serde_json::to_string_pretty(&tables)?);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per stage
//! - [`models`] - Row, Table, TableSet
//! - [`sanitize`] - Identifier sanitizing
//! - [`parser`] - CSV reading with encoding detection
//! - [`transform`] - Virtual sheets and the host-module pipelines
//! - [`workbook`] - Workbook sheet extraction
//! - [`writer`] - CSV text and file output
//! - [`config`] - Invocation arguments
//! - [`api`] - Host responses, module runner, logging

// Core modules
pub mod error;
pub mod models;
pub mod sanitize;

// Reading
pub mod parser;
pub mod workbook;

// Transformation
pub mod transform;

// Writing
pub mod writer;

// Host interface
pub mod api;
pub mod config;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConfigError, ConversionError, ConversionResult, CsvError, ErrorKind, SchemaError,
    WorkbookError, WriteError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Row, Table, TableSet};
pub use sanitize::sanitize;

// =============================================================================
// Re-exports - Reading
// =============================================================================

pub use parser::{
    decode_content, detect_encoding, parse_table, read_table, read_table_bytes, read_table_file,
    ReaderOptions,
};

pub use workbook::{
    extract_sheets, open_workbook, sheet_to_table, workbook_support, Cell, Extraction,
    MemoryWorkbook, WorkbookSource,
};

#[cfg(feature = "workbook")]
pub use workbook::CalamineWorkbook;

// =============================================================================
// Re-exports - Transformation
// =============================================================================

pub use transform::projection::{build_table_set, project, validate_requests, VirtualSheet};

pub use transform::pipeline::{csv_to_facts, xls_to_csv, xls_to_csv_with, XlsToCsvOutcome};

// =============================================================================
// Re-exports - Writing
// =============================================================================

pub use writer::{encode_table, to_csv, write_table, write_tables, WriteOutcome};

// =============================================================================
// Re-exports - Host interface
// =============================================================================

pub use api::{error_response, run_module, Facts, HostModule, ModuleResponse};
pub use config::{CsvToFactsArgs, XlsToCsvArgs};
