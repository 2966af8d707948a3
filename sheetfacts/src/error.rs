//! Error types for the sheetfacts conversions.
//!
//! Each stage has its own error enum:
//!
//! - [`CsvError`] - Reading and decoding delimited text
//! - [`SchemaError`] - Column lookups, projection requests, row shape
//! - [`WorkbookError`] - Opening and reading workbooks
//! - [`WriteError`] - Writing CSV files
//! - [`ConfigError`] - Invocation arguments
//! - [`ConversionError`] - Top-level, wraps all of the above
//!
//! Conversion is automatic via `From`, so `?` works across stage
//! boundaries. [`ConversionError::kind`] collapses everything into the
//! coarse [`ErrorKind`] reported to the automation host.

use thiserror::Error;

// =============================================================================
// CSV Reading Errors
// =============================================================================

/// Errors while reading a CSV source.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Source could not be opened or read.
    #[error("IOError on input file:{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Bytes are not valid in the source encoding.
    #[error("Input is not valid {0} text")]
    Encoding(String),

    /// The CSV reader rejected a record.
    #[error("Invalid CSV format at line {line}: {message}")]
    Parse { line: u64, message: String },

    /// No header row.
    #[error("CSV file is empty, a header row is required")]
    EmptyFile,

    /// The same column name appears twice in the header.
    #[error("Duplicate column \"{0}\" in CSV header")]
    DuplicateHeader(String),

    /// Delimiter or quote is not a single ASCII character.
    #[error("Unsupported {role} character {value:?}, must be ASCII")]
    UnsupportedDialect { role: &'static str, value: char },
}

// =============================================================================
// Schema Errors
// =============================================================================

/// Errors about columns and table shape.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A projection asked for a column the table does not have.
    #[error("column requested, \"{column}\", does not exist (virtual sheet \"{table}\")")]
    ColumnNotFound { column: String, table: String },

    /// A projection request is malformed.
    #[error("{0}")]
    InvalidProjection(String),

    /// A row's key set differs from the header.
    #[error("row {row} does not match the header at column \"{column}\"")]
    InconsistentRow { row: usize, column: String },

    /// Two tables ended up with the same name.
    #[error("table \"{0}\" is defined more than once")]
    DuplicateTable(String),
}

// =============================================================================
// Workbook Errors
// =============================================================================

/// Errors while reading a workbook.
#[derive(Debug, Error)]
pub enum WorkbookError {
    /// The workbook could not be opened.
    #[error("IOError on input file:{path}: {message}")]
    Open { path: String, message: String },

    /// A sheet listed by the workbook could not be read.
    #[error("Failed to read sheet \"{sheet}\": {message}")]
    Sheet { sheet: String, message: String },

    /// Two requested sheets sanitize to the same table name.
    #[error("sheets \"{first}\" and \"{second}\" both map to table \"{table}\"")]
    NameCollision {
        first: String,
        second: String,
        table: String,
    },

    /// Built without a workbook backend.
    #[error("Workbook support is not available, rebuild sheetfacts with the `workbook` feature")]
    Unavailable,
}

// =============================================================================
// Write Errors
// =============================================================================

/// Errors while writing CSV files.
#[derive(Debug, Error)]
pub enum WriteError {
    /// No destination directory configured.
    #[error("No output directory specified, nothing to write")]
    NoDestination,

    /// Destination file could not be created or written.
    #[error("IOError on output file:{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A cell cannot be represented in the output encoding.
    #[error("{table} UnicodeEncodeError: row {row} cannot be encoded as {encoding}")]
    Encoding {
        table: String,
        row: usize,
        encoding: String,
    },

    /// The CSV writer failed.
    #[error("CSV writer error: {0}")]
    Csv(#[from] csv::Error),

    /// Row shape error found while writing.
    #[error("{table}: {source}")]
    Schema {
        table: String,
        #[source]
        source: SchemaError,
    },
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors in invocation arguments.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Args file could not be read.
    #[error("Cannot read arguments file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Args file is not valid JSON for this module.
    #[error("Invalid arguments: {0}")]
    Json(#[from] serde_json::Error),

    /// Unknown character set label.
    #[error("Unknown encoding: {0}")]
    UnknownEncoding(String),
}

// =============================================================================
// Conversion Errors (top-level)
// =============================================================================

/// Coarse error classes reported to the automation host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Schema,
    Encoding,
    Dependency,
    Config,
}

/// Top-level error returned by the conversion entry points.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error(transparent)]
    Csv(#[from] CsvError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Workbook(#[from] WorkbookError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ConversionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConversionError::Csv(CsvError::Encoding(_)) => ErrorKind::Encoding,
            ConversionError::Csv(CsvError::UnsupportedDialect { .. }) => ErrorKind::Config,
            ConversionError::Csv(CsvError::Io { .. }) => ErrorKind::Io,
            ConversionError::Csv(_) => ErrorKind::Schema,
            ConversionError::Schema(_) => ErrorKind::Schema,
            ConversionError::Workbook(WorkbookError::Unavailable) => ErrorKind::Dependency,
            ConversionError::Workbook(WorkbookError::NameCollision { .. }) => ErrorKind::Schema,
            ConversionError::Workbook(_) => ErrorKind::Io,
            ConversionError::Write(WriteError::Encoding { .. }) => ErrorKind::Encoding,
            ConversionError::Write(WriteError::Schema { .. }) => ErrorKind::Schema,
            ConversionError::Write(WriteError::NoDestination) => ErrorKind::Config,
            ConversionError::Write(_) => ErrorKind::Io,
            ConversionError::Config(_) => ErrorKind::Config,
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

pub type CsvResult<T> = Result<T, CsvError>;

pub type SchemaResult<T> = Result<T, SchemaError>;

pub type WorkbookResult<T> = Result<T, WorkbookError>;

pub type WriteResult<T> = Result<T, WriteError>;

pub type ConfigResult<T> = Result<T, ConfigError>;

pub type ConversionResult<T> = Result<T, ConversionError>;
