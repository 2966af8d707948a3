//! Invocation arguments for each module.
//!
//! Hosts hand arguments over as a JSON file (`--args`); the command line
//! builds the same structs from flags. Unknown keys, such as the host's own
//! bookkeeping entries, are ignored.
//!
//! Environment (a `.env` file is loaded at startup):
//! - `SHEETFACTS_OUTPUT_ENCODING` - Default character set for written files
//! - `SHEETFACTS_QUIET` - Silence progress logging

use encoding_rs::Encoding;
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult, WriteError, WriteResult};
use crate::parser::ReaderOptions;
use crate::transform::projection::VirtualSheet;

/// Table name used when `table` is not given.
pub const DEFAULT_TABLE: &str = "spreadsheet";

/// Environment variable holding the default output encoding.
pub const OUTPUT_ENCODING_ENV: &str = "SHEETFACTS_OUTPUT_ENCODING";

/// Arguments of `csv_to_facts`.
#[derive(Debug, Clone, Deserialize)]
pub struct CsvToFactsArgs {
    /// CSV file to read.
    pub src: PathBuf,

    /// Name of the primary table.
    #[serde(default = "default_table")]
    pub table: String,

    /// Virtual sheets to derive from the primary table.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub vsheets: Vec<VirtualSheet>,

    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    #[serde(default = "default_quote")]
    pub quote: char,

    /// Source encoding label; detected when absent.
    #[serde(default)]
    pub encoding: Option<String>,
}

impl CsvToFactsArgs {
    pub fn new(src: impl Into<PathBuf>) -> Self {
        Self {
            src: src.into(),
            table: default_table(),
            vsheets: Vec::new(),
            delimiter: default_delimiter(),
            quote: default_quote(),
            encoding: None,
        }
    }

    pub fn from_args_file(path: &Path) -> ConfigResult<Self> {
        read_args_file(path)
    }

    pub fn reader_options(&self) -> ConfigResult<ReaderOptions> {
        Ok(ReaderOptions {
            delimiter: self.delimiter,
            quote: self.quote,
            encoding: self.encoding.as_deref().map(encoding_for_label).transpose()?,
        })
    }
}

/// Arguments of `xls_to_csv`.
#[derive(Debug, Clone, Deserialize)]
pub struct XlsToCsvArgs {
    /// Workbook to read.
    pub src: PathBuf,

    /// Directory receiving one CSV file per extracted sheet.
    #[serde(default)]
    pub dest: Option<PathBuf>,

    /// Sheets to extract. A single string is accepted as a one-item list.
    #[serde(default, deserialize_with = "one_or_many")]
    pub sheets: Vec<String>,

    /// Warn about sheets that were found but not extracted.
    #[serde(default)]
    pub warn: bool,

    /// Output encoding label.
    #[serde(default)]
    pub encoding: Option<String>,
}

impl XlsToCsvArgs {
    pub fn new(src: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Self {
        Self {
            src: src.into(),
            dest: Some(dest.into()),
            sheets: Vec::new(),
            warn: false,
            encoding: None,
        }
    }

    pub fn from_args_file(path: &Path) -> ConfigResult<Self> {
        read_args_file(path)
    }

    /// The destination directory, which must be set and non-empty.
    pub fn destination(&self) -> WriteResult<&Path> {
        match self.dest.as_deref() {
            Some(dest) if !dest.as_os_str().is_empty() => Ok(dest),
            _ => Err(WriteError::NoDestination),
        }
    }

    /// Output encoding from the arguments, then the environment, then UTF-8.
    pub fn output_encoding(&self) -> ConfigResult<&'static Encoding> {
        match self.encoding.as_deref() {
            Some(label) => encoding_for_label(label),
            None => match std::env::var(OUTPUT_ENCODING_ENV) {
                Ok(label) if !label.trim().is_empty() => encoding_for_label(&label),
                _ => Ok(encoding_rs::UTF_8),
            },
        }
    }
}

/// Resolve a character set label such as `utf-8`, `latin1` or `cp1252`.
pub fn encoding_for_label(label: &str) -> ConfigResult<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| ConfigError::UnknownEncoding(label.to_string()))
}

fn read_args_file<T: for<'de> Deserialize<'de>>(path: &Path) -> ConfigResult<T> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(serde_json::from_str(&content)?)
}

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}

fn default_delimiter() -> char {
    ','
}

fn default_quote() -> char {
    '"'
}

/// `null` is the same as an empty list.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(sheet)) => vec![sheet],
        Some(OneOrMany::Many(sheets)) => sheets,
        None => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_csv_args_defaults() {
        let args: CsvToFactsArgs = serde_json::from_value(json!({ "src": "nodes.csv" })).unwrap();

        assert_eq!(args.src, PathBuf::from("nodes.csv"));
        assert_eq!(args.table, "spreadsheet");
        assert!(args.vsheets.is_empty());
        assert_eq!(args.delimiter, ',');
        assert_eq!(args.quote, '"');
    }

    #[test]
    fn test_csv_args_full() {
        let args: CsvToFactsArgs = serde_json::from_value(json!({
            "src": "nodes.csv",
            "table": "f5",
            "vsheets": [{ "NAMEs": ["name"] }, { "LISTENERs": ["address", "port"] }],
            "_ansible_check_mode": false
        }))
        .unwrap();

        assert_eq!(args.table, "f5");
        assert_eq!(args.vsheets.len(), 2);
        assert_eq!(args.vsheets[1], VirtualSheet::new("LISTENERs", ["address", "port"]));
    }

    #[test]
    fn test_null_vsheets() {
        let args: CsvToFactsArgs =
            serde_json::from_value(json!({ "src": "a.csv", "vsheets": null })).unwrap();
        assert!(args.vsheets.is_empty());
    }

    #[test]
    fn test_bad_vsheet_shape() {
        let err = serde_json::from_value::<CsvToFactsArgs>(json!({
            "src": "a.csv",
            "vsheets": [{ "A": ["x"], "B": ["y"] }]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("only one virtual sheet name per item"));
    }

    #[test]
    fn test_missing_src() {
        assert!(serde_json::from_value::<CsvToFactsArgs>(json!({ "table": "x" })).is_err());
    }

    #[test]
    fn test_sheets_one_or_many() {
        let args: XlsToCsvArgs =
            serde_json::from_value(json!({ "src": "a.xlsx", "dest": "/tmp", "sheets": "Tenant-EPG" }))
                .unwrap();
        assert_eq!(args.sheets, ["Tenant-EPG"]);

        let args: XlsToCsvArgs = serde_json::from_value(json!({
            "src": "a.xlsx",
            "dest": "/tmp",
            "sheets": ["Tenant-EPG", "DHCP Relay"],
            "warn": true
        }))
        .unwrap();
        assert_eq!(args.sheets, ["Tenant-EPG", "DHCP Relay"]);
        assert!(args.warn);

        let args: XlsToCsvArgs = serde_json::from_value(json!({ "src": "a.xlsx" })).unwrap();
        assert!(args.sheets.is_empty());
        assert!(!args.warn);
    }

    #[test]
    fn test_destination_required() {
        let mut args = XlsToCsvArgs::new("a.xlsx", "");
        assert!(matches!(args.destination(), Err(WriteError::NoDestination)));

        args.dest = None;
        assert!(args.destination().is_err());

        args.dest = Some(PathBuf::from("/tmp"));
        assert_eq!(args.destination().unwrap(), Path::new("/tmp"));
    }

    #[test]
    fn test_encoding_labels() {
        assert_eq!(encoding_for_label("latin1").unwrap(), encoding_rs::WINDOWS_1252);
        assert_eq!(encoding_for_label(" UTF-8 ").unwrap(), encoding_rs::UTF_8);
        assert!(matches!(
            encoding_for_label("klingon"),
            Err(ConfigError::UnknownEncoding(_))
        ));

        let mut args = XlsToCsvArgs::new("a.xlsx", "/tmp");
        args.encoding = Some("cp1252".into());
        assert_eq!(args.output_encoding().unwrap(), encoding_rs::WINDOWS_1252);
    }

    #[test]
    fn test_reader_options() {
        let mut args = CsvToFactsArgs::new("a.csv");
        assert!(args.reader_options().unwrap().encoding.is_none());

        args.encoding = Some("iso-8859-1".into());
        args.delimiter = ';';
        let options = args.reader_options().unwrap();
        assert_eq!(options.delimiter, ';');
        assert_eq!(options.encoding, Some(encoding_rs::WINDOWS_1252));
    }

    #[test]
    fn test_args_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("args");
        std::fs::write(&path, r#"{"src": "wb.xlsx", "dest": "/tmp/out", "sheets": []}"#).unwrap();

        let args = XlsToCsvArgs::from_args_file(&path).unwrap();
        assert_eq!(args.dest, Some(PathBuf::from("/tmp/out")));

        let missing = XlsToCsvArgs::from_args_file(&dir.path().join("none"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }
}
