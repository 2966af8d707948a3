//! CSV reader with encoding detection.
//!
//! Turns delimited text into a [`Table`]: the first record is the header and
//! every following record becomes a [`Row`] keyed by it, in file order.
//!
//! Row shape rules:
//! - Short rows are padded with empty strings, so every row carries every
//!   header column.
//! - Fields beyond the header are dropped.
//! - Blank lines are skipped.

use encoding_rs::Encoding;
use std::io::Read;
use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::models::{Row, Table};

/// Dialect and decoding settings for [`read_table`].
#[derive(Debug, Clone, Copy)]
pub struct ReaderOptions {
    pub delimiter: char,
    pub quote: char,
    /// Source encoding; detected from the bytes when `None`.
    pub encoding: Option<&'static Encoding>,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote: '"',
            encoding: None,
        }
    }
}

/// Detect the encoding of raw bytes using chardet.
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    let charset = chardet::detect(bytes).0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "" => encoding_rs::UTF_8,
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            encoding_rs::WINDOWS_1252
        }
        other => Encoding::for_label(other.as_bytes()).unwrap_or(encoding_rs::UTF_8),
    }
}

/// Decode bytes with `encoding`. A byte order mark, if any, wins over
/// `encoding` and is stripped.
pub fn decode_content(bytes: &[u8], encoding: &'static Encoding) -> CsvResult<String> {
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(CsvError::Encoding(used.name().to_string()));
    }
    Ok(text.into_owned())
}

/// Read a table named `name` from any byte source.
pub fn read_table<R: Read>(mut source: R, name: &str, options: &ReaderOptions) -> CsvResult<Table> {
    let mut bytes = Vec::new();
    source
        .read_to_end(&mut bytes)
        .map_err(|e| CsvError::Io {
            path: "<input>".to_string(),
            source: e,
        })?;
    read_table_bytes(&bytes, name, options)
}

/// Read a table from a file on disk.
pub fn read_table_file<P: AsRef<Path>>(
    path: P,
    name: &str,
    options: &ReaderOptions,
) -> CsvResult<Table> {
    let bytes = std::fs::read(path.as_ref()).map_err(|e| CsvError::Io {
        path: path.as_ref().display().to_string(),
        source: e,
    })?;
    read_table_bytes(&bytes, name, options)
}

/// Read a table from raw bytes, decoding them first.
pub fn read_table_bytes(bytes: &[u8], name: &str, options: &ReaderOptions) -> CsvResult<Table> {
    let encoding = options.encoding.unwrap_or_else(|| detect_encoding(bytes));
    let content = decode_content(bytes, encoding)?;
    parse_table(&content, name, options)
}

/// Parse already-decoded CSV text.
///
/// # Example
/// ```
/// use sheetfacts::{parse_table, ReaderOptions};
///
/// let table = parse_table("name,port\nweb,80\ndb", "nodes", &ReaderOptions::default()).unwrap();
///
/// assert_eq!(table.headers(), ["name", "port"]);
/// assert_eq!(table.rows()[0]["port"], "80");
/// assert_eq!(table.rows()[1]["port"], "");
/// ```
pub fn parse_table(content: &str, name: &str, options: &ReaderOptions) -> CsvResult<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(ascii_byte("delimiter", options.delimiter)?)
        .quote(ascii_byte("quote", options.quote)?)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(parse_error)?
        .iter()
        .map(String::from)
        .collect();

    if headers.is_empty() {
        return Err(CsvError::EmptyFile);
    }
    for (i, header) in headers.iter().enumerate() {
        if headers[..i].contains(header) {
            return Err(CsvError::DuplicateHeader(header.clone()));
        }
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(parse_error)?;

        let row: Row = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.clone(), record.get(i).unwrap_or("").to_string()))
            .collect();

        rows.push(row);
    }

    Ok(Table::new(name, headers, rows))
}

fn ascii_byte(role: &'static str, value: char) -> CsvResult<u8> {
    if value.is_ascii() {
        Ok(value as u8)
    } else {
        Err(CsvError::UnsupportedDialect { role, value })
    }
}

fn parse_error(err: csv::Error) -> CsvError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    CsvError::Parse {
        line,
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const F5_NODES: &str = "appliance,name,address,partition,port
10.255.138.87,NEW_NODE1,192.0.2.1,Common,80
10.255.138.87,NEW_NODE2,198.51.100.1,Common,80
10.255.138.87,NEW_NODE1,192.0.2.1,Common,443
";

    fn parse(content: &str) -> CsvResult<Table> {
        parse_table(content, "spreadsheet", &ReaderOptions::default())
    }

    #[test]
    fn test_rows_in_file_order() {
        let table = parse(F5_NODES).unwrap();

        assert_eq!(table.name(), "spreadsheet");
        assert_eq!(table.headers(), ["appliance", "name", "address", "partition", "port"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows()[0]["name"], "NEW_NODE1");
        assert_eq!(table.rows()[1]["address"], "198.51.100.1");
        assert_eq!(table.rows()[2]["port"], "443");

        let keys: Vec<&String> = table.rows()[2].keys().collect();
        assert_eq!(keys, table.headers().iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_quoted_values() {
        let table = parse("name,descr\n\"web\",\"front end, public\"\n").unwrap();
        assert_eq!(table.rows()[0]["descr"], "front end, public");
    }

    #[test]
    fn test_short_rows_padded() {
        let table = parse("a,b,c\n1,2\n1\n").unwrap();

        assert_eq!(table.rows()[0]["c"], "");
        assert_eq!(table.rows()[1]["b"], "");
        assert_eq!(table.rows()[1].len(), 3);
    }

    #[test]
    fn test_extra_fields_dropped() {
        let table = parse("a,b\n1,2,3,4\n").unwrap();
        assert_eq!(table.rows()[0].len(), 2);
        assert_eq!(table.rows()[0]["b"], "2");
    }

    #[test]
    fn test_blank_lines_skipped() {
        let table = parse("a,b\n1,2\n\n3,4\n\n").unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_header_only() {
        let table = parse("a,b\n").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.headers(), ["a", "b"]);
    }

    #[test]
    fn test_empty_input_error() {
        assert!(matches!(parse(""), Err(CsvError::EmptyFile)));
        assert!(matches!(parse("\n\n"), Err(CsvError::EmptyFile)));
    }

    #[test]
    fn test_duplicate_header_error() {
        let err = parse("a,b,a\n1,2,3\n").unwrap_err();
        assert!(matches!(err, CsvError::DuplicateHeader(h) if h == "a"));
    }

    #[test]
    fn test_custom_dialect() {
        let options = ReaderOptions {
            delimiter: ';',
            quote: '\'',
            encoding: None,
        };
        let table = parse_table("a;b\n'x;y';2\n", "t", &options).unwrap();
        assert_eq!(table.rows()[0]["a"], "x;y");
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        let options = ReaderOptions {
            delimiter: '¦',
            ..ReaderOptions::default()
        };
        let err = parse_table("a¦b\n", "t", &options).unwrap_err();
        assert!(matches!(err, CsvError::UnsupportedDialect { role: "delimiter", .. }));
    }

    #[test]
    fn test_latin1_decoding() {
        // "nom\nSociété" in ISO-8859-1
        let bytes: &[u8] = &[
            0x6E, 0x6F, 0x6D, 0x0A, 0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9, 0x0A,
        ];
        let options = ReaderOptions {
            encoding: Some(encoding_rs::WINDOWS_1252),
            ..ReaderOptions::default()
        };
        let table = read_table_bytes(bytes, "t", &options).unwrap();
        assert_eq!(table.rows()[0]["nom"], "Société");
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let options = ReaderOptions {
            encoding: Some(encoding_rs::UTF_8),
            ..ReaderOptions::default()
        };
        let err = read_table_bytes(&[0x61, 0x0A, 0xFF, 0xFE, 0x0A], "t", &options).unwrap_err();
        assert!(matches!(err, CsvError::Encoding(_)));
    }

    #[test]
    fn test_bom_stripped() {
        let table = read_table_bytes(b"\xEF\xBB\xBFa,b\n1,2\n", "t", &ReaderOptions::default())
            .unwrap();
        assert_eq!(table.headers(), ["a", "b"]);
    }

    #[test]
    fn test_read_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(F5_NODES.as_bytes()).unwrap();

        let table = read_table_file(file.path(), "f5", &ReaderOptions::default()).unwrap();
        assert_eq!(table.name(), "f5");
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.csv");

        let err = read_table_file(&path, "t", &ReaderOptions::default()).unwrap_err();
        assert!(matches!(err, CsvError::Io { .. }));
        assert!(err.to_string().contains("nope.csv"));
    }

    #[test]
    fn test_read_from_reader() {
        let table = read_table(F5_NODES.as_bytes(), "t", &ReaderOptions::default()).unwrap();
        assert_eq!(table.len(), 3);
    }
}
