//! Tabular data model shared by every conversion.
//!
//! - [`Row`] - One row-record, column name to cell text, in header order
//! - [`Table`] - A named header plus its rows
//! - [`TableSet`] - Named tables, in insertion order
//!
//! Tables are built once per invocation and never mutated afterwards, so
//! the types only expose read access once constructed.

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{SchemaError, SchemaResult};

/// One row-record: column name to cell text, in header order.
pub type Row = IndexMap<String, String>;

// =============================================================================
// Table
// =============================================================================

/// An ordered sequence of rows sharing one header.
///
/// Serializes as the bare list of rows, which is the shape hosts expect
/// under their facts namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    name: String,
    headers: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Build a table whose rows are already keyed by `headers`.
    ///
    /// Callers inside the crate guarantee the row shape; use
    /// [`Table::from_records`] for rows of unknown provenance.
    pub(crate) fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows,
        }
    }

    /// Build a table from loose records, taking the header from the first
    /// record's key order.
    ///
    /// Every record must carry exactly the same key set as the first one.
    pub fn from_records(name: impl Into<String>, records: Vec<Row>) -> SchemaResult<Self> {
        let headers: Vec<String> = records
            .first()
            .map(|first| first.keys().cloned().collect())
            .unwrap_or_default();

        for (index, record) in records.iter().enumerate() {
            check_row(&headers, record, index + 1)?;
        }

        Ok(Self::new(name, headers, records))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }
}

impl Serialize for Table {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.rows.serialize(serializer)
    }
}

/// Check that `row` has exactly the columns in `headers`.
///
/// `index` is the 1-based row number used in the error.
pub(crate) fn check_row(headers: &[String], row: &Row, index: usize) -> SchemaResult<()> {
    if let Some(missing) = headers.iter().find(|h| !row.contains_key(h.as_str())) {
        return Err(SchemaError::InconsistentRow {
            row: index,
            column: missing.clone(),
        });
    }
    if let Some(extra) = row.keys().find(|k| !headers.contains(k)) {
        return Err(SchemaError::InconsistentRow {
            row: index,
            column: extra.clone(),
        });
    }
    Ok(())
}

// =============================================================================
// Table Set
// =============================================================================

/// Named tables produced by one invocation, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSet {
    tables: IndexMap<String, Table>,
}

impl TableSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table under its own name. Names are unique within a set.
    pub fn insert(&mut self, table: Table) -> SchemaResult<()> {
        if self.tables.contains_key(table.name()) {
            return Err(SchemaError::DuplicateTable(table.name().to_string()));
        }
        self.tables.insert(table.name().to_string(), table);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl Serialize for TableSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.tables.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_records_takes_first_key_order() {
        let table = Table::from_records(
            "t",
            vec![row(&[("b", "1"), ("a", "2")]), row(&[("a", "3"), ("b", "4")])],
        )
        .unwrap();

        assert_eq!(table.headers(), ["b", "a"]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_from_records_rejects_missing_column() {
        let err = Table::from_records(
            "t",
            vec![row(&[("a", "1"), ("b", "2")]), row(&[("a", "3")])],
        )
        .unwrap_err();

        match err {
            SchemaError::InconsistentRow { row, column } => {
                assert_eq!(row, 2);
                assert_eq!(column, "b");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_from_records_rejects_extra_column() {
        let err = Table::from_records("t", vec![row(&[("a", "1")]), row(&[("a", "3"), ("z", "")])])
            .unwrap_err();
        assert!(err.to_string().contains("\"z\""));
    }

    #[test]
    fn test_table_set_rejects_duplicate_name() {
        let mut set = TableSet::new();
        set.insert(Table::new("f5", vec![], vec![])).unwrap();
        let err = set.insert(Table::new("f5", vec![], vec![])).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateTable(name) if name == "f5"));
    }

    #[test]
    fn test_facts_layout() {
        let mut set = TableSet::new();
        set.insert(Table::new(
            "NAMEs",
            vec!["name".into()],
            vec![row(&[("name", "NEW_NODE1")])],
        ))
        .unwrap();

        assert_eq!(
            serde_json::to_value(&set).unwrap(),
            serde_json::json!({ "NAMEs": [{ "name": "NEW_NODE1" }] })
        );
    }
}
