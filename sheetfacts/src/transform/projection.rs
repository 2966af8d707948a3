//! Virtual sheets: de-duplicated projections of a table.
//!
//! ```text
//! spreadsheet (f5)                          NAMEs
//! ┌───────────┬──────────────┬──────┐       ┌───────────┐
//! │ name      │ address      │ port │       │ name      │
//! ├───────────┼──────────────┼──────┤  →    ├───────────┤
//! │ NEW_NODE1 │ 192.0.2.1    │ 80   │       │ NEW_NODE1 │
//! │ NEW_NODE2 │ 198.51.100.1 │ 80   │       │ NEW_NODE2 │
//! │ NEW_NODE1 │ 192.0.2.1    │ 443  │       └───────────┘
//! └───────────┴──────────────┴──────┘
//! ```
//!
//! Projected rows keep the order in which each distinct combination first
//! appears in the source table.

use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;
use std::str::FromStr;

use crate::error::{SchemaError, SchemaResult};
use crate::models::{Row, Table, TableSet};

/// A request for one virtual sheet: its name and the columns it selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualSheet {
    pub name: String,
    pub columns: Vec<String>,
}

impl VirtualSheet {
    pub fn new<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Check the request on its own: a name, at least one column, no
    /// column twice.
    pub fn validate(&self) -> SchemaResult<()> {
        if self.name.is_empty() {
            return Err(SchemaError::InvalidProjection(
                "virtual sheet name must not be empty".to_string(),
            ));
        }
        if self.columns.is_empty() {
            return Err(SchemaError::InvalidProjection(format!(
                "virtual sheet \"{}\" selects no columns",
                self.name
            )));
        }
        for (i, column) in self.columns.iter().enumerate() {
            if self.columns[..i].contains(column) {
                return Err(SchemaError::InvalidProjection(format!(
                    "virtual sheet \"{}\" selects column \"{}\" twice",
                    self.name, column
                )));
            }
        }
        Ok(())
    }
}

/// The host shape: a mapping with exactly one key, the sheet name.
impl TryFrom<IndexMap<String, Vec<String>>> for VirtualSheet {
    type Error = SchemaError;

    fn try_from(entry: IndexMap<String, Vec<String>>) -> SchemaResult<Self> {
        if entry.len() != 1 {
            return Err(SchemaError::InvalidProjection(
                "only one virtual sheet name per item".to_string(),
            ));
        }
        let (name, columns) = entry
            .into_iter()
            .next()
            .ok_or_else(|| SchemaError::InvalidProjection("empty virtual sheet item".to_string()))?;
        Ok(Self { name, columns })
    }
}

impl<'de> Deserialize<'de> for VirtualSheet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entry = IndexMap::<String, Vec<String>>::deserialize(deserializer)?;
        VirtualSheet::try_from(entry).map_err(serde::de::Error::custom)
    }
}

/// Command line shape: `NAME=col1,col2`.
impl FromStr for VirtualSheet {
    type Err = SchemaError;

    fn from_str(s: &str) -> SchemaResult<Self> {
        let (name, columns) = s.split_once('=').ok_or_else(|| {
            SchemaError::InvalidProjection(format!("expected NAME=col1,col2, got \"{}\"", s))
        })?;
        Ok(Self::new(
            name.trim(),
            columns.split(',').map(str::trim).filter(|c| !c.is_empty()),
        ))
    }
}

/// Project `table` onto the columns of `request`, keeping distinct rows.
pub fn project(table: &Table, request: &VirtualSheet) -> SchemaResult<Table> {
    request.validate()?;

    if let Some(column) = request.columns.iter().find(|c| !table.has_column(c)) {
        return Err(SchemaError::ColumnNotFound {
            column: column.clone(),
            table: request.name.clone(),
        });
    }

    let mut distinct: IndexSet<Vec<&str>> = IndexSet::new();
    for row in table.rows() {
        let values = request
            .columns
            .iter()
            .map(|column| {
                row.get(column)
                    .map(String::as_str)
                    .ok_or_else(|| SchemaError::ColumnNotFound {
                        column: column.clone(),
                        table: request.name.clone(),
                    })
            })
            .collect::<SchemaResult<Vec<&str>>>()?;

        distinct.insert(values);
    }

    let rows: Vec<Row> = distinct
        .into_iter()
        .map(|values| {
            request
                .columns
                .iter()
                .cloned()
                .zip(values.into_iter().map(String::from))
                .collect()
        })
        .collect();

    Ok(Table::new(request.name.clone(), request.columns.clone(), rows))
}

/// Check a whole list of requests against the primary table name before
/// any projection runs.
pub fn validate_requests(primary: &str, requests: &[VirtualSheet]) -> SchemaResult<()> {
    for (i, request) in requests.iter().enumerate() {
        request.validate()?;

        if request.name == primary || requests[..i].iter().any(|r| r.name == request.name) {
            return Err(SchemaError::DuplicateTable(request.name.clone()));
        }
    }
    Ok(())
}

/// The primary table followed by one projection per request.
pub fn build_table_set(primary: Table, requests: &[VirtualSheet]) -> SchemaResult<TableSet> {
    validate_requests(primary.name(), requests)?;

    let projections = requests
        .iter()
        .map(|request| project(&primary, request))
        .collect::<SchemaResult<Vec<Table>>>()?;

    let mut set = TableSet::new();
    set.insert(primary)?;
    for projection in projections {
        set.insert(projection)?;
    }
    Ok(set)
}
