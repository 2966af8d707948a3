//! Response returned to the automation host.
//!
//! Success carries the result under `ansible_facts`, failure carries a single
//! message:
//!
//! ```text
//! { "changed": false, "ansible_facts": { "f5": [ ... ], "NAMEs": [ ... ] } }
//! { "changed": true,  "ansible_facts": { "sheet_filenames": [ ... ] }, "warnings": [ ... ] }
//! { "changed": false, "failed": true, "msg": "IOError on input file:..." }
//! ```

use serde::Serialize;

use crate::error::ConversionError;
use crate::models::TableSet;
use crate::transform::pipeline::XlsToCsvOutcome;

/// Namespace holding results in the response.
pub const FACTS: &str = "ansible_facts";

/// What a module run reports back to its host.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ModuleResponse {
    pub changed: bool,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub failed: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,

    #[serde(rename = "ansible_facts", skip_serializing_if = "Option::is_none")]
    pub facts: Option<Facts>,
}

/// Results stored under [`FACTS`].
///
/// Table facts serialize through [`TableSet`] itself, so `run` and the
/// `csv-to-facts` command print the same layout.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Facts {
    /// `csv_to_facts`: table name to rows.
    Tables(TableSet),
    /// `xls_to_csv`: names of the written files.
    Files { sheet_filenames: Vec<String> },
}

impl ModuleResponse {
    /// Exit status for the host: 0 on success, 1 on failure.
    pub fn exit_code(&self) -> i32 {
        if self.failed {
            1
        } else {
            0
        }
    }
}

impl From<TableSet> for ModuleResponse {
    fn from(tables: TableSet) -> Self {
        Self {
            facts: Some(Facts::Tables(tables)),
            ..Self::default()
        }
    }
}

impl From<XlsToCsvOutcome> for ModuleResponse {
    fn from(outcome: XlsToCsvOutcome) -> Self {
        Self {
            changed: outcome.changed,
            warnings: outcome.warnings,
            facts: Some(Facts::Files {
                sheet_filenames: outcome.sheet_filenames,
            }),
            ..Self::default()
        }
    }
}

/// Create an error response
pub fn error_response(error: &ConversionError) -> ModuleResponse {
    ModuleResponse {
        failed: true,
        msg: Some(error.to_string()),
        ..ModuleResponse::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CsvError;
    use crate::models::Table;
    use serde_json::json;

    #[test]
    fn test_xls_outcome_layout() {
        let response = ModuleResponse::from(XlsToCsvOutcome {
            sheet_filenames: vec!["TenantEPG.csv".into()],
            warnings: vec!["sheet \"Notes\" found in source file, skipping".into()],
            changed: true,
        });

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "changed": true,
                "warnings": ["sheet \"Notes\" found in source file, skipping"],
                "ansible_facts": { "sheet_filenames": ["TenantEPG.csv"] }
            })
        );
        assert_eq!(response.exit_code(), 0);
    }

    #[test]
    fn test_table_facts_match_table_set_layout() {
        let mut tables = TableSet::new();
        tables
            .insert(Table::new(
                "NAMEs",
                vec!["name".into()],
                vec![[("name".to_string(), "NEW_NODE1".to_string())].into_iter().collect()],
            ))
            .unwrap();
        let standalone = serde_json::to_value(&tables).unwrap();

        let response = serde_json::to_value(ModuleResponse::from(tables)).unwrap();

        assert_eq!(response[FACTS], standalone);
        assert_eq!(response[FACTS], json!({ "NAMEs": [{ "name": "NEW_NODE1" }] }));
        assert_eq!(response["changed"], false);
    }

    #[test]
    fn test_error_layout() {
        let response = error_response(&CsvError::EmptyFile.into());

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["failed"], true);
        assert_eq!(value["changed"], false);
        assert!(value["msg"].as_str().unwrap().contains("empty"));
        assert!(value.get(FACTS).is_none());
        assert_eq!(response.exit_code(), 1);
    }
}
