//! Host-mode module runner.
//!
//! An automation host runs `sheetfacts run <module> --args <file>`, reads the
//! JSON response from stdout and uses the exit status as the failure signal.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use super::logs::{log_error, log_success};
use super::types::{error_response, ModuleResponse};
use crate::config::{CsvToFactsArgs, XlsToCsvArgs};
use crate::error::ConversionResult;
use crate::transform::pipeline::{csv_to_facts, xls_to_csv};

/// Modules a host can invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostModule {
    CsvToFacts,
    XlsToCsv,
}

impl HostModule {
    pub fn name(&self) -> &'static str {
        match self {
            HostModule::CsvToFacts => "csv_to_facts",
            HostModule::XlsToCsv => "xls_to_csv",
        }
    }
}

impl fmt::Display for HostModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HostModule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('-', "_").as_str() {
            "csv_to_facts" => Ok(HostModule::CsvToFacts),
            "xls_to_csv" => Ok(HostModule::XlsToCsv),
            other => Err(format!(
                "unknown module \"{}\", expected csv_to_facts or xls_to_csv",
                other
            )),
        }
    }
}

/// Run `module` with the arguments in `args_file`. Never fails: errors are
/// folded into a failed response.
pub fn run_module(module: HostModule, args_file: &Path) -> ModuleResponse {
    match dispatch(module, args_file) {
        Ok(response) => {
            log_success(format!("{} finished", module));
            response
        }
        Err(e) => {
            log_error(format!("{} failed: {}", module, e));
            error_response(&e)
        }
    }
}

fn dispatch(module: HostModule, args_file: &Path) -> ConversionResult<ModuleResponse> {
    match module {
        HostModule::CsvToFacts => {
            let args = CsvToFactsArgs::from_args_file(args_file)?;
            Ok(csv_to_facts(&args)?.into())
        }
        HostModule::XlsToCsv => {
            let args = XlsToCsvArgs::from_args_file(args_file)?;
            Ok(xls_to_csv(&args)?.into())
        }
    }
}
