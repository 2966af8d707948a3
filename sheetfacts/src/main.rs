//! sheetfacts CLI - CSV and workbook conversions
//!
//! # Commands
//!
//! ```bash
//! sheetfacts csv-to-facts nodes.csv --table f5 --vsheet NAMEs=name
//! sheetfacts xls-to-csv aci.xlsx /tmp --sheet Tenant-EPG --warn
//! sheetfacts sheets aci.xlsx          # List sheet names
//! sheetfacts to-csv rows.json         # JSON array of objects to CSV text
//! sheetfacts run csv_to_facts --args /tmp/args.json   # Host mode
//! ```

use clap::{Parser, Subcommand};
use sheetfacts::api::logs::{log_info, log_success, LOG_SINK};
use sheetfacts::{
    csv_to_facts, open_workbook, run_module, to_csv, xls_to_csv, CsvToFactsArgs, HostModule, Row,
    VirtualSheet, XlsToCsvArgs,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "sheetfacts")]
#[command(about = "Read CSV files and workbooks into facts, write sheets as CSV", long_about = None)]
struct Cli {
    /// Do not print progress on stderr
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a CSV file and print its rows (and virtual sheets) as JSON
    CsvToFacts {
        /// Input CSV file
        src: PathBuf,

        /// Name of the primary table
        #[arg(short, long, default_value = sheetfacts::config::DEFAULT_TABLE)]
        table: String,

        /// Virtual sheet as NAME=col1,col2 (repeatable)
        #[arg(short, long = "vsheet")]
        vsheets: Vec<VirtualSheet>,

        /// CSV delimiter
        #[arg(short, long, default_value = ",")]
        delimiter: char,

        /// Source encoding (auto-detect if not specified)
        #[arg(short, long)]
        encoding: Option<String>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write selected workbook sheets as CSV files
    XlsToCsv {
        /// Input workbook
        src: PathBuf,

        /// Destination directory
        dest: PathBuf,

        /// Sheet to extract (repeatable)
        #[arg(short, long = "sheet")]
        sheets: Vec<String>,

        /// Warn about sheets found but not extracted
        #[arg(short, long)]
        warn: bool,

        /// Output encoding (default: $SHEETFACTS_OUTPUT_ENCODING or utf-8)
        #[arg(short, long)]
        encoding: Option<String>,
    },

    /// List the sheets of a workbook
    Sheets {
        /// Input workbook
        src: PathBuf,
    },

    /// Format a JSON array of objects as CSV text
    ToCsv {
        /// Input JSON file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run a module the way an automation host does
    Run {
        /// csv_to_facts or xls_to_csv
        module: HostModule,

        /// JSON arguments file
        #[arg(short, long)]
        args: PathBuf,
    },
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    if cli.quiet {
        LOG_SINK.set_quiet(true);
    }

    let result = match cli.command {
        Commands::CsvToFacts {
            src,
            table,
            vsheets,
            delimiter,
            encoding,
            output,
        } => {
            let args = CsvToFactsArgs {
                table,
                vsheets,
                delimiter,
                encoding,
                ..CsvToFactsArgs::new(src)
            };
            cmd_csv_to_facts(&args, output.as_deref())
        }

        Commands::XlsToCsv {
            src,
            dest,
            sheets,
            warn,
            encoding,
        } => {
            let args = XlsToCsvArgs {
                sheets,
                warn,
                encoding,
                ..XlsToCsvArgs::new(src, dest)
            };
            cmd_xls_to_csv(&args)
        }

        Commands::Sheets { src } => cmd_sheets(&src),

        Commands::ToCsv { input, output } => cmd_to_csv(&input, output.as_deref()),

        Commands::Run { module, args } => cmd_run(module, &args),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_csv_to_facts(
    args: &CsvToFactsArgs,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let tables = csv_to_facts(args)?;
    log_success(format!("Built {} tables", tables.len()));

    let json = serde_json::to_string_pretty(&tables)?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_xls_to_csv(args: &XlsToCsvArgs) -> Result<(), Box<dyn std::error::Error>> {
    let outcome = xls_to_csv(args)?;

    if !outcome.changed {
        log_info("No sheets written");
    }
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    Ok(())
}

fn cmd_sheets(src: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let workbook = open_workbook(src)?;

    for name in workbook.sheet_names() {
        println!("{}", name);
    }

    Ok(())
}

fn cmd_to_csv(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let content = fs::read_to_string(input)?;
    let rows: Vec<Row> = serde_json::from_str(&content)?;

    let csv = to_csv(&rows)?;
    match output {
        Some(p) => {
            fs::write(p, &csv)?;
            log_success(format!("Output written to: {}", p.display()));
        }
        None => print!("{}", csv),
    }

    Ok(())
}

fn cmd_run(module: HostModule, args: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let response = run_module(module, args);
    println!("{}", serde_json::to_string(&response)?);

    if response.failed {
        std::process::exit(response.exit_code());
    }

    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            log_success(format!("Output written to: {}", p.display()));
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
