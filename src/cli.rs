use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config;

#[derive(Debug, Parser)]
#[command(author, version, about = "Inspect delimited files and infer a SQL-ready schema", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a delimited file and report the inferred schema
    Scan(ScanArgs),
    /// Emit a DDL-ready column list for a delimited file
    Columns(ColumnsArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum HeaderChoice {
    Auto,
    Present,
    Absent,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
#[value(rename_all = "kebab-case")]
pub enum OutputFormat {
    Table,
    Json,
}

/// Options shared by every command that runs a scan.
#[derive(Debug, Args)]
pub struct ScanOptions {
    /// Input file to inspect ('-' reads standard input)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Separator character (supports ',', 'tab', ';', '|'); detected when omitted
    #[arg(long, value_parser = config::parse_separator)]
    pub delimiter: Option<char>,
    /// Whether the first line is a header (defaults to auto)
    #[arg(long, value_enum)]
    pub header: Option<HeaderChoice>,
    /// Number of lines to sample (0 means the whole file)
    #[arg(long = "read-lines")]
    pub read_lines: Option<usize>,
    /// Emit NOT NULL for columns without observed nulls
    #[arg(long)]
    pub strict: bool,
    /// Mirror scan diagnostics to the log output
    #[arg(long)]
    pub verbose: bool,
    /// Qualifier file with nested configuration (JSON)
    #[arg(long = "qualifiers")]
    pub qualifiers: Option<PathBuf>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct ScanArgs {
    #[command(flatten)]
    pub options: ScanOptions,
    /// Output format for the scan report
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
    /// Write the JSON scan result to this file
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ColumnsArgs {
    #[command(flatten)]
    pub options: ScanOptions,
    /// Emit column names only (for load-statement target lists)
    #[arg(long = "names-only")]
    pub names_only: bool,
}
