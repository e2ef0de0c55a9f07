pub mod cli;
pub mod config;
pub mod detect;
pub mod diagnostics;
pub mod io_utils;
pub mod sample;
pub mod scan;
pub mod schema;
pub mod stats;
pub mod table;
pub mod tokenize;
pub mod types;

use std::{env, fs, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use encoding_rs::Encoding;
use log::{LevelFilter, info};

use crate::cli::{Cli, ColumnsArgs, Commands, HeaderChoice, OutputFormat, ScanArgs, ScanOptions};
use crate::config::{HeaderMode, ScanConfig};
use crate::diagnostics::Diagnostic;

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("csv_scout", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Scan(args) => handle_scan(&args),
        Commands::Columns(args) => handle_columns(&args),
    }
}

fn handle_scan(args: &ScanArgs) -> Result<()> {
    let (config, seed, encoding) = resolve_config(&args.options)?;
    let result = scan::scan_file_seeded(&args.options.input, &config, encoding, seed)
        .with_context(|| format!("Scanning {:?}", args.options.input))?;

    match args.format {
        OutputFormat::Table => table::print_scan(&result),
        OutputFormat::Json => println!("{}", result.to_json()?),
    }
    if let Some(path) = &args.output {
        result
            .save(path)
            .with_context(|| format!("Writing scan result to {path:?}"))?;
        info!("Scan result written to {path:?}");
    }
    info!(
        "Inferred {} column(s) using separator '{}'",
        result.columns.len(),
        printable_delimiter(result.detected_separator)
    );
    Ok(())
}

fn handle_columns(args: &ColumnsArgs) -> Result<()> {
    let (config, seed, encoding) = resolve_config(&args.options)?;
    let result = scan::scan_file_seeded(&args.options.input, &config, encoding, seed)
        .with_context(|| format!("Scanning {:?}", args.options.input))?;
    if args.names_only {
        println!("{}", result.column_names());
    } else {
        println!("{}", result.column_list());
    }
    Ok(())
}

/// Layers the configuration: defaults, then the qualifier file, then
/// explicit command-line flags. Qualifier warnings travel with the scan so
/// they land in the result's diagnostics list.
fn resolve_config(
    options: &ScanOptions,
) -> Result<(ScanConfig, Vec<Diagnostic>, &'static Encoding)> {
    let (mut config, seed) = match &options.qualifiers {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Reading qualifier file {path:?}"))?;
            let value: serde_json::Value = serde_json::from_str(&raw)
                .with_context(|| format!("Parsing qualifier file {path:?}"))?;
            ScanConfig::from_qualifiers(&value)
        }
        None => (ScanConfig::default(), Vec::new()),
    };

    if let Some(delimiter) = options.delimiter {
        config.separator = Some(delimiter);
    }
    if let Some(header) = options.header {
        config.header = match header {
            HeaderChoice::Auto => HeaderMode::Auto,
            HeaderChoice::Present => HeaderMode::Present,
            HeaderChoice::Absent => HeaderMode::Absent,
        };
    }
    if let Some(read_lines) = options.read_lines {
        config.read_lines = read_lines;
    }
    if options.strict {
        config.strict = true;
    }
    if options.verbose {
        config.verbose = true;
    }

    let encoding = io_utils::resolve_encoding(options.input_encoding.as_deref())?;
    Ok((config, seed, encoding))
}

pub(crate) fn printable_delimiter(delimiter: char) -> String {
    match delimiter {
        '\t' => "\\t".to_string(),
        '\n' => "\\n".to_string(),
        other => other.to_string(),
    }
}
