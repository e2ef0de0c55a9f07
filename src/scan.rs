//! Scan orchestration: the full inference pipeline for one file.
//!
//! A scan is a pure function of the path and configuration: sample lines,
//! settle the separator and the header question, tokenize, accumulate
//! per-column statistics, synthesize types, and emit the result. Recoverable
//! conditions become diagnostics; a missing or empty input aborts.

use std::path::Path;

use anyhow::{Result, bail};
use encoding_rs::Encoding;

use crate::{
    config::{HeaderMode, ScanConfig},
    detect,
    diagnostics::{Diagnostic, DiagnosticSink},
    io_utils, sample,
    schema::{ColumnInfo, ScanResult},
    stats::{self, ColumnAccumulator},
    tokenize, types,
};

/// Scans a delimited file and returns the inferred schema with statistics.
pub fn scan_file(path: &Path, config: &ScanConfig, encoding: &'static Encoding) -> Result<ScanResult> {
    scan_file_seeded(path, config, encoding, Vec::new())
}

/// Like [`scan_file`], but starts the diagnostics list with entries
/// produced before the scan, e.g. while parsing a qualifier object.
pub fn scan_file_seeded(
    path: &Path,
    config: &ScanConfig,
    encoding: &'static Encoding,
    seed: Vec<Diagnostic>,
) -> Result<ScanResult> {
    let mut sink = DiagnosticSink::seeded(config.verbose, seed);

    let (reader, file_size) = io_utils::open_input(path)?;
    let sample = sample::read_sample(reader, file_size, config.read_lines, encoding, &mut sink)?;

    let Some(header_candidate) = sample.header_candidate.clone() else {
        bail!("No nonempty lines found in {path:?}");
    };

    let separator = match config.separator {
        Some(separator) => separator,
        None => {
            let all_lines = std::iter::once(header_candidate.as_str())
                .chain(sample.lines.iter().map(|line| line.as_str()));
            detect::detect_separator(all_lines, &mut sink)
        }
    };

    let header_fields = tokenize::split_line(&header_candidate, separator, &mut sink);
    let header_present = match config.header {
        HeaderMode::Present => true,
        HeaderMode::Absent => false,
        HeaderMode::Auto => !looks_like_data(&header_fields),
    };

    let mut accumulators: Vec<ColumnAccumulator> = Vec::new();
    if header_present {
        for field in &header_fields {
            accumulators.push(ColumnAccumulator::named(unquote(field)));
        }
    } else {
        observe_line(&mut accumulators, &header_fields);
    }
    for line in &sample.lines {
        let fields = tokenize::split_line(line, separator, &mut sink);
        observe_line(&mut accumulators, &fields);
    }

    drop_trailing_null_column(&mut accumulators);

    let estimated_lines = sample.estimate_lines(&mut sink);
    let columns = accumulators.iter().map(build_column).collect();

    let qualifiers = ScanConfig {
        separator: Some(separator),
        header: if header_present {
            HeaderMode::Present
        } else {
            HeaderMode::Absent
        },
        ..config.clone()
    };

    Ok(ScanResult {
        qualifiers,
        estimated_lines,
        detected_separator: separator,
        header_present,
        columns,
        diagnostics: sink.into_entries(),
    })
}

/// Convenience wrapper emitting the DDL-ready column list.
pub fn infer_column_list(
    path: &Path,
    config: &ScanConfig,
    encoding: &'static Encoding,
) -> Result<String> {
    Ok(scan_file(path, config, encoding)?.column_list())
}

fn observe_line(accumulators: &mut Vec<ColumnAccumulator>, fields: &[String]) {
    for (index, field) in fields.iter().enumerate() {
        if accumulators.len() <= index {
            accumulators.push(ColumnAccumulator::default());
        }
        accumulators[index].observe(field);
    }
}

/// A first line with at least one numeric field is data, not a header.
fn looks_like_data(fields: &[String]) -> bool {
    fields
        .iter()
        .any(|field| stats::analyze_numeric_token(field).is_some())
}

/// Strips one surrounding quote layer from a header name and collapses
/// doubled quotes; data fields stay verbatim.
fn unquote(field: &str) -> String {
    if field.len() >= 2 && field.starts_with('"') && field.ends_with('"') {
        field[1..field.len() - 1].replace("\"\"", "\"")
    } else {
        field.to_string()
    }
}

/// A trailing delimiter manifests as a final unnamed, fully-null column.
fn drop_trailing_null_column(accumulators: &mut Vec<ColumnAccumulator>) {
    if let Some(last) = accumulators.last()
        && last.name.is_empty()
        && last.count > 0
        && last.null_count == last.count
    {
        accumulators.pop();
    }
}

fn build_column(accumulator: &ColumnAccumulator) -> ColumnInfo {
    let (kind, sql_type) = types::synthesize(accumulator);
    let numeric = accumulator.all_numeric() && accumulator.non_null() > 0;
    ColumnInfo {
        name: accumulator.name.clone(),
        count: accumulator.count,
        null_pct: accumulator.null_fraction(),
        length: accumulator.lengths.distribution(),
        min: if numeric { accumulator.min } else { None },
        max: if numeric { accumulator.max } else { None },
        scale: if numeric {
            Some(accumulator.scales.distribution())
        } else {
            None
        },
        kind,
        sql_type,
    }
}
