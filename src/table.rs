//! Fixed-width terminal rendering of a scan summary.

use std::fmt::Write as _;

use crate::schema::{ColumnInfo, ScanResult};

const HEADERS: [&str; 7] = ["column", "type", "sql type", "count", "null %", "min", "max"];

pub fn render_scan(result: &ScanResult) -> String {
    let rows: Vec<Vec<String>> = result
        .columns
        .iter()
        .enumerate()
        .map(|(index, column)| summary_row(index, column))
        .collect();

    let mut widths: Vec<usize> = HEADERS.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (index, cell) in row.iter().enumerate() {
            widths[index] = widths[index].max(cell.chars().count());
        }
    }

    let mut output = String::new();
    let header_cells: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    let _ = writeln!(output, "{}", format_row(&header_cells, &widths));
    let separator = widths
        .iter()
        .map(|w| "-".repeat(w + 2))
        .collect::<Vec<_>>()
        .join("+");
    let _ = writeln!(output, "{separator}");
    for row in &rows {
        let _ = writeln!(output, "{}", format_row(row, &widths));
    }
    output
}

pub fn print_scan(result: &ScanResult) {
    print!("{}", render_scan(result));
}

fn summary_row(index: usize, column: &ColumnInfo) -> Vec<String> {
    vec![
        column.display_name(index),
        column.kind.to_string(),
        column.sql_type.clone(),
        column.count.to_string(),
        format!("{:.1}", column.null_pct * 100.0),
        column.min.map(format_number).unwrap_or_default(),
        column.max.map(format_number).unwrap_or_default(),
    ]
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.4}")
    }
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .enumerate()
        .map(|(index, cell)| format!(" {:<width$} ", cell, width = widths[index]))
        .collect::<Vec<_>>()
        .join("|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScanConfig;
    use crate::stats::Distribution;
    use crate::types::ColumnKind;

    fn sample_result() -> ScanResult {
        ScanResult {
            qualifiers: ScanConfig::default(),
            estimated_lines: Some(3),
            detected_separator: ',',
            header_present: true,
            columns: vec![
                ColumnInfo {
                    name: "id".to_string(),
                    count: 2,
                    null_pct: 0.0,
                    length: Distribution::default(),
                    min: Some(1.0),
                    max: Some(2.0),
                    scale: Some(Distribution::default()),
                    kind: ColumnKind::Integer,
                    sql_type: "BIGINT".to_string(),
                },
                ColumnInfo {
                    name: String::new(),
                    count: 2,
                    null_pct: 0.5,
                    length: Distribution::default(),
                    min: None,
                    max: None,
                    scale: None,
                    kind: ColumnKind::String,
                    sql_type: "VARCHAR(4)".to_string(),
                },
            ],
            diagnostics: Vec::new(),
        }
    }

    #[test]
    fn renders_aligned_rows_with_header_separator() {
        let rendered = render_scan(&sample_result());
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("sql type"));
        assert!(lines[1].contains("---"));
        assert!(lines[2].contains("BIGINT"));
        assert!(lines[3].contains("Column2"));
    }

    #[test]
    fn numbers_render_compactly() {
        assert_eq!(format_number(2.0), "2");
        assert_eq!(format_number(2.5), "2.5000");
    }
}
