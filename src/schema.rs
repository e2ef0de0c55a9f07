//! Scan results and DDL emission.

use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::{
    config::ScanConfig,
    diagnostics::Diagnostic,
    stats::Distribution,
    types::ColumnKind,
};

/// Per-column descriptor emitted by a scan.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnInfo {
    /// Header name; empty when the file carried none.
    pub name: String,
    /// Observations at this column position, nulls included.
    pub count: u64,
    #[serde(rename = "nullPct")]
    pub null_pct: f64,
    /// Byte-length distribution over the raw field values.
    pub length: Distribution,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<Distribution>,
    #[serde(rename = "type")]
    pub kind: ColumnKind,
    #[serde(rename = "sqlType")]
    pub sql_type: String,
}

impl ColumnInfo {
    /// Emitted name, falling back to `Column<i>` (1-based) for unnamed
    /// positions.
    pub fn display_name(&self, index: usize) -> String {
        if self.name.is_empty() {
            format!("Column{}", index + 1)
        } else {
            self.name.clone()
        }
    }
}

/// Everything one scan produced. Constructed once per file and returned to
/// the caller; no state survives between scans.
#[derive(Debug, Serialize)]
pub struct ScanResult {
    /// The input configuration, completed with the separator and header
    /// decision that the scan settled on.
    pub qualifiers: ScanConfig,
    #[serde(rename = "estimatedLines", skip_serializing_if = "Option::is_none")]
    pub estimated_lines: Option<u64>,
    #[serde(rename = "detectedSeparator")]
    pub detected_separator: char,
    #[serde(rename = "headerPresent")]
    pub header_present: bool,
    pub columns: Vec<ColumnInfo>,
    #[serde(rename = "errors")]
    pub diagnostics: Vec<Diagnostic>,
}

impl ScanResult {
    /// DDL-ready `name sqlType[, name sqlType]*` list. Under `strict`,
    /// columns without observed nulls gain ` NOT NULL`.
    pub fn column_list(&self) -> String {
        self.columns
            .iter()
            .enumerate()
            .map(|(index, column)| {
                let mut entry = format!("{} {}", column.display_name(index), column.sql_type);
                if self.qualifiers.strict && column.null_pct == 0.0 {
                    entry.push_str(" NOT NULL");
                }
                entry
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Names-only variant for load-statement target lists.
    pub fn column_names(&self) -> String {
        self.columns
            .iter()
            .enumerate()
            .map(|(index, column)| column.display_name(index))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Serializing scan result")
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file =
            File::create(path).with_context(|| format!("Creating result file {path:?}"))?;
        serde_json::to_writer_pretty(file, self).context("Writing scan result JSON")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HeaderMode, ScanConfig};

    fn column(name: &str, sql_type: &str, null_pct: f64) -> ColumnInfo {
        ColumnInfo {
            name: name.to_string(),
            count: 2,
            null_pct,
            length: Distribution::default(),
            min: None,
            max: None,
            scale: None,
            kind: ColumnKind::String,
            sql_type: sql_type.to_string(),
        }
    }

    fn result(strict: bool, columns: Vec<ColumnInfo>) -> ScanResult {
        let qualifiers = ScanConfig {
            strict,
            separator: Some(','),
            header: HeaderMode::Present,
            ..ScanConfig::default()
        };
        ScanResult {
            qualifiers,
            estimated_lines: Some(2),
            detected_separator: ',',
            header_present: true,
            columns,
            diagnostics: Vec::new(),
        }
    }

    #[test]
    fn column_list_joins_names_and_types() {
        let result = result(
            false,
            vec![
                column("name", "VARCHAR(8)", 0.0),
                column("age", "INT(3)", 0.0),
            ],
        );
        assert_eq!(result.column_list(), "name VARCHAR(8), age INT(3)");
    }

    #[test]
    fn unnamed_columns_are_numbered_from_one() {
        let result = result(
            false,
            vec![column("", "INT(2)", 0.0), column("", "INT(2)", 0.0)],
        );
        assert_eq!(result.column_list(), "Column1 INT(2), Column2 INT(2)");
        assert_eq!(result.column_names(), "Column1, Column2");
    }

    #[test]
    fn strict_marks_only_null_free_columns() {
        let result = result(
            true,
            vec![
                column("a", "INT(2)", 0.0),
                column("b", "VARCHAR(4)", 0.5),
            ],
        );
        assert_eq!(
            result.column_list(),
            "a INT(2) NOT NULL, b VARCHAR(4)"
        );
    }

    #[test]
    fn json_uses_wire_field_names() {
        let result = result(false, vec![column("a", "INT(2)", 0.0)]);
        let json = result.to_json().expect("serialize");
        assert!(json.contains("\"estimatedLines\""));
        assert!(json.contains("\"detectedSeparator\""));
        assert!(json.contains("\"sqlType\""));
        assert!(json.contains("\"errors\""));
        assert!(!json.contains("\"sql_type\""));
    }
}
