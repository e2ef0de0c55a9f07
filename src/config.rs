use serde::Serialize;
use serde_json::Value;

use crate::diagnostics::{Diagnostic, Level};

/// Default number of data lines sampled per scan.
pub const DEFAULT_SAMPLE_LINES: usize = 200;

/// The quote character is fixed for the CSV family handled here.
pub const QUOTE: char = '"';

/// How the first nonempty line of the input is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderMode {
    Present,
    Absent,
    Auto,
}

/// Inputs to one scan. A completed copy (separator and header resolved) is
/// echoed back on the scan result as `qualifiers`.
#[derive(Debug, Clone, Serialize)]
pub struct ScanConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub separator: Option<char>,
    pub header: HeaderMode,
    pub quote: char,
    #[serde(rename = "readLines")]
    pub read_lines: usize,
    pub strict: bool,
    pub verbose: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            separator: None,
            header: HeaderMode::Auto,
            quote: QUOTE,
            read_lines: DEFAULT_SAMPLE_LINES,
            strict: false,
            verbose: false,
        }
    }
}

impl ScanConfig {
    /// Builds a configuration from a nested qualifier object.
    ///
    /// Key paths are flattened with `.` and lowercased, so
    /// `{"From": {"File": {"ColumnSeparator": ";"}}}` and
    /// `{"from.file.columnseparator": ";"}` are equivalent. Unknown keys and
    /// malformed values produce warnings and leave the defaults in place.
    pub fn from_qualifiers(qualifiers: &Value) -> (Self, Vec<Diagnostic>) {
        let mut config = ScanConfig::default();
        let mut warnings = Vec::new();
        let mut flattened = Vec::new();
        flatten(qualifiers, String::new(), &mut flattened, &mut warnings);
        for (key, value) in flattened {
            config.apply(&key, &value, &mut warnings);
        }
        (config, warnings)
    }

    fn apply(&mut self, key: &str, value: &Value, warnings: &mut Vec<Diagnostic>) {
        match key {
            "from.file.columnseparator" => match separator_from_value(value) {
                Ok(separator) => self.separator = Some(separator),
                Err(reason) => warn_entry(warnings, format!("Ignoring qualifier '{key}': {reason}")),
            },
            "from.file.header" => match header_from_value(value) {
                Ok(header) => self.header = header,
                Err(reason) => warn_entry(warnings, format!("Ignoring qualifier '{key}': {reason}")),
            },
            "readlines" => match lines_from_value(value) {
                Ok(read_lines) => self.read_lines = read_lines,
                Err(reason) => warn_entry(warnings, format!("Ignoring qualifier '{key}': {reason}")),
            },
            "strict" => match value.as_bool() {
                Some(strict) => self.strict = strict,
                None => warn_entry(warnings, format!("Ignoring qualifier '{key}': expected a boolean")),
            },
            "verbose" => match value.as_bool() {
                Some(verbose) => self.verbose = verbose,
                None => warn_entry(warnings, format!("Ignoring qualifier '{key}': expected a boolean")),
            },
            other => warn_entry(warnings, format!("Unknown qualifier '{other}' ignored")),
        }
    }
}

fn warn_entry(warnings: &mut Vec<Diagnostic>, message: String) {
    warnings.push(Diagnostic {
        level: Level::Warning,
        message,
    });
}

fn flatten(
    value: &Value,
    prefix: String,
    out: &mut Vec<(String, Value)>,
    warnings: &mut Vec<Diagnostic>,
) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                let lowered = key.to_lowercase();
                let path = if prefix.is_empty() {
                    lowered
                } else {
                    format!("{prefix}.{lowered}")
                };
                flatten(nested, path, out, warnings);
            }
        }
        Value::Array(_) => warn_entry(
            warnings,
            format!("Qualifier '{prefix}' holds an array, which is not supported"),
        ),
        scalar => out.push((prefix, scalar.clone())),
    }
}

/// Accepts a single character or one of the named forms used on the
/// command line (`tab`, `comma`, `pipe`, `semicolon`).
pub fn parse_separator(value: &str) -> Result<char, String> {
    match value {
        "tab" | "\t" => Ok('\t'),
        "comma" | "," => Ok(','),
        "pipe" | "|" => Ok('|'),
        "semicolon" | ";" => Ok(';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Separator cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Separator must be a single character".to_string());
            }
            Ok(first)
        }
    }
}

fn separator_from_value(value: &Value) -> Result<char, String> {
    match value {
        Value::String(text) => parse_separator(text),
        other => Err(format!("expected a one-character string, got {other}")),
    }
}

fn header_from_value(value: &Value) -> Result<HeaderMode, String> {
    match value {
        Value::Bool(true) => Ok(HeaderMode::Present),
        Value::Bool(false) => Ok(HeaderMode::Absent),
        Value::Number(number) => match number.as_i64() {
            Some(1) => Ok(HeaderMode::Present),
            Some(0) => Ok(HeaderMode::Absent),
            Some(-1) => Ok(HeaderMode::Auto),
            _ => Err(format!("expected -1, 0 or 1, got {number}")),
        },
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "present" | "true" | "1" => Ok(HeaderMode::Present),
            "absent" | "false" | "0" => Ok(HeaderMode::Absent),
            "auto" | "-1" | "" => Ok(HeaderMode::Auto),
            other => Err(format!("unrecognized header mode '{other}'")),
        },
        other => Err(format!("expected a boolean or tri-state value, got {other}")),
    }
}

fn lines_from_value(value: &Value) -> Result<usize, String> {
    match value {
        Value::Number(number) => number
            .as_u64()
            .map(|n| n as usize)
            .ok_or_else(|| format!("expected a non-negative integer, got {number}")),
        Value::String(text) => text
            .trim()
            .parse::<usize>()
            .map_err(|_| format!("expected a non-negative integer, got '{text}'")),
        other => Err(format!("expected a non-negative integer, got {other}")),
    }
}
