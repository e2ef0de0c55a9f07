//! Per-column statistical accumulation.
//!
//! Every tokenized field lands in a [`ColumnAccumulator`] keyed by column
//! position. Length and scale observations go through sparse histograms so
//! the moments can be derived once at synthesis time.

use std::{collections::BTreeMap, sync::OnceLock};

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::Serialize;

/// Aggregate view over a sparse integer histogram.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Distribution {
    pub avg: f64,
    pub min: u32,
    pub max: u32,
    #[serde(rename = "stdDev")]
    pub std_dev: f64,
}

/// Small integer-to-count mapping; zero-valued moments when empty.
#[derive(Debug, Clone, Default)]
pub struct Histogram {
    buckets: BTreeMap<u32, u64>,
    observations: u64,
}

impl Histogram {
    pub fn record(&mut self, value: u32) {
        *self.buckets.entry(value).or_insert(0) += 1;
        self.observations += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.observations == 0
    }

    pub fn max(&self) -> u32 {
        self.buckets.keys().next_back().copied().unwrap_or(0)
    }

    /// Population moments over the recorded values.
    pub fn distribution(&self) -> Distribution {
        if self.observations == 0 {
            return Distribution::default();
        }
        let total = self.observations as f64;
        let sum: f64 = self
            .buckets
            .iter()
            .map(|(&value, &count)| value as f64 * count as f64)
            .sum();
        let avg = sum / total;
        let variance = self
            .buckets
            .iter()
            .map(|(&value, &count)| {
                let delta = value as f64 - avg;
                delta * delta * count as f64
            })
            .sum::<f64>()
            / total;
        Distribution {
            avg,
            min: self.buckets.keys().next().copied().unwrap_or(0),
            max: self.max(),
            std_dev: variance.sqrt(),
        }
    }
}

/// One recognized numeric token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericObservation {
    pub value: f64,
    /// Digits after the decimal point; 0 when there is none.
    pub scale: u32,
}

/// Classifies a token as a signed decimal number. Exponents are accepted;
/// word spellings such as `inf` and `NaN` are not numbers here.
pub fn analyze_numeric_token(token: &str) -> Option<NumericObservation> {
    static NUMERIC: OnceLock<Regex> = OnceLock::new();
    let pattern = NUMERIC.get_or_init(|| {
        Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?$").expect("numeric pattern")
    });
    if !pattern.is_match(token) {
        return None;
    }
    let value: f64 = token.parse().ok()?;
    let scale = token
        .find('.')
        .map(|dot| {
            token[dot + 1..]
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .count() as u32
        })
        .unwrap_or(0);
    Some(NumericObservation { value, scale })
}

/// `YYYY-MM-DD` with a 2–4 digit year, calendar-checked.
pub fn is_date_token(token: &str) -> bool {
    static DATE: OnceLock<Regex> = OnceLock::new();
    let pattern =
        DATE.get_or_init(|| Regex::new(r"^\d{2,4}-\d{1,2}-\d{1,2}$").expect("date pattern"));
    pattern.is_match(token) && NaiveDate::parse_from_str(token, "%Y-%m-%d").is_ok()
}

/// `YYYY-MM-DD HH:MM:SS`, calendar-checked.
pub fn is_timestamp_token(token: &str) -> bool {
    static TIMESTAMP: OnceLock<Regex> = OnceLock::new();
    let pattern = TIMESTAMP.get_or_init(|| {
        Regex::new(r"^\d{2,4}-\d{1,2}-\d{1,2} \d{1,2}:\d{1,2}:\d{1,2}$").expect("timestamp pattern")
    });
    pattern.is_match(token) && NaiveDateTime::parse_from_str(token, "%Y-%m-%d %H:%M:%S").is_ok()
}

/// Empty fields, the two-character literal `""` and the literal `NULL` all
/// count as null observations.
fn is_null_token(token: &str) -> bool {
    token.is_empty() || token == "\"\"" || token == "NULL"
}

/// Running statistics for one column position.
#[derive(Debug, Default)]
pub struct ColumnAccumulator {
    pub name: String,
    pub count: u64,
    pub null_count: u64,
    pub numeric_count: u64,
    pub date_count: u64,
    pub timestamp_count: u64,
    pub lengths: Histogram,
    pub scales: Histogram,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnAccumulator {
    pub fn named(name: String) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    pub fn non_null(&self) -> u64 {
        self.count - self.null_count
    }

    pub fn null_fraction(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.null_count as f64 / self.count as f64
        }
    }

    /// True when every non-null observation parsed as numeric.
    pub fn all_numeric(&self) -> bool {
        self.numeric_count == self.non_null()
    }

    pub fn observe(&mut self, value: &str) {
        self.count += 1;
        self.lengths.record(value.len() as u32);
        if is_null_token(value) {
            self.null_count += 1;
            return;
        }
        if let Some(numeric) = analyze_numeric_token(value) {
            self.numeric_count += 1;
            self.scales.record(numeric.scale);
            self.min = Some(self.min.map_or(numeric.value, |m| m.min(numeric.value)));
            self.max = Some(self.max.map_or(numeric.value, |m| m.max(numeric.value)));
        } else if is_date_token(value) {
            self.date_count += 1;
        } else if is_timestamp_token(value) {
            self.timestamp_count += 1;
        }
    }
}
