use std::fmt;

use serde::Serialize;

use crate::stats::{ColumnAccumulator, Distribution};

/// Semantic type assigned to a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Integer,
    Number,
    Date,
    Timestamp,
    String,
    Stream,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Integer => "integer",
            ColumnKind::Number => "number",
            ColumnKind::Date => "date",
            ColumnKind::Timestamp => "timestamp",
            ColumnKind::String => "string",
            ColumnKind::Stream => "stream",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Observation floor for promoting an all-integer 0/1 column to `BOOLEAN`.
const BOOLEAN_MIN_OBSERVATIONS: u64 = 50;
/// Observation floor for the small-value `TINYINT` promotion.
const TINYINT_MIN_OBSERVATIONS: u64 = 100;
/// Columns whose longest value exceeds this are streamed, not inlined.
const STREAM_LENGTH_THRESHOLD: u32 = 10_000;

/// Maps accumulated statistics to a semantic kind and a SQL spelling.
/// Rules apply first-match.
pub fn synthesize(column: &ColumnAccumulator) -> (ColumnKind, String) {
    let non_null = column.non_null();
    let length = column.lengths.distribution();

    if column.all_numeric() {
        if column.scales.max() == 0 {
            if column.name.to_ascii_uppercase().contains("ID") {
                return (ColumnKind::Integer, "BIGINT".to_string());
            }
            if non_null >= BOOLEAN_MIN_OBSERVATIONS
                && column.min == Some(0.0)
                && column.max == Some(1.0)
            {
                return (ColumnKind::Integer, "BOOLEAN".to_string());
            }
            if non_null >= TINYINT_MIN_OBSERVATIONS
                && column.min.is_some_and(|m| m > -100.0)
                && column.max.is_some_and(|m| m < 100.0)
            {
                return (ColumnKind::Integer, "TINYINT".to_string());
            }
            return (ColumnKind::Integer, format!("INT({})", margin(&length)));
        }
        let scale = column.scales.distribution();
        return (
            ColumnKind::Number,
            format!("NUMERIC({},{})", margin(&length), margin(&scale)),
        );
    }
    if column.date_count == non_null {
        return (ColumnKind::Date, "DATE".to_string());
    }
    if column.timestamp_count == non_null {
        return (ColumnKind::Timestamp, "TIMESTAMP".to_string());
    }
    if length.max > STREAM_LENGTH_THRESHOLD {
        return (ColumnKind::Stream, "LONGVARCHAR".to_string());
    }
    (ColumnKind::String, format!("VARCHAR({})", margin(&length)))
}

/// Pads an observed maximum by the spread of its distribution: three
/// standard deviations once the spread is meaningful, one otherwise.
pub fn margin(dist: &Distribution) -> u32 {
    let pad = if dist.std_dev > 0.34 {
        (3.0 * dist.std_dev).floor() as u32
    } else {
        1
    };
    dist.max + pad
}
