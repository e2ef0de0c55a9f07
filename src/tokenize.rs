//! Quote-aware field splitting.
//!
//! Fields are emitted verbatim, surrounding quotes included; downstream
//! statistics work on the raw text. A quoted field keeps consuming
//! separator characters as literals until the quote closes, and a quote
//! left open at the end of the line ends the field there.

use crate::diagnostics::DiagnosticSink;

/// Splits one line into verbatim fields, reporting an unterminated quote
/// as a debug diagnostic.
pub fn split_line(line: &str, separator: char, sink: &mut DiagnosticSink) -> Vec<String> {
    let (fields, unterminated) = tokenize(line, separator);
    if unterminated {
        sink.debug("Unterminated quoted field at end of line");
    }
    fields
}

/// Core splitter. Backslash-escaped quotes are normalized to the doubled
/// form first, so quote accounting only ever sees `""`.
pub fn tokenize(line: &str, separator: char) -> (Vec<String>, bool) {
    let prepared = line.replace("\\\"", "\"\"");
    let mut fields = Vec::new();
    let mut open: Option<String> = None;

    for piece in prepared.split(separator) {
        match open.take() {
            None => {
                if opens_quoted_field(piece) {
                    open = Some(piece.to_string());
                } else {
                    fields.push(piece.to_string());
                }
            }
            Some(mut field) => {
                field.push(separator);
                field.push_str(piece);
                if closes_quoted_field(piece) {
                    fields.push(field);
                } else {
                    open = Some(field);
                }
            }
        }
    }

    let unterminated = open.is_some();
    if let Some(field) = open {
        fields.push(field);
    }
    (fields, unterminated)
}

fn quote_count(piece: &str) -> usize {
    piece.chars().filter(|&c| c == '"').count()
}

/// A piece starting with `"` opens a quoted field unless it is already
/// self-contained: at least two characters, trailing quote, even quote
/// total.
fn opens_quoted_field(piece: &str) -> bool {
    piece.starts_with('"')
        && !(piece.len() >= 2 && piece.ends_with('"') && quote_count(piece) % 2 == 0)
}

/// A continuation piece closes the field when it ends the quoted region:
/// trailing quote carrying an odd quote count of its own.
fn closes_quoted_field(piece: &str) -> bool {
    piece.ends_with('"') && quote_count(piece) % 2 == 1
}
