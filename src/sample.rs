//! Line sampling: trimmed nonempty lines with byte accounting.
//!
//! The first nonempty line is held aside as the header candidate and does
//! not count against the sample cap; the remaining lines feed detection and
//! statistics.

use std::io::BufRead;

use anyhow::{Context, Result};
use encoding_rs::Encoding;

use crate::{diagnostics::DiagnosticSink, io_utils};

/// Hard cap on a single line; longer input is truncated, not rejected.
pub const MAX_LINE_BYTES: usize = 999_999;

#[derive(Debug)]
pub struct LineSample {
    /// First nonempty line of the input, if any.
    pub header_candidate: Option<String>,
    /// Nonempty lines after the header candidate, at most `read_lines`.
    pub lines: Vec<String>,
    /// Raw bytes consumed from the stream, line terminators included.
    pub sampled_bytes: u64,
    pub eof_reached: bool,
    pub file_size: Option<u64>,
}

impl LineSample {
    /// Nonempty lines captured, header candidate included.
    pub fn line_count(&self) -> usize {
        self.lines.len() + usize::from(self.header_candidate.is_some())
    }

    /// Projects the sampled line count onto the whole file. `None` when the
    /// input was not fully read and no size is known to extrapolate from.
    pub fn estimate_lines(&self, sink: &mut DiagnosticSink) -> Option<u64> {
        let sampled = self.line_count() as u64;
        if self.eof_reached {
            return Some(sampled);
        }
        match self.file_size {
            Some(size) if self.sampled_bytes > 0 => Some(sampled * size / self.sampled_bytes),
            _ => {
                sink.warning("Cannot estimate row count: file size unknown or no bytes sampled");
                None
            }
        }
    }
}

pub fn read_sample<R: BufRead>(
    mut reader: R,
    file_size: Option<u64>,
    read_lines: usize,
    encoding: &'static Encoding,
    sink: &mut DiagnosticSink,
) -> Result<LineSample> {
    let mut header_candidate: Option<String> = None;
    let mut lines = Vec::new();
    let mut sampled_bytes = 0u64;
    let mut eof_reached = false;
    let mut decode_warned = false;
    let mut buffer = Vec::new();

    loop {
        if header_candidate.is_some() && read_lines > 0 && lines.len() >= read_lines {
            break;
        }
        buffer.clear();
        let consumed = reader
            .read_until(b'\n', &mut buffer)
            .context("Reading input line")?;
        if consumed == 0 {
            eof_reached = true;
            break;
        }
        sampled_bytes += consumed as u64;

        let (decoded, had_errors) = io_utils::decode_line(&buffer, encoding);
        if had_errors && !decode_warned {
            sink.warning(
                "Input contains byte sequences invalid for the declared encoding; they were replaced",
            );
            decode_warned = true;
        }

        let trimmed = decoded.trim_matches(|c: char| c.is_whitespace() || c.is_control());
        if trimmed.is_empty() {
            continue;
        }
        let mut line = trimmed.to_string();
        if line.len() > MAX_LINE_BYTES {
            line.truncate(floor_char_boundary(&line, MAX_LINE_BYTES));
            sink.warning(format!(
                "Line exceeds {MAX_LINE_BYTES} bytes and was truncated"
            ));
        }

        if header_candidate.is_none() {
            header_candidate = Some(line);
        } else {
            lines.push(line);
        }
    }

    if eof_reached && read_lines > 0 && header_candidate.is_some() && lines.len() < read_lines {
        sink.warning(format!(
            "Sample shorter than requested: {} of {} data line(s) available",
            lines.len(),
            read_lines
        ));
    }

    Ok(LineSample {
        header_candidate,
        lines,
        sampled_bytes,
        eof_reached,
        file_size,
    })
}

fn floor_char_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}
