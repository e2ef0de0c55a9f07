//! Delimiter detection by piece-count dispersion.
//!
//! Each candidate separator is scored by how many pieces it splits the
//! sampled lines into and how stable that count is: a good separator yields
//! many pieces with little variance. Piece counts are taken on a
//! quote-stripped variant of each line so separators embedded in quoted
//! values do not inflate a candidate.

use std::collections::BTreeMap;

use crate::diagnostics::DiagnosticSink;

/// The candidate set, in tie-break order.
pub const CANDIDATES: [char; 4] = [',', ';', '|', '\t'];

/// Picks the best separator for the sampled lines, defaulting to `,` with a
/// warning when no candidate splits the sample at all.
pub fn detect_separator<'a, I>(lines: I, sink: &mut DiagnosticSink) -> char
where
    I: IntoIterator<Item = &'a str>,
{
    let mut histograms: [BTreeMap<usize, u64>; CANDIDATES.len()] = Default::default();
    let mut total = 0u64;

    for line in lines {
        let stripped = strip_quoted_regions(line);
        total += 1;
        for (slot, candidate) in CANDIDATES.iter().enumerate() {
            let pieces = stripped.split(*candidate).count();
            *histograms[slot].entry(pieces).or_insert(0) += 1;
        }
    }

    let mut best: Option<(char, f64)> = None;
    for (slot, candidate) in CANDIDATES.iter().enumerate() {
        let Some(candidate_score) = score(&histograms[slot], total) else {
            continue;
        };
        match best {
            Some((_, current)) if current >= candidate_score => {}
            _ => best = Some((*candidate, candidate_score)),
        }
    }

    match best {
        Some((candidate, _)) => candidate,
        None => {
            sink.warning(
                "No separator candidate stood out; defaulting to ',' (possibly a single-column file)",
            );
            ','
        }
    }
}

/// `median − stddev`, or `None` when the median piece count never exceeds 1.
/// The standard deviation is the population form around the arithmetic mean.
fn score(histogram: &BTreeMap<usize, u64>, total: u64) -> Option<f64> {
    if total == 0 {
        return None;
    }
    let median = median(histogram, total);
    if median <= 1 {
        return None;
    }
    let (_, std_dev) = moments(histogram, total);
    Some(median as f64 - std_dev)
}

/// Sample median walked off the histogram; ties resolve to the higher value.
fn median(histogram: &BTreeMap<usize, u64>, total: u64) -> usize {
    let mut cumulative = 0u64;
    for (&value, &count) in histogram {
        cumulative += count;
        if cumulative * 2 > total {
            return value;
        }
    }
    0
}

fn moments(histogram: &BTreeMap<usize, u64>, total: u64) -> (f64, f64) {
    let sum: f64 = histogram
        .iter()
        .map(|(&value, &count)| value as f64 * count as f64)
        .sum();
    let mean = sum / total as f64;
    let variance: f64 = histogram
        .iter()
        .map(|(&value, &count)| {
            let delta = value as f64 - mean;
            delta * delta * count as f64
        })
        .sum::<f64>()
        / total as f64;
    (mean, variance.sqrt())
}

/// Removes escaped quotes (`""` and `\"`), then excises the content of
/// fully-closed quoted regions. An unterminated region keeps its content,
/// since the closing quote never arrived.
pub(crate) fn strip_quoted_regions(line: &str) -> String {
    let cleaned = line.replace("\\\"", "").replace("\"\"", "");
    let mut out = String::with_capacity(cleaned.len());
    let mut quoted_span = String::new();
    let mut in_quotes = false;

    for ch in cleaned.chars() {
        if ch == '"' {
            if in_quotes {
                quoted_span.clear();
                in_quotes = false;
            } else {
                in_quotes = true;
            }
        } else if in_quotes {
            quoted_span.push(ch);
        } else {
            out.push(ch);
        }
    }
    if in_quotes {
        out.push_str(&quoted_span);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(lines: &[&str]) -> (char, DiagnosticSink) {
        let mut sink = DiagnosticSink::new(false);
        let separator = detect_separator(lines.iter().copied(), &mut sink);
        (separator, sink)
    }

    #[test]
    fn detects_comma_from_uniform_lines() {
        let (separator, sink) = detect(&["a,b,c", "d,e,f", "g,h,i"]);
        assert_eq!(separator, ',');
        assert!(sink.entries().is_empty());
    }

    #[test]
    fn detects_tab_and_pipe() {
        assert_eq!(detect(&["a\tb", "c\td"]).0, '\t');
        assert_eq!(detect(&["a|b|c", "d|e|f"]).0, '|');
    }

    #[test]
    fn stable_candidate_beats_sporadic_one() {
        // Commas appear on one line only, so their median piece count is 1.
        let (separator, _) = detect(&["1;2;3,4", "5;6;7", "8;9;0"]);
        assert_eq!(separator, ';');
    }

    #[test]
    fn quoted_separators_do_not_inflate_a_candidate() {
        let lines = [
            "x;y;\"a,b,c,d\"",
            "u;v;\"e,f,g,h\"",
            "p;q;\"i,j,k,l\"",
        ];
        let (separator, _) = detect(&lines);
        assert_eq!(separator, ';');
    }

    #[test]
    fn single_column_defaults_to_comma_with_warning() {
        let (separator, sink) = detect(&["alpha", "beta", "gamma"]);
        assert_eq!(separator, ',');
        assert!(
            sink.entries()
                .iter()
                .any(|d| d.message.contains("single-column"))
        );
    }

    #[test]
    fn empty_sample_defaults_to_comma() {
        let (separator, sink) = detect(&[]);
        assert_eq!(separator, ',');
        assert_eq!(sink.entries().len(), 1);
    }

    #[test]
    fn strip_removes_closed_regions_and_escapes() {
        assert_eq!(strip_quoted_regions("\"a,b\",2"), ",2");
        assert_eq!(strip_quoted_regions("\"c\"\"d\",3"), ",3");
        assert_eq!(strip_quoted_regions("plain,row"), "plain,row");
    }

    #[test]
    fn strip_keeps_unterminated_region_content() {
        assert_eq!(strip_quoted_regions("a,\"b,c"), "a,b,c");
    }

    #[test]
    fn higher_count_wins_variance_being_equal() {
        // Semicolons split into more pieces than pipes on every line.
        let (separator, _) = detect(&["a;b;c|d", "e;f;g|h"]);
        assert_eq!(separator, ';');
    }
}
