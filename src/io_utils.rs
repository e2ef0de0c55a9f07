//! Input plumbing: stdin routing, encoding resolution, line decoding.
//!
//! The `-` path convention routes through standard input, in which case no
//! file size is available and the scan cannot estimate a total row count.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use encoding_rs::{Encoding, UTF_8};

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

/// Opens the input for sampling, reporting the file size when one exists.
pub fn open_input(path: &Path) -> Result<(Box<dyn BufRead>, Option<u64>)> {
    if is_dash(path) {
        return Ok((Box::new(BufReader::new(std::io::stdin())), None));
    }
    let file = File::open(path)
        .with_context(|| format!("Input file {path:?} does not exist or is not readable"))?;
    let size = file.metadata().ok().map(|metadata| metadata.len());
    Ok((Box::new(BufReader::new(file)), size))
}

/// Decodes one raw line, substituting malformed sequences. The flag reports
/// whether any substitution happened.
pub fn decode_line(bytes: &[u8], encoding: &'static Encoding) -> (String, bool) {
    let (text, _, had_errors) = encoding.decode(bytes);
    (text.into_owned(), had_errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::WINDOWS_1252;

    #[test]
    fn resolve_encoding_defaults_to_utf8() {
        assert_eq!(resolve_encoding(None).unwrap(), UTF_8);
        assert_eq!(resolve_encoding(Some("windows-1252")).unwrap(), WINDOWS_1252);
        assert!(resolve_encoding(Some("no-such-charset")).is_err());
    }

    #[test]
    fn decode_line_reports_substitutions() {
        let (text, had_errors) = decode_line(b"plain", UTF_8);
        assert_eq!(text, "plain");
        assert!(!had_errors);

        let (_, had_errors) = decode_line(&[0x66, 0xFF, 0x66], UTF_8);
        assert!(had_errors);
    }

    #[test]
    fn dash_path_is_stdin() {
        assert!(is_dash(Path::new("-")));
        assert!(!is_dash(Path::new("-file.csv")));
    }
}
