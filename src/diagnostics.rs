use log::{debug, error, info, warn};
use serde::Serialize;

/// Severity of a single scan diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Info,
    Warning,
    Error,
    Debug,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
}

/// Ordered collector for scan diagnostics.
///
/// The structured list is authoritative. When `verbose` is set, every entry
/// is additionally mirrored to the `log` facade as it is recorded.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    entries: Vec<Diagnostic>,
    verbose: bool,
}

impl DiagnosticSink {
    pub fn new(verbose: bool) -> Self {
        Self {
            entries: Vec::new(),
            verbose,
        }
    }

    /// Starts a sink pre-populated with diagnostics produced before the
    /// scan itself, e.g. while parsing a qualifier object.
    pub fn seeded(verbose: bool, seed: Vec<Diagnostic>) -> Self {
        let mut sink = Self::new(verbose);
        for diagnostic in seed {
            sink.record(diagnostic.level, diagnostic.message);
        }
        sink
    }

    pub fn record(&mut self, level: Level, message: impl Into<String>) {
        let message = message.into();
        if self.verbose {
            match level {
                Level::Info => info!("{message}"),
                Level::Warning => warn!("{message}"),
                Level::Error => error!("{message}"),
                Level::Debug => debug!("{message}"),
            }
        }
        self.entries.push(Diagnostic { level, message });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.record(Level::Info, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.record(Level::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.record(Level::Error, message);
    }

    pub fn debug(&mut self, message: impl Into<String>) {
        self.record(Level::Debug, message);
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_preserves_recording_order() {
        let mut sink = DiagnosticSink::new(false);
        sink.warning("first");
        sink.debug("second");
        sink.info("third");

        let levels: Vec<Level> = sink.entries().iter().map(|d| d.level).collect();
        assert_eq!(levels, vec![Level::Warning, Level::Debug, Level::Info]);
    }

    #[test]
    fn seeded_sink_keeps_seed_before_new_entries() {
        let seed = vec![Diagnostic {
            level: Level::Warning,
            message: "from qualifiers".to_string(),
        }];
        let mut sink = DiagnosticSink::seeded(false, seed);
        sink.info("from scan");

        assert_eq!(sink.entries()[0].message, "from qualifiers");
        assert_eq!(sink.entries()[1].message, "from scan");
    }

    #[test]
    fn level_serializes_uppercase() {
        let serialized = serde_json::to_string(&Level::Warning).expect("serialize level");
        assert_eq!(serialized, "\"WARNING\"");
    }
}
