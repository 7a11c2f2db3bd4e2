//! Per-run log sink.
//!
//! A search invocation owns exactly one `RunLog`; it is handed down by `&mut` to
//! whatever needs to trace, and written out once when the run is torn down.
//! Nothing here is global, so two runs in one process never interleave.

use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone)]
pub struct RunLog {
    /// Suffix on every line prefix, e.g. `MASTER` gives `INFO_MASTER: ...`
    tag: &'static str,
    lines: Vec<String>,
}

impl RunLog {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            lines: Vec::new(),
        }
    }

    pub fn push(&mut self, level: LogLevel, message: impl AsRef<str>) {
        let line = format!("{}_{}: {}", level, self.tag, message.as_ref());
        // Mirror into the log facade so RUST_LOG=debug shows lines as they happen
        log::debug!("{line}");
        self.lines.push(line);
    }

    pub fn info(&mut self, message: impl AsRef<str>) {
        self.push(LogLevel::Info, message);
    }

    pub fn warn(&mut self, message: impl AsRef<str>) {
        self.push(LogLevel::Warn, message);
    }

    pub fn error(&mut self, message: impl AsRef<str>) {
        self.push(LogLevel::Error, message);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Write every buffered line to `out` and empty the buffer.
    pub fn flush_to<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        for line in self.lines.drain(..) {
            writeln!(out, "{line}")?;
        }
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_are_prefixed_by_level_and_tag() {
        let mut log = RunLog::new("MASTER");
        log.info("starting");
        log.warn("feature X not found");
        log.error("boom");

        assert_eq!(
            log.lines(),
            &[
                "INFO_MASTER: starting".to_string(),
                "WARN_MASTER: feature X not found".to_string(),
                "ERROR_MASTER: boom".to_string(),
            ]
        );
    }

    #[test]
    fn flush_drains_the_buffer() {
        let mut log = RunLog::new("REG");
        log.info("one");
        log.info("two");

        let mut out: Vec<u8> = Vec::new();
        log.flush_to(&mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "INFO_REG: one\nINFO_REG: two\n");
        assert!(log.is_empty());
    }
}
