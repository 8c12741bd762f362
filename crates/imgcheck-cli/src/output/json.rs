//! JSON output adapter.

use std::io::{self, Write};
use std::sync::Mutex;

use anyhow::Result;
use imgcheck_core::{AnalysisRecord, ResultOutput};

/// How records are laid out on the wire.
#[derive(Debug, Clone, Copy)]
pub enum JsonMode {
    /// One compact JSON object per line, written as records arrive.
    Lines,
    /// A single JSON array, buffered and written on flush.
    Array {
        /// Pretty-print the array.
        pretty: bool,
    },
}

/// JSON output adapter behind the [`ResultOutput`] port.
///
/// In [`JsonMode::Lines`] each record is streamed immediately; in
/// [`JsonMode::Array`] records are held back so the stream stays a single
/// valid JSON document.
pub struct JsonOutput {
    writer: Mutex<Box<dyn Write + Send>>,
    mode: JsonMode,
    buffered: Mutex<Vec<AnalysisRecord>>,
}

impl JsonOutput {
    /// Line-delimited JSON to stdout.
    #[must_use]
    pub fn lines() -> Self {
        Self::to_writer(Box::new(io::stdout()), JsonMode::Lines)
    }

    /// Single-array JSON to stdout.
    #[must_use]
    pub fn array(pretty: bool) -> Self {
        Self::to_writer(Box::new(io::stdout()), JsonMode::Array { pretty })
    }

    /// JSON output over an arbitrary writer.
    #[must_use]
    pub fn to_writer(writer: Box<dyn Write + Send>, mode: JsonMode) -> Self {
        Self {
            writer: Mutex::new(writer),
            mode,
            buffered: Mutex::new(Vec::new()),
        }
    }

    fn write_line(&self, json: &str) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writeln!(writer, "{json}")?;
        Ok(())
    }
}

impl ResultOutput for JsonOutput {
    fn write(&self, record: &AnalysisRecord) -> Result<()> {
        match self.mode {
            JsonMode::Lines => self.write_line(&serde_json::to_string(record)?),
            JsonMode::Array { .. } => {
                self.buffered
                    .lock()
                    .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?
                    .push(record.clone());
                Ok(())
            }
        }
    }

    fn flush(&self) -> Result<()> {
        if let JsonMode::Array { pretty } = self.mode {
            let records = std::mem::take(
                &mut *self
                    .buffered
                    .lock()
                    .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?,
            );
            let json = if pretty {
                serde_json::to_string_pretty(&records)?
            } else {
                serde_json::to_string(&records)?
            };
            self.write_line(&json)?;
        }

        self.writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?
            .flush()?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use imgcheck_core::ErrorReport;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn record(name: &str) -> AnalysisRecord {
        AnalysisRecord::Error(ErrorReport::new(name, "nope"))
    }

    #[test]
    fn test_lines_mode_streams_one_line_per_record() {
        let buf = SharedBuf::default();
        let output = JsonOutput::to_writer(Box::new(buf.clone()), JsonMode::Lines);

        output.write(&record("a.png")).unwrap();
        output.write(&record("b.png")).unwrap();

        // Already visible before flush.
        let lines: Vec<String> = buf.contents().lines().map(String::from).collect();
        assert_eq!(lines.len(), 2);
        for line in &lines {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert_eq!(value["status"], "error");
        }
    }

    #[test]
    fn test_array_mode_holds_records_until_flush() {
        let buf = SharedBuf::default();
        let output =
            JsonOutput::to_writer(Box::new(buf.clone()), JsonMode::Array { pretty: false });

        output.write(&record("a.png")).unwrap();
        output.write(&record("b.png")).unwrap();
        assert!(buf.contents().is_empty());

        output.flush().unwrap();
        let value: serde_json::Value = serde_json::from_str(buf.contents().trim()).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_empty_array_mode_still_emits_a_document() {
        let buf = SharedBuf::default();
        let output =
            JsonOutput::to_writer(Box::new(buf.clone()), JsonMode::Array { pretty: true });

        output.flush().unwrap();
        assert_eq!(buf.contents().trim(), "[]");
    }
}
