//! Day Summary Writer
//!
//! Append-only JSONL export of per-day summary records.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use sim_events::DaySummary;

use super::OutputError;

/// Writes one JSON object per day to a JSONL file.
pub struct SummaryWriter {
    writer: Option<BufWriter<File>>,
    record_count: u64,
}

impl SummaryWriter {
    /// Creates a writer truncating any existing file at `path`.
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(file)),
            record_count: 0,
        })
    }

    /// Creates a writer that discards records (for tests).
    pub fn null() -> Self {
        Self {
            writer: None,
            record_count: 0,
        }
    }

    pub fn record_count(&self) -> u64 {
        self.record_count
    }

    /// Appends one summary record.
    pub fn write(&mut self, summary: &DaySummary) -> Result<(), OutputError> {
        self.record_count += 1;
        if let Some(ref mut writer) = self.writer {
            let json = serde_json::to_string(summary)?;
            writeln!(writer, "{json}")?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), OutputError> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for SummaryWriter {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!("failed to flush summary writer: {e}");
        }
    }
}
