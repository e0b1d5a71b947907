//! Chronicle Writer
//!
//! Plain-text, chronological transcript of every event and every declared
//! action, consumed by the external narrative-generation service.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use sim_events::ChronicleEntry;

use super::OutputError;

/// Writes one rendered line per chronicle entry.
pub struct Chronicle {
    writer: Option<BufWriter<File>>,
    entry_count: u64,
}

impl Chronicle {
    /// Creates a chronicle truncating any existing file at `path`.
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(file)),
            entry_count: 0,
        })
    }

    /// Creates a chronicle that discards entries (for tests).
    pub fn null() -> Self {
        Self {
            writer: None,
            entry_count: 0,
        }
    }

    pub fn entry_count(&self) -> u64 {
        self.entry_count
    }

    /// Appends one rendered entry.
    pub fn log(&mut self, entry: &ChronicleEntry) -> Result<(), OutputError> {
        self.entry_count += 1;
        if let Some(ref mut writer) = self.writer {
            writeln!(writer, "{entry}")?;
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

impl Drop for Chronicle {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!("failed to flush chronicle: {e}");
        }
    }
}
