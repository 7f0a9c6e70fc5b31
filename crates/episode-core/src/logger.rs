//! Append-only JSONL step logging.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use episode_events::StepRecord;

/// Writes one step record per line as JSON.
pub struct StepLogger {
    writer: Option<BufWriter<File>>,
    step_count: u64,
}

impl StepLogger {
    /// Create a new logger writing to the specified path.
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            step_count: 0,
        })
    }

    /// Create a logger that discards steps (for testing).
    pub fn null() -> Self {
        Self {
            writer: None,
            step_count: 0,
        }
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Log a single step record.
    pub fn log(&mut self, step: &StepRecord) -> std::io::Result<()> {
        self.step_count += 1;
        if let Some(ref mut writer) = self.writer {
            let json = serde_json::to_string(step)?;
            writeln!(writer, "{}", json)?;
        }
        Ok(())
    }

    /// Log an entire episode sequence.
    pub fn log_batch(&mut self, steps: &[StepRecord]) -> std::io::Result<()> {
        for step in steps {
            self.log(step)?;
        }
        Ok(())
    }

    /// Flush the buffer to disk.
    pub fn flush(&mut self) -> std::io::Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}
