use std::sync::{Arc, Mutex};

use arena_core::{LogRecord, MatchLog};

use super::{MatchSink, Result, SinkError};

/// In-memory sink. Clones share the same record buffer, so a caller can keep
/// one clone and hand the other to the runner.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<LogRecord>>>,
    flushes: Arc<Mutex<usize>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Number of times the sink was flushed.
    pub fn flushes(&self) -> usize {
        self.flushes
            .lock()
            .map(|count| *count)
            .unwrap_or_else(|poisoned| *poisoned.into_inner())
    }

    /// Assembles the recorded stream into a log, if a header was written.
    pub fn to_log(&self) -> Option<MatchLog> {
        MatchLog::from_records(self.records())
    }
}

impl MatchSink for MemorySink {
    fn write(&mut self, record: &LogRecord) -> Result<()> {
        self.records
            .lock()
            .map_err(|_| SinkError::LockPoisoned)?
            .push(record.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        *self.flushes.lock().map_err(|_| SinkError::LockPoisoned)? += 1;
        Ok(())
    }
}
