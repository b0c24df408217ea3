//! In-memory event log backend.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::log::{EventSink, LogEntry};

/// Append-only in-memory log with no eviction.
///
/// The backing store is behind an `Arc`, so cloning yields another handle to
/// the same log: keep one clone and hand the other to the simulation, then
/// read the entries back after (or during) the run.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventLog {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl InMemoryEventLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all entries recorded so far, in append order.
    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    /// Number of entries recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl EventSink for InMemoryEventLog {
    fn record(&mut self, entry: LogEntry) {
        self.entries.lock().push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::log::TaskEventKind;

    #[test]
    fn test_clone_shares_the_store() {
        let log = InMemoryEventLog::new();
        let mut sink = log.clone();
        sink.record(LogEntry {
            task_id: 1,
            kind: TaskEventKind::ExecutingStarted,
            core_index: 0,
            at_ms: 100,
        });
        assert_eq!(log.len(), 1);
        assert_eq!(log.entries()[0].task_id, 1);
    }

    #[test]
    fn test_entries_keep_append_order() {
        let log = InMemoryEventLog::new();
        let mut sink = log.clone();
        for at_ms in [10, 20, 30] {
            sink.record(LogEntry {
                task_id: 1,
                kind: TaskEventKind::ExecutingStarted,
                core_index: 0,
                at_ms,
            });
        }
        let at: Vec<u64> = log.entries().iter().map(|e| e.at_ms).collect();
        assert_eq!(at, vec![10, 20, 30]);
    }
}
