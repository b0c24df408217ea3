//! Append-only task event log.
//!
//! Every lifecycle boundary crossing appends one [`LogEntry`] to the
//! configured [`EventSink`]. Entries are immutable once recorded and the log
//! never evicts; it grows for the lifetime of one simulation run.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::task::TaskId;
use crate::util::clock::format_clock_ms;

/// Lifecycle boundary recorded in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskEventKind {
    /// The task was bound to a core and began executing.
    ExecutingStarted,
    /// The execution dwell elapsed; the completion dwell began.
    CompletingStarted,
    /// The completion dwell elapsed; the removal dwell began.
    RemovingStarted,
    /// The task retired and its core was freed.
    Retired,
}

/// One immutable log record: which task crossed which boundary, where, when.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Task the event belongs to.
    pub task_id: TaskId,
    /// Boundary crossed.
    pub kind: TaskEventKind,
    /// Core the task occupied when the boundary was crossed.
    pub core_index: usize,
    /// Engine-clock time of the crossing, milliseconds.
    pub at_ms: u64,
}

impl LogEntry {
    /// The entry's clock reading rendered as zero-padded `HH:MM:SS.mmm`.
    #[must_use]
    pub fn timestamp(&self) -> String {
        format_clock_ms(self.at_ms)
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Cores are narrated 1-based, matching the rendered core labels.
        let core = self.core_index + 1;
        let phrase = match self.kind {
            TaskEventKind::ExecutingStarted => format!("entered core {core}"),
            TaskEventKind::CompletingStarted => format!("finished executing at core {core}"),
            TaskEventKind::RemovingStarted => format!("completed at core {core}"),
            TaskEventKind::Retired => format!("retired from core {core}"),
        };
        write!(
            f,
            "Task {} {} at {}",
            self.task_id,
            phrase,
            self.timestamp()
        )
    }
}

/// Destination for log entries.
///
/// Implementations decide where entries go: an in-memory buffer for
/// renderers and tests, the tracing pipeline, or a channel to another thread.
pub trait EventSink: Send {
    /// Append one entry. Entries arrive in engine order.
    fn record(&mut self, entry: LogEntry);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_narration_format() {
        let entry = LogEntry {
            task_id: 3,
            kind: TaskEventKind::ExecutingStarted,
            core_index: 1,
            at_ms: 2_500,
        };
        assert_eq!(entry.to_string(), "Task 3 entered core 2 at 00:00:02.500");
    }

    #[test]
    fn test_timestamp_is_zero_padded() {
        let entry = LogEntry {
            task_id: 1,
            kind: TaskEventKind::Retired,
            core_index: 0,
            at_ms: 61_005,
        };
        assert_eq!(entry.timestamp(), "00:01:01.005");
    }
}
