//! Tracing-backed event log sink.

use crate::core::log::{EventSink, LogEntry};

/// Forwards every log entry to the tracing pipeline instead of storing it.
///
/// Useful when the run is observed through a subscriber (console, file,
/// collector) rather than a renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl TracingEventSink {
    /// Create the sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl EventSink for TracingEventSink {
    fn record(&mut self, entry: LogEntry) {
        ::tracing::info!(
            task_id = entry.task_id,
            kind = ?entry.kind,
            core = entry.core_index,
            at = %entry.timestamp(),
            "task event"
        );
    }
}
