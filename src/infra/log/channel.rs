//! Channel-backed event log sink for synchronous consumers.

use crossbeam_channel::{Receiver, Sender};

use crate::core::log::{EventSink, LogEntry};

/// Sends every log entry over a channel to a consumer thread.
///
/// Lets a renderer on its own OS thread tail the log without sharing any
/// engine state.
#[derive(Debug, Clone)]
pub struct ChannelEventSink {
    tx: Sender<LogEntry>,
}

impl ChannelEventSink {
    /// Create a sink and the receiver it feeds.
    #[must_use]
    pub fn unbounded() -> (Self, Receiver<LogEntry>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelEventSink {
    fn record(&mut self, entry: LogEntry) {
        if self.tx.send(entry).is_err() {
            tracing::warn!("log receiver dropped; entry discarded");
        }
    }
}
