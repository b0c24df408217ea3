//! Infrastructure adapters for event-log sinks.

pub mod log;

#[cfg(not(target_arch = "wasm32"))]
pub use log::ChannelEventSink;
pub use log::{InMemoryEventLog, TracingEventSink};
