//! Event-log sink backends.

#[cfg(not(target_arch = "wasm32"))]
pub mod channel;
pub mod memory;
pub mod tracing;

#[cfg(not(target_arch = "wasm32"))]
pub use channel::ChannelEventSink;
pub use memory::InMemoryEventLog;
pub use tracing::TracingEventSink;
