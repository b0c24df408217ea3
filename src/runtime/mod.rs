//! Runtime adapters (real-time driver) and renderer-facing API surface.

pub mod api;
#[cfg(feature = "tokio-runtime")]
pub mod driver;

pub use api::{CoreView, SimSnapshot, TaskView};
#[cfg(feature = "tokio-runtime")]
pub use driver::{watch_channel, RealtimeDriver, SnapshotConsumer, WatchPublisher};
