//! Real-time replay of a simulation on a tokio runtime.
//!
//! The engine itself is wall-clock-free; this driver walks the event heap,
//! sleeping out the gap before each event (scaled by a speed factor) and
//! publishing a fresh snapshot after every step. A hosting environment that
//! tears the replay down early simply drops the future; no engine timers
//! leak because the engine has none.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::core::engine::Simulation;
use crate::core::error::AppResult;
use crate::runtime::api::SimSnapshot;

/// Receiver of the driver's snapshot stream.
#[async_trait]
pub trait SnapshotConsumer: Send + Sync {
    /// Handle one published snapshot.
    async fn consume(&self, snapshot: SimSnapshot);
}

/// [`SnapshotConsumer`] publishing into a tokio watch channel, so renderers
/// always see the latest state and never queue behind stale frames.
#[derive(Debug)]
pub struct WatchPublisher {
    tx: watch::Sender<SimSnapshot>,
}

#[async_trait]
impl SnapshotConsumer for WatchPublisher {
    async fn consume(&self, snapshot: SimSnapshot) {
        // A dropped receiver just means nobody is rendering anymore.
        let _ = self.tx.send(snapshot);
    }
}

/// Create a watch-backed publisher and the receiver a renderer polls.
#[must_use]
pub fn watch_channel(initial: SimSnapshot) -> (WatchPublisher, watch::Receiver<SimSnapshot>) {
    let (tx, rx) = watch::channel(initial);
    (WatchPublisher { tx }, rx)
}

/// Drives a simulation against the wall clock.
#[derive(Debug, Clone, Copy)]
pub struct RealtimeDriver {
    speed: f64,
}

impl Default for RealtimeDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl RealtimeDriver {
    /// Create a driver replaying at real speed.
    #[must_use]
    pub const fn new() -> Self {
        Self { speed: 1.0 }
    }

    /// Scale replay speed; `2.0` runs twice as fast as real time.
    #[must_use]
    pub const fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Replay `sim` to completion, publishing a snapshot before the first
    /// event and after every processed event.
    ///
    /// # Errors
    ///
    /// Rejects a non-positive speed factor and propagates engine errors.
    pub async fn run(
        self,
        mut sim: Simulation,
        consumer: Arc<dyn SnapshotConsumer>,
    ) -> AppResult<()> {
        if !(self.speed > 0.0 && self.speed.is_finite()) {
            anyhow::bail!("replay speed must be a positive finite number");
        }
        consumer.consume(sim.snapshot()).await;
        while let Some(due) = sim.peek_due() {
            let gap_ms = due.saturating_sub(sim.now_ms());
            if gap_ms > 0 {
                #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let scaled = (gap_ms as f64 / self.speed).round() as u64;
                tokio::time::sleep(Duration::from_millis(scaled)).await;
            }
            sim.step()?;
            consumer.consume(sim.snapshot()).await;
        }
        tracing::info!(run_id = %sim.run_id(), "replay finished");
        Ok(())
    }
}
