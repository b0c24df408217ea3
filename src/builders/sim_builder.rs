//! Builder assembling a simulation from its parts.

use crate::config::SimConfig;
use crate::core::engine::Simulation;
use crate::core::error::SimError;
use crate::core::log::EventSink;
use crate::infra::log::memory::InMemoryEventLog;
use crate::util::rng::{DelaySource, SeededDelay, ThreadRngDelay};

/// Assembles configuration, randomness, and a log sink into a validated
/// [`Simulation`].
///
/// ```rust,ignore
/// let log = InMemoryEventLog::new();
/// let mut sim = SimulationBuilder::new()
///     .with_config(SimConfig::default())
///     .with_seed(42)
///     .with_event_sink(Box::new(log.clone()))
///     .build()?;
/// ```
pub struct SimulationBuilder {
    config: SimConfig,
    delay: Option<Box<dyn DelaySource>>,
    sink: Option<Box<dyn EventSink>>,
}

impl Default for SimulationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationBuilder {
    /// Start from the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: SimConfig::default(),
            delay: None,
            sink: None,
        }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: SimConfig) -> Self {
        self.config = config;
        self
    }

    /// Use an explicit dwell-draw source.
    #[must_use]
    pub fn with_delay_source(mut self, delay: Box<dyn DelaySource>) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Use a seeded dwell-draw source for a reproducible run.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.delay = Some(Box::new(SeededDelay::new(seed)));
        self
    }

    /// Use an explicit event sink. Defaults to a fresh in-memory log; pass a
    /// clone of your own [`InMemoryEventLog`] to keep a reading handle.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Box<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Validate and construct the simulation.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] for a rejected configuration.
    pub fn build(self) -> Result<Simulation, SimError> {
        let delay = self
            .delay
            .unwrap_or_else(|| Box::new(ThreadRngDelay));
        let sink = self
            .sink
            .unwrap_or_else(|| Box::new(InMemoryEventLog::new()));
        Simulation::new(self.config, delay, sink)
    }
}
