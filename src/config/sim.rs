//! Simulation configuration structures.

use serde::{Deserialize, Serialize};

/// Inclusive integer bounds, in whole seconds, for the randomized execution
/// dwell.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DelayRange {
    /// Smallest drawable dwell.
    pub min: u64,
    /// Largest drawable dwell.
    pub max: u64,
}

/// Configuration supplied once at simulation start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Worker pool size. Must be at least 1; a zero-core pool could never
    /// drain its queue.
    pub num_cores: usize,
    /// Total tasks the generator produces before stopping. Zero is a valid,
    /// immediately settled run.
    pub total_tasks: u64,
    /// Generator cadence in milliseconds.
    pub enqueue_interval_ms: u64,
    /// Bounds for the randomized execution dwell.
    pub executing_delay_range: DelayRange,
    /// Fixed completion (color-change) dwell in milliseconds.
    pub completing_duration_ms: u64,
    /// Fixed removal (fade-out) dwell in milliseconds.
    pub removing_duration_ms: u64,
    /// Debounce floor for externally visible status changes, milliseconds.
    pub min_status_interval_ms: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_cores: 4,
            total_tasks: 20,
            enqueue_interval_ms: 2_500,
            executing_delay_range: DelayRange { min: 2, max: 5 },
            completing_duration_ms: 1_000,
            removing_duration_ms: 2_000,
            min_status_interval_ms: 2_000,
        }
    }
}

impl SimConfig {
    /// A default-shaped configuration sized to the host's core count.
    #[must_use]
    pub fn for_host() -> Self {
        Self {
            num_cores: num_cpus::get(),
            ..Self::default()
        }
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first rejected value.
    pub fn validate(&self) -> Result<(), String> {
        if self.num_cores == 0 {
            return Err("num_cores must be at least 1".into());
        }
        if self.enqueue_interval_ms == 0 {
            return Err("enqueue_interval_ms must be greater than 0".into());
        }
        if self.executing_delay_range.min > self.executing_delay_range.max {
            return Err(format!(
                "executing_delay_range min {} exceeds max {}",
                self.executing_delay_range.min, self.executing_delay_range.max
            ));
        }
        Ok(())
    }

    /// Parse a configuration from a JSON string and validate it.
    ///
    /// # Errors
    ///
    /// Returns a parse or validation error description.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
