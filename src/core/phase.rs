//! System-phase classification from current load.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Derived label summarizing system load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// No tasks in the system, running or waiting.
    Idle,
    /// Free capacity remains and tasks are waiting in the queue.
    Growing,
    /// Every core is busy.
    AtCapacity,
    /// More tasks bound than cores exist. Unreachable while assignment only
    /// binds onto free cores; kept as a defensive classification.
    Overloaded,
    /// Tasks are draining and the system is winding down.
    Shrinking,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "Idle",
            Self::Growing => "Growing",
            Self::AtCapacity => "At Capacity",
            Self::Overloaded => "Overloaded",
            Self::Shrinking => "Shrinking",
        };
        f.write_str(label)
    }
}

/// Classify current load into a [`Phase`].
///
/// Pure function of `(active, queued, num_cores)`, evaluated as an ordered
/// decision list where the first matching rule wins. The order is load-bearing:
/// when `active == num_cores` and the queue is non-empty, the capacity rule
/// applies, not the growth rule, so queued backlog is not reflected in the
/// label once the cores are saturated.
#[must_use]
pub const fn classify(active: usize, queued: usize, num_cores: usize) -> Phase {
    if active == 0 && queued == 0 {
        Phase::Idle
    } else if active < num_cores && queued > 0 {
        Phase::Growing
    } else if active == num_cores {
        Phase::AtCapacity
    } else if active > num_cores {
        Phase::Overloaded
    } else {
        Phase::Shrinking
    }
}
