//! Renderer-facing view models.
//!
//! A renderer reconstructs the full visual from these snapshots plus the
//! ordered log entries; it needs no scheduling logic of its own and holds no
//! structural references, only stable task ids.

use serde::{Deserialize, Serialize};

use crate::core::phase::Phase;
use crate::core::scheduler::LockStatus;
use crate::core::task::{TaskId, TaskState};

/// One core's occupancy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CoreView {
    /// Core position, 0-based.
    pub index: usize,
    /// Task occupying the core, if any.
    pub task: Option<TaskId>,
}

/// One live task's externally relevant state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TaskView {
    /// Stable identifier for lookup.
    pub id: TaskId,
    /// Current lifecycle state.
    pub state: TaskState,
    /// Core the task occupies, if bound.
    pub core_index: Option<usize>,
}

/// Full serializable view of a simulation at one instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimSnapshot {
    /// Identifier of the run this snapshot belongs to.
    pub run_id: String,
    /// Virtual-clock reading, milliseconds.
    pub now_ms: u64,
    /// Surfaced (debounced) phase label.
    pub phase: Phase,
    /// Surfaced (debounced) lock status.
    pub lock: LockStatus,
    /// Core table in index order.
    pub cores: Vec<CoreView>,
    /// Live tasks in id order.
    pub tasks: Vec<TaskView>,
    /// Waiting task ids, queue head first.
    pub waiting: Vec<TaskId>,
    /// Tasks produced by the generator so far.
    pub produced: u64,
    /// Log entries recorded so far.
    pub log_len: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_round_trips_through_json() {
        let snap = SimSnapshot {
            run_id: "test-run".into(),
            now_ms: 2_500,
            phase: Phase::Growing,
            lock: LockStatus::Locked,
            cores: vec![CoreView {
                index: 0,
                task: Some(1),
            }],
            tasks: vec![TaskView {
                id: 1,
                state: TaskState::Executing,
                core_index: Some(0),
            }],
            waiting: vec![2, 3],
            produced: 3,
            log_len: 1,
        };
        let json = serde_json::to_string(&snap).unwrap();
        let back: SimSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.now_ms, 2_500);
        assert_eq!(back.waiting, vec![2, 3]);
        assert_eq!(back.cores[0].task, Some(1));
    }
}
