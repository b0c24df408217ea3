//! Waiting queue, core-occupancy table, and the assignment policy.
//!
//! The scheduler owns all shared load state: the FIFO queue of waiting tasks,
//! the fixed core table, and the active-task count. No other component
//! mutates these; lifecycle code requests changes through the operations
//! here. `assign` and `release` are the only places occupancy and the active
//! count change, and callers recompute lock status and phase after each.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::error::SimError;
use crate::core::task::{Task, TaskId};

/// Derived binary label: whether any task currently occupies a core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockStatus {
    /// At least one task is bound to a core.
    Locked,
    /// No task is bound to any core.
    Unlocked,
}

impl fmt::Display for LockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Locked => "Locked",
            Self::Unlocked => "Unlocked",
        })
    }
}

/// One unit of fixed, exclusive execution capacity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CoreSlot {
    /// Position in the core table, fixed at startup.
    pub index: usize,
    /// Task occupying the core, if any. At most one at a time.
    pub occupant: Option<TaskId>,
}

impl CoreSlot {
    /// Whether a task currently occupies this core.
    #[must_use]
    pub const fn occupied(&self) -> bool {
        self.occupant.is_some()
    }
}

/// A queue-head task bound to a free core by one `assign` pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    /// Task popped from the queue head.
    pub task_id: TaskId,
    /// Core it was bound to.
    pub core_index: usize,
}

/// Exclusive owner of the waiting queue and the core table.
#[derive(Debug)]
pub struct Scheduler {
    cores: Vec<CoreSlot>,
    waiting: VecDeque<TaskId>,
    active_count: usize,
}

impl Scheduler {
    /// Create a scheduler over `num_cores` cores, all free.
    ///
    /// # Errors
    ///
    /// A zero-core pool could never drain its queue, so `num_cores == 0` is
    /// rejected here instead of stalling silently.
    pub fn new(num_cores: usize) -> Result<Self, SimError> {
        if num_cores == 0 {
            return Err(SimError::InvalidConfig(
                "num_cores must be at least 1".into(),
            ));
        }
        Ok(Self {
            cores: (0..num_cores)
                .map(|index| CoreSlot {
                    index,
                    occupant: None,
                })
                .collect(),
            waiting: VecDeque::new(),
            active_count: 0,
        })
    }

    /// Append a task to the tail of the waiting queue. The queue is unbounded.
    pub fn enqueue(&mut self, task_id: TaskId) {
        self.waiting.push_back(task_id);
        tracing::debug!(task_id, depth = self.waiting.len(), "task enqueued");
    }

    /// Bind queued tasks to free cores until no core is free or the queue is
    /// empty.
    ///
    /// Deterministic greedy first-fit: cores are scanned in ascending index
    /// order and always preferred that way; tasks are served strictly
    /// oldest-first. Starvation-free by construction, since every waiting
    /// task is eventually popped in arrival order once a core frees.
    ///
    /// Returns the bindings made, in the order they were made. The caller
    /// drives the bound tasks into execution and recomputes lock status and
    /// phase.
    pub fn assign(&mut self) -> Vec<Binding> {
        let mut bindings = Vec::new();
        for i in 0..self.cores.len() {
            if self.cores[i].occupied() {
                continue;
            }
            let Some(task_id) = self.waiting.pop_front() else {
                break;
            };
            self.cores[i].occupant = Some(task_id);
            self.active_count += 1;
            tracing::info!(task_id, core = i, "task bound to core");
            bindings.push(Binding {
                task_id,
                core_index: i,
            });
        }
        bindings
    }

    /// Free a core whose task retired.
    ///
    /// Callers re-run [`assign`](Self::assign) within the same event handler
    /// so waiting work is drained eagerly.
    ///
    /// # Errors
    ///
    /// Releasing an out-of-range or already-vacant core indicates a defect in
    /// the lifecycle coupling and is surfaced rather than swallowed.
    pub fn release(&mut self, core_index: usize) -> Result<TaskId, SimError> {
        let slot = self
            .cores
            .get_mut(core_index)
            .ok_or(SimError::CoreOutOfRange(core_index))?;
        let task_id = slot
            .occupant
            .take()
            .ok_or(SimError::ReleaseVacant(core_index))?;
        self.active_count -= 1;
        tracing::info!(task_id, core = core_index, "core released");
        Ok(task_id)
    }

    /// Current lock status: locked iff any task is bound to a core.
    #[must_use]
    pub const fn lock_status(&self) -> LockStatus {
        if self.active_count > 0 {
            LockStatus::Locked
        } else {
            LockStatus::Unlocked
        }
    }

    /// Number of tasks currently bound to a core.
    #[must_use]
    pub const fn active_count(&self) -> usize {
        self.active_count
    }

    /// Current waiting-queue depth.
    #[must_use]
    pub fn queue_len(&self) -> usize {
        self.waiting.len()
    }

    /// Size of the core pool.
    #[must_use]
    pub fn num_cores(&self) -> usize {
        self.cores.len()
    }

    /// The core table, in index order.
    #[must_use]
    pub fn cores(&self) -> &[CoreSlot] {
        &self.cores
    }

    /// Waiting task ids in queue order, head first.
    #[must_use]
    pub fn waiting(&self) -> Vec<TaskId> {
        self.waiting.iter().copied().collect()
    }

    /// Verify the occupancy invariants against the live task table.
    ///
    /// A core is occupied iff exactly one live task has that core index and
    /// a capacity-counting state; `active_count` equals the number of such
    /// tasks; no waiting task holds a core; no id appears twice.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvariantViolated`] describing the first breach
    /// found.
    pub fn check_invariants(&self, tasks: &BTreeMap<TaskId, Task>) -> Result<(), SimError> {
        let mut bound = 0usize;
        for slot in &self.cores {
            match slot.occupant {
                Some(task_id) => {
                    let task = tasks.get(&task_id).ok_or_else(|| {
                        SimError::InvariantViolated(format!(
                            "core {} occupied by unknown task {task_id}",
                            slot.index
                        ))
                    })?;
                    if task.core_index != Some(slot.index) {
                        return Err(SimError::InvariantViolated(format!(
                            "task {task_id} bound to core {} but records {:?}",
                            slot.index, task.core_index
                        )));
                    }
                    if !task.state.is_bound() {
                        return Err(SimError::InvariantViolated(format!(
                            "task {task_id} occupies core {} in state {:?}",
                            slot.index, task.state
                        )));
                    }
                    bound += 1;
                }
                None => {
                    if let Some(task) = tasks
                        .values()
                        .find(|t| t.core_index == Some(slot.index) && t.state.is_bound())
                    {
                        return Err(SimError::InvariantViolated(format!(
                            "task {} claims vacant core {}",
                            task.id, slot.index
                        )));
                    }
                }
            }
        }
        if bound != self.active_count {
            return Err(SimError::InvariantViolated(format!(
                "active_count {} but {bound} cores occupied",
                self.active_count
            )));
        }
        let mut seen = std::collections::BTreeSet::new();
        for &task_id in &self.waiting {
            if !seen.insert(task_id) {
                return Err(SimError::InvariantViolated(format!(
                    "task {task_id} queued twice"
                )));
            }
            let task = tasks.get(&task_id).ok_or_else(|| {
                SimError::InvariantViolated(format!("queued task {task_id} not in live table"))
            })?;
            if task.core_index.is_some() {
                return Err(SimError::InvariantViolated(format!(
                    "queued task {task_id} holds core {:?}",
                    task.core_index
                )));
            }
        }
        Ok(())
    }
}
