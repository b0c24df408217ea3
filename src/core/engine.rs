//! The discrete-event simulation engine.
//!
//! All timing is expressed as one time-ordered event heap over a virtual
//! millisecond clock, instead of chained timer callbacks. Each event
//! handler runs to completion before the next fires, reproducing
//! single-threaded cooperative semantics; same-instant events fire in
//! scheduling order. The engine owns every mutable piece of simulation state
//! and is the only writer of the scheduler, the task table, and the
//! reporter.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

use uuid::Uuid;

use crate::config::SimConfig;
use crate::core::error::SimError;
use crate::core::generator::TaskGenerator;
use crate::core::log::{EventSink, LogEntry, TaskEventKind};
use crate::core::phase::{classify, Phase};
use crate::core::reporter::{StatusChannel, StatusReporter, Surface};
use crate::core::scheduler::Scheduler;
use crate::core::task::{Task, TaskId, TaskState};
use crate::runtime::api::{CoreView, SimSnapshot, TaskView};
use crate::util::rng::DelaySource;

/// Timer-fired occurrences the engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SimEvent {
    /// The generator's periodic tick.
    GeneratorTick,
    /// A task's randomized execution dwell elapsed.
    ExecutingElapsed(TaskId),
    /// A task's completion dwell elapsed.
    CompletingElapsed(TaskId),
    /// A task's removal dwell elapsed; it retires now.
    RemovingElapsed(TaskId),
    /// A debounced status channel's quiet window expired.
    StatusDue {
        channel: StatusChannel,
        generation: u64,
    },
}

/// Heap entry ordering events by due time, then scheduling order.
#[derive(Debug)]
struct QueuedEvent {
    due_ms: u64,
    seq: u64,
    event: SimEvent,
}

impl PartialEq for QueuedEvent {
    fn eq(&self, other: &Self) -> bool {
        self.due_ms == other.due_ms && self.seq == other.seq
    }
}

impl Eq for QueuedEvent {}

impl PartialOrd for QueuedEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap behavior on a max-heap.
        other
            .due_ms
            .cmp(&self.due_ms)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// One simulation run: virtual clock, event heap, and every collaborator.
pub struct Simulation {
    run_id: Uuid,
    cfg: SimConfig,
    now_ms: u64,
    next_seq: u64,
    events: BinaryHeap<QueuedEvent>,
    tasks: BTreeMap<TaskId, Task>,
    scheduler: Scheduler,
    generator: TaskGenerator,
    reporter: StatusReporter,
    delay: Box<dyn DelaySource>,
    sink: Box<dyn EventSink>,
    log_count: usize,
}

impl Simulation {
    /// Build a simulation from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] when the configuration is
    /// rejected (for example a zero-core pool).
    pub fn new(
        cfg: SimConfig,
        delay: Box<dyn DelaySource>,
        sink: Box<dyn EventSink>,
    ) -> Result<Self, SimError> {
        cfg.validate().map_err(SimError::InvalidConfig)?;
        let scheduler = Scheduler::new(cfg.num_cores)?;
        let generator = TaskGenerator::new(cfg.enqueue_interval_ms, cfg.total_tasks);
        let reporter = StatusReporter::new(cfg.min_status_interval_ms);
        let mut sim = Self {
            run_id: Uuid::new_v4(),
            now_ms: 0,
            next_seq: 0,
            events: BinaryHeap::new(),
            tasks: BTreeMap::new(),
            scheduler,
            generator,
            reporter,
            delay,
            sink,
            log_count: 0,
            cfg,
        };
        if !sim.generator.exhausted() {
            let first_tick = sim.generator.interval_ms();
            sim.schedule(first_tick, SimEvent::GeneratorTick);
        }
        tracing::info!(run_id = %sim.run_id, cores = sim.cfg.num_cores, total = sim.cfg.total_tasks, "simulation created");
        Ok(sim)
    }

    /// Process the next event, if any, returning its timestamp.
    ///
    /// # Errors
    ///
    /// Propagates invariant violations; these indicate a defect in the
    /// scheduler/lifecycle coupling and are never swallowed.
    pub fn step(&mut self) -> Result<Option<u64>, SimError> {
        let Some(next) = self.events.pop() else {
            return Ok(None);
        };
        self.now_ms = next.due_ms;
        match next.event {
            SimEvent::GeneratorTick => self.on_generator_tick()?,
            SimEvent::ExecutingElapsed(id) => self.on_executing_elapsed(id)?,
            SimEvent::CompletingElapsed(id) => self.on_completing_elapsed(id)?,
            SimEvent::RemovingElapsed(id) => self.on_removing_elapsed(id)?,
            SimEvent::StatusDue {
                channel,
                generation,
            } => self.on_status_due(channel, generation),
        }
        #[cfg(debug_assertions)]
        self.scheduler.check_invariants(&self.tasks)?;
        Ok(Some(next.due_ms))
    }

    /// Run until the event heap is empty.
    ///
    /// Terminates for every valid configuration: the generator stops at its
    /// total, each task's dwell chain is finite, and debounce holds expire.
    ///
    /// # Errors
    ///
    /// Propagates the first error from [`step`](Self::step).
    pub fn run_to_completion(&mut self) -> Result<(), SimError> {
        while self.step()?.is_some() {}
        Ok(())
    }

    /// Process every event due at or before `until_ms`, then park the clock
    /// there.
    ///
    /// # Errors
    ///
    /// Propagates the first error from [`step`](Self::step).
    pub fn run_until(&mut self, until_ms: u64) -> Result<(), SimError> {
        while self.peek_due().is_some_and(|due| due <= until_ms) {
            self.step()?;
        }
        self.now_ms = self.now_ms.max(until_ms);
        Ok(())
    }

    /// Due time of the next pending event.
    #[must_use]
    pub fn peek_due(&self) -> Option<u64> {
        self.events.peek().map(|e| e.due_ms)
    }

    /// Current virtual-clock reading in milliseconds.
    #[must_use]
    pub const fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Identifier correlating this run's snapshots and telemetry.
    #[must_use]
    pub const fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// The scheduler's current state.
    #[must_use]
    pub const fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// The debounced status reporter.
    #[must_use]
    pub const fn reporter(&self) -> &StatusReporter {
        &self.reporter
    }

    /// A live task by id.
    #[must_use]
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(&id)
    }

    /// Number of live (not yet retired) tasks.
    #[must_use]
    pub fn live_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// The instantaneous (un-debounced) phase classification.
    #[must_use]
    pub fn classify_now(&self) -> Phase {
        classify(
            self.scheduler.active_count(),
            self.scheduler.queue_len(),
            self.scheduler.num_cores(),
        )
    }

    /// Serializable view of the run for renderers.
    #[must_use]
    pub fn snapshot(&self) -> SimSnapshot {
        SimSnapshot {
            run_id: self.run_id.to_string(),
            now_ms: self.now_ms,
            phase: self.reporter.phase(),
            lock: self.reporter.lock(),
            cores: self
                .scheduler
                .cores()
                .iter()
                .map(|slot| CoreView {
                    index: slot.index,
                    task: slot.occupant,
                })
                .collect(),
            tasks: self
                .tasks
                .values()
                .map(|task| TaskView {
                    id: task.id,
                    state: task.state,
                    core_index: task.core_index,
                })
                .collect(),
            waiting: self.scheduler.waiting(),
            produced: self.generator.produced(),
            log_len: self.log_count,
        }
    }

    fn schedule(&mut self, due_ms: u64, event: SimEvent) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.events.push(QueuedEvent { due_ms, seq, event });
    }

    fn record(&mut self, task_id: TaskId, kind: TaskEventKind, core_index: usize) {
        self.sink.record(LogEntry {
            task_id,
            kind,
            core_index,
            at_ms: self.now_ms,
        });
        self.log_count += 1;
    }

    fn on_generator_tick(&mut self) -> Result<(), SimError> {
        if let Some(task) = self.generator.produce(self.now_ms) {
            let id = task.id;
            self.tasks.insert(id, task);
            self.scheduler.enqueue(id);
            self.run_assign()?;
        }
        if !self.generator.exhausted() {
            let next = self.now_ms + self.generator.interval_ms();
            self.schedule(next, SimEvent::GeneratorTick);
        }
        Ok(())
    }

    /// Bind queued tasks to free cores and start them executing, then
    /// recompute both status channels.
    fn run_assign(&mut self) -> Result<(), SimError> {
        let bindings = self.scheduler.assign();
        for binding in bindings {
            let range = self.cfg.executing_delay_range;
            let units = self.delay.draw_units(range.min, range.max);
            let dwell_ms = units * 1_000;
            let task = self
                .tasks
                .get_mut(&binding.task_id)
                .ok_or(SimError::UnknownTask(binding.task_id))?;
            // The assigned state passes through instantaneously at bind time.
            task.state = TaskState::Executing;
            task.core_index = Some(binding.core_index);
            task.executing_delay_ms = Some(dwell_ms);
            self.record(
                binding.task_id,
                TaskEventKind::ExecutingStarted,
                binding.core_index,
            );
            let due = self.now_ms + dwell_ms;
            self.schedule(due, SimEvent::ExecutingElapsed(binding.task_id));
        }
        self.refresh_status();
        Ok(())
    }

    fn on_executing_elapsed(&mut self, id: TaskId) -> Result<(), SimError> {
        let core_index = self.advance_task(id, TaskState::Executing, TaskState::Completing)?;
        self.record(id, TaskEventKind::CompletingStarted, core_index);
        let due = self.now_ms + self.cfg.completing_duration_ms;
        self.schedule(due, SimEvent::CompletingElapsed(id));
        Ok(())
    }

    fn on_completing_elapsed(&mut self, id: TaskId) -> Result<(), SimError> {
        let core_index = self.advance_task(id, TaskState::Completing, TaskState::Removing)?;
        self.record(id, TaskEventKind::RemovingStarted, core_index);
        let due = self.now_ms + self.cfg.removing_duration_ms;
        self.schedule(due, SimEvent::RemovingElapsed(id));
        Ok(())
    }

    fn on_removing_elapsed(&mut self, id: TaskId) -> Result<(), SimError> {
        let core_index = self.advance_task(id, TaskState::Removing, TaskState::Done)?;
        self.record(id, TaskEventKind::Retired, core_index);
        self.tasks.remove(&id);
        let released = self.scheduler.release(core_index)?;
        if released != id {
            return Err(SimError::InvariantViolated(format!(
                "core {core_index} released task {released}, expected {id}"
            )));
        }
        // Transient reading between the release and the eager re-assign; the
        // reporter sees both, within this same event.
        self.refresh_status();
        self.run_assign()
    }

    fn advance_task(
        &mut self,
        id: TaskId,
        expected: TaskState,
        next: TaskState,
    ) -> Result<usize, SimError> {
        let task = self.tasks.get_mut(&id).ok_or(SimError::UnknownTask(id))?;
        if task.state != expected {
            return Err(SimError::InvariantViolated(format!(
                "task {id} advanced from {:?}, expected {expected:?}",
                task.state
            )));
        }
        task.state = next;
        task.core_index
            .ok_or_else(|| SimError::InvariantViolated(format!("task {id} advanced without a core")))
    }

    fn on_status_due(&mut self, channel: StatusChannel, generation: u64) {
        match channel {
            StatusChannel::Lock => {
                if let Some(status) = self.reporter.fire_lock(generation, self.now_ms) {
                    tracing::info!(status = %status, "lock status surfaced");
                }
            }
            StatusChannel::Phase => {
                if let Some(phase) = self.reporter.fire_phase(generation, self.now_ms) {
                    tracing::info!(phase = %phase, "phase surfaced");
                }
            }
        }
    }

    /// Recompute lock status and phase and offer both to the reporter,
    /// scheduling wakeups for deferred emissions.
    fn refresh_status(&mut self) {
        let lock = self.scheduler.lock_status();
        match self.reporter.offer_lock(lock, self.now_ms) {
            Surface::Emitted => tracing::info!(status = %lock, "lock status surfaced"),
            Surface::Deferred {
                due_ms,
                generation,
            } => self.schedule(
                due_ms,
                SimEvent::StatusDue {
                    channel: StatusChannel::Lock,
                    generation,
                },
            ),
            Surface::Unchanged | Surface::Coalesced => {}
        }
        let phase = self.classify_now();
        match self.reporter.offer_phase(phase, self.now_ms) {
            Surface::Emitted => tracing::info!(phase = %phase, "phase surfaced"),
            Surface::Deferred {
                due_ms,
                generation,
            } => self.schedule(
                due_ms,
                SimEvent::StatusDue {
                    channel: StatusChannel::Phase,
                    generation,
                },
            ),
            Surface::Unchanged | Surface::Coalesced => {}
        }
    }
}
