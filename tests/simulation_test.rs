//! End-to-end simulation tests.
//!
//! These validate:
//! 1. The saturation scenario: with all four cores occupied at the fifth
//!    task's generation, the phase reads At Capacity, not Growing, despite
//!    the queued backlog
//! 2. The transient Growing reading when a core frees, resolved back to
//!    At Capacity by the same-callback re-assign
//! 3. Per-task log ordering across a full run
//! 4. Execution dwells drawn only from the configured range
//! 5. The Overloaded classification staying dead under the scheduler's
//!    own capacity invariant
//! 6. A full run draining back to Idle / Unlocked

use coregrid::builders::SimulationBuilder;
use coregrid::config::{DelayRange, SimConfig};
use coregrid::core::{LockStatus, Phase, Simulation, TaskEventKind};
use coregrid::infra::log::memory::InMemoryEventLog;
use coregrid::util::rng::FixedDelay;

/// The reference scenario: 4 cores, 20 tasks, one arrival every 2.5 s.
/// A fixed 10 s execution dwell keeps every early task on its core long
/// enough that the fifth arrival finds the pool saturated.
fn saturating_scenario() -> (Simulation, InMemoryEventLog) {
    let log = InMemoryEventLog::new();
    let cfg = SimConfig {
        num_cores: 4,
        total_tasks: 20,
        enqueue_interval_ms: 2_500,
        executing_delay_range: DelayRange { min: 10, max: 10 },
        ..SimConfig::default()
    };
    let sim = SimulationBuilder::new()
        .with_config(cfg)
        .with_delay_source(Box::new(FixedDelay(10)))
        .with_event_sink(Box::new(log.clone()))
        .build()
        .unwrap();
    (sim, log)
}

#[test]
fn test_fifth_task_queues_against_a_saturated_pool() {
    let (mut sim, _log) = saturating_scenario();

    // Fifth generation tick lands at 12.5 s; tasks 1-4 are still on core.
    sim.run_until(12_500).unwrap();

    assert_eq!(sim.scheduler().active_count(), 4);
    assert_eq!(sim.scheduler().queue_len(), 1);
    // Backlog is not reflected once the cores are saturated.
    assert_eq!(sim.classify_now(), Phase::AtCapacity);
    assert_eq!(sim.reporter().phase(), Phase::AtCapacity);
    assert_eq!(sim.reporter().lock(), LockStatus::Locked);
}

#[test]
fn test_transient_growing_resolves_back_to_at_capacity() {
    let (mut sim, _log) = saturating_scenario();

    // Task 1 retires at 15.5 s (10 s executing + 1 s completing + 2 s
    // removing after its 2.5 s assignment). Park just before it.
    sim.run_until(15_000).unwrap();
    assert_eq!(sim.peek_due(), Some(15_500));
    sim.step().unwrap();

    // Inside the retire callback the release surfaced the momentary Growing
    // reading, and the eager re-assign immediately restored a saturated
    // pool; the At Capacity emission is held by the debounce window.
    assert_eq!(sim.reporter().phase(), Phase::Growing);
    assert_eq!(sim.reporter().pending_phase(), Some(Phase::AtCapacity));
    assert_eq!(sim.classify_now(), Phase::AtCapacity);
    assert_eq!(sim.scheduler().active_count(), 4);

    // When the window closes the surfaced label catches up.
    sim.run_until(17_500).unwrap();
    assert_eq!(sim.reporter().phase(), Phase::AtCapacity);
}

#[test]
fn test_full_run_drains_to_idle() {
    let (mut sim, log) = saturating_scenario();
    sim.run_to_completion().unwrap();

    assert_eq!(sim.live_tasks(), 0);
    assert_eq!(sim.scheduler().active_count(), 0);
    assert_eq!(sim.scheduler().queue_len(), 0);
    assert_eq!(sim.reporter().phase(), Phase::Idle);
    assert_eq!(sim.reporter().lock(), LockStatus::Unlocked);

    // 20 tasks, four boundary crossings each.
    assert_eq!(log.len(), 80);
}

#[test]
fn test_per_task_log_entries_are_ordered() {
    let log = InMemoryEventLog::new();
    let mut sim = SimulationBuilder::new()
        .with_seed(2024)
        .with_event_sink(Box::new(log.clone()))
        .build()
        .unwrap();
    sim.run_to_completion().unwrap();

    let expected_kinds = [
        TaskEventKind::ExecutingStarted,
        TaskEventKind::CompletingStarted,
        TaskEventKind::RemovingStarted,
        TaskEventKind::Retired,
    ];
    for task_id in 1..=20 {
        let entries: Vec<_> = log
            .entries()
            .into_iter()
            .filter(|e| e.task_id == task_id)
            .collect();
        assert_eq!(entries.len(), 4, "task {task_id} boundary count");
        for (entry, expected) in entries.iter().zip(expected_kinds) {
            assert_eq!(entry.kind, expected, "task {task_id} boundary order");
        }
        for pair in entries.windows(2) {
            assert!(
                pair[0].at_ms < pair[1].at_ms,
                "task {task_id} timestamps must strictly increase"
            );
        }
        // All four crossings happen on the task's one core.
        assert!(entries.iter().all(|e| e.core_index == entries[0].core_index));
    }
}

#[test]
fn test_executing_dwells_stay_in_the_configured_range() {
    let log = InMemoryEventLog::new();
    let mut sim = SimulationBuilder::new()
        .with_seed(7)
        .with_event_sink(Box::new(log.clone()))
        .build()
        .unwrap();
    sim.run_to_completion().unwrap();

    for task_id in 1..=20 {
        let entries: Vec<_> = log
            .entries()
            .into_iter()
            .filter(|e| e.task_id == task_id)
            .collect();
        let started = entries
            .iter()
            .find(|e| e.kind == TaskEventKind::ExecutingStarted)
            .unwrap()
            .at_ms;
        let finished = entries
            .iter()
            .find(|e| e.kind == TaskEventKind::CompletingStarted)
            .unwrap()
            .at_ms;
        let dwell_secs = (finished - started) / 1_000;
        assert_eq!((finished - started) % 1_000, 0);
        assert!(
            (2..=5).contains(&dwell_secs),
            "task {task_id} dwell {dwell_secs}s outside [2, 5]"
        );
    }
}

#[test]
fn test_overloaded_stays_dead_under_the_capacity_invariant() {
    let (mut sim, _log) = saturating_scenario();
    let cores = sim.scheduler().num_cores();

    while sim.step().unwrap().is_some() {
        // Assignment only ever binds onto free cores, so the defensive
        // Overloaded branch must never become observable.
        assert!(sim.scheduler().active_count() <= cores);
        assert_ne!(sim.classify_now(), Phase::Overloaded);
        assert_ne!(sim.reporter().phase(), Phase::Overloaded);
    }
}

#[test]
fn test_log_timestamps_render_with_millisecond_precision() {
    let (mut sim, log) = saturating_scenario();
    sim.run_to_completion().unwrap();

    let first = &log.entries()[0];
    // Task 1 entered core 1 at the first generation tick.
    assert_eq!(first.task_id, 1);
    assert_eq!(first.kind, TaskEventKind::ExecutingStarted);
    assert_eq!(first.timestamp(), "00:00:02.500");
    assert_eq!(first.to_string(), "Task 1 entered core 1 at 00:00:02.500");
}
