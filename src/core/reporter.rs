//! Rate-limited ("debounced") surfacing of derived status labels.
//!
//! Lock status and phase are recomputed after every assignment-relevant
//! change, but their externally visible values may not flap faster than a
//! configured minimum interval. Each channel tracks the last value it
//! surfaced and when; a change inside the quiet window is held until the
//! window closes.
//!
//! Each channel owns at most one pending emission. A newer request inside
//! the window replaces the held value rather than scheduling a second timer,
//! so the surfaced value always reflects the most recent request; a request
//! that returns the channel to its currently surfaced value cancels the hold
//! outright. Stale wakeups are ignored via a generation counter.

use crate::core::phase::Phase;
use crate::core::scheduler::LockStatus;

/// Outcome of offering a value to a debounced channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// The value already matches what is surfaced; nothing to do.
    Unchanged,
    /// The value was surfaced immediately.
    Emitted,
    /// The value is held; wake the channel at `due_ms` with `generation`.
    Deferred {
        /// Engine-clock instant the hold expires.
        due_ms: u64,
        /// Token the wakeup must present to [`DebouncedChannel::fire`].
        generation: u64,
    },
    /// An existing hold absorbed the value; its wakeup is already scheduled.
    Coalesced,
}

#[derive(Debug)]
struct Pending<T> {
    value: T,
    generation: u64,
}

/// One debounced output channel.
#[derive(Debug)]
pub struct DebouncedChannel<T> {
    emitted: T,
    last_emit_ms: u64,
    min_interval_ms: u64,
    pending: Option<Pending<T>>,
    next_generation: u64,
}

impl<T> DebouncedChannel<T>
where
    T: Copy + PartialEq,
{
    /// Create a channel whose surfaced value starts as `initial`, with the
    /// quiet window anchored at clock zero.
    pub fn new(initial: T, min_interval_ms: u64) -> Self {
        Self {
            emitted: initial,
            last_emit_ms: 0,
            min_interval_ms,
            pending: None,
            next_generation: 0,
        }
    }

    /// Offer a newly computed value.
    pub fn offer(&mut self, value: T, now_ms: u64) -> Surface {
        if let Some(pending) = self.pending.as_mut() {
            if value == self.emitted {
                // The underlying value flapped back before the hold expired;
                // surfacing nothing is the latest-correct outcome.
                self.pending = None;
                return Surface::Unchanged;
            }
            pending.value = value;
            return Surface::Coalesced;
        }
        if value == self.emitted {
            return Surface::Unchanged;
        }
        let elapsed = now_ms.saturating_sub(self.last_emit_ms);
        if elapsed >= self.min_interval_ms {
            self.emitted = value;
            self.last_emit_ms = now_ms;
            return Surface::Emitted;
        }
        let due_ms = self.last_emit_ms + self.min_interval_ms;
        let generation = self.next_generation;
        self.next_generation += 1;
        self.pending = Some(Pending { value, generation });
        Surface::Deferred { due_ms, generation }
    }

    /// Handle a wakeup scheduled by an earlier [`Surface::Deferred`].
    ///
    /// Returns the newly surfaced value, or `None` when the hold was
    /// cancelled or superseded since the wakeup was scheduled.
    pub fn fire(&mut self, generation: u64, now_ms: u64) -> Option<T> {
        if !self
            .pending
            .as_ref()
            .is_some_and(|p| p.generation == generation)
        {
            return None;
        }
        let value = self.pending.take()?.value;
        self.emitted = value;
        self.last_emit_ms = now_ms;
        Some(value)
    }

    /// The currently surfaced value.
    pub fn emitted(&self) -> T {
        self.emitted
    }

    /// Engine-clock time of the last emission.
    pub const fn last_emit_ms(&self) -> u64 {
        self.last_emit_ms
    }

    /// The value currently held for later emission, if any.
    pub fn pending_value(&self) -> Option<T> {
        self.pending.as_ref().map(|p| p.value)
    }
}

/// Which reporter channel a wakeup belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChannel {
    /// The lock-status channel.
    Lock,
    /// The phase channel.
    Phase,
}

/// The two independent debounced channels narrating scheduler state.
#[derive(Debug)]
pub struct StatusReporter {
    lock: DebouncedChannel<LockStatus>,
    phase: DebouncedChannel<Phase>,
}

impl StatusReporter {
    /// Create a reporter surfacing `Unlocked` / `Idle` until told otherwise.
    #[must_use]
    pub fn new(min_interval_ms: u64) -> Self {
        Self {
            lock: DebouncedChannel::new(LockStatus::Unlocked, min_interval_ms),
            phase: DebouncedChannel::new(Phase::Idle, min_interval_ms),
        }
    }

    /// Offer a recomputed lock status.
    pub fn offer_lock(&mut self, value: LockStatus, now_ms: u64) -> Surface {
        self.lock.offer(value, now_ms)
    }

    /// Offer a recomputed phase.
    pub fn offer_phase(&mut self, value: Phase, now_ms: u64) -> Surface {
        self.phase.offer(value, now_ms)
    }

    /// Handle a lock-channel wakeup; returns the surfaced value, if any.
    pub fn fire_lock(&mut self, generation: u64, now_ms: u64) -> Option<LockStatus> {
        self.lock.fire(generation, now_ms)
    }

    /// Handle a phase-channel wakeup; returns the surfaced value, if any.
    pub fn fire_phase(&mut self, generation: u64, now_ms: u64) -> Option<Phase> {
        self.phase.fire(generation, now_ms)
    }

    /// Currently surfaced lock status.
    #[must_use]
    pub fn lock(&self) -> LockStatus {
        self.lock.emitted()
    }

    /// Currently surfaced phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase.emitted()
    }

    /// Lock value held for later emission, if any.
    #[must_use]
    pub fn pending_lock(&self) -> Option<LockStatus> {
        self.lock.pending_value()
    }

    /// Phase value held for later emission, if any.
    #[must_use]
    pub fn pending_phase(&self) -> Option<Phase> {
        self.phase.pending_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_offers_are_noops() {
        let mut ch = DebouncedChannel::new(LockStatus::Unlocked, 2_000);
        assert_eq!(ch.offer(LockStatus::Unlocked, 5_000), Surface::Unchanged);
        assert_eq!(ch.emitted(), LockStatus::Unlocked);
    }

    #[test]
    fn test_emits_immediately_outside_window() {
        let mut ch = DebouncedChannel::new(LockStatus::Unlocked, 2_000);
        assert_eq!(ch.offer(LockStatus::Locked, 2_500), Surface::Emitted);
        assert_eq!(ch.emitted(), LockStatus::Locked);
        assert_eq!(ch.last_emit_ms(), 2_500);
    }

    #[test]
    fn test_defers_inside_window() {
        let mut ch = DebouncedChannel::new(LockStatus::Unlocked, 2_000);
        assert_eq!(ch.offer(LockStatus::Locked, 3_000), Surface::Emitted);
        let surface = ch.offer(LockStatus::Unlocked, 4_000);
        assert_eq!(
            surface,
            Surface::Deferred {
                due_ms: 5_000,
                generation: 0
            }
        );
        // Still surfacing the old value until the hold expires.
        assert_eq!(ch.emitted(), LockStatus::Locked);
        assert_eq!(ch.fire(0, 5_000), Some(LockStatus::Unlocked));
        assert_eq!(ch.last_emit_ms(), 5_000);
    }

    #[test]
    fn test_newer_request_replaces_held_value() {
        let mut ch = DebouncedChannel::new(Phase::Idle, 2_000);
        assert_eq!(ch.offer(Phase::Growing, 3_000), Surface::Emitted);
        let Surface::Deferred { generation, .. } = ch.offer(Phase::AtCapacity, 3_500) else {
            panic!("expected deferral inside the window");
        };
        assert_eq!(ch.offer(Phase::Shrinking, 4_000), Surface::Coalesced);
        // The single wakeup surfaces the most recent request.
        assert_eq!(ch.fire(generation, 5_000), Some(Phase::Shrinking));
    }

    #[test]
    fn test_flap_back_cancels_hold() {
        let mut ch = DebouncedChannel::new(LockStatus::Unlocked, 2_000);
        assert_eq!(ch.offer(LockStatus::Locked, 3_000), Surface::Emitted);
        let Surface::Deferred { generation, .. } = ch.offer(LockStatus::Unlocked, 3_100) else {
            panic!("expected deferral inside the window");
        };
        assert_eq!(ch.offer(LockStatus::Locked, 3_200), Surface::Unchanged);
        // The stale wakeup must not fire.
        assert_eq!(ch.fire(generation, 5_000), None);
        assert_eq!(ch.emitted(), LockStatus::Locked);
    }

    #[test]
    fn test_stale_generation_ignored() {
        let mut ch = DebouncedChannel::new(Phase::Idle, 2_000);
        assert_eq!(ch.offer(Phase::Growing, 500), Surface::Deferred {
            due_ms: 2_000,
            generation: 0
        });
        assert_eq!(ch.fire(7, 2_000), None);
        assert_eq!(ch.fire(0, 2_000), Some(Phase::Growing));
    }

    #[test]
    fn test_channels_are_independent() {
        let mut reporter = StatusReporter::new(2_000);
        assert_eq!(reporter.offer_lock(LockStatus::Locked, 2_500), Surface::Emitted);
        // The lock emission does not consume the phase channel's window.
        assert_eq!(reporter.offer_phase(Phase::Growing, 2_500), Surface::Emitted);
        assert_eq!(reporter.lock(), LockStatus::Locked);
        assert_eq!(reporter.phase(), Phase::Growing);
    }

    #[test]
    fn test_at_most_one_visible_change_per_window() {
        let mut ch = DebouncedChannel::new(Phase::Idle, 2_000);
        assert_eq!(ch.offer(Phase::Growing, 2_000), Surface::Emitted);
        let mut visible_changes = 0;
        for (value, at) in [(Phase::AtCapacity, 2_100), (Phase::Shrinking, 3_900)] {
            match ch.offer(value, at) {
                Surface::Emitted => visible_changes += 1,
                Surface::Deferred { .. } | Surface::Coalesced | Surface::Unchanged => {}
            }
        }
        assert_eq!(visible_changes, 0);
        assert_eq!(ch.emitted(), Phase::Growing);
    }
}
