//! Debounced recount scheduling
//!
//! Every document or query edit invalidates the match count, and a burst of
//! keystrokes would otherwise trigger one bounded-but-not-free rescan per
//! key. The scheduler coalesces a burst into a single rescan that fires once
//! no invalidation has arrived for a full quiescence window.
//!
//! The scheduler does not own a timer thread. The host polls it from its
//! event loop, and time is read through a [`Clock`] so tests can drive it
//! with a [`ManualClock`].
//!
//! # Usage
//!
//! ```ignore
//! let mut scheduler = RecomputeScheduler::new(Duration::from_millis(50), SystemClock);
//! scheduler.invalidate();
//! // ... later, on the event loop
//! scheduler.fire_if_due(|| session_rescan());
//! ```

use log::trace;
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

// ─────────────────────────────────────────────────────────────────────────────
// Clocks
// ─────────────────────────────────────────────────────────────────────────────

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same time, so a test can keep one handle and give
/// another to the scheduler.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    /// Move time forward by `by`.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Recompute Scheduler
// ─────────────────────────────────────────────────────────────────────────────

/// Coalesces invalidations into one deferred rescan per quiet period.
#[derive(Debug)]
pub struct RecomputeScheduler<C: Clock = SystemClock> {
    clock: C,
    window: Duration,
    /// When the pending rescan becomes due; `None` when idle
    deadline: Option<Instant>,
    /// Invalidations folded into the pending rescan
    coalesced: u32,
}

impl<C: Clock> RecomputeScheduler<C> {
    pub fn new(window: Duration, clock: C) -> Self {
        Self {
            clock,
            window,
            deadline: None,
            coalesced: 0,
        }
    }

    /// The quiescence window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// The clock this scheduler reads.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Request a rescan, restarting the quiescence window.
    pub fn invalidate(&mut self) {
        self.deadline = Some(self.clock.now() + self.window);
        self.coalesced += 1;
    }

    /// Whether a rescan is waiting to fire.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// When the pending rescan becomes due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// How long the host may idle before the next `poll` can fire.
    pub fn time_until_fire(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(self.clock.now()))
    }

    /// Returns `true` exactly once per quiet period, when the window has
    /// elapsed since the last invalidation.
    pub fn poll(&mut self) -> bool {
        match self.deadline {
            Some(deadline) if self.clock.now() >= deadline => {
                trace!("Firing rescan after {} invalidation(s)", self.coalesced);
                self.deadline = None;
                self.coalesced = 0;
                true
            }
            _ => false,
        }
    }

    /// Run `on_fire` if the pending rescan is due; returns whether it ran.
    pub fn fire_if_due<F: FnOnce()>(&mut self, on_fire: F) -> bool {
        let due = self.poll();
        if due {
            on_fire();
        }
        due
    }

    /// Drop any pending rescan.
    pub fn cancel(&mut self) {
        self.deadline = None;
        self.coalesced = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(50);

    fn scheduler() -> (RecomputeScheduler<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        (RecomputeScheduler::new(WINDOW, clock.clone()), clock)
    }

    #[test]
    fn test_idle_scheduler_never_fires() {
        let (mut scheduler, clock) = scheduler();
        clock.advance(Duration::from_secs(10));
        assert!(!scheduler.is_pending());
        assert!(!scheduler.poll());
    }

    #[test]
    fn test_fires_once_after_window() {
        let (mut scheduler, clock) = scheduler();
        scheduler.invalidate();

        clock.advance(Duration::from_millis(49));
        assert!(!scheduler.poll());

        clock.advance(Duration::from_millis(1));
        assert!(scheduler.poll());
        assert!(!scheduler.poll());
        assert!(!scheduler.is_pending());
    }

    #[test]
    fn test_burst_coalesces_into_one_fire() {
        let (mut scheduler, clock) = scheduler();
        let mut fired = 0;

        for _ in 0..10 {
            scheduler.invalidate();
            clock.advance(Duration::from_millis(10));
            scheduler.fire_if_due(|| fired += 1);
        }
        assert_eq!(fired, 0);

        // Due one window after the last call, which was 10ms ago
        clock.advance(Duration::from_millis(39));
        scheduler.fire_if_due(|| fired += 1);
        assert_eq!(fired, 0);

        clock.advance(Duration::from_millis(1));
        scheduler.fire_if_due(|| fired += 1);
        assert_eq!(fired, 1);

        clock.advance(Duration::from_secs(1));
        scheduler.fire_if_due(|| fired += 1);
        assert_eq!(fired, 1);
    }

    #[test]
    fn test_invalidate_restarts_window() {
        let (mut scheduler, clock) = scheduler();
        scheduler.invalidate();
        clock.advance(Duration::from_millis(40));
        scheduler.invalidate();
        clock.advance(Duration::from_millis(40));
        assert!(!scheduler.poll());
        clock.advance(Duration::from_millis(10));
        assert!(scheduler.poll());
    }

    #[test]
    fn test_time_until_fire() {
        let (mut scheduler, clock) = scheduler();
        assert_eq!(scheduler.time_until_fire(), None);

        scheduler.invalidate();
        assert_eq!(scheduler.time_until_fire(), Some(WINDOW));

        clock.advance(Duration::from_millis(80));
        assert_eq!(scheduler.time_until_fire(), Some(Duration::ZERO));
        assert!(scheduler.next_deadline().is_some());
    }

    #[test]
    fn test_cancel_drops_pending() {
        let (mut scheduler, clock) = scheduler();
        scheduler.invalidate();
        scheduler.cancel();
        clock.advance(WINDOW);
        assert!(!scheduler.poll());
    }

    #[test]
    fn test_zero_window_fires_on_next_poll() {
        let mut scheduler = RecomputeScheduler::new(Duration::ZERO, ManualClock::new());
        scheduler.invalidate();
        assert!(scheduler.poll());
    }

    #[test]
    fn test_system_clock_scheduler() {
        let mut scheduler = RecomputeScheduler::new(Duration::ZERO, SystemClock);
        assert_eq!(scheduler.window(), Duration::ZERO);
        scheduler.invalidate();
        assert!(scheduler.poll());
    }
}
