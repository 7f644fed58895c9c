//! Cancel-and-reschedule debouncing that does not depend on any event loop.
//!
//! Callers supply the current [`Instant`] on every call, which keeps the
//! primitive usable from a terminal loop, a GUI tick or a test with a fake
//! clock.

use std::time::{Duration, Instant};

/// Quiescence window used for typed quantities.
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(150);

/// Holds at most one pending value. Scheduling a new value replaces the old
/// one and restarts the window, so only the latest value in a burst is ever
/// released.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Replaces any pending value and restarts the window from `now`.
    pub fn schedule(
        &mut self,
        value: T,
        now: Instant,
    ) {
        self.pending = Some((value, now + self.window));
    }

    /// Releases the pending value if its window has elapsed by `now`.
    pub fn poll(
        &mut self,
        now: Instant,
    ) -> Option<T> {
        match self.pending {
            Some((_, deadline)) if now >= deadline => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    /// Releases the pending value immediately, whatever the time.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    /// Drops the pending value without releasing it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value becomes due.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}
