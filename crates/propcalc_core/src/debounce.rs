//! Trailing-edge debounce for recomputation on field edits
//!
//! The timer does not own a clock; callers pass `now` so that event loops and
//! tests drive it the same way.

use std::time::Duration;

use web_time::Instant;

/// Default quiet period before a recompute fires
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Register a call. Any pending call is replaced, so only the last one
    /// inside the window fires.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true exactly once when the pending call is due
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Time left before the pending call fires
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(200);

    #[test]
    fn test_fires_once_after_delay() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        debouncer.schedule(start);

        assert!(!debouncer.poll(start + Duration::from_millis(199)));
        assert!(debouncer.poll(start + DELAY));
        assert!(!debouncer.poll(start + DELAY * 2));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_new_input_replaces_pending_call() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        debouncer.schedule(start);
        debouncer.schedule(start + Duration::from_millis(150));

        // The first deadline has passed but was superseded
        assert!(!debouncer.poll(start + Duration::from_millis(250)));
        assert_eq!(
            debouncer.time_until_due(start + Duration::from_millis(250)),
            Some(Duration::from_millis(100))
        );
        assert!(debouncer.poll(start + Duration::from_millis(350)));
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut debouncer = Debouncer::default();
        debouncer.schedule(start);
        debouncer.cancel();
        assert!(!debouncer.poll(start + Duration::from_secs(1)));
        assert_eq!(debouncer.time_until_due(start), None);
    }
}
