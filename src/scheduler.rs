//! Repeating refresh timer for the menu bar app.
//!
//! The tao event loop wakes on `ControlFlow::WaitUntil`; this timer only
//! tracks the next deadline and decides whether a wake-up is a refresh tick.
//! Time is passed in explicitly so the logic is testable.

use std::time::{Duration, Instant};

/// An owned, cancellable repeating timer.
#[derive(Debug)]
pub struct RefreshTimer {
    period: Duration,
    next_fire: Option<Instant>,
}

impl RefreshTimer {
    /// Create a stopped timer.
    pub fn new() -> Self {
        Self {
            period: Duration::from_secs(0),
            next_fire: None,
        }
    }

    /// Start (or restart) the timer with the given period in seconds.
    ///
    /// Any existing schedule is replaced; the first fire is one full period
    /// from `now`.
    pub fn start(&mut self, period_secs: u64, now: Instant) {
        self.period = Duration::from_secs(period_secs);
        self.next_fire = Some(now + self.period);
    }

    /// Stop the timer. Safe to call on a stopped timer.
    pub fn cancel(&mut self) {
        self.next_fire = None;
    }

    /// Whether the timer is scheduled.
    pub fn is_running(&self) -> bool {
        self.next_fire.is_some()
    }

    /// The instant of the next scheduled fire, if running.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.next_fire
    }

    /// Fire the timer if its deadline has passed.
    ///
    /// Fires at most once per call and re-arms at `now + period`, so a loop
    /// that was blocked (e.g. behind a modal dialog) catches up with a single
    /// tick instead of a burst.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.next_fire {
            Some(deadline) if now >= deadline => {
                self.next_fire = Some(now + self.period);
                true
            }
            _ => false,
        }
    }
}

impl Default for RefreshTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_timer_is_stopped() {
        let timer = RefreshTimer::new();
        assert!(!timer.is_running());
        assert_eq!(timer.next_deadline(), None);
    }

    #[test]
    fn test_start_schedules_one_period_out() {
        let mut timer = RefreshTimer::new();
        let now = Instant::now();
        timer.start(60, now);
        assert!(timer.is_running());
        assert_eq!(timer.next_deadline(), Some(now + Duration::from_secs(60)));
    }

    #[test]
    fn test_does_not_fire_before_deadline() {
        let mut timer = RefreshTimer::new();
        let now = Instant::now();
        timer.start(60, now);
        assert!(!timer.fire_if_due(now + Duration::from_secs(59)));
        assert!(timer.is_running());
    }

    #[test]
    fn test_fires_at_deadline_and_rearms() {
        let mut timer = RefreshTimer::new();
        let now = Instant::now();
        timer.start(60, now);

        let tick = now + Duration::from_secs(60);
        assert!(timer.fire_if_due(tick));
        assert_eq!(timer.next_deadline(), Some(tick + Duration::from_secs(60)));
    }

    #[test]
    fn test_late_fire_catches_up_with_single_tick() {
        let mut timer = RefreshTimer::new();
        let now = Instant::now();
        timer.start(10, now);

        // The loop was blocked for several periods.
        let late = now + Duration::from_secs(45);
        assert!(timer.fire_if_due(late));
        // Re-armed relative to the late fire, not the original schedule.
        assert_eq!(timer.next_deadline(), Some(late + Duration::from_secs(10)));
        assert!(!timer.fire_if_due(late + Duration::from_secs(9)));
    }

    #[test]
    fn test_restart_replaces_existing_schedule() {
        let mut timer = RefreshTimer::new();
        let now = Instant::now();
        timer.start(60, now);
        timer.start(5, now);
        assert_eq!(timer.next_deadline(), Some(now + Duration::from_secs(5)));
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut timer = RefreshTimer::new();
        let now = Instant::now();
        timer.start(60, now);

        timer.cancel();
        assert!(!timer.is_running());
        timer.cancel();
        assert!(!timer.is_running());
        assert!(!timer.fire_if_due(now + Duration::from_secs(120)));
    }
}
