//! Per-move time management
//!
//! Each move gets a fixed wall-clock budget, and the move must be returned
//! within `budget - margin`. The search itself stops a small unwind reserve
//! earlier, so that leaving the recursion and answering the harness still
//! lands inside that allowance. When a move overruns anyway, the margin
//! grows for the following moves.

use std::time::{Duration, Instant};

use tracing::warn;

/// Default cushion between the search deadline and the budget
pub const DEFAULT_MARGIN: Duration = Duration::from_millis(250);

/// Upper bound on the adaptive margin
pub const DEFAULT_MAX_MARGIN: Duration = Duration::from_secs(2);

/// Time kept between the search deadline and the allowed time
pub const UNWIND_RESERVE: Duration = Duration::from_millis(25);

/// Wall-clock deadline for one search, polled cooperatively
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    at: Instant,
}

impl Deadline {
    pub fn new(start: Instant, allowed: Duration) -> Self {
        Self {
            start,
            at: start + allowed,
        }
    }

    #[inline]
    pub fn expired(&self) -> bool {
        Instant::now() >= self.at
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

}

/// Budget with an adaptive safety margin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBudget {
    budget: Duration,
    margin: Duration,
    max_margin: Duration,
}

impl TimeBudget {
    /// The margin never exceeds `max_margin` nor half the budget
    pub fn new(budget: Duration, margin: Duration, max_margin: Duration) -> Self {
        let mut time = Self {
            budget,
            margin,
            max_margin,
        };
        time.margin = time.cap(margin);
        time
    }

    #[inline]
    pub fn margin(&self) -> Duration {
        self.margin
    }

    /// Time a move may take, from the call to the returned cell
    #[inline]
    pub fn allowed(&self) -> Duration {
        self.budget.saturating_sub(self.margin)
    }

    /// Time the search may run: the allowance minus the unwind reserve,
    /// which never takes more than a quarter of the allowance
    #[inline]
    pub fn search_window(&self) -> Duration {
        let allowed = self.allowed();
        allowed.saturating_sub(UNWIND_RESERVE.min(allowed / 4))
    }

    /// Search deadline for a move whose clock started at `start`
    pub fn deadline(&self, start: Instant) -> Deadline {
        Deadline::new(start, self.search_window())
    }

    /// Record how long a move took; grows the margin when the search ran
    /// past its deadline by more than half the margin. Returns whether the
    /// margin changed.
    pub fn record(&mut self, elapsed: Duration) -> bool {
        let overshoot = elapsed.saturating_sub(self.allowed());
        if overshoot <= self.margin / 2 {
            return false;
        }

        let grown = self.cap(self.margin + overshoot * 2);
        if grown == self.margin {
            return false;
        }
        warn!(
            elapsed_ms = elapsed.as_millis() as u64,
            budget_ms = self.budget.as_millis() as u64,
            old_margin_ms = self.margin.as_millis() as u64,
            new_margin_ms = grown.as_millis() as u64,
            "move overran its deadline, growing safety margin"
        );
        self.margin = grown;
        true
    }

    #[inline]
    fn cap(&self, margin: Duration) -> Duration {
        margin.min(self.max_margin).min(self.budget / 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_margin_capped_at_half_budget() {
        let time = TimeBudget::new(ms(300), ms(250), DEFAULT_MAX_MARGIN);
        assert_eq!(time.margin(), ms(150));
        assert_eq!(time.allowed(), ms(150));
    }

    #[test]
    fn test_on_time_move_keeps_margin() {
        let mut time = TimeBudget::new(ms(1_000), ms(200), DEFAULT_MAX_MARGIN);
        assert!(!time.record(ms(500)));
        // Within half a margin past the deadline
        assert!(!time.record(ms(850)));
        assert_eq!(time.margin(), ms(200));
    }

    #[test]
    fn test_overrun_grows_margin() {
        let mut time = TimeBudget::new(ms(1_000), ms(200), DEFAULT_MAX_MARGIN);
        // Deadline at 800ms, finished at 950ms: 150ms over
        assert!(time.record(ms(950)));
        assert_eq!(time.margin(), ms(500));
        assert_eq!(time.allowed(), ms(500));
    }

    #[test]
    fn test_margin_growth_capped() {
        let mut time = TimeBudget::new(ms(10_000), ms(200), ms(1_000));
        assert!(time.record(ms(10_000)));
        assert_eq!(time.margin(), ms(600));
        assert!(time.record(ms(10_000)));
        assert_eq!(time.margin(), ms(1_000));
        // Already at the cap
        assert!(!time.record(ms(10_000)));
    }

    #[test]
    fn test_deadline_expiry() {
        assert!(Deadline::new(Instant::now(), Duration::ZERO).expired());

        let deadline = Deadline::new(Instant::now(), Duration::from_secs(60));
        assert!(!deadline.expired());
        assert!(deadline.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_search_window_keeps_unwind_reserve() {
        let time = TimeBudget::new(ms(1_000), ms(250), DEFAULT_MAX_MARGIN);
        assert_eq!(time.allowed(), ms(750));
        assert_eq!(time.search_window(), ms(725));

        // Small allowances give up at most a quarter
        let tight = TimeBudget::new(ms(80), ms(40), DEFAULT_MAX_MARGIN);
        assert_eq!(tight.allowed(), ms(40));
        assert_eq!(tight.search_window(), ms(30));

        let start = Instant::now();
        let deadline = time.deadline(start);
        assert!(!deadline.expired());
        if let Some(earlier) = start.checked_sub(ms(725)) {
            assert!(time.deadline(earlier).expired());
        }
    }
}
