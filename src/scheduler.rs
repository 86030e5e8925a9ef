//! Adaptive scheduling: the 3-branch tick classifier and its timer state.
//!
//! Each tick classifies the channel (no session / chat gone quiet / chat
//! active), optionally fires a post, and picks the delay until the next
//! tick. The bot's event loop owns the single timer slot and re-arms it
//! with the chosen delay; `classify` itself is a pure function so tests can
//! probe every branch without timers.

use crate::config::IntervalRange;
use rand::Rng;
use std::time::Duration;
use tokio::time::Instant;

/// Scheduler timer state. Owned by the bot's event loop; mutated only by
/// ticks and shutdown.
#[derive(Debug, Default)]
pub struct SchedulerState {
    /// The single pending-timer slot: when the next tick fires, if armed.
    pub deadline: Option<Instant>,
    /// Once set, no further timer is armed and ticks become no-ops.
    pub stopped: bool,
}

impl SchedulerState {
    /// Fresh state: not stopped, no timer armed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the timer slot for `delay` from `now`. No-op once stopped.
    pub fn arm(&mut self, now: Instant, delay: Duration) {
        if self.stopped {
            return;
        }
        self.deadline = Some(now + delay);
    }

    /// Clear the timer slot, guaranteeing no pending tick fires.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

/// What a tick decided to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickBranch {
    /// No session resolved yet; probe again soon.
    StartupProbe,
    /// Chat has been silent past the threshold; back off.
    Backoff,
    /// Chat is active; post a quote.
    Post,
}

/// Classify one tick.
///
/// Evaluated in strict order: no session wins over everything; silence past
/// `threshold` (or never having heard chat at all) backs off; otherwise a
/// post fires. Pure: identical inputs give the identical branch.
#[must_use]
pub fn classify(connected: bool, idle: Option<Duration>, threshold: Duration) -> TickBranch {
    if !connected {
        return TickBranch::StartupProbe;
    }

    match idle {
        Some(idle) if idle <= threshold => TickBranch::Post,
        _ => TickBranch::Backoff,
    }
}

/// Pick a delay uniformly from the closed range.
pub fn pick_delay<R: Rng>(range: IntervalRange, rng: &mut R) -> Duration {
    Duration::from_secs(rng.gen_range(range.min..=range.max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const THRESHOLD: Duration = Duration::from_secs(300);

    #[test]
    fn disconnected_always_probes() {
        assert_eq!(
            classify(false, Some(Duration::ZERO), THRESHOLD),
            TickBranch::StartupProbe
        );
        assert_eq!(classify(false, None, THRESHOLD), TickBranch::StartupProbe);
    }

    #[test]
    fn silent_chat_backs_off() {
        assert_eq!(
            classify(true, Some(Duration::from_secs(301)), THRESHOLD),
            TickBranch::Backoff
        );
    }

    #[test]
    fn never_heard_chat_backs_off() {
        assert_eq!(classify(true, None, THRESHOLD), TickBranch::Backoff);
    }

    #[test]
    fn active_chat_posts() {
        assert_eq!(
            classify(true, Some(Duration::from_secs(10)), THRESHOLD),
            TickBranch::Post
        );
    }

    #[test]
    fn idle_exactly_at_threshold_still_posts() {
        // Backoff requires idle strictly greater than the threshold.
        assert_eq!(classify(true, Some(THRESHOLD), THRESHOLD), TickBranch::Post);
    }

    #[test]
    fn reclassification_is_idempotent() {
        let inputs = [
            (false, None),
            (true, None),
            (true, Some(Duration::from_secs(5))),
            (true, Some(Duration::from_secs(5000))),
        ];
        for (connected, idle) in inputs {
            let first = classify(connected, idle, THRESHOLD);
            let second = classify(connected, idle, THRESHOLD);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn picked_delay_stays_in_range() {
        let range = IntervalRange { min: 10, max: 30 };
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..200 {
            let delay = pick_delay(range, &mut rng);
            assert!(delay >= Duration::from_secs(10));
            assert!(delay <= Duration::from_secs(30));
        }
    }

    #[test]
    fn degenerate_range_is_exact() {
        let range = IntervalRange { min: 42, max: 42 };
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(pick_delay(range, &mut rng), Duration::from_secs(42));
    }

    #[tokio::test(start_paused = true)]
    async fn arm_sets_single_deadline() {
        let mut state = SchedulerState::new();
        let now = Instant::now();

        state.arm(now, Duration::from_secs(10));
        assert_eq!(state.deadline, Some(now + Duration::from_secs(10)));

        // Re-arming replaces the slot rather than stacking timers.
        state.arm(now, Duration::from_secs(20));
        assert_eq!(state.deadline, Some(now + Duration::from_secs(20)));
    }

    #[tokio::test(start_paused = true)]
    async fn stopped_state_refuses_to_arm() {
        let mut state = SchedulerState::new();
        state.stopped = true;

        state.arm(Instant::now(), Duration::from_secs(10));
        assert!(state.deadline.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_clears_deadline() {
        let mut state = SchedulerState::new();
        state.arm(Instant::now(), Duration::from_secs(10));

        state.cancel();
        assert!(state.deadline.is_none());
    }
}
