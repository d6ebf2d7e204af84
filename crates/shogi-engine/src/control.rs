//! Cooperative cancellation and time budget for a single search.
//!
//! There is no pre-emption: both the iterative-deepening loop and the
//! recursive alpha-beta search consult [`SearchControl::should_stop`] at
//! their own boundaries. `stop()` is idempotent and safe to call from
//! another thread while a search is in flight — the search never reads
//! concurrently-mutated state, only this one flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How often (in nodes) the recursive search re-checks the clock.
///
/// Checking every node would make `Instant::now()` a hot-path cost; once
/// per this many nodes is frequent enough that a blown time budget is
/// still caught within a few milliseconds.
const CLOCK_CHECK_INTERVAL: u64 = 1024;

/// Shared stop flag plus a time budget, checked cooperatively by the
/// search at every node and at every iterative-deepening boundary.
pub struct SearchControl {
    stopped: Arc<AtomicBool>,
    start: Instant,
    time_limit: Duration,
}

impl SearchControl {
    /// Start a new control with `time_limit` counted from now, sharing
    /// `stopped` with the caller so [`Self::stop`] can be triggered
    /// externally (e.g. from the embedding engine's `stop()`).
    pub fn new(stopped: Arc<AtomicBool>, time_limit: Duration) -> Self {
        SearchControl { stopped, start: Instant::now(), time_limit }
    }

    /// Request cancellation. Idempotent; safe to call from another thread.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Relaxed);
    }

    /// Whether a search at `nodes` visited should abort now. Only checks
    /// the clock every [`CLOCK_CHECK_INTERVAL`] nodes.
    pub fn should_stop(&self, nodes: u64) -> bool {
        if self.stopped.load(Ordering::Relaxed) {
            return true;
        }
        if nodes % CLOCK_CHECK_INTERVAL != 0 {
            return false;
        }
        self.elapsed() >= self.time_limit
    }

    /// Whether the iterative-deepening loop should start another
    /// iteration — a plain time check, since depth boundaries are rare
    /// enough that per-node throttling doesn't matter here.
    pub fn should_stop_iterating(&self) -> bool {
        self.stopped.load(Ordering::Relaxed) || self.elapsed() >= self.time_limit
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_control_does_not_stop() {
        let control = SearchControl::new(Arc::new(AtomicBool::new(false)), Duration::from_secs(5));
        assert!(!control.should_stop(0));
        assert!(!control.should_stop_iterating());
    }

    #[test]
    fn stop_is_observed_immediately() {
        let control = SearchControl::new(Arc::new(AtomicBool::new(false)), Duration::from_secs(5));
        control.stop();
        assert!(control.should_stop(0));
        assert!(control.should_stop_iterating());
    }

    #[test]
    fn external_flag_triggers_stop() {
        let flag = Arc::new(AtomicBool::new(false));
        let control = SearchControl::new(Arc::clone(&flag), Duration::from_secs(5));
        flag.store(true, Ordering::Relaxed);
        assert!(control.should_stop(0));
    }

    #[test]
    fn expired_time_limit_stops_iteration() {
        let control = SearchControl::new(Arc::new(AtomicBool::new(false)), Duration::from_millis(0));
        std::thread::sleep(Duration::from_millis(2));
        assert!(control.should_stop_iterating());
    }

    #[test]
    fn node_check_throttled_between_intervals() {
        let control = SearchControl::new(Arc::new(AtomicBool::new(false)), Duration::from_millis(0));
        std::thread::sleep(Duration::from_millis(2));
        // Not a multiple of the check interval — the clock isn't consulted.
        assert!(!control.should_stop(1));
        assert!(control.should_stop(CLOCK_CHECK_INTERVAL));
    }
}
