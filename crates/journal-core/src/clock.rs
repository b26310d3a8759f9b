//! Time source for record stamping.

use chrono::{DateTime, Utc};

/// Source of the `occurred_at` timestamps stamped onto appended records.
///
/// Injected at the coordinator seam so tests can freeze time and replays
/// stay deterministic.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time source used outside tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct WallClock;

impl Clock for WallClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_clock_never_runs_backwards() {
        let clock = WallClock;
        let earlier = clock.now();
        let later = clock.now();
        assert!(later >= earlier);
    }
}
