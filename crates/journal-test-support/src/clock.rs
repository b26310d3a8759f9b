//! Fixed clock for deterministic tests.

use chrono::{DateTime, Utc};
use journal_core::clock::Clock;

/// A clock frozen at a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
