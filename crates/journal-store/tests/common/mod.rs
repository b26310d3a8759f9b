//! Shared helpers for journal-store integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use journal_core::clock::Clock;
use journal_core::config::JournalConfig;
use journal_core::identity::StreamIdentity;
use journal_eventlog::EventLog;
use journal_store::JournalStore;
use journal_test_support::{FixedClock, PersonEvent, person_codec};

/// Fixed timestamp used across all integration tests.
pub fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// Builds a person store over the given log with default tuning.
pub fn person_store(log: Arc<dyn EventLog>) -> JournalStore<PersonEvent> {
    person_store_with_config(log, JournalConfig::default())
}

/// Builds a person store over the given log with explicit tuning.
pub fn person_store_with_config(
    log: Arc<dyn EventLog>,
    config: JournalConfig,
) -> JournalStore<PersonEvent> {
    JournalStore::new(log, person_codec(), config, fixed_clock())
}

/// The identity used by most scenarios.
pub fn p1() -> StreamIdentity {
    StreamIdentity::new("Person", "P1")
}
