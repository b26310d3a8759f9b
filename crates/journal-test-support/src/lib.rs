//! Shared test doubles and fixtures for the journal persistence layer.

mod clock;
mod log;
mod person;

pub use clock::FixedClock;
pub use log::{CountingEventLog, FailingEventLog, SnapshotRejectingLog};
pub use person::{Gender, PersonEvent, PersonState, person_codec};
