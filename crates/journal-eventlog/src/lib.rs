//! Journal Event Log — the client boundary to the substrate log service.
//!
//! The substrate is an append-only, per-stream ordered log with optimistic
//! append and paged reads. This crate defines the [`EventLog`] contract the
//! persistence layer is written against, plus two substrates: an in-memory
//! log for tests and development, and a PostgreSQL-backed log for
//! production.

pub mod log;
pub mod memory;
pub mod postgres;
pub mod schema;

pub use log::{EventLog, ExpectedVersion, ReadStatus, StreamSlice};
pub use memory::MemoryEventLog;
pub use postgres::PgEventLog;
