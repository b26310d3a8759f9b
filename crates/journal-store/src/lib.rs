//! Journal Store — reconstruction and persistence for journaled aggregates.
//!
//! An aggregate's durable form is its event history: every state change is
//! one immutable record on a per-aggregate stream, and current state is the
//! pure result of replaying that stream onto the zero value. This crate
//! owns the read/write/replay/snapshot protocol against the
//! [`journal_eventlog::EventLog`] boundary:
//!
//! - [`reconstruct`] rebuilds state from the latest snapshot plus tail
//!   events, with paged forward reads.
//! - [`JournalStore`] coordinates commits under optimistic concurrency and
//!   decides snapshot cadence.
//! - [`JournaledAggregate`] is the surface the hosting framework drives:
//!   raise an event, then commit it.

pub mod aggregate;
pub mod reconstruct;
pub mod store;

pub use aggregate::JournaledAggregate;
pub use store::JournalStore;
