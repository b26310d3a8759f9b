//! In-memory event log.
//!
//! Used for testing and development without a database. Thread-safe using
//! `RwLock` for concurrent access; per-stream ordering and optimistic
//! append semantics match the production substrate.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use journal_core::error::JournalError;
use journal_core::record::{EventData, RecordedEvent};

use crate::log::{EventLog, ExpectedVersion, ReadStatus, StreamSlice};

#[derive(Debug, Default)]
struct StreamState {
    events: Vec<RecordedEvent>,
    deleted: bool,
}

/// In-memory event log for tests.
#[derive(Debug, Default)]
pub struct MemoryEventLog {
    streams: RwLock<HashMap<String, StreamState>>,
}

impl MemoryEventLog {
    /// Creates a new empty in-memory log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current version of a stream, `None` if never written.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn stream_version(&self, stream: &str) -> Option<i64> {
        let streams = self.streams.read().unwrap();
        let state = streams.get(stream)?;
        #[allow(clippy::cast_possible_wrap)]
        let version = state.events.len() as i64;
        (version > 0).then_some(version)
    }

    /// Number of records ever appended to a stream.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn record_count(&self, stream: &str) -> usize {
        let streams = self.streams.read().unwrap();
        streams.get(stream).map_or(0, |s| s.events.len())
    }
}

#[async_trait]
impl EventLog for MemoryEventLog {
    async fn append(
        &self,
        stream: &str,
        expected: ExpectedVersion,
        event: EventData,
    ) -> Result<i64, JournalError> {
        let mut streams = self.streams.write().unwrap();

        // Validate before touching the map: a rejected append must not
        // leave an empty stream behind.
        let current = match streams.get(stream) {
            Some(state) if state.deleted => {
                return Err(JournalError::StreamDeleted(stream.to_string()));
            }
            #[allow(clippy::cast_possible_wrap)]
            Some(state) => state.events.len() as i64,
            None => 0,
        };
        let satisfied = match expected {
            ExpectedVersion::Any => true,
            ExpectedVersion::NoStream => current == 0,
            ExpectedVersion::Exact(v) => current == v,
        };
        if !satisfied {
            let expected = match expected {
                ExpectedVersion::Exact(v) => Some(v),
                ExpectedVersion::NoStream | ExpectedVersion::Any => None,
            };
            return Err(JournalError::ConcurrentModification {
                stream: stream.to_string(),
                expected,
                actual: (current > 0).then_some(current),
            });
        }

        let version = current + 1;
        let state = streams.entry(stream.to_string()).or_default();
        state.events.push(RecordedEvent {
            event_id: event.event_id,
            event_type: event.event_type,
            payload: event.payload,
            headers: event.headers,
            version,
        });

        Ok(version)
    }

    async fn read_forward(
        &self,
        stream: &str,
        after: i64,
        limit: usize,
    ) -> Result<StreamSlice, JournalError> {
        let streams = self.streams.read().unwrap();
        let Some(state) = streams.get(stream) else {
            return Ok(StreamSlice {
                events: Vec::new(),
                next_version: after,
                is_end: true,
                status: ReadStatus::StreamNotFound,
            });
        };

        if state.deleted {
            return Ok(StreamSlice {
                events: Vec::new(),
                next_version: after,
                is_end: true,
                status: ReadStatus::StreamDeleted,
            });
        }

        let events: Vec<RecordedEvent> = state
            .events
            .iter()
            .filter(|e| e.version > after)
            .take(limit)
            .cloned()
            .collect();

        let next_version = events.last().map_or(after, |e| e.version);
        #[allow(clippy::cast_possible_wrap)]
        let tail = state.events.len() as i64;

        Ok(StreamSlice {
            events,
            next_version,
            is_end: next_version >= tail,
            status: ReadStatus::Found,
        })
    }

    async fn read_backward_last(
        &self,
        stream: &str,
        count: usize,
    ) -> Result<Vec<RecordedEvent>, JournalError> {
        let streams = self.streams.read().unwrap();
        let Some(state) = streams.get(stream) else {
            return Ok(Vec::new());
        };

        if state.deleted {
            return Err(JournalError::StreamDeleted(stream.to_string()));
        }

        Ok(state.events.iter().rev().take(count).cloned().collect())
    }

    async fn delete_stream(&self, stream: &str) -> Result<(), JournalError> {
        let mut streams = self.streams.write().unwrap();
        let state = streams.entry(stream.to_string()).or_default();
        state.deleted = true;
        state.events.clear();
        Ok(())
    }
}
