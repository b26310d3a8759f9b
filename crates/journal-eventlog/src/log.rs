//! The event log contract.

use async_trait::async_trait;

use journal_core::error::JournalError;
use journal_core::record::{EventData, RecordedEvent};

/// Optimistic-concurrency precondition for an append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// No precondition; the append always lands at the current tail. Used
    /// for snapshot writes, which are order-independent for correctness.
    Any,
    /// The stream must not exist yet (no events ever appended).
    NoStream,
    /// The stream's current version must equal this value exactly.
    Exact(i64),
}

impl From<Option<i64>> for ExpectedVersion {
    fn from(version: Option<i64>) -> Self {
        match version {
            None => Self::NoStream,
            Some(v) => Self::Exact(v),
        }
    }
}

/// Outcome classification for a forward read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStatus {
    /// The stream exists; `events` holds the requested page.
    Found,
    /// The stream has never been written.
    StreamNotFound,
    /// The stream was hard-deleted.
    StreamDeleted,
}

/// One page of a forward read.
#[derive(Debug, Clone)]
pub struct StreamSlice {
    /// Records in stream order, strictly after the requested cursor.
    pub events: Vec<RecordedEvent>,
    /// Cursor to pass as `after` for the next page: the version of the last
    /// record in this page, or the requested cursor when the page is empty.
    pub next_version: i64,
    /// True when there are no further records past this page.
    pub is_end: bool,
    /// Outcome classification.
    pub status: ReadStatus,
}

/// Client contract against the substrate log service.
///
/// Implementations must be safe for concurrent use across distinct stream
/// names; the substrate enforces strict per-stream ordering and append
/// atomicity per call. No cross-stream ordering is introduced here.
#[async_trait]
pub trait EventLog: Send + Sync {
    /// Appends one record to a stream and returns the new stream version.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::ConcurrentModification`] when the stream's
    /// actual version does not satisfy `expected`,
    /// [`JournalError::StreamDeleted`] when the stream was hard-deleted,
    /// and [`JournalError::LogUnavailable`] on transport failure.
    async fn append(
        &self,
        stream: &str,
        expected: ExpectedVersion,
        event: EventData,
    ) -> Result<i64, JournalError>;

    /// Reads up to `limit` records with version strictly greater than
    /// `after`, in stream order. Callers loop until `is_end`.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::LogUnavailable`] on transport failure.
    /// Stream-level conditions are reported through [`StreamSlice::status`].
    async fn read_forward(
        &self,
        stream: &str,
        after: i64,
        limit: usize,
    ) -> Result<StreamSlice, JournalError>;

    /// Reads the most recent `count` records of a stream, most recent
    /// first. A never-written stream yields an empty vector.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::StreamDeleted`] when the stream was
    /// hard-deleted and [`JournalError::LogUnavailable`] on transport
    /// failure.
    async fn read_backward_last(
        &self,
        stream: &str,
        count: usize,
    ) -> Result<Vec<RecordedEvent>, JournalError>;

    /// Hard-deletes a stream. Subsequent appends and reads observe the
    /// deleted condition; the stream is never implicitly recreated.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::LogUnavailable`] on transport failure.
    async fn delete_stream(&self, stream: &str) -> Result<(), JournalError>;
}
