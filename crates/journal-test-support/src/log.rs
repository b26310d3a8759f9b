//! Test event logs — `EventLog` doubles for exercising failure paths and
//! observing I/O behavior.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use journal_core::error::JournalError;
use journal_core::record::{EventData, RecordedEvent};
use journal_eventlog::{EventLog, ExpectedVersion, StreamSlice};

/// An event log that always fails with `LogUnavailable`. Useful for testing
/// error-propagation paths.
#[derive(Debug)]
pub struct FailingEventLog;

#[async_trait]
impl EventLog for FailingEventLog {
    async fn append(
        &self,
        _stream: &str,
        _expected: ExpectedVersion,
        _event: EventData,
    ) -> Result<i64, JournalError> {
        Err(JournalError::LogUnavailable("connection refused".into()))
    }

    async fn read_forward(
        &self,
        _stream: &str,
        _after: i64,
        _limit: usize,
    ) -> Result<StreamSlice, JournalError> {
        Err(JournalError::LogUnavailable("connection refused".into()))
    }

    async fn read_backward_last(
        &self,
        _stream: &str,
        _count: usize,
    ) -> Result<Vec<RecordedEvent>, JournalError> {
        Err(JournalError::LogUnavailable("connection refused".into()))
    }

    async fn delete_stream(&self, _stream: &str) -> Result<(), JournalError> {
        Err(JournalError::LogUnavailable("connection refused".into()))
    }
}

/// A pass-through log that counts calls and the number of records each read
/// returned. Used to assert how much tail replay a load actually did.
pub struct CountingEventLog {
    inner: Arc<dyn EventLog>,
    appends: AtomicUsize,
    forward_reads: AtomicUsize,
    backward_reads: AtomicUsize,
    events_read_forward: AtomicUsize,
}

impl CountingEventLog {
    /// Wraps an inner log.
    #[must_use]
    pub fn new(inner: Arc<dyn EventLog>) -> Self {
        Self {
            inner,
            appends: AtomicUsize::new(0),
            forward_reads: AtomicUsize::new(0),
            backward_reads: AtomicUsize::new(0),
            events_read_forward: AtomicUsize::new(0),
        }
    }

    /// Number of `append` calls observed.
    #[must_use]
    pub fn appends(&self) -> usize {
        self.appends.load(Ordering::SeqCst)
    }

    /// Number of `read_forward` calls observed.
    #[must_use]
    pub fn forward_reads(&self) -> usize {
        self.forward_reads.load(Ordering::SeqCst)
    }

    /// Number of `read_backward_last` calls observed.
    #[must_use]
    pub fn backward_reads(&self) -> usize {
        self.backward_reads.load(Ordering::SeqCst)
    }

    /// Total records returned across all `read_forward` calls.
    #[must_use]
    pub fn events_read_forward(&self) -> usize {
        self.events_read_forward.load(Ordering::SeqCst)
    }

    /// Resets all counters to zero.
    pub fn reset(&self) {
        self.appends.store(0, Ordering::SeqCst);
        self.forward_reads.store(0, Ordering::SeqCst);
        self.backward_reads.store(0, Ordering::SeqCst);
        self.events_read_forward.store(0, Ordering::SeqCst);
    }
}

#[async_trait]
impl EventLog for CountingEventLog {
    async fn append(
        &self,
        stream: &str,
        expected: ExpectedVersion,
        event: EventData,
    ) -> Result<i64, JournalError> {
        self.appends.fetch_add(1, Ordering::SeqCst);
        self.inner.append(stream, expected, event).await
    }

    async fn read_forward(
        &self,
        stream: &str,
        after: i64,
        limit: usize,
    ) -> Result<StreamSlice, JournalError> {
        self.forward_reads.fetch_add(1, Ordering::SeqCst);
        let slice = self.inner.read_forward(stream, after, limit).await?;
        self.events_read_forward
            .fetch_add(slice.events.len(), Ordering::SeqCst);
        Ok(slice)
    }

    async fn read_backward_last(
        &self,
        stream: &str,
        count: usize,
    ) -> Result<Vec<RecordedEvent>, JournalError> {
        self.backward_reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read_backward_last(stream, count).await
    }

    async fn delete_stream(&self, stream: &str) -> Result<(), JournalError> {
        self.inner.delete_stream(stream).await
    }
}

/// A pass-through log that rejects appends to snapshot sibling streams.
/// Used to verify that snapshot failures never fail the primary write.
pub struct SnapshotRejectingLog {
    inner: Arc<dyn EventLog>,
}

impl SnapshotRejectingLog {
    /// Wraps an inner log.
    #[must_use]
    pub fn new(inner: Arc<dyn EventLog>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl EventLog for SnapshotRejectingLog {
    async fn append(
        &self,
        stream: &str,
        expected: ExpectedVersion,
        event: EventData,
    ) -> Result<i64, JournalError> {
        if stream.ends_with("::Snapshots") {
            return Err(JournalError::LogUnavailable(
                "snapshot stream rejected".into(),
            ));
        }
        self.inner.append(stream, expected, event).await
    }

    async fn read_forward(
        &self,
        stream: &str,
        after: i64,
        limit: usize,
    ) -> Result<StreamSlice, JournalError> {
        self.inner.read_forward(stream, after, limit).await
    }

    async fn read_backward_last(
        &self,
        stream: &str,
        count: usize,
    ) -> Result<Vec<RecordedEvent>, JournalError> {
        self.inner.read_backward_last(stream, count).await
    }

    async fn delete_stream(&self, stream: &str) -> Result<(), JournalError> {
        self.inner.delete_stream(stream).await
    }
}
