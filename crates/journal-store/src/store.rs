//! Persistence coordinator.

use std::sync::Arc;

use journal_core::clock::Clock;
use journal_core::codec::{EventCodec, encode_snapshot};
use journal_core::config::JournalConfig;
use journal_core::error::JournalError;
use journal_core::event::JournalEvent;
use journal_core::identity::StreamIdentity;
use journal_eventlog::{EventLog, ExpectedVersion};

use crate::reconstruct;

/// Coordinates reads and writes for one aggregate type's event union.
///
/// The store never retries or merges on a version conflict: the caller must
/// reload and reapply its business operation. Last-writer-wins is rejected
/// by contract.
pub struct JournalStore<E: JournalEvent> {
    log: Arc<dyn EventLog>,
    codec: EventCodec<E>,
    config: JournalConfig,
    clock: Arc<dyn Clock>,
}

impl<E: JournalEvent> JournalStore<E> {
    /// Creates a new store.
    #[must_use]
    pub fn new(
        log: Arc<dyn EventLog>,
        codec: EventCodec<E>,
        config: JournalConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            log,
            codec,
            config,
            clock,
        }
    }

    /// Reconstructs the current state and version for an identity.
    ///
    /// A never-written identity yields the zero state and `None`, not an
    /// error.
    ///
    /// # Errors
    ///
    /// See [`reconstruct::load`].
    pub async fn load(
        &self,
        identity: &StreamIdentity,
    ) -> Result<(E::State, Option<i64>), JournalError> {
        reconstruct::load(
            self.log.as_ref(),
            &self.codec,
            identity,
            self.config.read_page_size,
        )
        .await
    }

    /// Persists the pending event and returns the aggregate's new version.
    ///
    /// With no pending event this is an idempotent no-op returning
    /// `current`. After a successful append, when the new version is a
    /// positive exact multiple of the snapshot interval, the current full
    /// state is written to the snapshot sibling stream; a snapshot failure
    /// is logged and swallowed, never failing the primary write.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::ConcurrentModification`] when another writer
    /// advanced the stream past `current`; the caller must reload and
    /// reapply. Other variants propagate from the log and codec.
    pub async fn commit(
        &self,
        identity: &StreamIdentity,
        state: &E::State,
        pending: Option<&E>,
        current: Option<i64>,
    ) -> Result<Option<i64>, JournalError> {
        let Some(event) = pending else {
            return Ok(current);
        };

        let stream = identity.stream_name();
        let mut data = self.codec.encode(event);
        data.headers.insert(
            "occurred_at".to_string(),
            serde_json::json!(self.clock.now().to_rfc3339()),
        );

        let new_version = self
            .log
            .append(&stream, ExpectedVersion::from(current), data)
            .await?;

        tracing::debug!(
            stream = %identity,
            version = new_version,
            event_type = event.event_type(),
            "event committed"
        );

        let interval = self.config.snapshot_interval;
        if interval > 0 && new_version % interval == 0 {
            if let Err(err) = self.write_snapshot(identity, state, new_version).await {
                tracing::warn!(
                    stream = %identity,
                    version = new_version,
                    error = %err,
                    "snapshot write failed; event is durable, continuing"
                );
            }
        }

        Ok(Some(new_version))
    }

    /// Appends a full-state checkpoint to the snapshot sibling stream with
    /// no version precondition: snapshots are order-independent, only the
    /// most recent is ever read.
    async fn write_snapshot(
        &self,
        identity: &StreamIdentity,
        state: &E::State,
        last_event_version: i64,
    ) -> Result<(), JournalError> {
        let data = encode_snapshot(last_event_version, state);
        self.log
            .append(
                &identity.snapshot_stream_name(),
                ExpectedVersion::Any,
                data,
            )
            .await?;

        tracing::debug!(
            stream = %identity,
            last_event_version,
            "snapshot written"
        );
        Ok(())
    }
}
