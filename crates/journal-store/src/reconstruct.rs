//! Aggregate state reconstruction.
//!
//! Loading combines the latest snapshot (if any) with a paged replay of the
//! events recorded after it. Page size is purely an I/O chunking knob and
//! never affects the resulting state; events at or before the snapshot
//! cursor are never reapplied.

use journal_core::codec::{EventCodec, Snapshot, decode_snapshot};
use journal_core::error::JournalError;
use journal_core::event::{JournalEvent, JournalState};
use journal_core::identity::StreamIdentity;
use journal_eventlog::{EventLog, ReadStatus};

/// Rebuilds `(state, version)` for one aggregate identity.
///
/// Returns the zero state and `None` when the identity was never written.
///
/// # Errors
///
/// Returns [`JournalError::StreamDeleted`] when the main stream was
/// hard-deleted, [`JournalError::UnknownEventType`] /
/// [`JournalError::MalformedPayload`] when a record cannot be decoded
/// (loading fails rather than silently skipping events), and
/// [`JournalError::LogUnavailable`] on transport failure.
pub async fn load<E: JournalEvent>(
    log: &dyn EventLog,
    codec: &EventCodec<E>,
    identity: &StreamIdentity,
    page_size: usize,
) -> Result<(E::State, Option<i64>), JournalError> {
    let stream = identity.stream_name();

    let (mut state, mut cursor, seeded) = match latest_snapshot::<E::State>(log, identity).await? {
        Some(snapshot) => (snapshot.state, snapshot.last_event_version, true),
        None => (E::State::default(), 0, false),
    };

    let mut first_page = true;
    loop {
        let slice = log.read_forward(&stream, cursor, page_size).await?;
        match slice.status {
            ReadStatus::StreamNotFound => {
                if first_page && !seeded {
                    return Ok((E::State::default(), None));
                }
                break;
            }
            ReadStatus::StreamDeleted => {
                return Err(JournalError::StreamDeleted(stream));
            }
            ReadStatus::Found => {
                for record in &slice.events {
                    let event = codec.decode(record)?;
                    event.apply(&mut state);
                }
                cursor = slice.next_version;
                if slice.is_end {
                    break;
                }
            }
        }
        first_page = false;
    }

    tracing::debug!(stream = %identity, version = cursor, snapshot = seeded, "aggregate loaded");

    Ok((state, (cursor > 0).then_some(cursor)))
}

/// Fetches and decodes the most recent snapshot, if one exists.
async fn latest_snapshot<S: JournalState>(
    log: &dyn EventLog,
    identity: &StreamIdentity,
) -> Result<Option<Snapshot<S>>, JournalError> {
    let records = log
        .read_backward_last(&identity.snapshot_stream_name(), 1)
        .await?;
    records.first().map(decode_snapshot).transpose()
}
