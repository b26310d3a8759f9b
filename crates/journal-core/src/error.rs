//! Error taxonomy for the persistence layer.

use thiserror::Error;

/// Top-level error type for journal operations.
///
/// All failures are reported synchronously to the caller of `load`/`commit`;
/// none are retried transparently inside the core.
#[derive(Debug, Error)]
pub enum JournalError {
    /// Expected-version mismatch on append. Recoverable by the caller:
    /// reload the aggregate and reapply the business operation. Never
    /// auto-retried or merged here.
    #[error(
        "concurrent modification on stream {stream}: expected version {expected:?}, found {actual:?}"
    )]
    ConcurrentModification {
        /// Stream the append was issued against.
        stream: String,
        /// Version the writer expected (`None` = no stream).
        expected: Option<i64>,
        /// Version actually found, where the log reports it.
        actual: Option<i64>,
    },

    /// The stream was hard-deleted. Fatal for that aggregate identity; the
    /// core never implicitly recreates a deleted stream.
    #[error("stream {0} has been deleted")]
    StreamDeleted(String),

    /// A record's type tag does not resolve in the codec registry.
    #[error("unknown event type tag: {0}")]
    UnknownEventType(String),

    /// A record's payload failed to deserialize.
    #[error("malformed payload for event type {event_type}")]
    MalformedPayload {
        /// Type tag of the offending record.
        event_type: String,
        /// Underlying deserialization error.
        #[source]
        source: serde_json::Error,
    },

    /// Transport or timeout failure talking to the log service.
    #[error("event log unavailable: {0}")]
    LogUnavailable(String),
}
