//! Wire records exchanged with the event log.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A record to be appended to a stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventData {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Stable logical type tag for deserialization routing.
    pub event_type: String,
    /// Serialized event payload.
    pub payload: serde_json::Value,
    /// Free-form headers persisted alongside the payload.
    pub headers: serde_json::Map<String, serde_json::Value>,
}

impl EventData {
    /// Creates a record with a fresh event id and empty headers.
    #[must_use]
    pub fn new(event_type: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            event_type: event_type.into(),
            payload,
            headers: serde_json::Map::new(),
        }
    }
}

/// A record read back from a stream, with its assigned version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedEvent {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Stable logical type tag.
    pub event_type: String,
    /// Serialized event payload.
    pub payload: serde_json::Value,
    /// Headers persisted with the record.
    pub headers: serde_json::Map<String, serde_json::Value>,
    /// Version assigned by the log on append (1-based, gapless).
    pub version: i64,
}
