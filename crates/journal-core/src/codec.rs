//! Event codec — pure transforms between typed events and wire records.
//!
//! Decoding goes through an explicit registry populated at startup: a map
//! from logical type tag to a decode function. There is no ambient type
//! resolution; a tag that was never registered decodes to
//! [`JournalError::UnknownEventType`].

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::JournalError;
use crate::event::JournalEvent;
use crate::record::{EventData, RecordedEvent};

/// Type tag carried by snapshot records on the snapshot sibling stream.
pub const SNAPSHOT_EVENT_TYPE: &str = "journal.snapshot";

/// Decode function registered for one event type tag.
pub type DecodeFn<E> = fn(&serde_json::Value) -> Result<E, serde_json::Error>;

/// Registry-backed codec for one aggregate's event union.
pub struct EventCodec<E> {
    decoders: HashMap<String, DecodeFn<E>>,
}

impl<E> Default for EventCodec<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventCodec<E> {
    /// Creates an empty codec.
    #[must_use]
    pub fn new() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Registers a decode function for a type tag, replacing any previous
    /// registration for the same tag.
    pub fn register(&mut self, event_type: impl Into<String>, decode: DecodeFn<E>) {
        self.decoders.insert(event_type.into(), decode);
    }

    /// Builder-style [`register`](Self::register).
    #[must_use]
    pub fn with(mut self, event_type: impl Into<String>, decode: DecodeFn<E>) -> Self {
        self.register(event_type, decode);
        self
    }

    /// Decodes a recorded event back into the typed union.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::UnknownEventType`] when the record's tag has
    /// no registered decoder, and [`JournalError::MalformedPayload`] when
    /// the payload fails to deserialize.
    pub fn decode(&self, record: &RecordedEvent) -> Result<E, JournalError> {
        let decode = self
            .decoders
            .get(&record.event_type)
            .ok_or_else(|| JournalError::UnknownEventType(record.event_type.clone()))?;

        decode(&record.payload).map_err(|source| JournalError::MalformedPayload {
            event_type: record.event_type.clone(),
            source,
        })
    }
}

impl<E: JournalEvent> EventCodec<E> {
    /// Encodes a typed event into a record ready for append, with a fresh
    /// event id and empty headers.
    #[must_use]
    pub fn encode(&self, event: &E) -> EventData {
        EventData::new(event.event_type(), event.to_payload())
    }
}

/// Persisted shape of a snapshot record's payload.
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotPayload {
    last_event_version: i64,
    state: serde_json::Value,
}

/// A decoded snapshot: full state plus the version it was taken at.
#[derive(Debug, Clone)]
pub struct Snapshot<S> {
    /// Version of the last event reflected in `state`.
    pub last_event_version: i64,
    /// The full aggregate state at that version.
    pub state: S,
}

/// Encodes a full aggregate state as a snapshot record.
#[must_use]
pub fn encode_snapshot<S: Serialize>(last_event_version: i64, state: &S) -> EventData {
    // Serialization of derived Serialize types to Value is infallible.
    let payload = SnapshotPayload {
        last_event_version,
        state: serde_json::to_value(state).expect("aggregate state serialization is infallible"),
    };
    EventData::new(
        SNAPSHOT_EVENT_TYPE,
        serde_json::to_value(payload).expect("snapshot payload serialization is infallible"),
    )
}

/// Decodes the most recent record of a snapshot stream.
///
/// # Errors
///
/// Returns [`JournalError::UnknownEventType`] when the record does not carry
/// the snapshot tag, and [`JournalError::MalformedPayload`] when either the
/// envelope or the embedded state fails to deserialize.
pub fn decode_snapshot<S: DeserializeOwned>(
    record: &RecordedEvent,
) -> Result<Snapshot<S>, JournalError> {
    if record.event_type != SNAPSHOT_EVENT_TYPE {
        return Err(JournalError::UnknownEventType(record.event_type.clone()));
    }

    let malformed = |source| JournalError::MalformedPayload {
        event_type: SNAPSHOT_EVENT_TYPE.to_string(),
        source,
    };

    let payload: SnapshotPayload =
        serde_json::from_value(record.payload.clone()).map_err(malformed)?;
    let state: S = serde_json::from_value(payload.state).map_err(malformed)?;

    Ok(Snapshot {
        last_event_version: payload.last_event_version,
        state,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    enum CounterEvent {
        Incremented { by: i64 },
    }

    impl JournalEvent for CounterEvent {
        type State = i64;

        fn event_type(&self) -> &'static str {
            "counter.incremented"
        }

        fn to_payload(&self) -> serde_json::Value {
            serde_json::to_value(self).expect("CounterEvent serialization is infallible")
        }

        fn apply(&self, state: &mut Self::State) {
            let CounterEvent::Incremented { by } = self;
            *state += by;
        }
    }

    fn counter_codec() -> EventCodec<CounterEvent> {
        EventCodec::new().with("counter.incremented", |payload| {
            serde_json::from_value(payload.clone())
        })
    }

    fn recorded(event_type: &str, payload: serde_json::Value) -> RecordedEvent {
        RecordedEvent {
            event_id: uuid::Uuid::new_v4(),
            event_type: event_type.to_string(),
            payload,
            headers: serde_json::Map::new(),
            version: 1,
        }
    }

    #[test]
    fn test_encode_then_decode_round_trips() {
        let codec = counter_codec();
        let event = CounterEvent::Incremented { by: 3 };

        let data = codec.encode(&event);
        assert_eq!(data.event_type, "counter.incremented");

        let decoded = codec
            .decode(&recorded(&data.event_type, data.payload))
            .unwrap();
        assert_eq!(decoded, event);
    }

    #[test]
    fn test_decode_unregistered_tag_fails() {
        let codec = counter_codec();
        let record = recorded("counter.decremented", serde_json::json!({}));

        let err = codec.decode(&record).unwrap_err();
        assert!(matches!(err, JournalError::UnknownEventType(tag) if tag == "counter.decremented"));
    }

    #[test]
    fn test_decode_malformed_payload_fails() {
        let codec = counter_codec();
        let record = recorded("counter.incremented", serde_json::json!("not an object"));

        let err = codec.decode(&record).unwrap_err();
        assert!(matches!(err, JournalError::MalformedPayload { .. }));
    }

    #[test]
    fn test_snapshot_round_trip() {
        let data = encode_snapshot(10, &42_i64);
        assert_eq!(data.event_type, SNAPSHOT_EVENT_TYPE);

        let record = recorded(&data.event_type, data.payload);
        let snapshot: Snapshot<i64> = decode_snapshot(&record).unwrap();
        assert_eq!(snapshot.last_event_version, 10);
        assert_eq!(snapshot.state, 42);
    }

    #[test]
    fn test_decode_snapshot_rejects_non_snapshot_record() {
        let record = recorded("counter.incremented", serde_json::json!({}));
        let err = decode_snapshot::<i64>(&record).unwrap_err();
        assert!(matches!(err, JournalError::UnknownEventType(_)));
    }
}
