//! Self-applying journal events and the state they act on.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Marker bounds for aggregate state.
///
/// The zero value (`Default::default()`) is the state of an aggregate with
/// no history. State must round-trip through the payload encoding so that
/// snapshots can seed reconstruction.
pub trait JournalState: Default + Serialize + DeserializeOwned + Send + Sync {}

impl<T> JournalState for T where T: Default + Serialize + DeserializeOwned + Send + Sync {}

/// Trait that all journal events implement.
///
/// Events are self-applying: each event value owns the transition function
/// for itself onto the state shape. Domain crates model their events as a
/// tagged union implementing this trait, so new event kinds can be added
/// without touching the reconstructor.
pub trait JournalEvent: Send + Sync + std::fmt::Debug {
    /// The aggregate state this event transitions.
    type State: JournalState;

    /// Returns the stable logical type tag (used for serialization routing).
    ///
    /// The tag must never be a runtime-specific identifier; decoding goes
    /// through an explicit registry keyed on these tags.
    fn event_type(&self) -> &'static str;

    /// Serializes the event payload to JSON.
    fn to_payload(&self) -> serde_json::Value;

    /// Applies this event to the given state.
    fn apply(&self, state: &mut Self::State);
}
