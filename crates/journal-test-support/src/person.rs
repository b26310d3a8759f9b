//! Person fixture domain — a small journaled aggregate used across the
//! test suites.

use serde::{Deserialize, Serialize};

use journal_core::codec::EventCodec;
use journal_core::event::JournalEvent;

/// Gender recorded at registration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    /// Not recorded.
    #[default]
    Unspecified,
    /// Female.
    Female,
    /// Male.
    Male,
}

/// State of a person aggregate, derived purely from its event history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonState {
    /// First name, set at registration.
    pub first_name: String,
    /// Last name; may change on marriage.
    pub last_name: String,
    /// Gender, set at registration.
    pub gender: Gender,
    /// Whether the person is married.
    pub is_married: bool,
}

/// Event union for the person aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PersonEvent {
    /// A person's birth was registered.
    Registered {
        /// First name at registration.
        first_name: String,
        /// Last name at registration.
        last_name: String,
        /// Gender at registration.
        gender: Gender,
    },
    /// A person married.
    Married {
        /// Spouse's first name.
        spouse_first_name: String,
        /// Spouse's last name.
        spouse_last_name: String,
    },
    /// A person's last name changed.
    LastNameChanged {
        /// The new last name.
        last_name: String,
    },
}

impl JournalEvent for PersonEvent {
    type State = PersonState;

    fn event_type(&self) -> &'static str {
        match self {
            Self::Registered { .. } => "person.registered",
            Self::Married { .. } => "person.married",
            Self::LastNameChanged { .. } => "person.last_name_changed",
        }
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(self).expect("PersonEvent serialization is infallible")
    }

    fn apply(&self, state: &mut Self::State) {
        match self {
            Self::Registered {
                first_name,
                last_name,
                gender,
            } => {
                state.first_name = first_name.clone();
                state.last_name = last_name.clone();
                state.gender = *gender;
            }
            Self::Married { .. } => {
                state.is_married = true;
            }
            Self::LastNameChanged { last_name } => {
                state.last_name = last_name.clone();
            }
        }
    }
}

/// Builds a codec with all person event tags registered.
#[must_use]
pub fn person_codec() -> EventCodec<PersonEvent> {
    fn decode(payload: &serde_json::Value) -> Result<PersonEvent, serde_json::Error> {
        serde_json::from_value(payload.clone())
    }

    EventCodec::new()
        .with("person.registered", decode)
        .with("person.married", decode)
        .with("person.last_name_changed", decode)
}
