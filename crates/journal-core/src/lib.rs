//! Journal Core — shared abstractions.
//!
//! This crate defines the fundamental traits and types the persistence
//! layer is built on: stream identities, self-applying events, event
//! records, the codec registry, the error taxonomy, and configuration.
//! It contains no infrastructure code.

pub mod clock;
pub mod codec;
pub mod config;
pub mod error;
pub mod event;
pub mod identity;
pub mod record;
