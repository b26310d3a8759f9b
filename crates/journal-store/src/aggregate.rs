//! The journaled aggregate surface consumed by the hosting framework.

use journal_core::error::JournalError;
use journal_core::event::JournalEvent;
use journal_core::identity::StreamIdentity;

use crate::store::JournalStore;

/// A plain state holder for one journaled aggregate instance.
///
/// The hosting framework serializes access per identity: at most one
/// `raise`/`commit` cycle is in flight per aggregate at a time. Between
/// `raise` and a successful `commit`, in-memory state has advanced past
/// what is durable; a crash in that window loses at most the one pending
/// event, which was never acknowledged as durable.
pub struct JournaledAggregate<E: JournalEvent> {
    identity: StreamIdentity,
    state: E::State,
    version: Option<i64>,
    pending: Option<E>,
}

impl<E: JournalEvent> std::fmt::Debug for JournaledAggregate<E>
where
    E::State: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JournaledAggregate")
            .field("identity", &self.identity)
            .field("state", &self.state)
            .field("version", &self.version)
            .field("pending", &self.pending)
            .finish()
    }
}

impl<E: JournalEvent> JournaledAggregate<E> {
    /// Creates a fresh aggregate with zero state and no history.
    #[must_use]
    pub fn new(identity: StreamIdentity) -> Self {
        Self {
            identity,
            state: E::State::default(),
            version: None,
            pending: None,
        }
    }

    /// Reconstitutes an aggregate from its event history.
    ///
    /// # Errors
    ///
    /// Propagates load failures from the store; see
    /// [`JournalStore::load`].
    pub async fn load(
        store: &JournalStore<E>,
        identity: StreamIdentity,
    ) -> Result<Self, JournalError> {
        let (state, version) = store.load(&identity).await?;
        Ok(Self {
            identity,
            state,
            version,
            pending: None,
        })
    }

    /// Applies an event to in-memory state immediately and records it as
    /// the pending event. Does not persist; the framework's persistence
    /// hook drives [`commit`](Self::commit) after each mutation.
    pub fn raise(&mut self, event: E) {
        event.apply(&mut self.state);
        self.pending = Some(event);
    }

    /// Persists the pending event. On success the version advances and the
    /// pending event is cleared; on failure the pending event is retained
    /// and the error propagates for the caller to resolve (no automatic
    /// retry).
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::ConcurrentModification`] when another writer
    /// advanced this identity's stream; the caller must reload and reapply
    /// its business operation.
    pub async fn commit(&mut self, store: &JournalStore<E>) -> Result<(), JournalError> {
        let new_version = store
            .commit(
                &self.identity,
                &self.state,
                self.pending.as_ref(),
                self.version,
            )
            .await?;
        self.version = new_version;
        self.pending = None;
        Ok(())
    }

    /// The identity this aggregate is journaled under.
    #[must_use]
    pub fn identity(&self) -> &StreamIdentity {
        &self.identity
    }

    /// Current in-memory state, including any not-yet-committed event.
    #[must_use]
    pub fn state(&self) -> &E::State {
        &self.state
    }

    /// Version of the last durable event, `None` before the first commit.
    #[must_use]
    pub fn version(&self) -> Option<i64> {
        self.version
    }

    /// Whether an event is awaiting persistence.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}
