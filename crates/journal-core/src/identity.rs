//! Stream identity for journaled aggregates.

/// Identifies one aggregate's pair of streams in the substrate log.
///
/// The identity is derived from the hosting framework's key scheme and is
/// stable for the aggregate's lifetime. It is never stored; both stream
/// names are recomputed on demand.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StreamIdentity {
    /// Logical aggregate type name (the namespace of the key).
    pub aggregate_type: String,
    /// Aggregate key, unique within the type namespace.
    pub key: String,
}

impl StreamIdentity {
    /// Creates a new stream identity.
    #[must_use]
    pub fn new(aggregate_type: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            aggregate_type: aggregate_type.into(),
            key: key.into(),
        }
    }

    /// Name of the main event stream: `"{type}::{key}"`.
    #[must_use]
    pub fn stream_name(&self) -> String {
        format!("{}::{}", self.aggregate_type, self.key)
    }

    /// Name of the snapshot sibling stream: `"{type}::{key}::Snapshots"`.
    #[must_use]
    pub fn snapshot_stream_name(&self) -> String {
        format!("{}::Snapshots", self.stream_name())
    }
}

impl std::fmt::Display for StreamIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}::{}", self.aggregate_type, self.key)
    }
}
