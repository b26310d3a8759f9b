//! Event log database schema.

/// SQL to create the events table. The `(stream, version)` unique
/// constraint is what enforces both gapless ordering and optimistic
/// concurrency under concurrent writers.
pub const CREATE_EVENTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS journal_events (
    event_id    UUID PRIMARY KEY,
    stream      VARCHAR(512) NOT NULL,
    version     BIGINT NOT NULL,
    event_type  VARCHAR(255) NOT NULL,
    payload     JSONB NOT NULL,
    headers     JSONB NOT NULL DEFAULT '{}',
    recorded_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (stream, version)
);

CREATE INDEX IF NOT EXISTS idx_journal_events_stream
    ON journal_events (stream, version);
";

/// SQL to create the tombstone table backing hard deletes.
pub const CREATE_DELETED_STREAMS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS journal_deleted_streams (
    stream     VARCHAR(512) PRIMARY KEY,
    deleted_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";
