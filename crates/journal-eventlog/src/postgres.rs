//! PostgreSQL implementation of the [`EventLog`] contract.
//!
//! One `journal_events` table holds every stream; the `(stream, version)`
//! unique constraint is the optimistic-concurrency mechanism: a writer that
//! lost the race hits the constraint and surfaces
//! [`JournalError::ConcurrentModification`]. Hard deletes are recorded in a
//! tombstone table so a deleted stream is never implicitly recreated.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use uuid::Uuid;

use journal_core::config::LogConfig;
use journal_core::error::JournalError;
use journal_core::record::{EventData, RecordedEvent};

use crate::log::{EventLog, ExpectedVersion, ReadStatus, StreamSlice};
use crate::schema;

/// PostgreSQL-backed event log.
#[derive(Debug, Clone)]
pub struct PgEventLog {
    pool: PgPool,
}

type EventRow = (Uuid, String, serde_json::Value, serde_json::Value, i64);

fn row_to_event(row: EventRow) -> RecordedEvent {
    let (event_id, event_type, payload, headers, version) = row;
    RecordedEvent {
        event_id,
        event_type,
        payload,
        headers: headers.as_object().cloned().unwrap_or_default(),
        version,
    }
}

fn unavailable(err: sqlx::Error) -> JournalError {
    JournalError::LogUnavailable(err.to_string())
}

impl PgEventLog {
    /// Creates a new `PgEventLog` over an existing pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to the configured database and returns a ready log.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::LogUnavailable`] when the url does not parse
    /// or the connection cannot be established within the configured
    /// timeout.
    pub async fn connect(config: &LogConfig) -> Result<Self, JournalError> {
        let mut options: PgConnectOptions = config
            .url
            .parse()
            .map_err(|e| JournalError::LogUnavailable(format!("invalid log url: {e}")))?;
        if let Some(username) = &config.username {
            options = options.username(username);
        }
        if let Some(password) = &config.password {
            options = options.password(password);
        }

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(config.response_timeout())
            .connect_with(options)
            .await
            .map_err(unavailable)?;

        Ok(Self::new(pool))
    }

    /// Creates the event log tables if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::LogUnavailable`] when DDL execution fails.
    pub async fn ensure_schema(&self) -> Result<(), JournalError> {
        sqlx::raw_sql(schema::CREATE_EVENTS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;
        sqlx::raw_sql(schema::CREATE_DELETED_STREAMS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;
        Ok(())
    }

    async fn is_deleted(&self, stream: &str) -> Result<bool, JournalError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM journal_deleted_streams WHERE stream = $1)",
        )
        .bind(stream)
        .fetch_one(&self.pool)
        .await
        .map_err(unavailable)
    }

    async fn current_version(&self, stream: &str) -> Result<i64, JournalError> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(MAX(version), 0) FROM journal_events WHERE stream = $1",
        )
        .bind(stream)
        .fetch_one(&self.pool)
        .await
        .map_err(unavailable)
    }
}

#[async_trait]
impl EventLog for PgEventLog {
    async fn append(
        &self,
        stream: &str,
        expected: ExpectedVersion,
        event: EventData,
    ) -> Result<i64, JournalError> {
        if self.is_deleted(stream).await? {
            return Err(JournalError::StreamDeleted(stream.to_string()));
        }

        let current = self.current_version(stream).await?;
        let satisfied = match expected {
            ExpectedVersion::Any => true,
            ExpectedVersion::NoStream => current == 0,
            ExpectedVersion::Exact(v) => current == v,
        };
        if !satisfied {
            let expected = match expected {
                ExpectedVersion::Exact(v) => Some(v),
                ExpectedVersion::NoStream | ExpectedVersion::Any => None,
            };
            return Err(JournalError::ConcurrentModification {
                stream: stream.to_string(),
                expected,
                actual: (current > 0).then_some(current),
            });
        }

        let version = current + 1;
        let result = sqlx::query(
            r"
            INSERT INTO journal_events (event_id, stream, version, event_type, payload, headers)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(event.event_id)
        .bind(stream)
        .bind(version)
        .bind(&event.event_type)
        .bind(&event.payload)
        .bind(serde_json::Value::Object(event.headers.clone()))
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                tracing::debug!(
                    stream = %stream,
                    version,
                    event_type = %event.event_type,
                    "event appended"
                );
                Ok(version)
            }
            // A writer that lost the race lands on the (stream, version)
            // unique constraint.
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                let expected = match expected {
                    ExpectedVersion::Exact(v) => Some(v),
                    ExpectedVersion::NoStream | ExpectedVersion::Any => None,
                };
                Err(JournalError::ConcurrentModification {
                    stream: stream.to_string(),
                    expected,
                    actual: None,
                })
            }
            Err(e) => Err(unavailable(e)),
        }
    }

    async fn read_forward(
        &self,
        stream: &str,
        after: i64,
        limit: usize,
    ) -> Result<StreamSlice, JournalError> {
        if self.is_deleted(stream).await? {
            return Ok(StreamSlice {
                events: Vec::new(),
                next_version: after,
                is_end: true,
                status: ReadStatus::StreamDeleted,
            });
        }

        // Fetch one extra row to learn whether this page is the end.
        #[allow(clippy::cast_possible_wrap)]
        let fetch = limit as i64 + 1;
        let rows = sqlx::query_as::<_, EventRow>(
            r"
            SELECT event_id, event_type, payload, headers, version
            FROM journal_events
            WHERE stream = $1 AND version > $2
            ORDER BY version ASC
            LIMIT $3
            ",
        )
        .bind(stream)
        .bind(after)
        .bind(fetch)
        .fetch_all(&self.pool)
        .await
        .map_err(unavailable)?;

        if rows.is_empty() && self.current_version(stream).await? == 0 {
            return Ok(StreamSlice {
                events: Vec::new(),
                next_version: after,
                is_end: true,
                status: ReadStatus::StreamNotFound,
            });
        }

        let is_end = rows.len() <= limit;
        let events: Vec<RecordedEvent> =
            rows.into_iter().take(limit).map(row_to_event).collect();
        let next_version = events.last().map_or(after, |e| e.version);

        Ok(StreamSlice {
            events,
            next_version,
            is_end,
            status: ReadStatus::Found,
        })
    }

    async fn read_backward_last(
        &self,
        stream: &str,
        count: usize,
    ) -> Result<Vec<RecordedEvent>, JournalError> {
        if self.is_deleted(stream).await? {
            return Err(JournalError::StreamDeleted(stream.to_string()));
        }

        #[allow(clippy::cast_possible_wrap)]
        let limit = count as i64;
        let rows = sqlx::query_as::<_, EventRow>(
            r"
            SELECT event_id, event_type, payload, headers, version
            FROM journal_events
            WHERE stream = $1
            ORDER BY version DESC
            LIMIT $2
            ",
        )
        .bind(stream)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(rows.into_iter().map(row_to_event).collect())
    }

    async fn delete_stream(&self, stream: &str) -> Result<(), JournalError> {
        let mut tx = self.pool.begin().await.map_err(unavailable)?;

        sqlx::query("INSERT INTO journal_deleted_streams (stream) VALUES ($1) ON CONFLICT DO NOTHING")
            .bind(stream)
            .execute(&mut *tx)
            .await
            .map_err(unavailable)?;
        sqlx::query("DELETE FROM journal_events WHERE stream = $1")
            .bind(stream)
            .execute(&mut *tx)
            .await
            .map_err(unavailable)?;

        tx.commit().await.map_err(unavailable)?;

        tracing::debug!(stream = %stream, "stream hard-deleted");
        Ok(())
    }
}
