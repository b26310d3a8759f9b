//! Failure-path behavior: conflicts, deleted streams, decode failures, and
//! swallowed snapshot errors.

mod common;

use std::sync::Arc;

use journal_core::error::JournalError;
use journal_core::record::EventData;
use journal_eventlog::{EventLog, ExpectedVersion, MemoryEventLog};
use journal_store::JournaledAggregate;
use journal_test_support::{FailingEventLog, Gender, PersonEvent, SnapshotRejectingLog};

use common::{p1, person_store};

fn registered(first: &str, last: &str) -> PersonEvent {
    PersonEvent::Registered {
        first_name: first.to_string(),
        last_name: last.to_string(),
        gender: Gender::Female,
    }
}

#[tokio::test]
async fn test_stale_writer_gets_concurrent_modification_and_stream_stays_consistent() {
    let log = Arc::new(MemoryEventLog::new());
    let store = person_store(log.clone());

    let mut seed = JournaledAggregate::new(p1());
    seed.raise(registered("Ann", "Lee"));
    seed.commit(&store).await.unwrap();

    // Two writers load the same version, then both try to commit.
    let mut a = JournaledAggregate::load(&store, p1()).await.unwrap();
    let mut b = JournaledAggregate::load(&store, p1()).await.unwrap();

    a.raise(PersonEvent::LastNameChanged {
        last_name: "First".to_string(),
    });
    a.commit(&store).await.unwrap();

    b.raise(PersonEvent::LastNameChanged {
        last_name: "Second".to_string(),
    });
    let err = b.commit(&store).await.unwrap_err();

    assert!(matches!(err, JournalError::ConcurrentModification { .. }));
    // Exactly one append landed: the stream ends at expected + 1, not + 2.
    assert_eq!(log.stream_version(&p1().stream_name()), Some(2));
    // The loser keeps its pending event and stale version for the caller
    // to resolve by reloading.
    assert!(b.has_pending());
    assert_eq!(b.version(), Some(1));
}

#[tokio::test]
async fn test_load_of_deleted_stream_fails() {
    let log = Arc::new(MemoryEventLog::new());
    let store = person_store(log.clone());

    let mut person = JournaledAggregate::new(p1());
    person.raise(registered("Ann", "Lee"));
    person.commit(&store).await.unwrap();

    log.delete_stream(&p1().stream_name()).await.unwrap();

    let err = JournaledAggregate::load(&store, p1()).await.unwrap_err();
    assert!(matches!(err, JournalError::StreamDeleted(_)));
}

#[tokio::test]
async fn test_load_fails_on_unregistered_event_type() {
    let log = Arc::new(MemoryEventLog::new());
    log.append(
        &p1().stream_name(),
        ExpectedVersion::NoStream,
        EventData::new("person.cloned", serde_json::json!({})),
    )
    .await
    .unwrap();

    let store = person_store(log);
    let err = JournaledAggregate::load(&store, p1()).await.unwrap_err();

    assert!(matches!(err, JournalError::UnknownEventType(tag) if tag == "person.cloned"));
}

#[tokio::test]
async fn test_load_fails_on_malformed_payload_instead_of_skipping() {
    let log = Arc::new(MemoryEventLog::new());
    log.append(
        &p1().stream_name(),
        ExpectedVersion::NoStream,
        EventData::new("person.registered", serde_json::json!(42)),
    )
    .await
    .unwrap();

    let store = person_store(log);
    let err = JournaledAggregate::load(&store, p1()).await.unwrap_err();

    assert!(matches!(
        err,
        JournalError::MalformedPayload { event_type, .. } if event_type == "person.registered"
    ));
}

#[tokio::test]
async fn test_snapshot_write_failure_never_fails_the_commit() {
    let memory = Arc::new(MemoryEventLog::new());
    let rejecting = Arc::new(SnapshotRejectingLog::new(memory.clone()));
    let store = person_store(rejecting);

    let mut person = JournaledAggregate::new(p1());
    person.raise(registered("Ann", "Lee"));
    person.commit(&store).await.unwrap();
    for i in 2..=10 {
        person.raise(PersonEvent::LastNameChanged {
            last_name: format!("Lee{i}"),
        });
        person.commit(&store).await.unwrap();
    }

    // The tenth commit tried to snapshot and was rejected; the event still
    // landed and no snapshot exists.
    assert_eq!(person.version(), Some(10));
    assert_eq!(memory.record_count(&p1().snapshot_stream_name()), 0);

    // Reconstruction falls back to full tail replay.
    let reload_store = person_store(memory);
    let loaded = JournaledAggregate::load(&reload_store, p1()).await.unwrap();
    assert_eq!(loaded.state().last_name, "Lee10");
    assert_eq!(loaded.version(), Some(10));
}

#[tokio::test]
async fn test_log_unavailability_propagates_from_load_and_commit() {
    let store = person_store(Arc::new(FailingEventLog));

    let err = JournaledAggregate::load(&store, p1()).await.unwrap_err();
    assert!(matches!(err, JournalError::LogUnavailable(_)));

    let mut person = JournaledAggregate::new(p1());
    person.raise(registered("Ann", "Lee"));
    let err = person.commit(&store).await.unwrap_err();
    assert!(matches!(err, JournalError::LogUnavailable(_)));
    assert!(person.has_pending());
}

#[tokio::test]
async fn test_zero_snapshot_interval_disables_snapshots() {
    let log = Arc::new(MemoryEventLog::new());
    let config = journal_core::config::JournalConfig {
        snapshot_interval: 0,
        ..journal_core::config::JournalConfig::default()
    };
    let store = common::person_store_with_config(log.clone(), config);

    let mut person = JournaledAggregate::new(p1());
    person.raise(registered("Ann", "Lee"));
    person.commit(&store).await.unwrap();
    for i in 2..=20 {
        person.raise(PersonEvent::LastNameChanged {
            last_name: format!("Lee{i}"),
        });
        person.commit(&store).await.unwrap();
    }

    assert_eq!(log.record_count(&p1().snapshot_stream_name()), 0);
}
