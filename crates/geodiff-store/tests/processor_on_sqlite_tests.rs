#![allow(clippy::unwrap_used, clippy::expect_used)]

// The core pipeline against the SQLite backend, inside one transaction

use chrono::{DateTime, Duration, TimeZone, Utc};
use geodiff_core::{
    ChangeAction, ChangeProcessor, EntitySnapshot, EntityType, ExErrorKind, Geometry,
    InvalidActionsMode, ProcessorOptions, User,
};
use geodiff_store::repo::queries;
use geodiff_store::SqliteStore;
use rusqlite::Connection;

fn setup_test_db() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    geodiff_store::db::configure(&conn).unwrap();
    geodiff_store::migrations::apply_migrations(&mut conn).unwrap();
    conn
}

fn ts(offset_secs: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap() + Duration::seconds(offset_secs)
}

fn point(id: i64, version: i64, changeset_id: i64, lon: f64, lat: f64) -> EntitySnapshot {
    EntitySnapshot::new(EntityType::Point, id, version, changeset_id)
        .with_timestamp(ts(version))
        .with_user(User::new(1, "alice"))
        .with_tag("name", "A")
        .with_geometry(Geometry::point(lon, lat))
}

#[test]
fn test_run_commits_records_and_summaries() {
    // Given: A migrated database and a three-change stream in changeset 500
    let mut conn = setup_test_db();
    let stream = vec![
        (ChangeAction::Create, point(1, 1, 500, 0.0, 0.0)),
        (ChangeAction::Create, point(2, 1, 500, 1.0, 1.0)),
        (ChangeAction::Modify, point(1, 2, 500, 0.0, 0.5)),
    ];

    // When: The run executes inside a transaction that is then committed
    let tx = conn.transaction().unwrap();
    let report = {
        let mut store = SqliteStore::new(&tx);
        ChangeProcessor::new(ProcessorOptions::default())
            .run(&mut store, stream)
            .unwrap()
    };
    tx.commit().unwrap();

    // Then: The changeset summary and current state are durable
    assert_eq!(report.changesets, vec![500]);
    let changeset = queries::get_changeset(&conn, 500).unwrap().unwrap();
    assert_eq!(changeset.num_changes, 3);
    assert_eq!(changeset.closed_at, Some(ts(2)));

    let current = queries::get_entity(&conn, EntityType::Point, 1).unwrap().unwrap();
    assert_eq!(current.version, 2);
    assert_eq!(current.user, Some(User::new(1, "alice")));

    let modify = &queries::entity_history(&conn, EntityType::Point, 1).unwrap()[1];
    assert!(!modify.tags_changed);
    assert!(modify.geometry_changed);
}

#[test]
fn test_break_rolls_back_whole_run() {
    // Given: A stream whose second change deletes an unknown entity
    let mut conn = setup_test_db();
    let stream = vec![
        (ChangeAction::Create, point(1, 1, 600, 0.0, 0.0)),
        (ChangeAction::Delete, point(99, 2, 600, 0.0, 0.0)),
    ];
    let options = ProcessorOptions {
        invalid_actions: InvalidActionsMode::Break,
        ..ProcessorOptions::default()
    };

    // When: The run fails and the transaction is dropped
    let err = {
        let tx = conn.transaction().unwrap();
        let mut store = SqliteStore::new(&tx);
        ChangeProcessor::new(options).run(&mut store, stream).unwrap_err()
    };

    // Then: Nothing from the run is visible
    assert_eq!(err.kind(), ExErrorKind::InvalidAction);
    assert_eq!(err.entity_id(), Some(99));
    assert_eq!(queries::count_changes(&conn).unwrap(), 0);
    assert!(queries::get_changeset(&conn, 600).unwrap().is_none());
}
