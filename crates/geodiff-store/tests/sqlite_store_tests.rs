#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use geodiff_core::collaborators::{ChangeSink, ChangesetStore, EntityStore, UserStore};
use geodiff_core::{
    build_change, ChangeAction, ChangesetRecord, EntitySnapshot, EntityType, ExErrorKind,
    Geometry, RelationMember, User,
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

#[test]
fn test_lookup_missing_entity_is_none() {
    let conn = setup_test_db();
    let store = SqliteStore::new(&conn);

    assert!(store.lookup(EntityType::Point, 1).unwrap().is_none());
}

#[test]
fn test_current_state_round_trip() {
    // Given: A line with tags, geometry and a user
    let conn = setup_test_db();
    let mut store = SqliteStore::new(&conn);
    store.add_user(&User::new(4, "dora")).unwrap();
    let line = EntitySnapshot::new(EntityType::Line, 42, 3, 9)
        .with_timestamp(ts(0) + Duration::milliseconds(250))
        .with_user(User::new(4, "dora"))
        .with_tag("highway", "service")
        .with_geometry(Geometry::line([(0.0, 0.0), (1.5, -2.25)]));

    // When: It is saved and looked up again
    store.save_current(&line).unwrap();
    let loaded = store.lookup(EntityType::Line, 42).unwrap().unwrap();

    // Then: Every field survives
    assert_eq!(loaded, line);

    // And: Ids are scoped by entity type
    assert!(store.lookup(EntityType::Point, 42).unwrap().is_none());
}

#[test]
fn test_save_current_replaces_previous_version() {
    let conn = setup_test_db();
    let mut store = SqliteStore::new(&conn);
    let v1 = EntitySnapshot::new(EntityType::Point, 1, 1, 10)
        .with_timestamp(ts(0))
        .with_geometry(Geometry::point(1.0, 1.0));
    let v2 = EntitySnapshot::new(EntityType::Point, 1, 2, 11)
        .with_timestamp(ts(1))
        .with_geometry(Geometry::point(2.0, 2.0));

    store.save_current(&v1).unwrap();
    store.save_current(&v2.tombstone()).unwrap();

    let loaded = store.lookup(EntityType::Point, 1).unwrap().unwrap();
    assert_eq!(loaded.version, 2);
    assert!(!loaded.visible);
    assert!(loaded.geometry.is_none());
}

#[test]
fn test_relation_members_round_trip() {
    let conn = setup_test_db();
    let mut store = SqliteStore::new(&conn);
    let relation = EntitySnapshot::new(EntityType::Relation, 5, 1, 1)
        .with_timestamp(ts(0))
        .with_members(vec![RelationMember {
            member_type: EntityType::Line,
            member_id: 42,
            role: "outer".to_string(),
        }]);

    store.save_current(&relation).unwrap();

    assert_eq!(store.lookup(EntityType::Relation, 5).unwrap().unwrap(), relation);
}

#[test]
fn test_changeset_lifecycle_and_summary() {
    // Given: A changeset with two persisted changes
    let conn = setup_test_db();
    let mut store = SqliteStore::new(&conn);
    assert!(!store.changeset_exists(500).unwrap());
    store
        .create_changeset(&ChangesetRecord::new(500, 1, ts(0)))
        .unwrap();
    assert!(store.changeset_exists(500).unwrap());

    for (id, offset) in [(1, 5), (2, 9)] {
        let next = EntitySnapshot::new(EntityType::Point, id, 1, 500)
            .with_timestamp(ts(offset))
            .with_geometry(Geometry::point(0.0, 0.0));
        store
            .persist(&build_change(ChangeAction::Create, None, &next))
            .unwrap();
    }

    // When: The summary is recomputed
    store.recompute_changeset_summary(500).unwrap();

    // Then: Count and close time reflect the changes
    let changeset = queries::get_changeset(&conn, 500).unwrap().unwrap();
    assert_eq!(changeset.num_changes, 2);
    assert_eq!(changeset.created_at, ts(0));
    assert_eq!(changeset.closed_at, Some(ts(9)));
}

#[test]
fn test_duplicate_changeset_is_constraint_violation() {
    let conn = setup_test_db();
    let mut store = SqliteStore::new(&conn);
    store
        .create_changeset(&ChangesetRecord::new(7, 1, ts(0)))
        .unwrap();

    let err = store
        .create_changeset(&ChangesetRecord::new(7, 1, ts(0)))
        .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::ConstraintViolation);
    assert_eq!(err.changeset_id(), Some(7));
}

#[test]
fn test_recompute_unknown_changeset_is_not_found() {
    let conn = setup_test_db();
    let mut store = SqliteStore::new(&conn);

    let err = store.recompute_changeset_summary(404).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::NotFound);
}

#[test]
fn test_change_record_round_trip() {
    let conn = setup_test_db();
    let mut store = SqliteStore::new(&conn);
    store
        .create_changeset(&ChangesetRecord::new(11, 1, ts(0)))
        .unwrap();
    let prev = EntitySnapshot::new(EntityType::Point, 7, 2, 10)
        .with_timestamp(ts(0))
        .with_tag("name", "A")
        .with_geometry(Geometry::point(1.0, 2.0));
    let next = EntitySnapshot::new(EntityType::Point, 7, 3, 11)
        .with_timestamp(ts(1))
        .with_tag("name", "A")
        .with_geometry(Geometry::point(1.0, 2.5));
    let record = build_change(ChangeAction::Modify, Some(&prev), &next);

    store.persist(&record).unwrap();

    assert_eq!(queries::list_changes(&conn, 11).unwrap(), vec![record.clone()]);
    assert_eq!(
        queries::entity_history(&conn, EntityType::Point, 7).unwrap(),
        vec![record]
    );
    assert_eq!(queries::count_changes(&conn).unwrap(), 1);
}

#[test]
fn test_change_without_timestamp_is_rejected() {
    let conn = setup_test_db();
    let mut store = SqliteStore::new(&conn);
    let next = EntitySnapshot::new(EntityType::Point, 1, 1, 1);

    let err = store
        .persist(&build_change(ChangeAction::Create, None, &next))
        .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::MissingField);
}

#[test]
fn test_users_add_get_update() {
    let conn = setup_test_db();
    let mut store = SqliteStore::new(&conn);

    assert!(store.get_user(1).unwrap().is_none());
    store.add_user(&User::new(1, "alice")).unwrap();
    store.update_user(&User::new(1, "alice_b")).unwrap();

    assert_eq!(store.get_user(1).unwrap(), Some(User::new(1, "alice_b")));
}
