#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use geodiff_core::{EntitySnapshot, EntityType, Geometry, User};
use rusqlite::Connection;

pub fn setup_test_db() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    geodiff_store::db::configure(&conn).unwrap();
    geodiff_store::migrations::apply_migrations(&mut conn).unwrap();
    conn
}

pub fn ts(offset_secs: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap() + Duration::seconds(offset_secs)
}

pub fn point(id: i64, version: i64, changeset_id: i64, lon: f64, lat: f64) -> EntitySnapshot {
    EntitySnapshot::new(EntityType::Point, id, version, changeset_id)
        .with_timestamp(ts(version))
        .with_user(User::new(1, "alice"))
        .with_tag("name", "A")
        .with_geometry(Geometry::point(lon, lat))
}

/// One JSON-lines record as the change reader expects it
pub fn change_line(action: &str, entity: &EntitySnapshot) -> String {
    serde_json::json!({ "action": action, "entity": entity }).to_string()
}

pub fn stream(lines: &[String]) -> String {
    let mut text = lines.join("\n");
    text.push('\n');
    text
}
