use chrono::{DateTime, Duration, TimeZone, Utc};
use geodiff_core::{EntitySnapshot, EntityType, Geometry, User};

/// Fixed base instant for deterministic timestamps
#[allow(dead_code)]
pub fn ts(offset_secs: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap() + Duration::seconds(offset_secs)
}

/// A timestamped point snapshot tagged `name=A`
#[allow(dead_code)]
pub fn point(id: i64, version: i64, changeset_id: i64, lon: f64, lat: f64) -> EntitySnapshot {
    EntitySnapshot::new(EntityType::Point, id, version, changeset_id)
        .with_timestamp(ts(version))
        .with_tag("name", "A")
        .with_geometry(Geometry::point(lon, lat))
}

/// A timestamped line snapshot
#[allow(dead_code)]
pub fn line(id: i64, version: i64, changeset_id: i64, coords: &[(f64, f64)]) -> EntitySnapshot {
    EntitySnapshot::new(EntityType::Line, id, version, changeset_id)
        .with_timestamp(ts(version))
        .with_tag("highway", "residential")
        .with_geometry(Geometry::line(coords.iter().copied()))
}

#[allow(dead_code)]
pub fn alice() -> User {
    User::new(1, "alice")
}
