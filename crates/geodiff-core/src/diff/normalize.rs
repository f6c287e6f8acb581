//! Geometry normalization.
//!
//! Source data contains lines reduced to a single position. Those are not
//! valid line strings, so they collapse to a point geometry at that position.
//! The same function is applied to the previous and the new geometry before
//! any comparison, which keeps equality checks symmetric.

use crate::model::{EntityType, Geometry};

/// Return the canonical geometry for an entity of the given type.
///
/// - Point entities: identity.
/// - Line entities: a one-position line becomes a point; an empty line
///   becomes absent; anything else is returned unchanged.
/// - Relation entities: identity (relations normally carry no geometry).
/// - Absent input yields absent output.
///
/// The function is total and idempotent.
pub fn normalize_geometry(entity_type: EntityType, raw: Option<&Geometry>) -> Option<Geometry> {
    let geometry = raw?;

    match entity_type {
        EntityType::Point | EntityType::Relation => Some(geometry.clone()),
        EntityType::Line => match geometry {
            Geometry::LineString(coords) => match coords.as_slice() {
                [] => None,
                [single] => Some(Geometry::Point(*single)),
                _ => Some(geometry.clone()),
            },
            Geometry::Point(_) => Some(geometry.clone()),
        },
    }
}
