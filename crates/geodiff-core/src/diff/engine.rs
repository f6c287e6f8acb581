//! Change diff builder.
//!
//! The core entry point is [`build_change`], which accepts the claimed action,
//! the stored previous version (if any) and the incoming version, and produces
//! a [`ChangeRecord`].

use crate::diff::normalize::normalize_geometry;
use crate::diff::tags::compare_tags;
use crate::model::{ChangeAction, ChangeRecord, EntitySnapshot, EntityType};

/// Build the audit record for one change.
///
/// Identity fields (`entity_id`, `entity_type`, `version`, `changeset_id`,
/// `timestamp`) are copied from `next`. Geometries on both sides are
/// normalized before comparison, so a one-position line never reaches the
/// record.
///
/// Per action:
///
/// - **Create**: both flags set, only `new_*` populated.
/// - **Modify** with previous: flags reflect tag and geometry value
///   equality; `previous_*` always populated, `new_*` only for the changed
///   dimension.
/// - **Modify** without previous: treated like a create.
/// - `members_changed` is set for every relation create or modify; member
///   lists are not compared.
/// - **Delete**: both flags set, only `previous_*` populated (empty when the
///   entity was unknown).
///
/// Never fails and never mutates its inputs.
pub fn build_change(
    action: ChangeAction,
    previous: Option<&EntitySnapshot>,
    next: &EntitySnapshot,
) -> ChangeRecord {
    let new_geometry = normalize_geometry(next.entity_type, next.geometry.as_ref());
    let previous_geometry =
        previous.and_then(|p| normalize_geometry(p.entity_type, p.geometry.as_ref()));

    let mut record = ChangeRecord {
        entity_id: next.entity_id,
        entity_type: next.entity_type,
        version: next.version,
        changeset_id: next.changeset_id,
        timestamp: next.timestamp,
        action,
        tags_changed: false,
        geometry_changed: false,
        members_changed: false,
        previous_tags: None,
        new_tags: None,
        previous_geometry: None,
        new_geometry: None,
    };

    match (action, previous) {
        (ChangeAction::Create, _) | (ChangeAction::Modify, None) => {
            record.tags_changed = true;
            record.geometry_changed = true;
            record.members_changed = next.entity_type == EntityType::Relation;
            record.new_tags = Some(next.tags.clone());
            record.new_geometry = new_geometry;
        }

        (ChangeAction::Modify, Some(prev)) => {
            let tags_changed = !compare_tags(Some(&prev.tags), Some(&next.tags)).is_equal();
            let geometry_changed = previous_geometry != new_geometry;

            record.tags_changed = tags_changed;
            record.geometry_changed = geometry_changed;
            record.members_changed = next.entity_type == EntityType::Relation;
            record.previous_tags = Some(prev.tags.clone());
            record.previous_geometry = previous_geometry;
            if tags_changed {
                record.new_tags = Some(next.tags.clone());
            }
            if geometry_changed {
                record.new_geometry = new_geometry;
            }
        }

        (ChangeAction::Delete, prev) => {
            record.tags_changed = true;
            record.geometry_changed = true;
            if let Some(prev) = prev {
                record.previous_tags = Some(prev.tags.clone());
                record.previous_geometry = previous_geometry;
            }
        }
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Coordinate, Geometry, RelationMember};
    use chrono::{TimeZone, Utc};

    fn point(id: i64, version: i64, lon: f64, lat: f64) -> EntitySnapshot {
        EntitySnapshot::new(EntityType::Point, id, version, 100)
            .with_timestamp(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
            .with_tag("name", "A")
            .with_geometry(Geometry::point(lon, lat))
    }

    #[test]
    fn test_create_sets_both_flags_and_only_new_side() {
        let next = point(1, 1, 1.0, 2.0);
        let record = build_change(ChangeAction::Create, None, &next);

        assert!(record.tags_changed);
        assert!(record.geometry_changed);
        assert!(!record.members_changed);
        assert!(record.previous_tags.is_none());
        assert!(record.previous_geometry.is_none());
        assert_eq!(record.new_tags.as_ref(), Some(&next.tags));
        assert_eq!(record.new_geometry, next.geometry);
        assert_eq!(record.timestamp, next.timestamp);
    }

    #[test]
    fn test_create_ignores_supplied_previous() {
        let prev = point(1, 1, 1.0, 2.0);
        let next = point(1, 2, 1.0, 2.0);
        let record = build_change(ChangeAction::Create, Some(&prev), &next);

        assert!(record.previous_tags.is_none());
        assert!(record.tags_changed && record.geometry_changed);
    }

    #[test]
    fn test_modify_unchanged_has_no_new_values() {
        let prev = point(1, 2, 1.0, 2.0);
        let next = point(1, 3, 1.0, 2.0);
        let record = build_change(ChangeAction::Modify, Some(&prev), &next);

        assert!(!record.tags_changed);
        assert!(!record.geometry_changed);
        assert!(record.new_tags.is_none());
        assert!(record.new_geometry.is_none());
        assert_eq!(record.previous_tags.as_ref(), Some(&prev.tags));
        assert_eq!(record.previous_geometry, prev.geometry);
    }

    #[test]
    fn test_modify_moved_point_records_geometry_only() {
        let prev = point(1, 2, 1.0, 2.0);
        let next = point(1, 3, 1.0, 2.5);
        let record = build_change(ChangeAction::Modify, Some(&prev), &next);

        assert!(!record.tags_changed);
        assert!(record.geometry_changed);
        assert_eq!(record.previous_geometry, Some(Geometry::point(1.0, 2.0)));
        assert_eq!(record.new_geometry, Some(Geometry::point(1.0, 2.5)));
        assert!(record.new_tags.is_none());
    }

    #[test]
    fn test_modify_without_previous_behaves_like_create() {
        let next = point(1, 5, 1.0, 2.0);
        let record = build_change(ChangeAction::Modify, None, &next);

        assert!(record.tags_changed && record.geometry_changed);
        assert!(record.previous_tags.is_none());
        assert!(record.new_tags.is_some());
    }

    #[test]
    fn test_delete_has_only_previous_side() {
        let prev = point(1, 2, 1.0, 2.0);
        let next = point(1, 3, 1.0, 2.0).tombstone();
        let record = build_change(ChangeAction::Delete, Some(&prev), &next);

        assert!(record.tags_changed && record.geometry_changed);
        assert!(record.new_tags.is_none());
        assert!(record.new_geometry.is_none());
        assert_eq!(record.previous_tags.as_ref(), Some(&prev.tags));
    }

    #[test]
    fn test_delete_of_unknown_entity_is_empty() {
        let next = point(9, 1, 0.0, 0.0);
        let record = build_change(ChangeAction::Delete, None, &next);

        assert!(record.previous_tags.is_none());
        assert!(record.previous_geometry.is_none());
        assert!(record.new_tags.is_none());
    }

    #[test]
    fn test_single_position_line_is_normalized_in_record() {
        let next = EntitySnapshot::new(EntityType::Line, 42, 1, 7)
            .with_geometry(Geometry::line([(1.0, 2.0)]));
        let record = build_change(ChangeAction::Create, None, &next);

        assert_eq!(
            record.new_geometry,
            Some(Geometry::Point(Coordinate::new(1.0, 2.0)))
        );
    }

    #[test]
    fn test_degenerate_line_compares_equal_after_normalization() {
        let prev = EntitySnapshot::new(EntityType::Line, 42, 1, 7)
            .with_geometry(Geometry::line([(1.0, 2.0)]));
        let next = EntitySnapshot::new(EntityType::Line, 42, 2, 8)
            .with_geometry(Geometry::point(1.0, 2.0));
        let record = build_change(ChangeAction::Modify, Some(&prev), &next);

        assert!(!record.geometry_changed);
    }

    #[test]
    fn test_relation_members_flag() {
        let member = |id| RelationMember {
            member_type: EntityType::Line,
            member_id: id,
            role: "outer".to_string(),
        };
        let prev = EntitySnapshot::new(EntityType::Relation, 3, 1, 1).with_members(vec![member(1)]);
        let same = EntitySnapshot::new(EntityType::Relation, 3, 2, 2).with_members(vec![member(1)]);
        let retagged = EntitySnapshot::new(EntityType::Relation, 3, 2, 2)
            .with_members(vec![member(1)])
            .with_tag("type", "multipolygon");

        assert!(build_change(ChangeAction::Create, None, &prev).members_changed);
        assert!(build_change(ChangeAction::Modify, None, &same).members_changed);
        assert!(!build_change(ChangeAction::Delete, Some(&prev), &same).members_changed);

        // unchanged member list still flags membership on a relation modify
        let record = build_change(ChangeAction::Modify, Some(&prev), &retagged);
        assert!(record.tags_changed);
        assert!(record.members_changed);
        assert!(build_change(ChangeAction::Modify, Some(&prev), &same).members_changed);
    }

    #[test]
    fn test_members_flag_never_set_for_points_and_lines() {
        let prev = point(1, 1, 0.0, 0.0);
        let next = point(1, 2, 0.0, 0.0);
        assert!(!build_change(ChangeAction::Modify, Some(&prev), &next).members_changed);
        assert!(!build_change(ChangeAction::Create, None, &next).members_changed);
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let prev = point(1, 2, 1.0, 2.0);
        let next = point(1, 3, 5.0, 5.0);
        let (prev_copy, next_copy) = (prev.clone(), next.clone());

        let _ = build_change(ChangeAction::Modify, Some(&prev), &next);

        assert_eq!(prev, prev_copy);
        assert_eq!(next, next_copy);
    }
}
