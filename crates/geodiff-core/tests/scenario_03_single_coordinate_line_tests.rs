#![allow(clippy::unwrap_used, clippy::expect_used)]

/// Scenario 3: Create a line with a single coordinate
mod common;

use common::line;
use geodiff_core::{
    build_change, ChangeAction, ChangeProcessor, Coordinate, EntityType, Geometry, MemoryStore,
    ProcessorOptions,
};

#[test]
fn test_scenario_03_single_coordinate_line_becomes_point() {
    // Given a new line with one coordinate
    let next = line(42, 1, 9, &[(1.0, 2.0)]);

    // When the create is diffed
    let record = build_change(ChangeAction::Create, None, &next);

    // Then the recorded geometry is a valid point, not a one-point line
    let geometry = record.new_geometry.expect("geometry present");
    assert_eq!(geometry, Geometry::Point(Coordinate::new(1.0, 2.0)));
    assert!(geometry.is_valid());
    assert_eq!(record.entity_type, EntityType::Line);
}

#[test]
fn test_scenario_03_stored_state_keeps_raw_geometry() {
    // Given an empty store
    let mut store = MemoryStore::new();
    let mut processor = ChangeProcessor::new(ProcessorOptions::default());

    // When the degenerate line is created and then modified with the same position
    processor
        .process(&mut store, ChangeAction::Create, &line(42, 1, 9, &[(1.0, 2.0)]))
        .unwrap();
    let outcome = processor
        .process(&mut store, ChangeAction::Modify, &line(42, 2, 10, &[(1.0, 2.0)]))
        .unwrap();

    // Then both sides normalize identically and no geometry change is reported
    let record = outcome.record().unwrap();
    assert!(!record.geometry_changed);
    assert_eq!(
        record.previous_geometry,
        Some(Geometry::Point(Coordinate::new(1.0, 2.0)))
    );
}
