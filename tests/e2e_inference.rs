//! End-to-end tests for spatial adjacency inference.
//!
//! Covers adjacency detection, door placement, merge behavior against
//! existing connections and doors, and corridor handling.

use dungeon_metrics::inference::INFERRED_CONNECTION_TYPE;
use dungeon_metrics::model::Door;
use dungeon_metrics::{Corridor, Level, Point, Room, SpatialInference};
use pretty_assertions::assert_eq;

// ============================================================================
// Helper: an L-shaped block of three touching rooms plus a distant vault.
// ============================================================================

fn setup_block() -> Level {
    Level::new()
        .with_room(Room::new("hall", 0.0, 0.0, 10.0, 10.0))
        .with_room(Room::new("east", 11.0, 2.0, 6.0, 6.0))
        .with_room(Room::new("south", 0.0, 10.0, 10.0, 4.0))
        .with_room(Room::new("vault", 40.0, 40.0, 4.0, 4.0))
}

fn pairs(level: &Level) -> Vec<(String, String)> {
    level
        .connections
        .iter()
        .map(|c| (c.from_room.clone(), c.to_room.clone()))
        .collect()
}

// ============================================================================
// 1. Detection
// ============================================================================

#[test]
fn test_infer_finds_adjacent_pairs_only() {
    let inferred = SpatialInference::default().infer(&setup_block());

    let found: Vec<(String, String)> = inferred
        .connections
        .iter()
        .map(|c| (c.from_room.clone(), c.to_room.clone()))
        .collect();
    assert_eq!(
        found,
        vec![
            ("hall".to_string(), "east".to_string()),
            ("hall".to_string(), "south".to_string()),
        ]
    );
    assert!(inferred.connections.iter().all(|c| c.inferred));
    assert!(inferred
        .connections
        .iter()
        .all(|c| c.connection_type.as_deref() == Some(INFERRED_CONNECTION_TYPE)));
}

#[test]
fn test_confidence_in_unit_range() {
    let inferred = SpatialInference::default().infer(&setup_block());
    for conn in &inferred.connections {
        let confidence = conn.confidence.unwrap();
        assert!((0.0..=1.0).contains(&confidence));
    }
}

#[test]
fn test_door_on_shared_boundary() {
    let inferred = SpatialInference::default().infer(&setup_block());

    // hall/south share the edge y=10 over x in [0, 10]
    let door = inferred.doors.iter().find(|d| d.connects.contains(&"south".to_string())).unwrap();
    assert_eq!(door.position, Point::new(5.0, 10.0));
    assert!(door.inferred);

    // hall/east: y ranges overlap over [2, 8], 1 unit gap on x
    let door = inferred.doors.iter().find(|d| d.connects.contains(&"east".to_string())).unwrap();
    assert_eq!(door.position.y, 5.0);
}

#[test]
fn test_threshold_controls_gap_tolerance() {
    let level = Level::new()
        .with_room(Room::new("a", 0.0, 0.0, 5.0, 5.0))
        .with_room(Room::new("b", 8.0, 0.0, 5.0, 5.0));

    assert!(SpatialInference::new(2.0).infer(&level).connections.is_empty());
    assert_eq!(SpatialInference::new(3.0).infer(&level).connections.len(), 1);
}

#[test]
fn test_corridor_counts_as_space() {
    let level = Level::new()
        .with_room(Room::new("a", 0.0, 0.0, 5.0, 5.0))
        .with_room(Room::new("b", 15.0, 0.0, 5.0, 5.0))
        .with_corridor(Corridor::new("c", [Point::new(5.5, 2.5), Point::new(14.5, 2.5)], 1.0));

    let inferred = SpatialInference::default().infer(&level);
    assert_eq!(inferred.connections.len(), 2);
    assert!(inferred.connections.iter().all(|c| c.from_room == "c" || c.to_room == "c"));
}

// ============================================================================
// 2. Merge
// ============================================================================

#[test]
fn test_enhance_adds_missing_links_and_doors() {
    let mut level = setup_block().with_connection("hall", "east");
    let stats = SpatialInference::default().enhance(&mut level);

    assert_eq!(stats.connections_added, 1);
    assert_eq!(stats.doors_added, 2);
    assert_eq!(
        pairs(&level),
        vec![
            ("hall".to_string(), "east".to_string()),
            ("hall".to_string(), "south".to_string()),
        ]
    );
    // the user-authored connection is untouched
    assert!(!level.connections[0].inferred);
}

#[test]
fn test_enhance_keeps_existing_doors() {
    let mut level = setup_block().with_door(Door::new("d0", Point::new(10.0, 5.0), "hall", "east"));
    let stats = SpatialInference::default().enhance(&mut level);

    assert_eq!(stats.doors_added, 0);
    assert_eq!(level.doors.len(), 1);
    assert!(level.connections.iter().all(|c| c.door_id.is_none()));
}

#[test]
fn test_reverse_direction_counts_as_existing() {
    let mut level = setup_block().with_connection("south", "hall");
    let stats = SpatialInference::default().enhance(&mut level);
    assert_eq!(stats.connections_added, 1);
    assert!(!level.connections.iter().any(|c| c.from_room == "hall" && c.to_room == "south"));
    assert!(level.has_connection("hall", "south"));
    assert!(level.has_connection("east", "hall"));
    assert!(!level.has_connection("east", "south"));
}

#[test]
fn test_enhance_twice_adds_nothing() {
    let inference = SpatialInference::default();
    let mut level = setup_block();
    inference.enhance(&mut level);
    let snapshot = level.clone();

    let stats = inference.enhance(&mut level);
    assert_eq!(stats.connections_added, 0);
    assert_eq!(level, snapshot);
}
