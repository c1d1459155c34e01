//! # Spatial Inference
//!
//! Repairs missing connectivity from geometry alone. Two spaces are
//! adjacent when their projections overlap on one axis and the gap on the
//! other axis is within `adjacency_threshold`. Every adjacent pair yields
//! one connection and one door.
//!
//! ```text
//!   ┌──────┐ gap ≤ t ┌──────┐
//!   │  a   │   [d]   │  b   │     overlap on y, door at the middle of
//!   └──────┘         └──────┘     the shared y-range, between the faces
//! ```
//!
//! [`SpatialInference::enhance`] is additive and idempotent: it never
//! touches existing connections or doors, skips pairs that are already
//! linked, and only adds doors to a level that has none.

use hashbrown::HashSet;
use tracing::debug;

use crate::config::EngineConfig;
use crate::model::{unordered, Bounds, Connection, Door, Level, Point, Space};

/// Confidence granted to any adjacent pair.
const BASE_CONFIDENCE: f64 = 0.5;
/// Extra confidence available for overlapping boxes.
const OVERLAP_BONUS: f64 = 0.5;
/// Type tag on connections produced here.
pub const INFERRED_CONNECTION_TYPE: &str = "inferred_adjacency";

/// Output of a raw inference pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inferred {
    pub connections: Vec<Connection>,
    pub doors: Vec<Door>,
}

/// What [`SpatialInference::enhance`] added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnhanceStats {
    pub connections_added: usize,
    pub doors_added: usize,
}

/// Geometry-driven adjacency inference.
#[derive(Debug, Clone)]
pub struct SpatialInference {
    adjacency_threshold: f64,
    min_confidence: f64,
}

impl Default for SpatialInference {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl SpatialInference {
    pub fn new(adjacency_threshold: f64) -> Self {
        Self { adjacency_threshold, ..Self::default() }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            adjacency_threshold: config.adjacency_threshold,
            min_confidence: config.min_inference_confidence,
        }
    }

    /// Infer a connection and a door for every adjacent pair of spaces.
    ///
    /// O(n²) over rooms and corridors. Corridors with an empty path have
    /// no geometry and are ignored.
    pub fn infer(&self, level: &Level) -> Inferred {
        let spaces: Vec<(Space<'_>, Bounds)> = level
            .spaces()
            .filter_map(|s| s.bounds().map(|b| (s, b)))
            .collect();

        let mut out = Inferred::default();

        for (i, (a, ab)) in spaces.iter().enumerate() {
            for (b, bb) in &spaces[i + 1..] {
                let Some(confidence) = self.adjacency_confidence(ab, bb) else {
                    continue;
                };

                let door_id = format!("inferred_door_{}", out.doors.len() + 1);
                out.doors.push(Door {
                    id: door_id.clone(),
                    position: door_position(ab, bb),
                    connects: vec![a.id().to_string(), b.id().to_string()],
                    inferred: true,
                });
                out.connections.push(Connection {
                    from_room: a.id().to_string(),
                    to_room: b.id().to_string(),
                    door_id: Some(door_id),
                    inferred: true,
                    connection_type: Some(INFERRED_CONNECTION_TYPE.to_string()),
                    confidence: Some(confidence),
                });
            }
        }

        debug!("Inferred {} adjacencies over {} spaces", out.connections.len(), spaces.len());
        out
    }

    /// Merge inferred data into `level` without duplicating or mutating
    /// anything already there.
    pub fn enhance(&self, level: &mut Level) -> EnhanceStats {
        let inferred = self.infer(level);
        let add_doors = level.doors.is_empty();

        let mut linked: HashSet<(String, String)> = level
            .connections
            .iter()
            .map(|c| owned_key(&c.from_room, &c.to_room))
            .collect();

        let mut stats = EnhanceStats::default();
        for mut conn in inferred.connections {
            if conn.confidence.unwrap_or(0.0) <= self.min_confidence {
                continue;
            }
            if !linked.insert(owned_key(&conn.from_room, &conn.to_room)) {
                continue;
            }
            if !add_doors {
                conn.door_id = None;
            }
            level.connections.push(conn);
            stats.connections_added += 1;
        }

        if add_doors {
            stats.doors_added = inferred.doors.len();
            level.doors.extend(inferred.doors);
        }

        debug!(
            "Enhanced level: +{} connections, +{} doors",
            stats.connections_added, stats.doors_added
        );
        stats
    }

    /// `None` when the pair is not adjacent.
    fn adjacency_confidence(&self, a: &Bounds, b: &Bounds) -> Option<f64> {
        if !self.is_adjacent(a, b) {
            return None;
        }
        let smaller = a.area().min(b.area());
        let overlap_ratio = if smaller > 0.0 {
            (a.intersection_area(b) / smaller).min(1.0)
        } else {
            0.0
        };
        Some((BASE_CONFIDENCE + OVERLAP_BONUS * overlap_ratio).min(1.0))
    }

    fn is_adjacent(&self, a: &Bounds, b: &Bounds) -> bool {
        let ox = a.overlap_x(b);
        let oy = a.overlap_y(b);
        (ox > 0.0 && -oy <= self.adjacency_threshold)
            || (oy > 0.0 && -ox <= self.adjacency_threshold)
    }
}

fn owned_key(a: &str, b: &str) -> (String, String) {
    let (x, y) = unordered(a, b);
    (x.to_string(), y.to_string())
}

/// Middle of the shared boundary when exactly one axis overlaps,
/// otherwise the midpoint of the two centers.
fn door_position(a: &Bounds, b: &Bounds) -> Point {
    let ox = a.overlap_x(b);
    let oy = a.overlap_y(b);
    let x_mid = (a.min_x.max(b.min_x) + a.max_x.min(b.max_x)) / 2.0;
    let y_mid = (a.min_y.max(b.min_y) + a.max_y.min(b.max_y)) / 2.0;

    match (ox > 0.0, oy > 0.0) {
        (true, false) | (false, true) => Point::new(x_mid, y_mid),
        _ => a.center().midpoint(&b.center()),
    }
}
