//! # Space Graph
//!
//! Read-only adjacency index over a level's spaces. Rooms occupy indices
//! `0..room_count`, corridors follow, matching [`Level::spaces`] order.
//!
//! Connections are undirected and kept as a multigraph: parallel edges and
//! self-loops count toward degree and edge totals. Connections naming an
//! unknown space are dropped with a warning.

use std::collections::VecDeque;

use hashbrown::HashMap;
use smallvec::SmallVec;
use tracing::warn;

use crate::model::{Level, Point};

/// Dense node index into a [`SpaceGraph`].
pub type NodeIx = usize;

/// Undirected multigraph over rooms and corridors.
#[derive(Debug, Clone)]
pub struct SpaceGraph<'a> {
    ids: Vec<&'a str>,
    centers: Vec<Option<Point>>,
    index: HashMap<&'a str, NodeIx>,
    /// node → neighbour per incident edge end
    adjacency: Vec<SmallVec<[NodeIx; 4]>>,
    edge_count: usize,
    room_count: usize,
}

impl<'a> SpaceGraph<'a> {
    pub fn from_level(level: &'a Level) -> Self {
        let mut ids = Vec::with_capacity(level.space_count());
        let mut centers = Vec::with_capacity(level.space_count());
        let mut index = HashMap::with_capacity(level.space_count());

        for space in level.spaces() {
            let ix = ids.len();
            ids.push(space.id());
            centers.push(space.center());
            index.entry(space.id()).or_insert(ix);
        }

        let mut adjacency: Vec<SmallVec<[NodeIx; 4]>> = vec![SmallVec::new(); ids.len()];
        let mut edge_count = 0;

        for conn in &level.connections {
            let (Some(&a), Some(&b)) = (index.get(conn.from_room.as_str()), index.get(conn.to_room.as_str())) else {
                warn!("Skipping connection {} - {}: unknown endpoint", conn.from_room, conn.to_room);
                continue;
            };
            adjacency[a].push(b);
            adjacency[b].push(a);
            edge_count += 1;
        }

        Self {
            ids,
            centers,
            index,
            adjacency,
            edge_count,
            room_count: level.rooms.len(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn room_count(&self) -> usize {
        self.room_count
    }

    pub fn is_room(&self, ix: NodeIx) -> bool {
        ix < self.room_count
    }

    pub fn id(&self, ix: NodeIx) -> &'a str {
        self.ids[ix]
    }

    pub fn center(&self, ix: NodeIx) -> Option<Point> {
        self.centers[ix]
    }

    pub fn index_of(&self, id: &str) -> Option<NodeIx> {
        self.index.get(id).copied()
    }

    /// Neighbours of `ix`, one entry per incident edge end.
    pub fn neighbors(&self, ix: NodeIx) -> &[NodeIx] {
        &self.adjacency[ix]
    }

    pub fn degree(&self, ix: NodeIx) -> usize {
        self.adjacency[ix].len()
    }

    /// BFS hop counts from `start`; `None` marks unreachable nodes.
    pub fn bfs_distances(&self, start: NodeIx) -> Vec<Option<usize>> {
        let mut dist = vec![None; self.node_count()];
        let mut queue = VecDeque::new();
        dist[start] = Some(0);
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            let next_depth = dist[current].map(|d| d + 1);
            for &next in self.neighbors(current) {
                if dist[next].is_none() {
                    dist[next] = next_depth;
                    queue.push_back(next);
                }
            }
        }

        dist
    }

    pub fn distance(&self, from: NodeIx, to: NodeIx) -> Option<usize> {
        self.bfs_distances(from)[to]
    }

    pub fn is_reachable(&self, from: NodeIx, to: NodeIx) -> bool {
        self.distance(from, to).is_some()
    }

    /// Largest BFS distance from `ix` to any node in its component.
    pub fn eccentricity(&self, ix: NodeIx) -> usize {
        self.bfs_distances(ix).into_iter().flatten().max().unwrap_or(0)
    }

    /// Connected components by flood fill, each listed in discovery order.
    pub fn components(&self) -> Vec<Vec<NodeIx>> {
        let mut seen = vec![false; self.node_count()];
        let mut components = Vec::new();

        for root in 0..self.node_count() {
            if seen[root] {
                continue;
            }
            let mut members = Vec::new();
            let mut queue = VecDeque::from([root]);
            seen[root] = true;
            while let Some(current) = queue.pop_front() {
                members.push(current);
                for &next in self.neighbors(current) {
                    if !seen[next] {
                        seen[next] = true;
                        queue.push_back(next);
                    }
                }
            }
            components.push(members);
        }

        components
    }

    pub fn component_count(&self) -> usize {
        self.components().len()
    }

    pub fn is_connected(&self) -> bool {
        self.node_count() > 0 && self.component_count() == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Corridor, Room};

    fn chain(n: usize) -> Level {
        let mut level = Level::new();
        for i in 0..n {
            level = level.with_room(Room::new(format!("r{i}"), i as f64 * 10.0, 0.0, 5.0, 5.0));
        }
        for i in 1..n {
            level = level.with_connection(format!("r{}", i - 1), format!("r{i}"));
        }
        level
    }

    #[test]
    fn test_bfs_on_chain() {
        let level = chain(4);
        let g = SpaceGraph::from_level(&level);
        assert_eq!(g.bfs_distances(0), vec![Some(0), Some(1), Some(2), Some(3)]);
        assert_eq!(g.eccentricity(1), 2);
        assert!(g.is_connected());
    }

    #[test]
    fn test_unknown_endpoints_are_skipped() {
        let level = chain(2).with_connection("r0", "ghost");
        let g = SpaceGraph::from_level(&level);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.degree(0), 1);
    }

    #[test]
    fn test_components_and_reachability() {
        let level = chain(2).with_room(Room::new("lonely", 100.0, 100.0, 3.0, 3.0));
        let g = SpaceGraph::from_level(&level);
        assert_eq!(g.component_count(), 2);
        assert!(!g.is_connected());
        assert!(g.is_reachable(0, 1));
        assert!(!g.is_reachable(0, 2));
    }

    #[test]
    fn test_parallel_edges_count_twice() {
        let level = chain(2).with_connection("r1", "r0");
        let g = SpaceGraph::from_level(&level);
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.degree(0), 2);
        assert_eq!(g.distance(0, 1), Some(1));
    }

    #[test]
    fn test_corridors_follow_rooms() {
        let level = chain(2)
            .with_corridor(Corridor::new("c", [Point::new(0.0, 0.0), Point::new(1.0, 0.0)], 1.0))
            .with_connection("c", "r1");
        let g = SpaceGraph::from_level(&level);
        assert_eq!(g.room_count(), 2);
        assert_eq!(g.index_of("c"), Some(2));
        assert!(!g.is_room(2));
        assert_eq!(g.id(2), "c");
    }
}
