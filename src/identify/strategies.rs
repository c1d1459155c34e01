//! The five cascade stages.

use crate::model::{ElementKind, Point};
use crate::topology::NodeIx;

use super::{boss, IdentifyContext, Resolution, ResolutionStrategy};

/// Rooms that already carry `is_entrance` / `is_exit` win outright.
pub struct ExplicitFlags;

impl ResolutionStrategy for ExplicitFlags {
    fn name(&self) -> &'static str {
        "explicit_flags"
    }

    fn attempt(&self, ctx: &IdentifyContext<'_>, res: &mut Resolution) {
        let rooms = &ctx.level.rooms;
        if let Some(ix) = rooms.iter().position(|r| r.is_entrance) {
            res.set_entrance(ix, self.name());
        }
        if let Some(ix) = (0..rooms.len()).find(|&i| rooms[i].is_exit && Some(i) != res.entrance) {
            res.set_exit(ix, self.name());
        }
    }
}

/// Entrance / exit game elements claim the room nearest to them.
pub struct ElementMarkers;

impl ResolutionStrategy for ElementMarkers {
    fn name(&self) -> &'static str {
        "element_markers"
    }

    fn attempt(&self, ctx: &IdentifyContext<'_>, res: &mut Resolution) {
        let marker = |kind: ElementKind| {
            ctx.level.game_elements.iter().find(|e| e.kind == kind).map(|e| e.position)
        };

        if res.entrance.is_none() {
            if let Some(at) = marker(ElementKind::Entrance) {
                if let Some(ix) = nearest_room_excluding(ctx, &at, res.exit) {
                    res.set_entrance(ix, self.name());
                }
            }
        }
        if res.exit.is_none() {
            if let Some(at) = marker(ElementKind::Exit) {
                if let Some(ix) = nearest_room_excluding(ctx, &at, res.entrance) {
                    res.set_exit(ix, self.name());
                }
            }
        }
    }
}

/// Exit only: the best-ranked boss room reachable from the entrance.
///
/// With no entrance yet, the best candidate that reaches at least one other
/// room is taken and the topology stage then picks an entrance in the same
/// component. Isolated candidates are skipped.
pub struct BossRoom;

impl ResolutionStrategy for BossRoom {
    fn name(&self) -> &'static str {
        "boss_room"
    }

    fn attempt(&self, ctx: &IdentifyContext<'_>, res: &mut Resolution) {
        if res.exit.is_some() {
            return;
        }
        let chosen = boss::rank_boss_candidates(ctx.level)
            .into_iter()
            .filter(|&ix| Some(ix) != res.entrance)
            .find(|&ix| match res.entrance {
                Some(entrance) => ctx.reachable(entrance, ix),
                None => reaches_other_room(ctx, ix),
            });
        if let Some(ix) = chosen {
            res.set_exit(ix, self.name());
        }
    }
}

/// Degree-based fallback over rooms that have at least one connection.
pub struct Topology;

impl ResolutionStrategy for Topology {
    fn name(&self) -> &'static str {
        "topology"
    }

    fn attempt(&self, ctx: &IdentifyContext<'_>, res: &mut Resolution) {
        let graph = &ctx.graph;
        let connected: Vec<NodeIx> = (0..ctx.room_count()).filter(|&ix| graph.degree(ix) > 0).collect();

        if res.entrance.is_none() {
            let pool: Vec<NodeIx> = connected
                .iter()
                .copied()
                .filter(|&ix| Some(ix) != res.exit)
                .filter(|&ix| res.exit.is_none_or(|exit| ctx.reachable(exit, ix)))
                .collect();
            if let Some(ix) = prefer_leaf(ctx, &pool) {
                res.set_entrance(ix, self.name());
            }
        }

        if res.exit.is_none() {
            let Some(entrance) = res.entrance else { return };
            let dist = graph.bfs_distances(entrance);
            let pool: Vec<NodeIx> = connected
                .iter()
                .copied()
                .filter(|&ix| ix != entrance && dist[ix].is_some())
                .collect();
            if let Some(ix) = prefer_leaf(ctx, &pool) {
                res.set_exit(ix, self.name());
            }
        }
    }
}

/// Last resort: extremes of `x + y` over room centers.
pub struct SpatialExtremes;

impl ResolutionStrategy for SpatialExtremes {
    fn name(&self) -> &'static str {
        "spatial"
    }

    fn attempt(&self, ctx: &IdentifyContext<'_>, res: &mut Resolution) {
        let diagonal_key = |ix: NodeIx| {
            let c = ctx.level.rooms[ix].center();
            c.x + c.y
        };

        if res.entrance.is_none() {
            let pick = (0..ctx.room_count())
                .filter(|&ix| Some(ix) != res.exit)
                .fold(None, |best: Option<NodeIx>, ix| match best {
                    Some(b) if diagonal_key(b) <= diagonal_key(ix) => Some(b),
                    _ => Some(ix),
                });
            if let Some(ix) = pick {
                res.set_entrance(ix, self.name());
            }
        }

        if res.exit.is_none() {
            let pick = (0..ctx.room_count())
                .filter(|&ix| Some(ix) != res.entrance)
                .fold(None, |best: Option<NodeIx>, ix| match best {
                    Some(b) if diagonal_key(b) >= diagonal_key(ix) => Some(b),
                    _ => Some(ix),
                });
            if let Some(ix) = pick {
                res.set_exit(ix, self.name());
            }
        }
    }
}

fn reaches_other_room(ctx: &IdentifyContext<'_>, ix: NodeIx) -> bool {
    let dist = ctx.graph.bfs_distances(ix);
    (0..ctx.room_count()).any(|room| room != ix && dist[room].is_some())
}

/// First degree-1 room in `pool`, else the first of minimum degree.
fn prefer_leaf(ctx: &IdentifyContext<'_>, pool: &[NodeIx]) -> Option<NodeIx> {
    let degree = |ix: NodeIx| ctx.graph.degree(ix);
    pool.iter()
        .copied()
        .find(|&ix| degree(ix) == 1)
        .or_else(|| pool.iter().copied().min_by_key(|&ix| (degree(ix), ix)))
}

fn nearest_room_excluding(ctx: &IdentifyContext<'_>, at: &Point, exclude: Option<NodeIx>) -> Option<NodeIx> {
    let rooms = &ctx.level.rooms;
    (0..rooms.len())
        .filter(|&ix| Some(ix) != exclude)
        .map(|ix| (ix, rooms[ix].center().distance(at)))
        .fold(None, |best: Option<(NodeIx, f64)>, (ix, d)| match best {
            Some((_, bd)) if bd <= d => best,
            _ => Some((ix, d)),
        })
        .map(|(ix, _)| ix)
}
