//! Boss-room ranking for exit detection.
//!
//! Priority bands, highest first:
//!
//! | Priority | Clue |
//! |----------|------|
//! | 100 | name is exactly a boss-room name |
//! | 80 | name contains "boss" |
//! | 70 | `room_type == "boss"` |
//! | 60 | room is nearest a `boss` game element |
//! | 50 | description mentions a boss keyword |
//! | 30 | name or description mentions a named boss monster |
//!
//! Names containing "fake" are demoted to a tenth of their priority.

use hashbrown::HashSet;

use crate::model::{ElementKind, Level, Room};
use crate::topology::NodeIx;

const EXACT_BOSS_NAMES: &[&str] = &[
    "boss",
    "boss room",
    "boss chamber",
    "boss lair",
    "boss arena",
    "final boss",
    "final boss room",
];

const DESCRIPTION_KEYWORDS: &[&str] = &["boss", "final battle", "final encounter", "lair", "throne"];

const MONSTER_CLUES: &[&str] = &[
    "dragon", "lich", "demon", "overlord", "warlord", "necromancer", "beholder",
];

const FAKE_DEMOTION: u32 = 10;

/// Priority of `room` as a boss room; 0 means not a candidate.
pub fn boss_priority(room: &Room, hosts_boss_element: bool) -> u32 {
    let name = lowered(room.name.as_deref());
    let description = lowered(room.description.as_deref());
    let mut priority = 0;

    if EXACT_BOSS_NAMES.contains(&name.trim()) {
        priority = 100;
    } else if name.contains("boss") {
        priority = 80;
    }
    if room.room_type.as_deref().is_some_and(|t| t.trim().eq_ignore_ascii_case("boss")) {
        priority = priority.max(70);
    }
    if hosts_boss_element {
        priority = priority.max(60);
    }
    if DESCRIPTION_KEYWORDS.iter().any(|k| description.contains(k)) {
        priority = priority.max(50);
    }
    if MONSTER_CLUES.iter().any(|k| name.contains(k) || description.contains(k)) {
        priority = priority.max(30);
    }

    if priority > 0 && name.contains("fake") {
        priority = (priority / FAKE_DEMOTION).max(1);
    }
    priority
}

/// Candidate room indices, best first. Equal priorities keep declaration order.
pub fn rank_boss_candidates(level: &Level) -> Vec<NodeIx> {
    let boss_hosts: HashSet<NodeIx> = level
        .game_elements
        .iter()
        .filter(|e| e.kind == ElementKind::Boss)
        .filter_map(|e| level.nearest_room(&e.position))
        .collect();

    let mut ranked: Vec<(NodeIx, u32)> = level
        .rooms
        .iter()
        .enumerate()
        .map(|(ix, room)| (ix, boss_priority(room, boss_hosts.contains(&ix))))
        .filter(|&(_, p)| p > 0)
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.into_iter().map(|(ix, _)| ix).collect()
}

fn lowered(s: Option<&str>) -> String {
    s.unwrap_or_default().to_lowercase()
}
