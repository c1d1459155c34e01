//! Level and document containers.

use serde::{Deserialize, Serialize};
use super::{Bounds, Connection, Corridor, Door, GameElement, Point, Room, Space};

/// One dungeon level: owns its spaces, edges, doors and entities.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Level {
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub corridors: Vec<Corridor>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub doors: Vec<Door>,
    #[serde(default)]
    pub game_elements: Vec<GameElement>,
}

impl Level {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_room(mut self, room: Room) -> Self {
        self.rooms.push(room);
        self
    }

    pub fn with_corridor(mut self, corridor: Corridor) -> Self {
        self.corridors.push(corridor);
        self
    }

    pub fn with_connection(mut self, a: impl Into<String>, b: impl Into<String>) -> Self {
        self.connections.push(Connection::new(a, b));
        self
    }

    pub fn with_door(mut self, door: Door) -> Self {
        self.doors.push(door);
        self
    }

    pub fn with_element(mut self, element: GameElement) -> Self {
        self.game_elements.push(element);
        self
    }

    /// All spaces, rooms first then corridors, in declaration order.
    pub fn spaces(&self) -> impl Iterator<Item = Space<'_>> + '_ {
        self.rooms.iter().map(Space::Room)
            .chain(self.corridors.iter().map(Space::Corridor))
    }

    pub fn space_count(&self) -> usize {
        self.rooms.len() + self.corridors.len()
    }

    pub fn space(&self, id: &str) -> Option<Space<'_>> {
        self.spaces().find(|s| s.id() == id)
    }

    pub fn room(&self, id: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    pub fn door(&self, id: &str) -> Option<&Door> {
        self.doors.iter().find(|d| d.id == id)
    }

    /// Whether any connection already links the unordered pair.
    pub fn has_connection(&self, a: &str, b: &str) -> bool {
        self.connections.iter().any(|c| c.links(a, b))
    }

    /// Bounding box over every space with geometry.
    pub fn map_bounds(&self) -> Option<Bounds> {
        Bounds::enclosing(self.spaces().filter_map(|s| s.bounds()))
    }

    /// Bounding box over rooms only.
    pub fn room_bounds(&self) -> Option<Bounds> {
        Bounds::enclosing(self.rooms.iter().map(Room::bounds))
    }

    /// Index of the room whose center is nearest `point`. Ties go to the earlier room.
    pub fn nearest_room(&self, point: &Point) -> Option<usize> {
        self.rooms
            .iter()
            .enumerate()
            .map(|(i, r)| (i, r.center().distance(point)))
            .fold(None, |best: Option<(usize, f64)>, (i, d)| match best {
                Some((_, bd)) if bd <= d => best,
                _ => Some((i, d)),
            })
            .map(|(i, _)| i)
    }
}

/// A dungeon document: free-form header plus one or more levels.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Dungeon {
    #[serde(default)]
    pub header: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub levels: Vec<Level>,
}

impl Dungeon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(level: Level) -> Self {
        Self { header: serde_json::Map::new(), levels: vec![level] }
    }

    /// The level every rule evaluates.
    pub fn first_level(&self) -> Option<&Level> {
        self.levels.first()
    }

    pub fn first_level_mut(&mut self) -> Option<&mut Level> {
        self.levels.first_mut()
    }
}
