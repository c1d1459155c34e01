//! Spaces: the traversable nodes of a dungeon graph.

use serde::{Deserialize, Serialize};
use super::{Bounds, Point, Size};

/// An axis-aligned room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub position: Point,
    pub size: Size,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_type: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_entrance: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_exit: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl Room {
    pub fn new(id: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            position: Point::new(x, y),
            size: Size::new(width, height),
            name: None,
            description: None,
            room_type: None,
            is_entrance: false,
            is_exit: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_room_type(mut self, room_type: impl Into<String>) -> Self {
        self.room_type = Some(room_type.into());
        self
    }

    pub fn as_entrance(mut self) -> Self {
        self.is_entrance = true;
        self
    }

    pub fn as_exit(mut self) -> Self {
        self.is_exit = true;
        self
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(
            self.position.x,
            self.position.y,
            self.position.x + self.size.width,
            self.position.y + self.size.height,
        )
    }

    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    pub fn area(&self) -> f64 {
        self.bounds().area()
    }
}

/// A corridor described by a polyline of a given width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Corridor {
    pub id: String,
    #[serde(default)]
    pub path: Vec<Point>,
    #[serde(default = "default_corridor_width")]
    pub width: f64,
}

fn default_corridor_width() -> f64 {
    1.0
}

impl Corridor {
    pub fn new(id: impl Into<String>, path: impl IntoIterator<Item = Point>, width: f64) -> Self {
        Self { id: id.into(), path: path.into_iter().collect(), width }
    }

    /// Bounding box of the path grown by half the width. `None` for an empty path.
    pub fn bounds(&self) -> Option<Bounds> {
        let first = self.path.first()?;
        let half = self.width / 2.0;
        let seed = Bounds::new(first.x, first.y, first.x, first.y);
        let b = self.path.iter().fold(seed, |acc, p| {
            Bounds::new(acc.min_x.min(p.x), acc.min_y.min(p.y), acc.max_x.max(p.x), acc.max_y.max(p.y))
        });
        Some(Bounds::new(b.min_x - half, b.min_y - half, b.max_x + half, b.max_y + half))
    }
}

/// Borrowed view over either kind of space.
#[derive(Debug, Clone, Copy)]
pub enum Space<'a> {
    Room(&'a Room),
    Corridor(&'a Corridor),
}

impl<'a> Space<'a> {
    pub fn id(&self) -> &'a str {
        match self {
            Space::Room(r) => &r.id,
            Space::Corridor(c) => &c.id,
        }
    }

    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            Space::Room(r) => Some(r.bounds()),
            Space::Corridor(c) => c.bounds(),
        }
    }

    pub fn center(&self) -> Option<Point> {
        self.bounds().map(|b| b.center())
    }

    pub fn is_room(&self) -> bool {
        matches!(self, Space::Room(_))
    }
}
