//! # Dungeon Graph Model
//!
//! Clean DTOs for one dungeon document: spaces (rooms, corridors),
//! undirected connections, doors and point entities.
//! These types cross every boundary: format adapters ↔ inference ↔
//! identification ↔ rules.
//!
//! Design rule: this module is pure data. No I/O, no state, no logging.

pub mod geometry;
pub mod space;
pub mod connection;
pub mod element;
pub mod level;

pub use geometry::{Point, Size, Bounds};
pub use space::{Room, Corridor, Space};
pub use connection::{Connection, Door, unordered};
pub use element::{GameElement, ElementKind};
pub use level::{Level, Dungeon};
