//! Line-oriented text dump.
//!
//! ```text
//! # comment
//! header seed 42
//! level
//! room r1 0 0 10 8 [type=<t>] [entrance] [exit]
//! corridor c1 1 10,4 20,4
//! connect r1 c1 [door=d1] [inferred] [confidence=0.75] [type=<t>]
//! door d1 10 4 r1 c1 [inferred]
//! element treasure 5 5
//! ```
//!
//! Every `level` line opens a new level; records before the first `level`
//! line land in an implicit first level. Ids must not contain whitespace.
//! Room names and descriptions are not carried.

use std::io::Write;

use crate::model::{Connection, Corridor, Door, Dungeon, ElementKind, GameElement, Level, Point, Room};
use crate::{Error, Result};

use super::FormatAdapter;

pub struct TextAdapter;

impl FormatAdapter for TextAdapter {
    fn id(&self) -> &'static str {
        "text"
    }

    fn parse(&self, input: &str) -> Result<Dungeon> {
        parse_text(input)
    }

    fn render(&self, dungeon: &Dungeon) -> Result<String> {
        let mut buf = Vec::new();
        write_text(dungeon, &mut buf)?;
        String::from_utf8(buf).map_err(|e| Error::Render(e.to_string()))
    }
}

// ============================================================================
// Writer
// ============================================================================

/// Write a dungeon as a text dump.
pub fn write_text(dungeon: &Dungeon, writer: &mut dyn Write) -> Result<()> {
    writeln!(writer, "# dungeon-metrics text dump")?;
    writeln!(writer, "# Levels: {}", dungeon.levels.len())?;

    for (key, value) in &dungeon.header {
        check_token("header key", key)?;
        writeln!(writer, "header {} {}", key, serde_json::to_string(value)?)?;
    }

    for level in &dungeon.levels {
        writeln!(writer)?;
        writeln!(writer, "level")?;
        write_level(level, writer)?;
    }

    writer.flush()?;
    Ok(())
}

fn write_level(level: &Level, writer: &mut dyn Write) -> Result<()> {
    for room in &level.rooms {
        check_token("room id", &room.id)?;
        write!(
            writer,
            "room {} {} {} {} {}",
            room.id, room.position.x, room.position.y, room.size.width, room.size.height
        )?;
        if let Some(room_type) = &room.room_type {
            check_token("room type", room_type)?;
            write!(writer, " type={room_type}")?;
        }
        if room.is_entrance {
            write!(writer, " entrance")?;
        }
        if room.is_exit {
            write!(writer, " exit")?;
        }
        writeln!(writer)?;
    }

    for corridor in &level.corridors {
        check_token("corridor id", &corridor.id)?;
        write!(writer, "corridor {} {}", corridor.id, corridor.width)?;
        for p in &corridor.path {
            write!(writer, " {},{}", p.x, p.y)?;
        }
        writeln!(writer)?;
    }

    for conn in &level.connections {
        check_token("connection endpoint", &conn.from_room)?;
        check_token("connection endpoint", &conn.to_room)?;
        write!(writer, "connect {} {}", conn.from_room, conn.to_room)?;
        if let Some(door) = &conn.door_id {
            check_token("door id", door)?;
            write!(writer, " door={door}")?;
        }
        if conn.inferred {
            write!(writer, " inferred")?;
        }
        if let Some(confidence) = conn.confidence {
            write!(writer, " confidence={confidence}")?;
        }
        if let Some(kind) = &conn.connection_type {
            check_token("connection type", kind)?;
            write!(writer, " type={kind}")?;
        }
        writeln!(writer)?;
    }

    for door in &level.doors {
        check_token("door id", &door.id)?;
        let [a, b] = match door.connects.as_slice() {
            [a, b] => [a, b],
            _ => {
                return Err(Error::Render(format!(
                    "door {} must connect exactly two spaces, found {}",
                    door.id,
                    door.connects.len()
                )));
            }
        };
        check_token("door endpoint", a)?;
        check_token("door endpoint", b)?;
        write!(writer, "door {} {} {} {} {}", door.id, door.position.x, door.position.y, a, b)?;
        if door.inferred {
            write!(writer, " inferred")?;
        }
        writeln!(writer)?;
    }

    for element in &level.game_elements {
        writeln!(writer, "element {} {} {}", element.kind, element.position.x, element.position.y)?;
    }
    Ok(())
}

fn check_token(what: &str, value: &str) -> Result<()> {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return Err(Error::Render(format!("{what} {value:?} is not a single token")));
    }
    Ok(())
}

// ============================================================================
// Reader
// ============================================================================

fn parse_text(input: &str) -> Result<Dungeon> {
    let mut dungeon = Dungeon::new();

    for (ix, raw) in input.lines().enumerate() {
        let line_no = ix + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else { continue };
        let mut rec = Record { line: line_no, tokens };

        if keyword == "level" {
            rec.finish()?;
            dungeon.levels.push(Level::new());
            continue;
        }
        if keyword == "header" {
            let key = rec.word("header key")?.to_string();
            let rest = line
                .strip_prefix(keyword)
                .and_then(|rest| rest.trim_start().strip_prefix(key.as_str()))
                .map(str::trim)
                .unwrap_or_default();
            let value = serde_json::from_str(rest).map_err(|e| rec.error(format!("header {key}: {e}")))?;
            dungeon.header.insert(key, value);
            continue;
        }

        if dungeon.levels.is_empty() {
            dungeon.levels.push(Level::new());
        }
        let Some(level) = dungeon.levels.last_mut() else { continue };

        match keyword {
            "room" => level.rooms.push(rec.room()?),
            "corridor" => level.corridors.push(rec.corridor()?),
            "connect" => level.connections.push(rec.connection()?),
            "door" => level.doors.push(rec.door()?),
            "element" => level.game_elements.push(rec.element()?),
            other => return Err(rec.error(format!("unknown record {other:?}"))),
        }
    }

    Ok(dungeon)
}

struct Record<'a> {
    line: usize,
    tokens: std::str::SplitWhitespace<'a>,
}

impl<'a> Record<'a> {
    fn error(&self, message: impl Into<String>) -> Error {
        Error::Parse { line: self.line, message: message.into() }
    }

    fn word(&mut self, what: &str) -> Result<&'a str> {
        let line = self.line;
        self.tokens.next().ok_or_else(|| Error::Parse { line, message: format!("missing {what}") })
    }

    fn number(&mut self, what: &str) -> Result<f64> {
        let token = self.word(what)?;
        parse_number(token).ok_or_else(|| self.error(format!("invalid {what} {token:?}")))
    }

    fn finish(&mut self) -> Result<()> {
        match self.tokens.next() {
            Some(extra) => Err(self.error(format!("unexpected token {extra:?}"))),
            None => Ok(()),
        }
    }

    fn room(&mut self) -> Result<Room> {
        let id = self.word("room id")?;
        let x = self.number("x")?;
        let y = self.number("y")?;
        let width = self.number("width")?;
        let height = self.number("height")?;
        let mut room = Room::new(id, x, y, width, height);
        while let Some(flag) = self.tokens.next() {
            match flag {
                "entrance" => room.is_entrance = true,
                "exit" => room.is_exit = true,
                _ => match flag.strip_prefix("type=") {
                    Some(t) if !t.is_empty() => room.room_type = Some(t.to_string()),
                    _ => return Err(self.error(format!("unknown room flag {flag:?}"))),
                },
            }
        }
        Ok(room)
    }

    fn corridor(&mut self) -> Result<Corridor> {
        let id = self.word("corridor id")?;
        let width = self.number("width")?;
        let mut path = Vec::new();
        while let Some(token) = self.tokens.next() {
            let point = token
                .split_once(',')
                .and_then(|(x, y)| Some(Point::new(parse_number(x)?, parse_number(y)?)))
                .ok_or_else(|| self.error(format!("invalid path point {token:?}")))?;
            path.push(point);
        }
        Ok(Corridor::new(id, path, width))
    }

    fn connection(&mut self) -> Result<Connection> {
        let from = self.word("connection source")?;
        let to = self.word("connection target")?;
        let mut conn = Connection::new(from, to);
        while let Some(flag) = self.tokens.next() {
            if flag == "inferred" {
                conn.inferred = true;
            } else if let Some(door) = flag.strip_prefix("door=") {
                conn.door_id = Some(door.to_string());
            } else if let Some(kind) = flag.strip_prefix("type=") {
                conn.connection_type = Some(kind.to_string());
            } else if let Some(value) = flag.strip_prefix("confidence=") {
                let confidence = parse_number(value).ok_or_else(|| self.error(format!("invalid confidence {value:?}")))?;
                conn.confidence = Some(confidence);
            } else {
                return Err(self.error(format!("unknown connection flag {flag:?}")));
            }
        }
        Ok(conn)
    }

    fn door(&mut self) -> Result<Door> {
        let id = self.word("door id")?;
        let x = self.number("x")?;
        let y = self.number("y")?;
        let a = self.word("door endpoint")?;
        let b = self.word("door endpoint")?;
        let mut door = Door::new(id, Point::new(x, y), a, b);
        match self.tokens.next() {
            None => {}
            Some("inferred") => door.inferred = true,
            Some(flag) => return Err(self.error(format!("unknown door flag {flag:?}"))),
        }
        self.finish()?;
        Ok(door)
    }

    fn element(&mut self) -> Result<GameElement> {
        let kind = ElementKind::parse(self.word("element type")?);
        let x = self.number("x")?;
        let y = self.number("y")?;
        self.finish()?;
        Ok(GameElement::new(kind, x, y))
    }
}

fn parse_number(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}
