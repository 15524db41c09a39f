//! # Dungeon Module
//!
//! The dungeon data model and the subsystems that operate on it.
//!
//! A [`DungeonTemplate`] is an immutable description of a dungeon: an ordered
//! sequence of rooms, each with a fixed-size character grid layout, door
//! connections to other rooms, and optional monster/chest placements. The
//! template never mutates at runtime; exploration state belongs to the host.

pub mod builtin;
pub mod loader;
pub mod map;
pub mod pathfinding;
pub mod registry;
pub mod tiles;

pub use loader::*;
pub use map::*;
pub use pathfinding::*;
pub use registry::*;
pub use tiles::*;

use crate::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// A 2D tile coordinate inside a room grid.
///
/// Also used as the key for door placements. Derives `Ord` so door maps
/// iterate in a fixed order, which keeps map layout and pathfinding output
/// reproducible across processes.
///
/// # Examples
///
/// ```
/// use questforge::Position;
///
/// let pos = Position::new(3, 5);
/// assert_eq!(pos.x, 3);
/// assert_eq!(pos.y, 5);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Calculates the Manhattan distance to another position.
    ///
    /// # Examples
    ///
    /// ```
    /// use questforge::Position;
    ///
    /// assert_eq!(Position::new(0, 0).manhattan_distance(Position::new(3, 4)), 7);
    /// ```
    pub fn manhattan_distance(self, other: Position) -> u32 {
        ((self.x - other.x).abs() + (self.y - other.y).abs()) as u32
    }

    /// Returns the 4 cardinal adjacent positions in north/south/east/west order.
    pub fn cardinal_adjacent_positions(self) -> [Position; 4] {
        [
            Position::new(self.x, self.y - 1),
            Position::new(self.x, self.y + 1),
            Position::new(self.x + 1, self.y),
            Position::new(self.x - 1, self.y),
        ]
    }
}

impl std::ops::Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Position {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Cardinal direction used for door entries and pathfinding step facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Converts a direction to a position delta.
    ///
    /// # Examples
    ///
    /// ```
    /// use questforge::{Direction, Position};
    ///
    /// assert_eq!(Direction::North.to_delta(), Position::new(0, -1));
    /// ```
    pub fn to_delta(self) -> Position {
        match self {
            Direction::North => Position::new(0, -1),
            Direction::South => Position::new(0, 1),
            Direction::East => Position::new(1, 0),
            Direction::West => Position::new(-1, 0),
        }
    }

    /// Converts a single-step position delta to a direction.
    ///
    /// Returns `None` for diagonal, zero, or multi-step deltas.
    pub fn from_delta(delta: Position) -> Option<Direction> {
        match (delta.x, delta.y) {
            (0, -1) => Some(Direction::North),
            (0, 1) => Some(Direction::South),
            (1, 0) => Some(Direction::East),
            (-1, 0) => Some(Direction::West),
            _ => None,
        }
    }

    /// Returns the opposite direction.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Parses a lowercase direction name.
    pub fn parse(s: &str) -> Option<Direction> {
        match s.trim().to_ascii_lowercase().as_str() {
            "north" => Some(Direction::North),
            "south" => Some(Direction::South),
            "east" => Some(Direction::East),
            "west" => Some(Direction::West),
            _ => None,
        }
    }

    /// Returns the lowercase name of the direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        }
    }

    /// All four directions in a fixed order.
    pub fn all() -> [Direction; 4] {
        [
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
        ]
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Base difficulty of a dungeon template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Parses a lowercase difficulty name.
    pub fn parse(s: &str) -> Option<Difficulty> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Returns the lowercase name of the difficulty.
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The role a room plays inside its dungeon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomKind {
    /// The room the party starts in; dungeons have exactly one
    Entry,
    /// A room whose purpose is a monster encounter
    Combat,
    /// A room built around chest loot
    Treasure,
    /// The boss encounter room
    Boss,
}

impl RoomKind {
    /// Parses a lowercase room type name.
    pub fn parse(s: &str) -> Option<RoomKind> {
        match s.trim().to_ascii_lowercase().as_str() {
            "entry" => Some(RoomKind::Entry),
            "combat" => Some(RoomKind::Combat),
            "treasure" => Some(RoomKind::Treasure),
            "boss" => Some(RoomKind::Boss),
            _ => None,
        }
    }

    /// Returns the lowercase name of the room kind.
    pub fn as_str(self) -> &'static str {
        match self {
            RoomKind::Entry => "entry",
            RoomKind::Combat => "combat",
            RoomKind::Treasure => "treasure",
            RoomKind::Boss => "boss",
        }
    }
}

/// Equipment slot categories a dungeon's loot is biased toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipSlot {
    Weapon,
    Armor,
    Helmet,
    Boots,
    Trinket,
}

impl EquipSlot {
    /// Parses a lowercase slot name.
    pub fn parse(s: &str) -> Option<EquipSlot> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weapon" => Some(EquipSlot::Weapon),
            "armor" => Some(EquipSlot::Armor),
            "helmet" => Some(EquipSlot::Helmet),
            "boots" => Some(EquipSlot::Boots),
            "trinket" => Some(EquipSlot::Trinket),
            _ => None,
        }
    }
}

/// Loot tier of a chest placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LootTier {
    Common,
    Rare,
    Epic,
}

impl LootTier {
    /// Parses a lowercase tier name.
    pub fn parse(s: &str) -> Option<LootTier> {
        match s.trim().to_ascii_lowercase().as_str() {
            "common" => Some(LootTier::Common),
            "rare" => Some(LootTier::Rare),
            "epic" => Some(LootTier::Epic),
            _ => None,
        }
    }
}

/// Preferred equipment-slot categories plus a free-text flavor description.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LootBias {
    /// Slots the dungeon's loot table should favor
    pub slots: BTreeSet<EquipSlot>,
    /// Free-text description consumed by the loot flavoring layer
    pub description: String,
}

/// A door connecting one room to another.
///
/// The door's own coordinate is the key in [`RoomTemplate::doors`]. The
/// `target_entry` direction names the side of the target room the party
/// enters from, so travel direction is its opposite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Door {
    /// Id of the room this door leads to
    pub target_room: String,
    /// Side of the target room the party enters from
    pub target_entry: Direction,
}

/// A monster spawn inside a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterPlacement {
    /// Tile the monster spawns on
    pub position: Position,
    /// Name of the monster pool to draw from
    pub pool: String,
    /// Whether this spawn is the dungeon's boss
    pub is_boss: bool,
}

/// A chest spawn inside a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChestPlacement {
    /// Tile the chest sits on
    pub position: Position,
    /// Loot tier rolled when the chest opens
    pub tier: LootTier,
}

/// A single room of a dungeon template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomTemplate {
    /// Id unique within the dungeon
    pub id: String,
    /// Role of the room
    pub kind: RoomKind,
    /// Grid width in tiles
    pub width: u32,
    /// Grid height in tiles
    pub height: u32,
    /// Character grid, one string per row; length == height, each row's
    /// character count == width
    pub layout: Vec<String>,
    /// Doors keyed by their coordinate on the grid
    pub doors: BTreeMap<Position, Door>,
    /// Monster spawns
    #[serde(default)]
    pub monsters: Vec<MonsterPlacement>,
    /// Chest spawns
    #[serde(default)]
    pub chests: Vec<ChestPlacement>,
}

impl RoomTemplate {
    /// Checks whether a position lies inside the room grid.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width as i32 && pos.y < self.height as i32
    }

    /// Checks whether a position lies on the outer boundary of the grid.
    pub fn on_boundary(&self, pos: Position) -> bool {
        self.in_bounds(pos)
            && (pos.x == 0
                || pos.y == 0
                || pos.x == self.width as i32 - 1
                || pos.y == self.height as i32 - 1)
    }

    /// Returns the layout character at a position, or `None` out of bounds.
    pub fn char_at(&self, pos: Position) -> Option<char> {
        if !self.in_bounds(pos) {
            return None;
        }
        self.layout
            .get(pos.y as usize)
            .and_then(|row| row.chars().nth(pos.x as usize))
    }
}

/// Immutable template describing a complete dungeon.
///
/// Templates are authored (built-in or via the markdown loader) and consumed
/// read-only by the map service, the pathfinder, and exploration state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DungeonTemplate {
    /// Stable id used for registry lookup and shadowing
    pub id: String,
    /// Display name
    pub name: String,
    /// Flavor description shown in dungeon selection
    pub description: String,
    /// Baseline difficulty
    pub base_difficulty: Difficulty,
    /// Visual theme resolving the layout characters
    pub tile_set: TileSetTheme,
    /// Equipment-slot bias for generated loot
    pub loot_bias: LootBias,
    /// Rooms in declaration order; the first entry room anchors the map
    pub rooms: Vec<RoomTemplate>,
}

impl DungeonTemplate {
    /// Finds a room by id.
    pub fn room(&self, id: &str) -> Option<&RoomTemplate> {
        self.rooms.iter().find(|r| r.id == id)
    }

    /// Returns the first room typed as the entry, if any.
    pub fn entry_room(&self) -> Option<&RoomTemplate> {
        self.rooms.iter().find(|r| r.kind == RoomKind::Entry)
    }
}

/// Validates a template against the data-model invariants, accumulating
/// every violation found.
///
/// Checks: at least one entry room, unique room ids, layout rows match the
/// declared dimensions, door targets reference existing rooms, door
/// coordinates sit on the boundary or a walkable opening, and every chest
/// and monster placement is in-bounds on a walkable tile. An empty result
/// means the template is valid.
pub fn validate_template(
    template: &DungeonTemplate,
    tiles: &TileRegistry,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if template.rooms.is_empty() {
        errors.push(ValidationError::NoRooms);
        return errors;
    }

    let mut seen_ids = HashSet::new();
    for room in &template.rooms {
        if !seen_ids.insert(room.id.as_str()) {
            errors.push(ValidationError::DuplicateRoomId {
                room: room.id.clone(),
            });
        }
    }

    if template.entry_room().is_none() {
        errors.push(ValidationError::NoEntryRoom);
    }

    for room in &template.rooms {
        validate_room(template, room, tiles, &mut errors);
    }

    errors
}

fn validate_room(
    template: &DungeonTemplate,
    room: &RoomTemplate,
    tiles: &TileRegistry,
    errors: &mut Vec<ValidationError>,
) {
    let grid_ok = check_grid(room, errors);

    for (pos, door) in &room.doors {
        if template.room(&door.target_room).is_none() {
            errors.push(ValidationError::DanglingDoorTarget {
                room: room.id.clone(),
                target: door.target_room.clone(),
            });
        }
        if !room.in_bounds(*pos) {
            errors.push(ValidationError::DoorOutsideRoom {
                room: room.id.clone(),
                x: pos.x,
                y: pos.y,
            });
        } else if grid_ok {
            let walkable = room
                .char_at(*pos)
                .map(|c| tiles.is_walkable(template.tile_set, c))
                .unwrap_or(false);
            if !room.on_boundary(*pos) && !walkable {
                errors.push(ValidationError::DoorNotOnOpening {
                    room: room.id.clone(),
                    x: pos.x,
                    y: pos.y,
                });
            }
        }
    }

    // Placement checks only make sense over a well-formed grid.
    if !grid_ok {
        return;
    }

    for monster in &room.monsters {
        check_placement(template, room, tiles, "monster", monster.position, errors);
    }
    for chest in &room.chests {
        check_placement(template, room, tiles, "chest", chest.position, errors);
    }
}

fn check_grid(room: &RoomTemplate, errors: &mut Vec<ValidationError>) -> bool {
    let mut ok = true;
    if room.layout.len() != room.height as usize {
        errors.push(ValidationError::LayoutHeightMismatch {
            room: room.id.clone(),
            expected: room.height as usize,
            actual: room.layout.len(),
        });
        ok = false;
    }
    for (row_idx, row) in room.layout.iter().enumerate() {
        let len = row.chars().count();
        if len != room.width as usize {
            errors.push(ValidationError::RaggedRow {
                room: room.id.clone(),
                row: row_idx,
                expected: room.width as usize,
                actual: len,
            });
            ok = false;
        }
    }
    ok
}

fn check_placement(
    template: &DungeonTemplate,
    room: &RoomTemplate,
    tiles: &TileRegistry,
    kind: &'static str,
    pos: Position,
    errors: &mut Vec<ValidationError>,
) {
    if !room.in_bounds(pos) {
        errors.push(ValidationError::PlacementOutOfBounds {
            room: room.id.clone(),
            kind,
            x: pos.x,
            y: pos.y,
        });
        return;
    }
    let walkable = room
        .char_at(pos)
        .map(|c| tiles.is_walkable(template.tile_set, c))
        .unwrap_or(false);
    if !walkable {
        errors.push(ValidationError::PlacementNotWalkable {
            room: room.id.clone(),
            kind,
            x: pos.x,
            y: pos.y,
        });
    }
}
