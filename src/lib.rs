//! # Questforge Core
//!
//! The algorithmic core of a note-taking plugin that gamifies task completion.
//!
//! ## Architecture Overview
//!
//! Questforge is built from small, synchronous, pure-function-style subsystems
//! over immutable inputs:
//!
//! - **Dungeon Data Model**: Immutable templates describing rooms, character
//!   grid layouts, door connections, and monster/chest placements
//! - **Tile Registry**: Per-theme mapping from layout characters to tile
//!   semantics, with a shared fallback table
//! - **Dungeon Registry**: Merges built-in templates with user-registered
//!   content; lookup, enumeration, and random selection
//! - **User Dungeon Loader**: Parses markdown+frontmatter dungeon definitions,
//!   accumulating every validation error instead of stopping at the first
//! - **Map Service**: Breadth-first layout of room coordinates for minimap and
//!   full-map rendering
//! - **Pathfinder**: A* over a single room's tile grid, 4-directional, with
//!   deterministic tie-breaking
//! - **Recurrence Engine**: Parses compact recurrence expressions and generates
//!   dated quest instances keyed for idempotence
//!
//! Storage, UI rendering, AI text generation, and note-file I/O live in the
//! host plugin; this crate only consumes and produces plain data.

pub mod dungeon;
pub mod quests;
pub mod utils;

// Core module re-exports
pub use dungeon::*;
pub use quests::*;

// Explicit re-exports for commonly used types
pub use dungeon::{
    // From the data model
    ChestPlacement,
    Difficulty,
    Direction,
    Door,
    DungeonTemplate,
    EquipSlot,
    LootBias,
    LootTier,
    MonsterPlacement,
    Position,
    RoomKind,
    RoomTemplate,
    // From the map service
    AdjacentRoom,
    MapCoord,
    // From the registry
    DungeonRegistry,
    // From the tile registry
    TileCategory,
    TileDefinition,
    TileRegistry,
    TileResolutionError,
    TileSetTheme,
};

pub use quests::{Priority, QuestInstance, RecurringTemplate, WatchedFolderConfig};

/// Core error type for the Questforge engine.
#[derive(thiserror::Error, Debug)]
pub enum QuestforgeError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Unknown tile character for a theme
    #[error(transparent)]
    Tile(#[from] TileResolutionError),

    /// Date parsing failed
    #[error("Date error: {0}")]
    Date(#[from] chrono::ParseError),

    /// Input is structurally invalid
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type used throughout the Questforge codebase.
pub type QuestforgeResult<T> = Result<T, QuestforgeError>;

/// Structural problem in user-authored content.
///
/// Loaders accumulate every violation they find into a `Vec<ValidationError>`
/// so the author can fix a file in one pass; they never stop at the first
/// problem.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required frontmatter key is absent
    #[error("missing required field '{field}'")]
    MissingField { field: String },

    /// A field value is not one of the accepted forms
    #[error("invalid value '{value}' for field '{field}'")]
    InvalidValue { field: String, value: String },

    /// A numeric field could not be parsed
    #[error("field '{field}' expects a number, got '{value}'")]
    InvalidNumber { field: String, value: String },

    /// The file has no frontmatter block
    #[error("missing frontmatter block (expected leading '---' fence)")]
    MissingFrontmatter,

    /// The file defines no rooms
    #[error("dungeon defines no rooms")]
    NoRooms,

    /// Two rooms share an id
    #[error("duplicate room id '{room}'")]
    DuplicateRoomId { room: String },

    /// No room is typed as the entry
    #[error("no entry room defined")]
    NoEntryRoom,

    /// More than one room is typed as the entry
    #[error("expected exactly one entry room, found {count}")]
    MultipleEntryRooms { count: usize },

    /// A room section has no layout block
    #[error("room '{room}' has no layout block")]
    MissingLayout { room: String },

    /// Layout row count does not match the declared height
    #[error("room '{room}' layout has {actual} rows, expected {expected}")]
    LayoutHeightMismatch {
        room: String,
        expected: usize,
        actual: usize,
    },

    /// A layout row's width differs from the declared width
    #[error("room '{room}' layout row {row} has {actual} characters, expected {expected}")]
    RaggedRow {
        room: String,
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// A layout dimension exceeds the accepted bound
    #[error("room '{room}' grid dimension {dim} exceeds the maximum of {max}")]
    LayoutTooLarge { room: String, dim: u32, max: u32 },

    /// A door line could not be parsed
    #[error("room '{room}' has an unparseable door entry '{line}'")]
    InvalidDoorSpec { room: String, line: String },

    /// A door names a direction outside north/south/east/west
    #[error("room '{room}' door uses unknown direction '{value}'")]
    InvalidDirection { room: String, value: String },

    /// A door targets a room id that does not exist
    #[error("room '{room}' door targets unknown room '{target}'")]
    DanglingDoorTarget { room: String, target: String },

    /// A door coordinate is outside the room grid
    #[error("room '{room}' door at ({x},{y}) is outside the grid")]
    DoorOutsideRoom { room: String, x: i32, y: i32 },

    /// A door coordinate is neither on the boundary nor on a walkable opening
    #[error("room '{room}' door at ({x},{y}) is not on the boundary or a walkable opening")]
    DoorNotOnOpening { room: String, x: i32, y: i32 },

    /// A placement line could not be parsed
    #[error("room '{room}' has an unparseable {kind} entry '{line}'")]
    InvalidPlacementSpec {
        room: String,
        kind: &'static str,
        line: String,
    },

    /// A chest or monster sits outside the room grid
    #[error("room '{room}' {kind} at ({x},{y}) is out of bounds")]
    PlacementOutOfBounds {
        room: String,
        kind: &'static str,
        x: i32,
        y: i32,
    },

    /// A chest or monster sits on a non-walkable tile
    #[error("room '{room}' {kind} at ({x},{y}) is not on a walkable tile")]
    PlacementNotWalkable {
        room: String,
        kind: &'static str,
        x: i32,
        y: i32,
    },
}

/// Version information for the engine.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine configuration constants.
pub mod config {
    /// Templates whose id starts with this prefix are test/placeholder
    /// entries, excluded from random dungeon selection.
    pub const PLACEHOLDER_ID_PREFIX: &str = "test_";

    /// Largest grid dimension accepted from user-authored layouts.
    pub const MAX_GRID_DIM: u32 = 64;

    /// Forward scan window for weekday next-run queries, inclusive of today.
    pub const NEXT_RUN_SCAN_DAYS: i64 = 7;
}
