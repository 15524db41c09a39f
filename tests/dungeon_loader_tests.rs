//! Integration tests for the user dungeon loader and registry interplay.

use questforge::{
    parse_dungeon_markdown, Difficulty, Direction, DungeonRegistry, Position, RoomKind,
    TileRegistry, TileSetTheme, ValidationError,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

const CAVE: &str = "\
---
name: Gloom Cave
difficulty: hard
tileset: crypt
description: Hand-authored test cave.
lootSlots: [weapon, armor]
lootDescription: Rusty but serviceable
---

## entry
type: entry
layout: |
  #######
  #.....#
  #..E..#
  #.....#
  ###+###
doors:
  3,4: pit/north

## pit
type: combat
layout: |
  ###+###
  #.....#
  #..~..#
  #.....#
  #######
doors:
  3,0: entry/south
monsters:
  - 2,1: bat
chests:
  - 5,3: common
";

/// A valid hand-constructed file parses to a template whose rooms, id, and
/// door graph match the source exactly.
#[test]
fn test_loader_round_trip() {
    let template = parse_dungeon_markdown(CAVE, &TileRegistry::default())
        .expect("cave should parse cleanly");

    assert_eq!(template.id, "gloom_cave");
    assert_eq!(template.base_difficulty, Difficulty::Hard);
    assert_eq!(template.tile_set, TileSetTheme::Crypt);
    assert_eq!(template.rooms.len(), 2);
    assert_eq!(template.rooms[0].id, "entry");
    assert_eq!(template.rooms[1].id, "pit");

    let entry = template.room("entry").unwrap();
    assert_eq!(entry.kind, RoomKind::Entry);
    let down = entry.doors.get(&Position::new(3, 4)).unwrap();
    assert_eq!(down.target_room, "pit");
    assert_eq!(down.target_entry, Direction::North);

    let pit = template.room("pit").unwrap();
    let up = pit.doors.get(&Position::new(3, 0)).unwrap();
    assert_eq!(up.target_room, "entry");
    assert_eq!(up.target_entry, Direction::South);
}

/// Three independent violations all surface at once: a ragged row, a
/// dangling door target, and a missing entry room.
#[test]
fn test_loader_reports_every_violation() {
    let broken = "\
---
name: Broken Keep
difficulty: easy
tileset: stone
---

## hall
type: combat
layout: |
  ######
  #...#
  ######
doors:
  2,0: oubliette/south
";
    let errors =
        parse_dungeon_markdown(broken, &TileRegistry::default()).expect_err("must reject");

    assert!(errors.len() >= 3, "expected >= 3 violations, got {errors:?}");
    assert!(errors
        .iter()
        .any(|e| matches!(e, ValidationError::RaggedRow { room, row: 1, .. } if room == "hall")));
    assert!(errors.iter().any(
        |e| matches!(e, ValidationError::DanglingDoorTarget { target, .. } if target == "oubliette")
    ));
    assert!(errors.contains(&ValidationError::NoEntryRoom));
}

/// Loading from disk goes through the same path the plugin uses: a whole
/// text blob, no streaming.
#[test]
fn test_loader_from_file() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(CAVE.as_bytes()).unwrap();

    let text = std::fs::read_to_string(file.path()).unwrap();
    let template = parse_dungeon_markdown(&text, &TileRegistry::default()).unwrap();
    assert_eq!(template.id, "gloom_cave");
}

/// A parsed user dungeon shadows a built-in of the same id until the user
/// set is cleared.
#[test]
fn test_parsed_dungeon_shadows_builtin() {
    let shadow_src = CAVE.replace("name: Gloom Cave", "id: goblin_cave\nname: Gloom Cave");
    let shadow = parse_dungeon_markdown(&shadow_src, &TileRegistry::default()).unwrap();
    assert_eq!(shadow.id, "goblin_cave");

    let mut registry = DungeonRegistry::new();
    registry.register_user_dungeons(vec![shadow]);
    assert_eq!(registry.get("goblin_cave").unwrap().name, "Gloom Cave");

    registry.clear_user_dungeons();
    assert_eq!(registry.get("goblin_cave").unwrap().name, "Goblin Cave");
}

/// Random selection over built-ins plus user dungeons still skips
/// placeholder ids.
#[test]
fn test_random_selection_skips_placeholders() {
    let user = parse_dungeon_markdown(CAVE, &TileRegistry::default()).unwrap();
    let mut registry = DungeonRegistry::new();
    registry.register_user_dungeons(vec![user]);

    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..100 {
        let picked = registry.random_dungeon(&mut rng).unwrap();
        assert_ne!(picked.id, "test_arena");
    }
}
