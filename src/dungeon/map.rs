//! # Dungeon Map Service
//!
//! Computes integer grid coordinates for every room of a template by
//! breadth-first traversal of its door connections.
//!
//! The layout is a pure function of door topology: it is computed fresh on
//! every call and never persisted. Rooms unreachable from the entry are
//! omitted, so presence in the returned map doubles as the reachability
//! predicate.

use crate::dungeon::{Direction, DungeonTemplate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet, VecDeque};

/// Integer position of a room on the dungeon map grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapCoord {
    pub col: i32,
    pub row: i32,
}

impl MapCoord {
    /// Offsets the coordinate one grid unit in a direction.
    pub fn step(self, direction: Direction) -> MapCoord {
        let delta = direction.to_delta();
        MapCoord {
            col: self.col + delta.x,
            row: self.row + delta.y,
        }
    }
}

/// A neighboring room reached through a door.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjacentRoom {
    /// Id of the neighboring room
    pub room_id: String,
    /// Direction of travel through the door
    pub direction: Direction,
}

/// Computes map-grid positions for every room reachable from the entry.
///
/// BFS starts at the entry room, pinned to (0,0). Traversing a door moves
/// one grid unit in the travel direction (the opposite of the door's
/// `target_entry` side): north is row-1, south row+1, east col+1, west
/// col-1. First visit wins: a room reachable by several paths keeps the
/// position assigned by whichever BFS frontier reached it first. Door maps
/// iterate in key order, so the result is identical on every run.
///
/// Rooms with no door path from the entry do not appear in the result.
pub fn calculate_room_positions(template: &DungeonTemplate) -> BTreeMap<String, MapCoord> {
    let mut positions = BTreeMap::new();

    let Some(entry) = template.entry_room() else {
        log::debug!("template '{}' has no entry room, empty layout", template.id);
        return positions;
    };

    let mut visited: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::new();

    positions.insert(entry.id.clone(), MapCoord { col: 0, row: 0 });
    visited.insert(&entry.id);
    queue.push_back(&entry.id);

    while let Some(room_id) = queue.pop_front() {
        let Some(room) = template.room(room_id) else {
            continue;
        };
        let here = positions[room_id];
        for door in room.doors.values() {
            let Some(target) = template.room(&door.target_room) else {
                // Dangling targets are the loader's problem; skip here.
                continue;
            };
            if visited.insert(&target.id) {
                let travel = door.target_entry.opposite();
                positions.insert(target.id.clone(), here.step(travel));
                queue.push_back(&target.id);
            }
        }
    }

    positions
}

/// Lists the rooms directly adjacent to a room, one item per door.
///
/// Direct door-table read, no search. The direction is the travel
/// direction through the door. Unknown room ids yield an empty list.
pub fn get_adjacent_rooms(template: &DungeonTemplate, room_id: &str) -> Vec<AdjacentRoom> {
    let Some(room) = template.room(room_id) else {
        return Vec::new();
    };
    room.doors
        .values()
        .map(|door| AdjacentRoom {
            room_id: door.target_room.clone(),
            direction: door.target_entry.opposite(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::builtin::builtin_dungeons;
    use crate::dungeon::{
        Difficulty, Door, DungeonTemplate, LootBias, Position, RoomKind, RoomTemplate,
        TileSetTheme,
    };
    use std::collections::BTreeMap;

    fn bare_room(id: &str, kind: RoomKind) -> RoomTemplate {
        RoomTemplate {
            id: id.to_string(),
            kind,
            width: 3,
            height: 3,
            layout: vec!["###".to_string(), "#.#".to_string(), "###".to_string()],
            doors: BTreeMap::new(),
            monsters: Vec::new(),
            chests: Vec::new(),
        }
    }

    fn door_to(target: &str, entry: Direction) -> Door {
        Door {
            target_room: target.to_string(),
            target_entry: entry,
        }
    }

    fn template_of(rooms: Vec<RoomTemplate>) -> DungeonTemplate {
        DungeonTemplate {
            id: "t".to_string(),
            name: "T".to_string(),
            description: String::new(),
            base_difficulty: Difficulty::Easy,
            tile_set: TileSetTheme::Stone,
            loot_bias: LootBias::default(),
            rooms,
        }
    }

    #[test]
    fn test_entry_pinned_at_origin() {
        let template = template_of(vec![bare_room("start", RoomKind::Entry)]);
        let layout = calculate_room_positions(&template);
        assert_eq!(layout["start"], MapCoord { col: 0, row: 0 });
    }

    #[test]
    fn test_south_door_places_neighbor_below() {
        let mut entry = bare_room("start", RoomKind::Entry);
        // South door: the neighbor is entered from its north side.
        entry
            .doors
            .insert(Position::new(1, 2), door_to("cellar", Direction::North));
        let template = template_of(vec![entry, bare_room("cellar", RoomKind::Combat)]);

        let layout = calculate_room_positions(&template);
        assert_eq!(layout["cellar"], MapCoord { col: 0, row: 1 });
    }

    #[test]
    fn test_all_four_offsets() {
        let mut entry = bare_room("hub", RoomKind::Entry);
        entry
            .doors
            .insert(Position::new(1, 0), door_to("n", Direction::South));
        entry
            .doors
            .insert(Position::new(1, 2), door_to("s", Direction::North));
        entry
            .doors
            .insert(Position::new(2, 1), door_to("e", Direction::West));
        entry
            .doors
            .insert(Position::new(0, 1), door_to("w", Direction::East));
        let template = template_of(vec![
            entry,
            bare_room("n", RoomKind::Combat),
            bare_room("s", RoomKind::Combat),
            bare_room("e", RoomKind::Combat),
            bare_room("w", RoomKind::Combat),
        ]);

        let layout = calculate_room_positions(&template);
        assert_eq!(layout["n"], MapCoord { col: 0, row: -1 });
        assert_eq!(layout["s"], MapCoord { col: 0, row: 1 });
        assert_eq!(layout["e"], MapCoord { col: 1, row: 0 });
        assert_eq!(layout["w"], MapCoord { col: -1, row: 0 });
    }

    #[test]
    fn test_first_visit_wins_on_cycles() {
        // hub -> a (east), hub -> b (south), b -> a (east then north would
        // re-reach a); a keeps the position from the first frontier.
        let mut hub = bare_room("hub", RoomKind::Entry);
        hub.doors
            .insert(Position::new(2, 1), door_to("a", Direction::West));
        hub.doors
            .insert(Position::new(1, 2), door_to("b", Direction::North));
        let mut b = bare_room("b", RoomKind::Combat);
        b.doors
            .insert(Position::new(2, 1), door_to("a", Direction::West));
        let template = template_of(vec![hub, bare_room("a", RoomKind::Combat), b]);

        let layout = calculate_room_positions(&template);
        // First visit from hub assigns (1,0); the later path via b at (0,1)
        // would have said (1,1) and must not win.
        assert_eq!(layout["a"], MapCoord { col: 1, row: 0 });
    }

    #[test]
    fn test_unreachable_rooms_omitted() {
        let template = template_of(vec![
            bare_room("start", RoomKind::Entry),
            bare_room("island", RoomKind::Treasure),
        ]);
        let layout = calculate_room_positions(&template);
        assert!(layout.contains_key("start"));
        assert!(!layout.contains_key("island"));
    }

    #[test]
    fn test_layout_is_deterministic() {
        for template in builtin_dungeons() {
            let first = calculate_room_positions(&template);
            let second = calculate_room_positions(&template);
            assert_eq!(first, second, "layout of '{}' not stable", template.id);
        }
    }

    #[test]
    fn test_adjacency_matches_doors() {
        let template = builtin_dungeons()
            .into_iter()
            .find(|t| t.id == "goblin_cave")
            .unwrap();
        let adjacent = get_adjacent_rooms(&template, "warrens");
        assert_eq!(adjacent.len(), 2);
        assert!(adjacent.iter().any(|a| a.room_id == "entry"));
        assert!(adjacent
            .iter()
            .any(|a| a.room_id == "hoard" && a.direction == Direction::East));
        assert!(get_adjacent_rooms(&template, "no_such_room").is_empty());
    }
}
