//! # Built-in Dungeons
//!
//! The dungeon templates that ship with the engine.
//!
//! Declaration order here is the enumeration order the registry exposes.
//! `test_arena` is a placeholder used by automated tests; its `test_` prefix
//! keeps it out of random selection.

use crate::dungeon::{
    ChestPlacement, Difficulty, Direction, Door, DungeonTemplate, EquipSlot, LootBias, LootTier,
    MonsterPlacement, Position, RoomKind, RoomTemplate, TileSetTheme,
};
use std::collections::BTreeMap;

/// Returns all built-in dungeon templates in declaration order.
pub fn builtin_dungeons() -> Vec<DungeonTemplate> {
    vec![
        goblin_cave(),
        crypt_of_echoes(),
        emberfall_depths(),
        test_arena(),
    ]
}

fn room(
    id: &str,
    kind: RoomKind,
    layout: &[&str],
    doors: &[(i32, i32, &str, Direction)],
    monsters: &[(i32, i32, &str, bool)],
    chests: &[(i32, i32, LootTier)],
) -> RoomTemplate {
    let width = layout.first().map(|row| row.chars().count()).unwrap_or(0) as u32;
    let height = layout.len() as u32;
    let doors: BTreeMap<Position, Door> = doors
        .iter()
        .map(|&(x, y, target, entry)| {
            (
                Position::new(x, y),
                Door {
                    target_room: target.to_string(),
                    target_entry: entry,
                },
            )
        })
        .collect();
    RoomTemplate {
        id: id.to_string(),
        kind,
        width,
        height,
        layout: layout.iter().map(|row| row.to_string()).collect(),
        doors,
        monsters: monsters
            .iter()
            .map(|&(x, y, pool, is_boss)| MonsterPlacement {
                position: Position::new(x, y),
                pool: pool.to_string(),
                is_boss,
            })
            .collect(),
        chests: chests
            .iter()
            .map(|&(x, y, tier)| ChestPlacement {
                position: Position::new(x, y),
                tier,
            })
            .collect(),
    }
}

fn loot_bias(slots: &[EquipSlot], description: &str) -> LootBias {
    LootBias {
        slots: slots.iter().copied().collect(),
        description: description.to_string(),
    }
}

fn goblin_cave() -> DungeonTemplate {
    DungeonTemplate {
        id: "goblin_cave".to_string(),
        name: "Goblin Cave".to_string(),
        description: "A damp warren of tunnels claimed by a goblin band.".to_string(),
        base_difficulty: Difficulty::Easy,
        tile_set: TileSetTheme::Stone,
        loot_bias: loot_bias(
            &[EquipSlot::Weapon, EquipSlot::Trinket],
            "Crude goblin weaponry and stolen trinkets",
        ),
        rooms: vec![
            room(
                "entry",
                RoomKind::Entry,
                &[
                    "#######",
                    "#.....#",
                    "#.....#",
                    "#..E..#",
                    "#.....#",
                    "#.....#",
                    "###+###",
                ],
                &[(3, 6, "warrens", Direction::North)],
                &[],
                &[],
            ),
            room(
                "warrens",
                RoomKind::Combat,
                &[
                    "####+####",
                    "#.......#",
                    "#.~~....#",
                    "#.......+",
                    "#...O...#",
                    "#.......#",
                    "#########",
                ],
                &[
                    (4, 0, "entry", Direction::South),
                    (8, 3, "hoard", Direction::West),
                ],
                &[(6, 2, "goblin", false), (3, 5, "goblin", false)],
                &[],
            ),
            room(
                "hoard",
                RoomKind::Treasure,
                &[
                    "#######",
                    "#.....#",
                    "#..*..#",
                    "+.....#",
                    "#.....#",
                    "#.....#",
                    "#######",
                ],
                &[(0, 3, "warrens", Direction::East)],
                &[],
                &[(3, 4, LootTier::Common), (4, 2, LootTier::Rare)],
            ),
        ],
    }
}

fn crypt_of_echoes() -> DungeonTemplate {
    DungeonTemplate {
        id: "crypt_of_echoes".to_string(),
        name: "Crypt of Echoes".to_string(),
        description: "Burial vaults where every footstep answers twice.".to_string(),
        base_difficulty: Difficulty::Medium,
        tile_set: TileSetTheme::Crypt,
        loot_bias: loot_bias(
            &[EquipSlot::Armor, EquipSlot::Helmet],
            "Grave goods and funerary plate",
        ),
        rooms: vec![
            room(
                "entry",
                RoomKind::Entry,
                &[
                    "#######",
                    "#.....#",
                    "#..E..#",
                    "#.....+",
                    "#.....#",
                    "#.....#",
                    "#######",
                ],
                &[(6, 3, "ossuary", Direction::West)],
                &[],
                &[],
            ),
            room(
                "ossuary",
                RoomKind::Combat,
                &[
                    "#########",
                    "#...%...#",
                    "#.......#",
                    "#.......#",
                    "+.......+",
                    "#.......#",
                    "#..%....#",
                    "#.......#",
                    "#########",
                ],
                &[
                    (0, 4, "entry", Direction::East),
                    (8, 4, "gallery", Direction::West),
                ],
                &[(4, 2, "skeleton", false), (6, 6, "skeleton", false)],
                &[],
            ),
            room(
                "gallery",
                RoomKind::Combat,
                &[
                    "###########",
                    "#.........#",
                    "#..T......#",
                    "+.........#",
                    "#.........#",
                    "#.........#",
                    "#####+#####",
                ],
                &[
                    (0, 3, "ossuary", Direction::East),
                    (5, 6, "tomb", Direction::North),
                ],
                &[(8, 4, "ghoul", false)],
                &[(2, 5, LootTier::Rare)],
            ),
            room(
                "tomb",
                RoomKind::Boss,
                &[
                    "#####+#####",
                    "#.........#",
                    "#...%.....#",
                    "#.........#",
                    "#.........#",
                    "#.........#",
                    "#....~....#",
                    "#.........#",
                    "###########",
                ],
                &[(5, 0, "gallery", Direction::South)],
                &[(5, 4, "crypt_lord", true)],
                &[(8, 7, LootTier::Epic)],
            ),
        ],
    }
}

fn emberfall_depths() -> DungeonTemplate {
    DungeonTemplate {
        id: "emberfall_depths".to_string(),
        name: "Emberfall Depths".to_string(),
        description: "Volcanic caverns spanned by a single scorched causeway.".to_string(),
        base_difficulty: Difficulty::Hard,
        tile_set: TileSetTheme::Infernal,
        loot_bias: loot_bias(
            &[EquipSlot::Weapon, EquipSlot::Boots],
            "Fire-tempered arms and ash-proof boots",
        ),
        rooms: vec![
            room(
                "entry",
                RoomKind::Entry,
                &[
                    "###+###",
                    "#.....#",
                    "#.....#",
                    "#..E..#",
                    "#.....#",
                    "#.....#",
                    "#######",
                ],
                &[(3, 0, "bridge", Direction::South)],
                &[],
                &[],
            ),
            room(
                "bridge",
                RoomKind::Combat,
                &[
                    "###########",
                    "#~~~~~~~~~#",
                    "#~.......~#",
                    "+....&....#",
                    "#~.......~#",
                    "#~~~~~~~~~#",
                    "#####+#####",
                ],
                &[
                    (0, 3, "throne", Direction::East),
                    (5, 6, "entry", Direction::North),
                ],
                &[(3, 2, "imp", false), (7, 4, "imp", false)],
                &[],
            ),
            room(
                "throne",
                RoomKind::Boss,
                &[
                    "#########",
                    "#&.....&#",
                    "#.......#",
                    "#.......#",
                    "#.......+",
                    "#.......#",
                    "#.......#",
                    "#&.....&#",
                    "#########",
                ],
                &[(8, 4, "bridge", Direction::West)],
                &[(4, 3, "flame_tyrant", true)],
                &[(2, 6, LootTier::Epic), (6, 6, LootTier::Rare)],
            ),
        ],
    }
}

fn test_arena() -> DungeonTemplate {
    DungeonTemplate {
        id: "test_arena".to_string(),
        name: "Test Arena".to_string(),
        description: "Single-room placeholder used by automated tests.".to_string(),
        base_difficulty: Difficulty::Easy,
        tile_set: TileSetTheme::Stone,
        loot_bias: LootBias::default(),
        rooms: vec![room(
            "arena",
            RoomKind::Entry,
            &["#####", "#...#", "#.E.#", "#...#", "#####"],
            &[],
            &[],
            &[],
        )],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::{validate_template, TileRegistry};

    #[test]
    fn test_all_builtins_are_valid() {
        let tiles = TileRegistry::default();
        for template in builtin_dungeons() {
            let errors = validate_template(&template, &tiles);
            assert!(
                errors.is_empty(),
                "builtin '{}' failed validation: {errors:?}",
                template.id
            );
        }
    }

    #[test]
    fn test_builtin_ids_are_unique() {
        let templates = builtin_dungeons();
        let mut ids: Vec<&str> = templates.iter().map(|t| t.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), templates.len());
    }

    #[test]
    fn test_door_graph_is_symmetric() {
        // Every door has a matching return door in its target room.
        for template in builtin_dungeons() {
            for room in &template.rooms {
                for door in room.doors.values() {
                    let target = template.room(&door.target_room).unwrap();
                    assert!(
                        target.doors.values().any(|d| d.target_room == room.id),
                        "{}: no return door from '{}' to '{}'",
                        template.id,
                        target.id,
                        room.id
                    );
                }
            }
        }
    }
}
