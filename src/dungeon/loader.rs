//! # User Dungeon Loader
//!
//! Parses a user-authored markdown dungeon definition into a
//! [`DungeonTemplate`].
//!
//! The format is frontmatter (`name`, `difficulty`, `tileset`, optional
//! `id`, `description`, `lootSlots`, `lootDescription`) followed by one
//! `## room_id` section per room. Each section holds `type:`, a `layout: |`
//! literal block, a `doors:` mapping (`col,row: targetRoom/direction`), and
//! optional `chests:` / `monsters:` lists.
//!
//! Parsing is two-pass: every room section is first read into an
//! intermediate representation, then the complete set is validated, so
//! cross-reference checks see all rooms and every violation accumulates into
//! one list. A file with three independent problems reports all three.

use crate::config::MAX_GRID_DIM;
use crate::dungeon::{
    validate_template, ChestPlacement, Difficulty, Direction, Door, DungeonTemplate, EquipSlot,
    LootBias, LootTier, MonsterPlacement, Position, RoomKind, RoomTemplate, TileRegistry,
    TileSetTheme,
};
use crate::utils::{parse_bracketed_list, parse_coord, parse_kv_block, slugify, split_frontmatter};
use crate::ValidationError;
use std::collections::{BTreeMap, HashMap};

/// Intermediate representation of one `## room` section before validation.
#[derive(Debug, Default)]
struct RawRoom {
    id: String,
    kind: Option<String>,
    width: Option<String>,
    height: Option<String>,
    layout: Vec<String>,
    door_lines: Vec<String>,
    chest_lines: Vec<String>,
    monster_lines: Vec<String>,
}

/// Parses a markdown dungeon definition, accumulating every violation.
///
/// Returns the template only when the file is completely clean; otherwise
/// the full list of problems comes back so the author can fix the file in
/// one pass.
///
/// # Examples
///
/// ```
/// use questforge::{parse_dungeon_markdown, TileRegistry};
///
/// let text = "\
/// ---
/// name: Tiny Hole
/// difficulty: easy
/// tileset: stone
/// ---
///
/// ### start
/// type: entry
/// layout: |
///   ######
///   #.E.#
///   ######
/// ";
/// let template = parse_dungeon_markdown(text, &TileRegistry::default()).unwrap();
/// assert_eq!(template.id, "tiny_hole");
/// assert_eq!(template.rooms.len(), 1);
/// ```
pub fn parse_dungeon_markdown(
    text: &str,
    tiles: &TileRegistry,
) -> Result<DungeonTemplate, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let Some((head, body)) = split_frontmatter(text) else {
        return Err(vec![ValidationError::MissingFrontmatter]);
    };

    let front: HashMap<String, String> = parse_kv_block(head).into_iter().collect();

    let name = require(&front, "name", &mut errors);
    let difficulty = match require(&front, "difficulty", &mut errors) {
        Some(value) => match Difficulty::parse(&value) {
            Some(d) => Some(d),
            None => {
                errors.push(ValidationError::InvalidValue {
                    field: "difficulty".to_string(),
                    value,
                });
                None
            }
        },
        None => None,
    };
    let tile_set = match require(&front, "tileset", &mut errors) {
        Some(value) => match TileSetTheme::parse(&value) {
            Some(t) => Some(t),
            None => {
                errors.push(ValidationError::InvalidValue {
                    field: "tileset".to_string(),
                    value,
                });
                None
            }
        },
        None => None,
    };

    let mut loot_slots = std::collections::BTreeSet::new();
    if let Some(raw) = front.get("lootSlots") {
        for item in parse_bracketed_list(raw) {
            match EquipSlot::parse(&item) {
                Some(slot) => {
                    loot_slots.insert(slot);
                }
                None => errors.push(ValidationError::InvalidValue {
                    field: "lootSlots".to_string(),
                    value: item,
                }),
            }
        }
    }

    let raw_rooms = split_room_sections(body);
    if raw_rooms.is_empty() {
        errors.push(ValidationError::NoRooms);
    }

    let rooms: Vec<RoomTemplate> = raw_rooms
        .into_iter()
        .map(|raw| convert_room(raw, &mut errors))
        .collect();

    let entry_count = rooms.iter().filter(|r| r.kind == RoomKind::Entry).count();
    if entry_count > 1 {
        errors.push(ValidationError::MultipleEntryRooms { count: entry_count });
    }

    let name = name.unwrap_or_default();
    let id = front
        .get("id")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| slugify(&name));

    let template = DungeonTemplate {
        id,
        name,
        description: front.get("description").cloned().unwrap_or_default(),
        // Fallbacks keep the cross-reference pass running; the accumulated
        // errors already guarantee an Err return.
        base_difficulty: difficulty.unwrap_or(Difficulty::Easy),
        tile_set: tile_set.unwrap_or(TileSetTheme::Stone),
        loot_bias: LootBias {
            slots: loot_slots,
            description: front.get("lootDescription").cloned().unwrap_or_default(),
        },
        rooms,
    };

    errors.extend(validate_template(&template, tiles));

    if errors.is_empty() {
        Ok(template)
    } else {
        log::debug!(
            "dungeon markdown rejected with {} violation(s)",
            errors.len()
        );
        Err(errors)
    }
}

fn require(
    front: &HashMap<String, String>,
    field: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<String> {
    match front.get(field).map(|s| s.trim()).filter(|s| !s.is_empty()) {
        Some(value) => Some(value.to_string()),
        None => {
            errors.push(ValidationError::MissingField {
                field: field.to_string(),
            });
            None
        }
    }
}

/// First pass: split the body into per-room sections and read each into a
/// [`RawRoom`] without judging its content.
fn split_room_sections(body: &str) -> Vec<RawRoom> {
    let mut sections: Vec<(String, Vec<&str>)> = Vec::new();
    for line in body.lines() {
        if let Some(header) = line.strip_prefix("## ") {
            sections.push((header.trim().to_string(), Vec::new()));
        } else if let Some((_, lines)) = sections.last_mut() {
            lines.push(line);
        }
        // Text before the first room header is ignored.
    }
    sections
        .into_iter()
        .map(|(id, lines)| read_room_section(id, &lines))
        .collect()
}

fn read_room_section(id: String, lines: &[&str]) -> RawRoom {
    let mut raw = RawRoom {
        id,
        ..RawRoom::default()
    };
    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        let trimmed = line.trim();
        if trimmed.is_empty() || is_indented(line) {
            // Stray indented lines outside a block are ignored.
            i += 1;
            continue;
        }
        let Some((key, value)) = trimmed.split_once(':') else {
            i += 1;
            continue;
        };
        let (key, value) = (key.trim(), value.trim());
        match key {
            "type" => raw.kind = Some(value.to_string()),
            "width" => raw.width = Some(value.to_string()),
            "height" => raw.height = Some(value.to_string()),
            "layout" => {
                let (rows, next) = collect_indented(lines, i + 1);
                raw.layout = dedent(&rows);
                i = next;
                continue;
            }
            "doors" => {
                let (rows, next) = collect_indented(lines, i + 1);
                raw.door_lines = rows.iter().map(|l| l.trim().to_string()).collect();
                i = next;
                continue;
            }
            "chests" => {
                let (rows, next) = collect_indented(lines, i + 1);
                raw.chest_lines = rows.iter().map(|l| l.trim().to_string()).collect();
                i = next;
                continue;
            }
            "monsters" => {
                let (rows, next) = collect_indented(lines, i + 1);
                raw.monster_lines = rows.iter().map(|l| l.trim().to_string()).collect();
                i = next;
                continue;
            }
            other => log::debug!("ignoring unknown room key '{other}'"),
        }
        i += 1;
    }
    raw
}

fn is_indented(line: &str) -> bool {
    line.starts_with(' ') || line.starts_with('\t')
}

/// Collects the run of indented, non-blank lines starting at `start`.
/// Returns the lines and the index of the first line not consumed.
fn collect_indented<'a>(lines: &[&'a str], start: usize) -> (Vec<&'a str>, usize) {
    let mut collected = Vec::new();
    let mut i = start;
    while i < lines.len() {
        let line = lines[i];
        if line.trim().is_empty() || !is_indented(line) {
            break;
        }
        collected.push(line.trim_end_matches('\r'));
        i += 1;
    }
    (collected, i)
}

/// Strips the common leading-space indentation from a layout block.
fn dedent(rows: &[&str]) -> Vec<String> {
    let min_indent = rows
        .iter()
        .map(|row| row.len() - row.trim_start_matches(' ').len())
        .min()
        .unwrap_or(0);
    rows.iter().map(|row| row[min_indent..].to_string()).collect()
}

/// Second pass (per room): convert the raw section into a [`RoomTemplate`],
/// pushing a violation for each malformed field. Fallback values keep the
/// room present so the whole-template pass can still check cross-references.
fn convert_room(raw: RawRoom, errors: &mut Vec<ValidationError>) -> RoomTemplate {
    let kind = match &raw.kind {
        Some(value) => match RoomKind::parse(value) {
            Some(kind) => kind,
            None => {
                errors.push(ValidationError::InvalidValue {
                    field: format!("type in room '{}'", raw.id),
                    value: value.clone(),
                });
                RoomKind::Combat
            }
        },
        None => {
            errors.push(ValidationError::MissingField {
                field: format!("type in room '{}'", raw.id),
            });
            RoomKind::Combat
        }
    };

    if raw.layout.is_empty() {
        errors.push(ValidationError::MissingLayout {
            room: raw.id.clone(),
        });
    }

    let height = parse_dim(&raw.height, "height", &raw.id, raw.layout.len() as u32, errors);
    let derived_width = raw
        .layout
        .first()
        .map(|row| row.chars().count() as u32)
        .unwrap_or(0);
    let width = parse_dim(&raw.width, "width", &raw.id, derived_width, errors);

    for dim in [width, height] {
        if dim > MAX_GRID_DIM {
            errors.push(ValidationError::LayoutTooLarge {
                room: raw.id.clone(),
                dim,
                max: MAX_GRID_DIM,
            });
        }
    }

    let mut doors = BTreeMap::new();
    for line in &raw.door_lines {
        match parse_door_line(line) {
            Ok((pos, target, dir_str)) => match Direction::parse(&dir_str) {
                Some(dir) => {
                    doors.insert(
                        pos,
                        Door {
                            target_room: target,
                            target_entry: dir,
                        },
                    );
                }
                None => errors.push(ValidationError::InvalidDirection {
                    room: raw.id.clone(),
                    value: dir_str,
                }),
            },
            Err(()) => errors.push(ValidationError::InvalidDoorSpec {
                room: raw.id.clone(),
                line: line.clone(),
            }),
        }
    }

    let mut chests = Vec::new();
    for line in &raw.chest_lines {
        match parse_chest_line(line) {
            Ok(chest) => chests.push(chest),
            Err(()) => errors.push(ValidationError::InvalidPlacementSpec {
                room: raw.id.clone(),
                kind: "chest",
                line: line.clone(),
            }),
        }
    }

    let mut monsters = Vec::new();
    for line in &raw.monster_lines {
        match parse_monster_line(line) {
            Ok(monster) => monsters.push(monster),
            Err(()) => errors.push(ValidationError::InvalidPlacementSpec {
                room: raw.id.clone(),
                kind: "monster",
                line: line.clone(),
            }),
        }
    }

    RoomTemplate {
        id: raw.id,
        kind,
        width,
        height,
        layout: raw.layout,
        doors,
        monsters,
        chests,
    }
}

fn parse_dim(
    declared: &Option<String>,
    field: &str,
    room: &str,
    derived: u32,
    errors: &mut Vec<ValidationError>,
) -> u32 {
    match declared {
        Some(value) => match value.parse::<u32>() {
            Ok(dim) => dim,
            Err(_) => {
                errors.push(ValidationError::InvalidNumber {
                    field: format!("{field} in room '{room}'"),
                    value: value.clone(),
                });
                derived
            }
        },
        None => derived,
    }
}

/// Parses `col,row: targetRoom/direction`.
fn parse_door_line(line: &str) -> Result<(Position, String, String), ()> {
    let (coord, value) = line.split_once(':').ok_or(())?;
    let (x, y) = parse_coord(coord).ok_or(())?;
    let (target, dir) = value.trim().split_once('/').ok_or(())?;
    let target = target.trim();
    if target.is_empty() {
        return Err(());
    }
    Ok((
        Position::new(x, y),
        target.to_string(),
        dir.trim().to_string(),
    ))
}

/// Parses `- col,row: tier`.
fn parse_chest_line(line: &str) -> Result<ChestPlacement, ()> {
    let rest = line.strip_prefix('-').ok_or(())?.trim();
    let (coord, tier) = rest.split_once(':').ok_or(())?;
    let (x, y) = parse_coord(coord).ok_or(())?;
    let tier = LootTier::parse(tier).ok_or(())?;
    Ok(ChestPlacement {
        position: Position::new(x, y),
        tier,
    })
}

/// Parses `- col,row: pool` with an optional trailing `boss` flag.
fn parse_monster_line(line: &str) -> Result<MonsterPlacement, ()> {
    let rest = line.strip_prefix('-').ok_or(())?.trim();
    let (coord, value) = rest.split_once(':').ok_or(())?;
    let (x, y) = parse_coord(coord).ok_or(())?;
    let mut parts = value.trim().split_whitespace();
    let pool = parts.next().ok_or(())?.to_string();
    let is_boss = match parts.next() {
        None => false,
        Some("boss") => true,
        Some(_) => return Err(()),
    };
    if parts.next().is_some() {
        return Err(());
    }
    Ok(MonsterPlacement {
        position: Position::new(x, y),
        pool,
        is_boss,
    })
}
