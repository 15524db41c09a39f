//! # Pathfinder
//!
//! A* search over a single room's tile grid for entity movement.
//!
//! Movement is 4-directional with uniform step cost, so the Manhattan
//! heuristic is admissible and consistent and the returned path is optimal.
//! Frontier ties on f-score break by insertion order, which makes the output
//! reproducible for testing. An unreachable goal returns `None`; that is the
//! designed "no answer" signal, not an error.

use crate::dungeon::{Direction, Position, RoomTemplate, TileRegistry, TileSetTheme};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

/// Frontier node for A* search.
///
/// Ordering is reversed on (f-score, insertion sequence) so the std
/// max-heap behaves as a min-heap and equal f-scores pop in insertion
/// order.
#[derive(Debug, Clone, Copy)]
struct FrontierNode {
    f_score: u32,
    seq: u64,
    position: Position,
}

impl PartialEq for FrontierNode {
    fn eq(&self, other: &Self) -> bool {
        (self.f_score, self.seq) == (other.f_score, other.seq)
    }
}

impl Eq for FrontierNode {}

impl PartialOrd for FrontierNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierNode {
    fn cmp(&self, other: &Self) -> Ordering {
        (other.f_score, other.seq).cmp(&(self.f_score, self.seq))
    }
}

/// Finds a shortest walkable path between two tiles of a room.
///
/// The returned sequence excludes `start` and ends at `goal`, so its length
/// equals the number of steps taken. Returns `None` when either endpoint is
/// out of bounds or not walkable, or when no route exists.
///
/// # Examples
///
/// ```
/// use questforge::{find_path, Position, RoomTemplate, RoomKind, TileRegistry, TileSetTheme};
/// use std::collections::BTreeMap;
///
/// let room = RoomTemplate {
///     id: "hall".to_string(),
///     kind: RoomKind::Combat,
///     width: 5,
///     height: 3,
///     layout: vec!["#####".into(), "#...#".into(), "#####".into()],
///     doors: BTreeMap::new(),
///     monsters: vec![],
///     chests: vec![],
/// };
/// let tiles = TileRegistry::default();
/// let path = find_path(&room, &tiles, TileSetTheme::Stone, Position::new(1, 1), Position::new(3, 1));
/// assert_eq!(path.unwrap().len(), 2);
/// ```
pub fn find_path(
    room: &RoomTemplate,
    tiles: &TileRegistry,
    tileset: TileSetTheme,
    start: Position,
    goal: Position,
) -> Option<Vec<Position>> {
    if !can_walk_to(room, tiles, tileset, start) || !can_walk_to(room, tiles, tileset, goal) {
        return None;
    }
    if start == goal {
        return Some(Vec::new());
    }

    let mut open: BinaryHeap<FrontierNode> = BinaryHeap::new();
    let mut came_from: HashMap<Position, Position> = HashMap::new();
    let mut g_score: HashMap<Position, u32> = HashMap::new();
    let mut seq: u64 = 0;

    g_score.insert(start, 0);
    open.push(FrontierNode {
        f_score: start.manhattan_distance(goal),
        seq,
        position: start,
    });

    while let Some(node) = open.pop() {
        let current = node.position;
        if current == goal {
            return Some(reconstruct(&came_from, start, goal));
        }
        // A stale heap entry carries an f-score that no longer matches the
        // best known g; skip it.
        let current_g = g_score[&current];
        if node.f_score != current_g + current.manhattan_distance(goal) {
            continue;
        }

        for neighbor in current.cardinal_adjacent_positions() {
            if !can_walk_to(room, tiles, tileset, neighbor) {
                continue;
            }
            let tentative = current_g + 1;
            if tentative < *g_score.get(&neighbor).unwrap_or(&u32::MAX) {
                came_from.insert(neighbor, current);
                g_score.insert(neighbor, tentative);
                seq += 1;
                open.push(FrontierNode {
                    f_score: tentative + neighbor.manhattan_distance(goal),
                    seq,
                    position: neighbor,
                });
            }
        }
    }

    None
}

fn reconstruct(came_from: &HashMap<Position, Position>, start: Position, goal: Position) -> Vec<Position> {
    let mut path = Vec::new();
    let mut current = goal;
    while current != start {
        path.push(current);
        current = came_from[&current];
    }
    path.reverse();
    path
}

/// Derives the facing direction of a single cardinal step.
///
/// Returns `None` for diagonal, zero, or multi-tile displacements; callers
/// must guard those before animating a step.
pub fn facing_direction(from: Position, to: Position) -> Option<Direction> {
    Direction::from_delta(to - from)
}

/// The position one step away in a direction.
pub fn step_position(pos: Position, direction: Direction) -> Position {
    pos + direction.to_delta()
}

/// Whether a tile is in bounds and walkable under the given theme.
///
/// O(1) check shared with movement validation outside the pathfinder.
pub fn can_walk_to(
    room: &RoomTemplate,
    tiles: &TileRegistry,
    tileset: TileSetTheme,
    pos: Position,
) -> bool {
    room.char_at(pos)
        .map(|c| tiles.is_walkable(tileset, c))
        .unwrap_or(false)
}
