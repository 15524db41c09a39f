//! # Tile Registry
//!
//! Maps single-character layout symbols to tile semantics per visual theme.
//!
//! Lookup goes to the theme-specific table first, then to the shared fallback
//! table. Unknown characters surface as a typed [`TileResolutionError`];
//! whether to treat an unknown character as a wall or reject the dungeon is a
//! caller-level policy, never decided here.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Visual theme a dungeon's layout characters resolve against.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TileSetTheme {
    /// Grey stonework halls
    Stone,
    /// Bone-littered burial vaults
    Crypt,
    /// Overgrown forest ruins
    Verdant,
    /// Lava-lit volcanic caverns
    Infernal,
}

impl TileSetTheme {
    /// Parses a lowercase theme name.
    pub fn parse(s: &str) -> Option<TileSetTheme> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stone" => Some(TileSetTheme::Stone),
            "crypt" => Some(TileSetTheme::Crypt),
            "verdant" => Some(TileSetTheme::Verdant),
            "infernal" => Some(TileSetTheme::Infernal),
            _ => None,
        }
    }

    /// Returns the lowercase name of the theme.
    pub fn as_str(self) -> &'static str {
        match self {
            TileSetTheme::Stone => "stone",
            TileSetTheme::Crypt => "crypt",
            TileSetTheme::Verdant => "verdant",
            TileSetTheme::Infernal => "infernal",
        }
    }

    /// All themes in declaration order.
    pub fn all() -> [TileSetTheme; 4] {
        [
            TileSetTheme::Stone,
            TileSetTheme::Crypt,
            TileSetTheme::Verdant,
            TileSetTheme::Infernal,
        ]
    }
}

impl std::fmt::Display for TileSetTheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Broad semantic category of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileCategory {
    Floor,
    Wall,
    Hazard,
    Obstacle,
    Decorative,
    Interactive,
}

/// Resolved semantics of a single layout character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileDefinition {
    /// Whether entities may stand on the tile
    pub walkable: bool,
    /// Whether the tile blocks line of sight
    pub blocking: bool,
    /// Semantic category
    pub category: TileCategory,
}

impl TileDefinition {
    const fn new(walkable: bool, blocking: bool, category: TileCategory) -> Self {
        Self {
            walkable,
            blocking,
            category,
        }
    }
}

/// Unknown tile character for a theme.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown tile character '{character}' in tileset '{tileset}'")]
pub struct TileResolutionError {
    /// The character that failed to resolve
    pub character: char,
    /// The theme it was looked up against
    pub tileset: TileSetTheme,
}

/// Registry of tile definitions, themed tables over a shared fallback.
#[derive(Debug, Clone)]
pub struct TileRegistry {
    themed: HashMap<TileSetTheme, HashMap<char, TileDefinition>>,
    shared: HashMap<char, TileDefinition>,
}

impl TileRegistry {
    /// Resolves a layout character against a theme.
    ///
    /// Theme-specific definitions shadow the shared table. Unknown characters
    /// fail with a [`TileResolutionError`] naming both the character and the
    /// theme so callers can decide between wall-defaulting and rejection.
    ///
    /// # Examples
    ///
    /// ```
    /// use questforge::{TileCategory, TileRegistry, TileSetTheme};
    ///
    /// let tiles = TileRegistry::default();
    /// let def = tiles.resolve_tile(TileSetTheme::Stone, '#').unwrap();
    /// assert_eq!(def.category, TileCategory::Wall);
    /// assert!(tiles.resolve_tile(TileSetTheme::Stone, '?').is_err());
    /// ```
    pub fn resolve_tile(
        &self,
        tileset: TileSetTheme,
        character: char,
    ) -> Result<&TileDefinition, TileResolutionError> {
        self.themed
            .get(&tileset)
            .and_then(|table| table.get(&character))
            .or_else(|| self.shared.get(&character))
            .ok_or(TileResolutionError { character, tileset })
    }

    /// Whether entities may stand on the tile a character resolves to.
    ///
    /// Pure derived predicate shared by pathfinding and spawn validation.
    /// Unknown characters are not walkable.
    pub fn is_walkable(&self, tileset: TileSetTheme, character: char) -> bool {
        self.resolve_tile(tileset, character)
            .map(|def| def.walkable)
            .unwrap_or(false)
    }
}

impl Default for TileRegistry {
    fn default() -> Self {
        use TileCategory::*;

        let mut shared = HashMap::new();
        shared.insert('#', TileDefinition::new(false, true, Wall));
        shared.insert('.', TileDefinition::new(true, false, Floor));
        // Entry spawn marker; behaves as floor for movement.
        shared.insert('E', TileDefinition::new(true, false, Floor));
        shared.insert('~', TileDefinition::new(true, false, Hazard));
        shared.insert('^', TileDefinition::new(true, false, Hazard));
        shared.insert('O', TileDefinition::new(false, true, Obstacle));
        shared.insert('*', TileDefinition::new(true, false, Decorative));
        shared.insert('+', TileDefinition::new(true, false, Interactive));

        let mut themed: HashMap<TileSetTheme, HashMap<char, TileDefinition>> = HashMap::new();
        themed.insert(
            TileSetTheme::Stone,
            HashMap::from([('=', TileDefinition::new(false, false, Obstacle))]),
        );
        themed.insert(
            TileSetTheme::Crypt,
            HashMap::from([
                ('%', TileDefinition::new(false, false, Obstacle)),
                ('T', TileDefinition::new(true, false, Interactive)),
            ]),
        );
        themed.insert(
            TileSetTheme::Verdant,
            HashMap::from([
                ('"', TileDefinition::new(true, false, Decorative)),
                ('Y', TileDefinition::new(false, true, Obstacle)),
            ]),
        );
        themed.insert(
            TileSetTheme::Infernal,
            HashMap::from([('&', TileDefinition::new(true, false, Hazard))]),
        );

        Self { themed, shared }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_fallback_resolution() {
        let tiles = TileRegistry::default();
        for theme in TileSetTheme::all() {
            assert_eq!(
                tiles.resolve_tile(theme, '#').unwrap().category,
                TileCategory::Wall
            );
            assert!(tiles.is_walkable(theme, '.'));
            assert!(!tiles.is_walkable(theme, '#'));
        }
    }

    #[test]
    fn test_theme_specific_characters() {
        let tiles = TileRegistry::default();
        // Crypt bone pile resolves only under crypt.
        assert!(tiles.resolve_tile(TileSetTheme::Crypt, '%').is_ok());
        assert!(tiles.resolve_tile(TileSetTheme::Stone, '%').is_err());
        // Infernal lava vent is a walkable hazard.
        let vent = tiles.resolve_tile(TileSetTheme::Infernal, '&').unwrap();
        assert_eq!(vent.category, TileCategory::Hazard);
        assert!(vent.walkable);
    }

    #[test]
    fn test_unknown_character_error_names_both() {
        let tiles = TileRegistry::default();
        let err = tiles.resolve_tile(TileSetTheme::Verdant, 'q').unwrap_err();
        assert_eq!(err.character, 'q');
        assert_eq!(err.tileset, TileSetTheme::Verdant);
        let msg = err.to_string();
        assert!(msg.contains('q'));
        assert!(msg.contains("verdant"));
    }

    #[test]
    fn test_unknown_character_not_walkable() {
        let tiles = TileRegistry::default();
        assert!(!tiles.is_walkable(TileSetTheme::Stone, 'z'));
    }

    #[test]
    fn test_hazards_are_walkable_but_marked() {
        let tiles = TileRegistry::default();
        let spikes = tiles.resolve_tile(TileSetTheme::Stone, '^').unwrap();
        assert!(spikes.walkable);
        assert_eq!(spikes.category, TileCategory::Hazard);
    }
}
