//! # Dungeon Registry
//!
//! Merges built-in dungeon templates with user-registered content.
//!
//! The registry is an explicit context object owned by the application root
//! and passed by reference to whoever needs lookups; there is no hidden
//! module-level collection. The user set is replaced wholesale on reload so a
//! stale entry can never linger after its source file is gone, at the cost of
//! losing mid-session registrations the loader does not re-supply.

use crate::config::PLACEHOLDER_ID_PREFIX;
use crate::dungeon::{builtin, DungeonTemplate};
use rand::Rng;

/// Registry of built-in and user-registered dungeon templates.
///
/// Built-ins keep their declaration order; user templates keep registration
/// order. On id collision the user set shadows built-ins, and within the user
/// set the last registration wins.
#[derive(Debug, Clone)]
pub struct DungeonRegistry {
    builtins: Vec<DungeonTemplate>,
    user: Vec<DungeonTemplate>,
}

impl DungeonRegistry {
    /// Creates a registry seeded with the built-in templates.
    pub fn new() -> Self {
        Self {
            builtins: builtin::builtin_dungeons(),
            user: Vec::new(),
        }
    }

    /// Creates a registry with an explicit built-in set, for tests.
    pub fn with_builtins(builtins: Vec<DungeonTemplate>) -> Self {
        Self {
            builtins,
            user: Vec::new(),
        }
    }

    /// Looks up a template by id.
    ///
    /// User-registered templates shadow built-ins of the same id; within the
    /// user set the last-registered template wins.
    pub fn get(&self, id: &str) -> Option<&DungeonTemplate> {
        self.user
            .iter()
            .rev()
            .find(|t| t.id == id)
            .or_else(|| self.builtins.iter().find(|t| t.id == id))
    }

    /// Enumerates all templates: built-ins first, then user templates in
    /// registration order.
    pub fn all(&self) -> impl Iterator<Item = &DungeonTemplate> {
        self.builtins.iter().chain(self.user.iter())
    }

    /// Atomically replaces the entire user set. No partial update: the old
    /// set is dropped in the same assignment that installs the new one.
    pub fn register_user_dungeons(&mut self, templates: Vec<DungeonTemplate>) {
        log::info!("registering {} user dungeon(s)", templates.len());
        self.user = templates;
    }

    /// Empties the user set.
    pub fn clear_user_dungeons(&mut self) {
        self.user.clear();
    }

    /// Number of built-in templates.
    pub fn builtin_count(&self) -> usize {
        self.builtins.len()
    }

    /// Number of user-registered templates.
    pub fn user_count(&self) -> usize {
        self.user.len()
    }

    /// Picks a template uniformly at random, excluding placeholder entries.
    ///
    /// Returns `None` when no selectable template exists; callers must treat
    /// that as "nothing to run", not reach for an unchecked index.
    pub fn random_dungeon<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&DungeonTemplate> {
        let selectable: Vec<&DungeonTemplate> =
            self.all().filter(|t| !is_placeholder(&t.id)).collect();
        if selectable.is_empty() {
            return None;
        }
        Some(selectable[rng.gen_range(0..selectable.len())])
    }
}

impl Default for DungeonRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether an id marks a non-selectable test/placeholder template.
pub fn is_placeholder(id: &str) -> bool {
    id.starts_with(PLACEHOLDER_ID_PREFIX)
}
