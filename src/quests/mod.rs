//! # Quests Module
//!
//! Recurring-quest templates, the recurrence schedule engine, and dated
//! quest-instance generation.
//!
//! Templates are authored in note files and read-only here; the engine
//! derives schedule facts from them but never mutates one. Generated
//! instances are keyed by `(template id, date)` so a scheduling driver can
//! guarantee at-most-once generation per day by checking the key before
//! calling the constructor.

pub mod instances;
pub mod loader;
pub mod recurrence;

pub use instances::*;
pub use loader::*;
pub use recurrence::*;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Priority a generated quest carries onto the task board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Parses a lowercase priority name.
    pub fn parse(s: &str) -> Option<Priority> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }

    /// Returns the lowercase name of the priority.
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

/// A user-authored template for a recurring quest.
///
/// Read-only to the recurrence engine; the authoring layer owns its
/// lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringTemplate {
    /// Stable id, part of every generated instance's key
    pub id: String,
    /// Display name; may contain `{{date}}` / `{{date_slug}}` placeholders
    pub quest_name: String,
    /// Compact recurrence expression, e.g. `weekdays` or `monday, fri`
    pub recurrence: String,
    /// Task-board category the instances land in
    pub category: String,
    /// Priority stamped onto instances
    pub priority: Priority,
    /// XP awarded per completed task inside the quest
    pub xp_per_task: u32,
    /// Bonus XP awarded when the whole quest completes
    pub completion_bonus: u32,
    /// Body content with `{{placeholder}}` tokens
    pub body: String,
}

/// A dated quest generated from a recurring template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestInstance {
    /// Unique record id
    pub id: Uuid,
    /// Idempotence key: `<template_id>:<YYYY-MM-DD>`
    pub key: String,
    /// Id of the originating template
    pub template_id: String,
    /// Name with placeholders substituted
    pub name: String,
    /// The day this instance was generated for
    pub date: NaiveDate,
    /// Category inherited from the template
    pub category: String,
    /// Priority inherited from the template
    pub priority: Priority,
    /// XP per completed task
    pub xp_per_task: u32,
    /// Bonus XP on full completion
    pub completion_bonus: u32,
    /// Body with placeholders substituted
    pub body: String,
    /// Whether the quest has been completed
    pub completed: bool,
}

/// Folder watched for recurring-quest template files.
///
/// Supplied by the host's settings layer; opaque to the engine beyond these
/// fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchedFolderConfig {
    /// Vault-relative folder path
    pub folder: String,
    /// Whether scheduling is active for this folder
    pub enabled: bool,
}
