//! # Recurring-Template Loader
//!
//! Parses a recurring-quest template file: frontmatter (`questName`,
//! `recurrence`, `category`, `priority`, `xpPerTask`, `completionBonus`)
//! followed by a free-form body with `{{placeholder}}` tokens.
//!
//! Shares the dungeon loader's contract: every violation accumulates into
//! one list. An unparseable recurrence expression is not a violation; the
//! template loads and simply never fires, with a `warn!` so the typo shows
//! up in logs.

use crate::quests::{is_monthly_rule, parse_recurrence_days, Priority, RecurringTemplate};
use crate::utils::{parse_kv_block, slugify, split_frontmatter};
use crate::ValidationError;
use std::collections::HashMap;

/// Parses a recurring-quest template, accumulating every violation.
///
/// `questName` and `recurrence` are required; `category` defaults to
/// `general`, `priority` to medium, and the XP fields to 0 when absent.
/// Malformed numeric or priority values are violations, not defaults.
pub fn parse_recurring_template(text: &str) -> Result<RecurringTemplate, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let Some((head, body)) = split_frontmatter(text) else {
        return Err(vec![ValidationError::MissingFrontmatter]);
    };

    let front: HashMap<String, String> = parse_kv_block(head).into_iter().collect();

    let quest_name = match front.get("questName").map(|s| s.trim()).filter(|s| !s.is_empty()) {
        Some(name) => name.to_string(),
        None => {
            errors.push(ValidationError::MissingField {
                field: "questName".to_string(),
            });
            String::new()
        }
    };

    let recurrence = match front.get("recurrence").map(|s| s.trim()).filter(|s| !s.is_empty()) {
        Some(expr) => {
            if !is_monthly_rule(expr) && parse_recurrence_days(expr).is_empty() {
                // Degraded, not rejected: the template loads but never fires.
                log::warn!("recurrence '{expr}' for '{quest_name}' never fires");
            }
            expr.to_string()
        }
        None => {
            errors.push(ValidationError::MissingField {
                field: "recurrence".to_string(),
            });
            String::new()
        }
    };

    let priority = match front.get("priority") {
        Some(value) => match Priority::parse(value) {
            Some(p) => p,
            None => {
                errors.push(ValidationError::InvalidValue {
                    field: "priority".to_string(),
                    value: value.clone(),
                });
                Priority::default()
            }
        },
        None => Priority::default(),
    };

    let xp_per_task = parse_xp(&front, "xpPerTask", &mut errors);
    let completion_bonus = parse_xp(&front, "completionBonus", &mut errors);

    let id = front
        .get("id")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| slugify(&quest_name));

    let template = RecurringTemplate {
        id,
        quest_name,
        recurrence,
        category: front
            .get("category")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "general".to_string()),
        priority,
        xp_per_task,
        completion_bonus,
        body: body.trim_start_matches('\n').to_string(),
    };

    if errors.is_empty() {
        Ok(template)
    } else {
        Err(errors)
    }
}

fn parse_xp(
    front: &HashMap<String, String>,
    field: &str,
    errors: &mut Vec<ValidationError>,
) -> u32 {
    match front.get(field) {
        Some(value) => match value.trim().parse::<u32>() {
            Ok(xp) => xp,
            Err(_) => {
                errors.push(ValidationError::InvalidNumber {
                    field: field.to_string(),
                    value: value.clone(),
                });
                0
            }
        },
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "\
---
questName: Water the plants
recurrence: monday, thursday
category: chores
priority: low
xpPerTask: 10
completionBonus: 25
---

- [ ] Water the ferns for {{date}}
- [ ] Note progress in {{date_slug}}.md
";

    #[test]
    fn test_parses_valid_template() {
        let template = parse_recurring_template(VALID).unwrap();
        assert_eq!(template.id, "water_the_plants");
        assert_eq!(template.quest_name, "Water the plants");
        assert_eq!(template.recurrence, "monday, thursday");
        assert_eq!(template.category, "chores");
        assert_eq!(template.priority, Priority::Low);
        assert_eq!(template.xp_per_task, 10);
        assert_eq!(template.completion_bonus, 25);
        assert!(template.body.starts_with("- [ ] Water the ferns"));
    }

    #[test]
    fn test_defaults_for_optional_fields() {
        let text = "---\nquestName: Minimal\nrecurrence: daily\n---\nbody\n";
        let template = parse_recurring_template(text).unwrap();
        assert_eq!(template.category, "general");
        assert_eq!(template.priority, Priority::Medium);
        assert_eq!(template.xp_per_task, 0);
        assert_eq!(template.completion_bonus, 0);
    }

    #[test]
    fn test_accumulates_multiple_violations() {
        let text = "---\npriority: urgent\nxpPerTask: lots\n---\n";
        let errors = parse_recurring_template(text).unwrap_err();
        assert!(errors.len() >= 4, "got {errors:?}");
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::MissingField { field } if field == "questName")));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::MissingField { field } if field == "recurrence")));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::InvalidValue { field, .. } if field == "priority")));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::InvalidNumber { field, .. } if field == "xpPerTask")));
    }

    #[test]
    fn test_unparseable_recurrence_still_loads() {
        // Degraded scheduling: the typo disables the quest, it does not
        // reject the template.
        let text = "---\nquestName: Typo\nrecurrence: evry day\n---\n";
        let template = parse_recurring_template(text).unwrap();
        assert_eq!(template.recurrence, "evry day");
        assert!(parse_recurrence_days(&template.recurrence).is_empty());
    }

    #[test]
    fn test_missing_frontmatter() {
        let errors = parse_recurring_template("just a body").unwrap_err();
        assert_eq!(errors, vec![ValidationError::MissingFrontmatter]);
    }
}
