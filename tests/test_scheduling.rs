//! Integration tests for the recurrence engine and quest-instance lifecycle.

use chrono::NaiveDate;
use questforge::{
    archive_completed, describe_schedule, generate_quest_instance, instance_key, is_monthly_rule,
    next_run_date, parse_recurrence_days, parse_recurring_template, should_generate_today,
    Priority,
};
use std::collections::HashSet;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_weekday_parsing_contract() {
    assert_eq!(
        parse_recurrence_days("weekdays"),
        [1u8, 2, 3, 4, 5].into_iter().collect()
    );
    assert_eq!(
        parse_recurrence_days("weekly:sunday"),
        [0u8].into_iter().collect()
    );
    assert!(parse_recurrence_days("monthly").is_empty());
    assert!(is_monthly_rule("monthly"));
}

#[test]
fn test_monthly_next_run_contract() {
    assert_eq!(
        next_run_date("monthly", date(2024, 3, 15)),
        Some(date(2024, 4, 1))
    );
    assert_eq!(
        next_run_date("monthly", date(2024, 3, 1)),
        Some(date(2024, 3, 1))
    );
}

/// End-to-end: load a template from markdown, check its schedule, generate
/// an instance on an eligible day.
#[test]
fn test_template_to_instance_flow() {
    let text = "\
---
questName: Weekly review {{date}}
recurrence: weekly:friday
category: planning
priority: high
xpPerTask: 15
completionBonus: 50
---

- [ ] Review the week ending {{date}}
- [ ] File notes under review-{{date_slug}}
";
    let template = parse_recurring_template(text).unwrap();
    assert_eq!(template.priority, Priority::High);
    assert_eq!(describe_schedule(&template.recurrence), "Weekly on Friday");

    // 2024-03-15 is a Friday; the 14th is not.
    assert!(should_generate_today(&template.recurrence, date(2024, 3, 15)));
    assert!(!should_generate_today(&template.recurrence, date(2024, 3, 14)));

    let instance = generate_quest_instance(&template, date(2024, 3, 15));
    assert_eq!(instance.key, "weekly_review_date:2024-03-15");
    assert_eq!(instance.name, "Weekly review 2024-03-15");
    assert!(instance.body.contains("review-20240315"));
    assert_eq!(instance.xp_per_task, 15);
}

/// The driver recognizes duplicates by key: generating for the same
/// (template, date) twice yields the same key every time.
#[test]
fn test_idempotent_keying() {
    let text = "---\nquestName: Daily stretch\nrecurrence: daily\n---\nStretch!\n";
    let template = parse_recurring_template(text).unwrap();
    let day = date(2024, 6, 3);

    let mut seen = HashSet::new();
    for _ in 0..5 {
        let instance = generate_quest_instance(&template, day);
        seen.insert(instance.key);
    }
    assert_eq!(seen.len(), 1);
    assert_eq!(
        instance_key(&template.id, day),
        seen.into_iter().next().unwrap()
    );

    // A different day produces a different key.
    assert_ne!(
        instance_key(&template.id, day),
        instance_key(&template.id, date(2024, 6, 4))
    );
}

/// A degraded expression never fires and has no next run, but querying it
/// does not panic anywhere.
#[test]
fn test_degraded_expression_never_fires() {
    let expr = "evry second thursday";
    let today = date(2024, 3, 15);
    assert!(parse_recurrence_days(expr).is_empty());
    assert!(!should_generate_today(expr, today));
    assert_eq!(next_run_date(expr, today), None);
    assert_eq!(describe_schedule(expr), "Never (unrecognized schedule)");
}

/// Completed instances from prior dates move to year-month partitions;
/// uncompleted stale instances are left alone.
#[test]
fn test_archival_policy() {
    let text = "---\nquestName: Tidy desk\nrecurrence: daily\n---\nTidy.\n";
    let template = parse_recurring_template(text).unwrap();

    let mut done = generate_quest_instance(&template, date(2024, 5, 30));
    done.completed = true;
    let skipped = generate_quest_instance(&template, date(2024, 5, 31));

    let outcome = archive_completed(vec![done.clone(), skipped.clone()], date(2024, 6, 10));
    assert_eq!(outcome.archived["2024-05"], vec![done]);
    assert_eq!(outcome.remaining, vec![skipped]);
}
