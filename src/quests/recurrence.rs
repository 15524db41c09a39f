//! # Recurrence Engine
//!
//! Parses compact recurrence expressions into concrete schedules and answers
//! "does this fire today" / "when does it fire next".
//!
//! Everything here is a stateless pure function over a date. Weekdays are
//! numbered 0=Sunday through 6=Saturday. A malformed expression degrades to
//! an empty, never-firing day set instead of failing: a typo silently
//! disables a template rather than crashing the scheduler. Dropped tokens
//! are logged at `warn` level so the typo is at least visible.

use crate::config::NEXT_RUN_SCAN_DAYS;
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeSet;

const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Parses a recurrence expression into a set of weekday numbers.
///
/// Grammar: `daily`, `weekdays`, `weekends`, `weekly` (Monday), `monthly`
/// (empty set; monthly is not expressible as weekdays), `weekly:<dayname>`,
/// or a comma-separated list of day names and abbreviations. Unrecognized
/// tokens are dropped from the list.
///
/// # Examples
///
/// ```
/// use questforge::parse_recurrence_days;
///
/// assert_eq!(
///     parse_recurrence_days("weekdays"),
///     [1, 2, 3, 4, 5].into_iter().collect()
/// );
/// assert_eq!(parse_recurrence_days("weekly:sunday"), [0].into_iter().collect());
/// assert!(parse_recurrence_days("monthly").is_empty());
/// ```
pub fn parse_recurrence_days(expr: &str) -> BTreeSet<u8> {
    let normalized = expr.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "daily" => return (0..=6).collect(),
        "weekdays" => return (1..=5).collect(),
        "weekends" => return [0, 6].into_iter().collect(),
        // Bare weekly defaults to Monday.
        "weekly" => return [1].into_iter().collect(),
        "monthly" => return BTreeSet::new(),
        _ => {}
    }

    if let Some(day) = normalized.strip_prefix("weekly:") {
        return match weekday_number(day) {
            Some(n) => [n].into_iter().collect(),
            None => {
                log::warn!("unrecognized day '{day}' in recurrence '{expr}'");
                BTreeSet::new()
            }
        };
    }

    let mut days = BTreeSet::new();
    for token in normalized.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        match weekday_number(token) {
            Some(n) => {
                days.insert(n);
            }
            None => log::warn!("dropping unrecognized token '{token}' in recurrence '{expr}'"),
        }
    }
    days
}

/// Maps a day name or abbreviation to its weekday number.
fn weekday_number(token: &str) -> Option<u8> {
    match token {
        "sunday" | "sun" => Some(0),
        "monday" | "mon" => Some(1),
        "tuesday" | "tue" | "tues" => Some(2),
        "wednesday" | "wed" => Some(3),
        "thursday" | "thu" | "thur" | "thurs" => Some(4),
        "friday" | "fri" => Some(5),
        "saturday" | "sat" => Some(6),
        _ => None,
    }
}

/// Whether an expression is the monthly rule.
///
/// Exact match, independent of the day-set parser.
pub fn is_monthly_rule(expr: &str) -> bool {
    expr.trim().eq_ignore_ascii_case("monthly")
}

/// Whether a template with this expression fires on the given day.
///
/// Monthly rules fire on the 1st of the month; everything else fires when
/// the day's weekday is in the parsed set.
pub fn should_generate_today(expr: &str, today: NaiveDate) -> bool {
    if is_monthly_rule(expr) {
        return today.day() == 1;
    }
    let weekday = today.weekday().num_days_from_sunday() as u8;
    parse_recurrence_days(expr).contains(&weekday)
}

/// The next day this expression fires, today included.
///
/// Monthly: today if it is the 1st, otherwise the 1st of next month.
/// Weekday sets: scan forward up to seven days. `None` when the expression
/// parsed to an empty set and can never fire.
pub fn next_run_date(expr: &str, today: NaiveDate) -> Option<NaiveDate> {
    if is_monthly_rule(expr) {
        if today.day() == 1 {
            return Some(today);
        }
        let (year, month) = if today.month() == 12 {
            (today.year() + 1, 1)
        } else {
            (today.year(), today.month() + 1)
        };
        return NaiveDate::from_ymd_opt(year, month, 1);
    }

    let days = parse_recurrence_days(expr);
    if days.is_empty() {
        return None;
    }
    (0..NEXT_RUN_SCAN_DAYS)
        .map(|offset| today + Duration::days(offset))
        .find(|date| days.contains(&(date.weekday().num_days_from_sunday() as u8)))
}

/// Renders a schedule as a short human-readable description.
///
/// Consumed by the dashboard next to each template.
pub fn describe_schedule(expr: &str) -> String {
    if is_monthly_rule(expr) {
        return "Monthly on the 1st".to_string();
    }
    let days = parse_recurrence_days(expr);
    if days.is_empty() {
        return "Never (unrecognized schedule)".to_string();
    }
    if days.len() == 7 {
        return "Every day".to_string();
    }
    if days == (1..=5).collect() {
        return "Weekdays (Mon-Fri)".to_string();
    }
    if days == [0, 6].into_iter().collect() {
        return "Weekends (Sat-Sun)".to_string();
    }
    let names: Vec<&str> = days.iter().map(|&d| DAY_NAMES[d as usize]).collect();
    format!("Weekly on {}", names.join(", "))
}
