//! # Questforge CLI
//!
//! Thin command-line surface over the engine: validate user-authored dungeon
//! files, inspect computed map layouts, and query recurrence schedules.

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use log::info;
use questforge::{
    calculate_room_positions, describe_schedule, next_run_date, parse_dungeon_markdown,
    should_generate_today, DungeonRegistry, DungeonTemplate, MapCoord, QuestforgeError,
    QuestforgeResult, TileRegistry,
};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Command line arguments for the Questforge engine.
#[derive(Parser, Debug)]
#[command(name = "questforge")]
#[command(about = "Procedural dungeon and recurring-quest core for a gamified task tracker")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parses a dungeon markdown file and reports every violation
    Validate {
        /// Path to the dungeon markdown file
        file: PathBuf,
    },
    /// Prints the computed map layout of a dungeon
    Map {
        /// Path to a dungeon markdown file, or a built-in dungeon id
        target: String,
        /// Emit the layout as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Describes a recurrence expression and its next run
    Schedule {
        /// Recurrence expression, e.g. "weekdays" or "monday, fri"
        expr: String,
        /// Date to evaluate against, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Lists all registered dungeon templates
    List,
}

fn main() -> QuestforgeResult<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .parse_filters(&args.log_level)
        .init();

    info!("questforge v{}", questforge::VERSION);

    match args.command {
        Command::Validate { file } => validate(&file),
        Command::Map { target, json } => map(&target, json),
        Command::Schedule { expr, date } => schedule(&expr, date.as_deref()),
        Command::List => list(),
    }
}

fn validate(file: &PathBuf) -> QuestforgeResult<()> {
    let text = std::fs::read_to_string(file)?;
    match parse_dungeon_markdown(&text, &TileRegistry::default()) {
        Ok(template) => {
            println!(
                "{}: ok ({} room(s), {} difficulty, {} tileset)",
                template.id,
                template.rooms.len(),
                template.base_difficulty,
                template.tile_set
            );
            Ok(())
        }
        Err(errors) => {
            // One bullet per violation so the author can fix the file in
            // one pass.
            eprintln!("{} validation error(s):", errors.len());
            for error in &errors {
                eprintln!("  - {error}");
            }
            std::process::exit(1);
        }
    }
}

fn map(target: &str, json: bool) -> QuestforgeResult<()> {
    let registry = DungeonRegistry::new();
    let template: DungeonTemplate = if target.ends_with(".md") {
        let text = std::fs::read_to_string(target)?;
        parse_dungeon_markdown(&text, &TileRegistry::default()).map_err(|errors| {
            QuestforgeError::InvalidInput(format!("{} validation error(s) in {target}", errors.len()))
        })?
    } else {
        registry
            .get(target)
            .cloned()
            .ok_or_else(|| QuestforgeError::InvalidInput(format!("unknown dungeon '{target}'")))?
    };

    let layout = calculate_room_positions(&template);
    if json {
        println!("{}", serde_json::to_string_pretty(&layout)?);
        return Ok(());
    }

    println!("{} ({} room(s) reachable):", template.name, layout.len());
    for (room_id, coord) in &layout {
        println!("  {room_id}: ({}, {})", coord.col, coord.row);
    }
    render_grid(&layout);

    let unreachable: Vec<&str> = template
        .rooms
        .iter()
        .filter(|room| !layout.contains_key(&room.id))
        .map(|room| room.id.as_str())
        .collect();
    if !unreachable.is_empty() {
        println!("unreachable: {}", unreachable.join(", "));
    }
    Ok(())
}

/// Sketches the layout as a character grid, one cell per room.
fn render_grid(layout: &BTreeMap<String, MapCoord>) {
    if layout.is_empty() {
        return;
    }
    let min_col = layout.values().map(|c| c.col).min().unwrap_or(0);
    let max_col = layout.values().map(|c| c.col).max().unwrap_or(0);
    let min_row = layout.values().map(|c| c.row).min().unwrap_or(0);
    let max_row = layout.values().map(|c| c.row).max().unwrap_or(0);

    let by_coord: BTreeMap<(i32, i32), &str> = layout
        .iter()
        .map(|(id, coord)| ((coord.row, coord.col), id.as_str()))
        .collect();

    for row in min_row..=max_row {
        let mut line = String::new();
        for col in min_col..=max_col {
            match by_coord.get(&(row, col)) {
                Some(id) => {
                    let cell: String = id.chars().take(3).collect();
                    line.push_str(&format!("[{cell:>3}]"));
                }
                None => line.push_str("     "),
            }
        }
        println!("  {line}");
    }
}

fn schedule(expr: &str, date: Option<&str>) -> QuestforgeResult<()> {
    let today = match date {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")?,
        None => Local::now().date_naive(),
    };

    println!("schedule: {}", describe_schedule(expr));
    println!(
        "fires on {today}: {}",
        if should_generate_today(expr, today) {
            "yes"
        } else {
            "no"
        }
    );
    match next_run_date(expr, today) {
        Some(next) => println!("next run: {next}"),
        None => println!("next run: never"),
    }
    Ok(())
}

fn list() -> QuestforgeResult<()> {
    let registry = DungeonRegistry::new();
    for template in registry.all() {
        println!(
            "{:<20} {:<8} {:<9} {} room(s)  {}",
            template.id,
            template.base_difficulty,
            template.tile_set,
            template.rooms.len(),
            template.name
        );
    }
    Ok(())
}
