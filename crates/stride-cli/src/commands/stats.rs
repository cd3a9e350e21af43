//! Per-habit statistics command for CLI.

use serde::Serialize;
use stride_core::storage::HabitDb;
use stride_core::{progress_percentage, resolve_tier, total_progress, GoalTier};

#[derive(Serialize)]
struct HabitStats {
    id: String,
    name: String,
    streak: u32,
    completions: usize,
    total_units: f64,
    current_tier: GoalTier,
    completed_all: bool,
    percentage: f64,
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let db = HabitDb::open()?;
    let habits = db.list_habits()?;

    let stats: Vec<HabitStats> = habits
        .iter()
        .map(|habit| {
            let status = resolve_tier(habit);
            HabitStats {
                id: habit.id.clone(),
                name: habit.name.clone(),
                streak: habit.streak,
                completions: habit.completions.len(),
                total_units: total_progress(habit),
                current_tier: status.current,
                completed_all: status.completed_all,
                percentage: progress_percentage(habit),
            }
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
