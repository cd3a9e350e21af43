//! Completion logging command for CLI.

use chrono::{DateTime, Utc};
use stride_core::storage::HabitDb;
use stride_core::{resolve_tier, total_progress};

pub fn run(habit_id: &str, units: f64, at: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    if !units.is_finite() || units < 0.0 {
        return Err(format!("units must be a non-negative number, got {units}").into());
    }

    let timestamp = match at {
        Some(raw) => DateTime::parse_from_rfc3339(raw)?.with_timezone(&Utc),
        None => Utc::now(),
    };

    let mut db = HabitDb::open()?;
    let habit = db.log_units(habit_id, units, timestamp)?;

    println!(
        "Logged {units} {} against '{}'",
        habit.goals.target_unit(),
        habit.name
    );
    println!(
        "total: {} {}, tier: {}, streak: {} days",
        total_progress(&habit),
        habit.goals.target_unit(),
        resolve_tier(&habit).current,
        habit.streak
    );
    println!("{}", serde_json::to_string_pretty(&habit)?);
    Ok(())
}
