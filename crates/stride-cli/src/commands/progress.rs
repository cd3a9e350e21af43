//! Progress report command for CLI.

use serde::Serialize;
use stride_core::storage::HabitDb;
use stride_core::{
    markers_for, progress_percentage, resolve_tier, total_progress, Config, MarkerPositions,
    TierStatus,
};

#[derive(Serialize)]
struct ProgressReport<'a> {
    habit_id: &'a str,
    name: &'a str,
    total_units: f64,
    percentage: f64,
    tier: TierStatus,
    markers: MarkerPositions,
    streak: u32,
}

pub fn run(habit_id: &str, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let db = HabitDb::open()?;
    let config = Config::load()?;

    let habit = db
        .get_habit(habit_id)?
        .ok_or_else(|| format!("Habit not found: {habit_id}"))?;

    let report = ProgressReport {
        habit_id: &habit.id,
        name: &habit.name,
        total_units: total_progress(&habit),
        percentage: progress_percentage(&habit),
        tier: resolve_tier(&habit),
        markers: markers_for(&habit),
        streak: habit.streak,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let decimals = config.display.percent_decimals as usize;
    let tier_line = if report.tier.completed_all {
        format!("{} tier complete", report.tier.current)
    } else if let Some(next) = report.tier.next {
        format!("{} tier, next {next}", report.tier.current)
    } else {
        format!("working toward {}", report.tier.current)
    };

    println!(
        "{}: {} {} logged, {:.decimals$}% ({tier_line})",
        report.name,
        report.total_units,
        habit.goals.target_unit(),
        report.percentage,
    );
    println!("streak: {} days", report.streak);
    if config.display.show_markers {
        println!(
            "markers: low {:.decimals$}%, clear {:.decimals$}%, stretch {:.decimals$}%",
            report.markers.low, report.markers.clear, report.markers.stretch,
        );
    }
    Ok(())
}
