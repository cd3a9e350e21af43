//! Goal ladder commands for CLI.

use chrono::Utc;
use clap::Subcommand;
use stride_core::storage::HabitDb;
use stride_core::GoalTier;

#[derive(Subcommand)]
pub enum GoalAction {
    /// Set one tier's target; sibling tiers are clamped to keep the ladder ordered
    Set {
        /// Habit ID
        habit_id: String,
        /// Tier: low, clear, or stretch
        tier: String,
        /// New target
        target: f64,
    },
    /// Change the unit for the whole ladder
    Unit {
        /// Habit ID
        habit_id: String,
        /// New unit, e.g. "pages"
        unit: String,
    },
    /// Show a habit's goal ladder
    Show {
        /// Habit ID
        habit_id: String,
    },
}

pub fn run(action: GoalAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut db = HabitDb::open()?;

    match action {
        GoalAction::Set {
            habit_id,
            tier,
            target,
        } => {
            let tier: GoalTier = tier.parse()?;
            let habit = db
                .get_habit(&habit_id)?
                .ok_or_else(|| format!("Habit not found: {habit_id}"))?;

            let mut goals = habit.goals;
            goals.set_target(tier, target)?;
            db.update_goals(&habit_id, &goals, Utc::now())?;

            println!("Goals updated:");
            println!("{}", serde_json::to_string_pretty(&goals)?);
        }
        GoalAction::Unit { habit_id, unit } => {
            let habit = db
                .get_habit(&habit_id)?
                .ok_or_else(|| format!("Habit not found: {habit_id}"))?;

            let mut goals = habit.goals;
            goals.set_unit(unit);
            db.update_goals(&habit_id, &goals, Utc::now())?;

            println!("Goals updated:");
            println!("{}", serde_json::to_string_pretty(&goals)?);
        }
        GoalAction::Show { habit_id } => {
            let habit = db
                .get_habit(&habit_id)?
                .ok_or_else(|| format!("Habit not found: {habit_id}"))?;
            println!("{}", serde_json::to_string_pretty(&habit.goals)?);
        }
    }
    Ok(())
}
