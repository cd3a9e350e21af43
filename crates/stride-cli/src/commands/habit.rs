//! Habit management commands for CLI.

use chrono::Utc;
use clap::Subcommand;
use stride_core::storage::HabitDb;
use stride_core::{Config, FrequencyUnit, Goal, GoalSet, GoalTier, Habit, Stage};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Create a new habit
    Add {
        /// Habit name
        name: String,
        /// Icon (emoji or short label)
        #[arg(long)]
        icon: Option<String>,
        /// Low tier target (default: from config)
        #[arg(long)]
        low: Option<f64>,
        /// Clear tier target (default: from config)
        #[arg(long)]
        clear: Option<f64>,
        /// Stretch tier target (default: from config)
        #[arg(long)]
        stretch: Option<f64>,
        /// Unit the targets count, e.g. "pages" (default: from config)
        #[arg(long)]
        unit: Option<String>,
        /// Intended repetitions per period (default: 1)
        #[arg(long, default_value = "1")]
        frequency: f64,
        /// Target period: day, week, month, or session (default: day)
        #[arg(long, default_value = "day")]
        per: String,
        /// Track a "do less" habit; targets must descend low >= clear >= stretch
        #[arg(long)]
        subtractive: bool,
        /// Stage color (red, orange, amber, yellow, lime, green, teal, blue, indigo, violet)
        #[arg(long)]
        stage: Option<String>,
    },
    /// List habits
    List,
    /// Get habit details
    Show {
        /// Habit ID
        id: String,
    },
    /// Delete a habit and its completion log
    Delete {
        /// Habit ID
        id: String,
    },
}

pub fn run(action: HabitAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut db = HabitDb::open()?;

    match action {
        HabitAction::Add {
            name,
            icon,
            low,
            clear,
            stretch,
            unit,
            frequency,
            per,
            subtractive,
            stage,
        } => {
            if subtractive && (low.is_none() || clear.is_none() || stretch.is_none()) {
                return Err("subtractive habits need explicit --low, --clear and --stretch".into());
            }

            let auto = Config::load()?.auto_goals();
            let additive = !subtractive;
            let unit = unit.unwrap_or(auto.unit);
            let frequency_unit: FrequencyUnit = per.parse()?;

            let tier_goal = |tier: GoalTier, target: f64| {
                Goal::new(tier, target, &unit, additive).with_frequency(frequency, frequency_unit)
            };
            let goals = GoalSet::new(
                tier_goal(GoalTier::Low, low.unwrap_or(auto.low)),
                tier_goal(GoalTier::Clear, clear.unwrap_or(auto.clear)),
                tier_goal(GoalTier::Stretch, stretch.unwrap_or(auto.stretch)),
            )?;

            let mut habit = Habit::new(name, goals, Utc::now());
            if let Some(icon) = icon {
                habit.icon = icon;
            }
            if let Some(stage) = stage {
                habit.stage = stage.parse::<Stage>()?;
            }

            db.insert_habit(&habit)?;
            println!("Habit created: {}", habit.id);
            println!("{}", serde_json::to_string_pretty(&habit)?);
        }
        HabitAction::List => {
            let habits = db.list_habits()?;
            println!("{}", serde_json::to_string_pretty(&habits)?);
        }
        HabitAction::Show { id } => match db.get_habit(&id)? {
            Some(habit) => println!("{}", serde_json::to_string_pretty(&habit)?),
            None => println!("Habit not found: {id}"),
        },
        HabitAction::Delete { id } => {
            if db.delete_habit(&id)? {
                println!("Habit deleted: {id}");
            } else {
                println!("Habit not found: {id}");
            }
        }
    }
    Ok(())
}
