//! Onboarding commands for CLI.

use chrono::{DateTime, NaiveDate, Utc};
use clap::Subcommand;
use stride_core::storage::HabitDb;
use stride_core::{sequence, Config, OnboardingHabit};

#[derive(Subcommand)]
pub enum OnboardAction {
    /// Rank candidates and show the staggered schedule without saving
    Plan {
        /// Candidate as "name=Run,cost=6,return=9[,icon=X]"; repeat per habit
        #[arg(long = "habit", required = true)]
        habits: Vec<String>,
        /// Schedule base date (RFC3339 or YYYY-MM-DD), defaults to now
        #[arg(long)]
        base: Option<String>,
    },
    /// Rank candidates, assign stages and start dates, and save the habits
    Commit {
        /// Candidate as "name=Run,cost=6,return=9[,icon=X]"; repeat per habit
        #[arg(long = "habit", required = true)]
        habits: Vec<String>,
        /// Schedule base date (RFC3339 or YYYY-MM-DD), defaults to now
        #[arg(long)]
        base: Option<String>,
    },
}

fn parse_candidate(raw: &str) -> Result<OnboardingHabit, Box<dyn std::error::Error>> {
    let mut name = None;
    let mut icon = None;
    let mut cost = None;
    let mut energy_return = None;

    for field in raw.split(',') {
        let (key, value) = field
            .split_once('=')
            .ok_or_else(|| format!("bad candidate field '{field}', expected key=value"))?;
        match key.trim() {
            "name" => name = Some(value.trim().to_string()),
            "icon" => icon = Some(value.trim().to_string()),
            "cost" => cost = Some(value.trim().parse::<f64>()?),
            "return" => energy_return = Some(value.trim().parse::<f64>()?),
            other => return Err(format!("unknown candidate field '{other}'").into()),
        }
    }

    let name = name.ok_or("candidate needs a name")?;
    let cost = cost.ok_or_else(|| format!("candidate '{name}' needs a cost"))?;
    let energy_return =
        energy_return.ok_or_else(|| format!("candidate '{name}' needs a return"))?;

    let mut candidate = OnboardingHabit::new(name, cost, energy_return);
    if let Some(icon) = icon {
        candidate = candidate.with_icon(icon);
    }
    Ok(candidate)
}

fn parse_base(raw: Option<&str>) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    let Some(raw) = raw else {
        return Ok(Utc::now());
    };
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| format!("cannot parse '{raw}' as RFC3339 or YYYY-MM-DD"))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| format!("cannot use '{raw}' as a base date"))?;
    Ok(midnight.and_utc())
}

fn parse_candidates(raw: &[String]) -> Result<Vec<OnboardingHabit>, Box<dyn std::error::Error>> {
    raw.iter().map(|entry| parse_candidate(entry)).collect()
}

pub fn run(action: OnboardAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        OnboardAction::Plan { habits, base } => {
            let base = parse_base(base.as_deref())?;
            let sequenced = sequence(parse_candidates(&habits)?, base);
            println!("{}", serde_json::to_string_pretty(&sequenced)?);
        }
        OnboardAction::Commit { habits, base } => {
            let base = parse_base(base.as_deref())?;
            let sequenced = sequence(parse_candidates(&habits)?, base);

            let auto = Config::load()?.auto_goals();
            let mut db = HabitDb::open()?;
            let now = Utc::now();

            let mut created = Vec::new();
            for candidate in sequenced {
                let habit = candidate.into_habit(&auto, now)?;
                db.insert_habit(&habit)?;
                created.push(habit);
            }

            println!("Onboarded {} habits", created.len());
            println!("{}", serde_json::to_string_pretty(&created)?);
        }
    }
    Ok(())
}
