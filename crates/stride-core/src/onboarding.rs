//! Onboarding sequencing for new habit candidates.
//!
//! Candidates are ranked by net energy (return minus cost), assigned a
//! stage from the ordered palette, and staggered onto start dates: the
//! first eight habits start 21 days apart, everything after that 42 days
//! apart. A sequenced candidate converts into a full [`Habit`] with an
//! auto-generated goal ladder.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GoalError;
use crate::goal::{Goal, GoalSet, GoalTier};
use crate::habit::{Habit, Stage};

/// Days between consecutive start dates during the initial ramp.
pub const INITIAL_STAGGER_DAYS: i64 = 21;

/// Days between consecutive start dates after the ramp.
pub const EXTENDED_STAGGER_DAYS: i64 = 42;

/// Number of habits that start on the initial cadence.
pub const INITIAL_RAMP_COUNT: usize = 8;

/// Goal targets applied when onboarding creates habits.
///
/// Defaults to a gentle additive ladder of 1/2/3 units per day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoGoals {
    pub unit: String,
    pub low: f64,
    pub clear: f64,
    pub stretch: f64,
}

impl Default for AutoGoals {
    fn default() -> Self {
        Self {
            unit: "units".to_string(),
            low: 1.0,
            clear: 2.0,
            stretch: 3.0,
        }
    }
}

/// A habit candidate collected during onboarding.
///
/// `stage` and `start_date` stay empty until [`sequence`] assigns them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnboardingHabit {
    pub name: String,
    #[serde(default)]
    pub icon: String,
    /// Effort the habit demands, on whatever scale the caller uses.
    pub energy_cost: f64,
    /// Energy the habit gives back, on the same scale.
    pub energy_return: f64,
    #[serde(default)]
    pub stage: Option<Stage>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
}

impl OnboardingHabit {
    pub fn new(name: impl Into<String>, energy_cost: f64, energy_return: f64) -> Self {
        Self {
            name: name.into(),
            icon: String::new(),
            energy_cost,
            energy_return,
            stage: None,
            start_date: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Energy the habit is expected to give back, net of its cost.
    pub fn net_energy(&self) -> f64 {
        self.energy_return - self.energy_cost
    }

    /// Convert a sequenced candidate into a full habit.
    ///
    /// The habit gets a fresh id, an empty completion log, and an additive
    /// once-per-day goal ladder built from `auto`. Stage and start date
    /// carry over when the candidate has been sequenced.
    ///
    /// # Errors
    /// Returns an error if the auto-goal targets do not form a valid
    /// ladder.
    pub fn into_habit(self, auto: &AutoGoals, now: DateTime<Utc>) -> Result<Habit, GoalError> {
        let goals = GoalSet::new(
            Goal::new(GoalTier::Low, auto.low, &auto.unit, true),
            Goal::new(GoalTier::Clear, auto.clear, &auto.unit, true),
            Goal::new(GoalTier::Stretch, auto.stretch, &auto.unit, true),
        )?;
        let mut habit = Habit::new(self.name, goals, now).with_icon(self.icon);
        if let Some(stage) = self.stage {
            habit.stage = stage;
        }
        habit.start_date = self.start_date;
        Ok(habit)
    }
}

/// Rank candidates in place by net energy.
///
/// Descending net energy, ties broken by ascending cost, then descending
/// return. The sort is stable, so candidates tied on every key keep their
/// input order.
pub fn rank_by_net_energy(candidates: &mut [OnboardingHabit]) {
    candidates.sort_by(|a, b| {
        b.net_energy()
            .total_cmp(&a.net_energy())
            .then_with(|| a.energy_cost.total_cmp(&b.energy_cost))
            .then_with(|| b.energy_return.total_cmp(&a.energy_return))
    });
}

/// Start date for the habit at `index` in the onboarding ranking.
///
/// The first eight habits are spaced [`INITIAL_STAGGER_DAYS`] apart; every
/// habit after that is spaced [`EXTENDED_STAGGER_DAYS`] from the previous
/// one. Index 7 therefore lands 147 days out and index 8 at 189.
pub fn staggered_start_date(base: DateTime<Utc>, index: usize) -> DateTime<Utc> {
    let index = index as i64;
    let ramp_end = INITIAL_RAMP_COUNT as i64 - 1;
    let days = if index <= ramp_end {
        index * INITIAL_STAGGER_DAYS
    } else {
        ramp_end * INITIAL_STAGGER_DAYS + (index - ramp_end) * EXTENDED_STAGGER_DAYS
    };
    base + Duration::days(days)
}

/// Rank candidates, then assign stages and staggered start dates.
///
/// Returns the candidates in rank order with `stage` and `start_date`
/// filled in. Ranks past the end of the palette all land on the final
/// stage.
pub fn sequence(
    mut candidates: Vec<OnboardingHabit>,
    base: DateTime<Utc>,
) -> Vec<OnboardingHabit> {
    rank_by_net_energy(&mut candidates);
    for (index, candidate) in candidates.iter_mut().enumerate() {
        candidate.stage = Some(Stage::for_index(index));
        candidate.start_date = Some(staggered_start_date(base, index));
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goal::FrequencyUnit;
    use chrono::TimeZone;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn candidate(name: &str, cost: f64, ret: f64) -> OnboardingHabit {
        OnboardingHabit::new(name, cost, ret)
    }

    fn names(candidates: &[OnboardingHabit]) -> Vec<&str> {
        candidates.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_net_energy() {
        assert_eq!(candidate("a", 2.0, 5.0).net_energy(), 3.0);
        assert_eq!(candidate("b", 5.0, 2.0).net_energy(), -3.0);
    }

    #[test]
    fn test_rank_descending_net_energy() {
        let mut candidates = vec![
            candidate("small", 1.0, 2.0),
            candidate("big", 1.0, 9.0),
            candidate("mid", 1.0, 5.0),
        ];
        rank_by_net_energy(&mut candidates);
        assert_eq!(names(&candidates), vec!["big", "mid", "small"]);
    }

    #[test]
    fn test_rank_tie_prefers_cheaper() {
        // equal net energy, different cost
        let mut candidates = vec![
            candidate("pricey", 4.0, 7.0),
            candidate("cheap", 1.0, 4.0),
        ];
        rank_by_net_energy(&mut candidates);
        assert_eq!(names(&candidates), vec!["cheap", "pricey"]);
    }

    #[test]
    fn test_rank_full_tie_keeps_input_order() {
        let mut candidates = vec![
            candidate("first", 2.0, 5.0),
            candidate("second", 2.0, 5.0),
            candidate("third", 2.0, 5.0),
        ];
        rank_by_net_energy(&mut candidates);
        assert_eq!(names(&candidates), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_stagger_initial_ramp() {
        assert_eq!(staggered_start_date(base(), 0), base());
        assert_eq!(staggered_start_date(base(), 1), base() + Duration::days(21));
        assert_eq!(staggered_start_date(base(), 3), base() + Duration::days(63));
        assert_eq!(staggered_start_date(base(), 7), base() + Duration::days(147));
    }

    #[test]
    fn test_stagger_extended_cadence() {
        assert_eq!(staggered_start_date(base(), 8), base() + Duration::days(189));
        assert_eq!(staggered_start_date(base(), 9), base() + Duration::days(231));
        assert_eq!(staggered_start_date(base(), 10), base() + Duration::days(273));
    }

    #[test]
    fn test_sequence_assigns_stages_and_dates() {
        let candidates = vec![
            candidate("slow", 3.0, 3.0),
            candidate("fast", 1.0, 9.0),
        ];
        let sequenced = sequence(candidates, base());
        assert_eq!(names(&sequenced), vec!["fast", "slow"]);
        assert_eq!(sequenced[0].stage, Some(Stage::Red));
        assert_eq!(sequenced[0].start_date, Some(base()));
        assert_eq!(sequenced[1].stage, Some(Stage::Orange));
        assert_eq!(sequenced[1].start_date, Some(base() + Duration::days(21)));
    }

    #[test]
    fn test_sequence_clamps_stage_past_palette() {
        let candidates: Vec<_> = (0..12)
            .map(|i| candidate(&format!("habit-{i}"), 1.0, 12.0 - i as f64))
            .collect();
        let sequenced = sequence(candidates, base());
        assert_eq!(sequenced[9].stage, Some(Stage::Violet));
        assert_eq!(sequenced[10].stage, Some(Stage::Violet));
        assert_eq!(sequenced[11].stage, Some(Stage::Violet));
    }

    #[test]
    fn test_into_habit_builds_auto_ladder() {
        let sequenced = sequence(vec![candidate("run", 2.0, 6.0).with_icon("shoe")], base());
        let habit = sequenced[0]
            .clone()
            .into_habit(&AutoGoals::default(), base())
            .unwrap();

        assert_eq!(habit.name, "run");
        assert_eq!(habit.icon, "shoe");
        assert_eq!(habit.stage, Stage::Red);
        assert_eq!(habit.start_date, Some(base()));
        assert_eq!(habit.streak, 0);
        assert!(habit.completions.is_empty());

        assert!(habit.goals.is_additive());
        assert_eq!(habit.goals.target_unit(), "units");
        assert_eq!(habit.goals.low().target, 1.0);
        assert_eq!(habit.goals.clear().target, 2.0);
        assert_eq!(habit.goals.stretch().target, 3.0);
        for goal in habit.goals.iter() {
            assert_eq!(goal.frequency_unit, FrequencyUnit::PerDay);
            assert_eq!(goal.frequency, 1.0);
        }
    }

    #[test]
    fn test_into_habit_rejects_invalid_auto_ladder() {
        let auto = AutoGoals {
            unit: "units".to_string(),
            low: 5.0,
            clear: 2.0,
            stretch: 3.0,
        };
        let result = candidate("run", 1.0, 2.0).into_habit(&auto, base());
        assert!(result.is_err());
    }
}
