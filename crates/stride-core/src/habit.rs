//! Habit records and the completion log.
//!
//! A habit owns a three-tier [`GoalSet`], an append-only completion log,
//! a calendar-day streak, and a cosmetic stage. Logging units returns an
//! updated copy; callers decide what to persist.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::goal::GoalSet;

/// Cosmetic stage palette, in onboarding order.
///
/// Onboarding assigns stages by rank; ranks past the end of the palette
/// clamp to the last stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Red,
    Orange,
    Amber,
    Yellow,
    Lime,
    Green,
    Teal,
    Blue,
    Indigo,
    Violet,
}

impl Stage {
    /// The full palette in assignment order.
    pub const ORDER: [Stage; 10] = [
        Stage::Red,
        Stage::Orange,
        Stage::Amber,
        Stage::Yellow,
        Stage::Lime,
        Stage::Green,
        Stage::Teal,
        Stage::Blue,
        Stage::Indigo,
        Stage::Violet,
    ];

    /// Stage for a rank index, clamped to the final stage.
    pub fn for_index(index: usize) -> Stage {
        Stage::ORDER[index.min(Stage::ORDER.len() - 1)]
    }

    /// Stable string form used in storage and CLI output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Red => "red",
            Stage::Orange => "orange",
            Stage::Amber => "amber",
            Stage::Yellow => "yellow",
            Stage::Lime => "lime",
            Stage::Green => "green",
            Stage::Teal => "teal",
            Stage::Blue => "blue",
            Stage::Indigo => "indigo",
            Stage::Violet => "violet",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ORDER
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| format!("unknown stage: {s}"))
    }
}

/// One logged completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    pub id: String,
    pub completed_units: f64,
    pub timestamp: DateTime<Utc>,
}

impl Completion {
    pub fn new(completed_units: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            completed_units,
            timestamp,
        }
    }
}

/// A tracked habit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    pub goals: GoalSet,
    #[serde(default)]
    pub completions: Vec<Completion>,
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub last_completion_date: Option<DateTime<Utc>>,
    pub stage: Stage,
    /// Assigned by onboarding staggering; manual habits may leave it unset.
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Habit {
    /// Create a habit with a fresh id and an empty completion log.
    pub fn new(name: impl Into<String>, goals: GoalSet, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            icon: String::new(),
            goals,
            completions: Vec::new(),
            streak: 0,
            last_completion_date: None,
            stage: Stage::Red,
            start_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stage = stage;
        self
    }

    pub fn with_start_date(mut self, start_date: DateTime<Utc>) -> Self {
        self.start_date = Some(start_date);
        self
    }

    /// Log completed units at an explicit time, returning the updated habit.
    ///
    /// The streak grows by one the first time units are logged on a given
    /// UTC calendar day; further logs on the same day leave it unchanged.
    /// Skipped days never reset it.
    pub fn log_units(&self, units: f64, at: DateTime<Utc>) -> Habit {
        let mut updated = self.clone();
        let same_day = updated
            .last_completion_date
            .map(|last| last.date_naive() == at.date_naive())
            .unwrap_or(false);
        if !same_day {
            updated.streak += 1;
        }
        updated.completions.push(Completion::new(units, at));
        updated.last_completion_date = Some(at);
        updated.updated_at = at;
        updated
    }

    /// Log completed units at the current time.
    pub fn log_units_now(&self, units: f64) -> Habit {
        self.log_units(units, Utc::now())
    }
}
