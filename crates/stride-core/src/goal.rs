//! Three-tier goal ladders.
//!
//! Every habit carries exactly three goals:
//! - **low**: the floor commitment
//! - **clear**: the standard commitment
//! - **stretch**: the ambition
//!
//! All three share a direction and a target unit. Additive habits
//! ("do more") order their targets low <= clear <= stretch; subtractive
//! habits ("do less") order them low >= clear >= stretch. The ordering is
//! validated at construction and re-enforced by a cascading clamp whenever
//! a single tier is edited: the edited value is kept and the sibling tiers
//! are clamped until the ladder is consistent again.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GoalError;

/// Tier within a habit's three-tier goal ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalTier {
    Low,
    Clear,
    Stretch,
}

impl GoalTier {
    /// All tiers, floor to ambition.
    pub const ALL: [GoalTier; 3] = [GoalTier::Low, GoalTier::Clear, GoalTier::Stretch];

    /// Stable string form used in storage and CLI output.
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalTier::Low => "low",
            GoalTier::Clear => "clear",
            GoalTier::Stretch => "stretch",
        }
    }
}

impl fmt::Display for GoalTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(GoalTier::Low),
            "clear" => Ok(GoalTier::Clear),
            "stretch" => Ok(GoalTier::Stretch),
            other => Err(format!("unknown goal tier: {other}")),
        }
    }
}

/// Period over which a goal's target is intended to be met.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyUnit {
    PerDay,
    PerWeek,
    PerMonth,
    PerSession,
}

impl FrequencyUnit {
    /// Stable string form used in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            FrequencyUnit::PerDay => "per_day",
            FrequencyUnit::PerWeek => "per_week",
            FrequencyUnit::PerMonth => "per_month",
            FrequencyUnit::PerSession => "per_session",
        }
    }
}

impl fmt::Display for FrequencyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FrequencyUnit {
    type Err = String;

    /// Accepts both the stored form (`per_day`) and the bare period (`day`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "per_day" | "day" => Ok(FrequencyUnit::PerDay),
            "per_week" | "week" => Ok(FrequencyUnit::PerWeek),
            "per_month" | "month" => Ok(FrequencyUnit::PerMonth),
            "per_session" | "session" => Ok(FrequencyUnit::PerSession),
            other => Err(format!("unknown frequency unit: {other}")),
        }
    }
}

/// A single tier target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub tier: GoalTier,
    /// Raw target in `target_unit`s. Finite and strictly positive.
    pub target: f64,
    /// Unit the target is counted in, e.g. "units", "pages", "minutes".
    pub target_unit: String,
    /// How many times per `frequency_unit` the habit is intended.
    pub frequency: f64,
    pub frequency_unit: FrequencyUnit,
    /// True for "do more" habits, false for "do less".
    pub is_additive: bool,
}

impl Goal {
    /// Create a goal intended once per day (the common case).
    pub fn new(
        tier: GoalTier,
        target: f64,
        target_unit: impl Into<String>,
        is_additive: bool,
    ) -> Self {
        Self {
            tier,
            target,
            target_unit: target_unit.into(),
            frequency: 1.0,
            frequency_unit: FrequencyUnit::PerDay,
            is_additive,
        }
    }

    /// Override the intended frequency.
    pub fn with_frequency(mut self, frequency: f64, unit: FrequencyUnit) -> Self {
        self.frequency = frequency;
        self.frequency_unit = unit;
        self
    }

    /// Target normalized to a per-day quantity.
    ///
    /// Weekly targets are spread over 7 days and monthly targets over 30,
    /// scaled by the intended frequency. Per-day and per-session targets
    /// pass through unchanged.
    pub fn normalized_target(&self) -> f64 {
        match self.frequency_unit {
            FrequencyUnit::PerWeek => self.target / 7.0 * self.frequency,
            FrequencyUnit::PerMonth => self.target / 30.0 * self.frequency,
            FrequencyUnit::PerDay | FrequencyUnit::PerSession => self.target,
        }
    }

    fn validate(&self) -> Result<(), GoalError> {
        if !self.target.is_finite() || self.target <= 0.0 {
            return Err(GoalError::NonPositiveTarget {
                tier: self.tier,
                target: self.target,
            });
        }
        if !self.frequency.is_finite() || self.frequency <= 0.0 {
            return Err(GoalError::NonPositiveFrequency { tier: self.tier });
        }
        Ok(())
    }
}

/// The complete three-tier ladder for one habit.
///
/// Construction validates every ladder invariant; edits go through
/// [`GoalSet::set_target`] and [`GoalSet::set_unit`] so the invariants
/// keep holding afterwards. Edits are never rejected for ordering
/// conflicts: the edited value wins and the siblings are clamped.
/// Deserializing routes through [`GoalSet::new`], so a stored or wire
/// ladder cannot skip validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGoalSet")]
pub struct GoalSet {
    low: Goal,
    clear: Goal,
    stretch: Goal,
}

/// Unvalidated ladder shape accepted while deserializing a [`GoalSet`].
#[derive(Deserialize)]
struct RawGoalSet {
    low: Goal,
    clear: Goal,
    stretch: Goal,
}

impl TryFrom<RawGoalSet> for GoalSet {
    type Error = GoalError;

    fn try_from(raw: RawGoalSet) -> Result<Self, GoalError> {
        GoalSet::new(raw.low, raw.clear, raw.stretch)
    }
}

impl GoalSet {
    /// Build a ladder from the three tier goals.
    ///
    /// # Errors
    /// Returns an error if a goal sits in the wrong slot, a target or
    /// frequency is not strictly positive, the goals disagree on direction
    /// or unit, or the targets are not ordered for the direction.
    pub fn new(low: Goal, clear: Goal, stretch: Goal) -> Result<Self, GoalError> {
        let slots = [
            (&low, GoalTier::Low),
            (&clear, GoalTier::Clear),
            (&stretch, GoalTier::Stretch),
        ];
        for (goal, expected) in slots {
            if goal.tier != expected {
                return Err(GoalError::TierMismatch {
                    expected,
                    found: goal.tier,
                });
            }
            goal.validate()?;
        }
        if low.is_additive != clear.is_additive || clear.is_additive != stretch.is_additive {
            return Err(GoalError::MixedPolarity);
        }
        if low.target_unit != clear.target_unit || clear.target_unit != stretch.target_unit {
            return Err(GoalError::UnitMismatch);
        }

        let set = Self { low, clear, stretch };
        if !set.is_ordered() {
            return Err(GoalError::UnorderedTargets);
        }
        Ok(set)
    }

    /// Assemble a ladder from loose goals, e.g. rows loaded from storage.
    ///
    /// # Errors
    /// Returns [`GoalError::MissingTier`] or [`GoalError::DuplicateTier`]
    /// when the goals do not cover each tier exactly once, plus everything
    /// [`GoalSet::new`] rejects.
    pub fn from_goals(goals: Vec<Goal>) -> Result<Self, GoalError> {
        let mut low = None;
        let mut clear = None;
        let mut stretch = None;
        for goal in goals {
            let slot = match goal.tier {
                GoalTier::Low => &mut low,
                GoalTier::Clear => &mut clear,
                GoalTier::Stretch => &mut stretch,
            };
            if slot.is_some() {
                return Err(GoalError::DuplicateTier(goal.tier));
            }
            *slot = Some(goal);
        }
        let low = low.ok_or(GoalError::MissingTier(GoalTier::Low))?;
        let clear = clear.ok_or(GoalError::MissingTier(GoalTier::Clear))?;
        let stretch = stretch.ok_or(GoalError::MissingTier(GoalTier::Stretch))?;
        Self::new(low, clear, stretch)
    }

    pub fn get(&self, tier: GoalTier) -> &Goal {
        match tier {
            GoalTier::Low => &self.low,
            GoalTier::Clear => &self.clear,
            GoalTier::Stretch => &self.stretch,
        }
    }

    pub fn low(&self) -> &Goal {
        &self.low
    }

    pub fn clear(&self) -> &Goal {
        &self.clear
    }

    pub fn stretch(&self) -> &Goal {
        &self.stretch
    }

    /// Direction shared by all three tiers.
    pub fn is_additive(&self) -> bool {
        self.low.is_additive
    }

    /// Unit shared by all three tiers.
    pub fn target_unit(&self) -> &str {
        &self.low.target_unit
    }

    /// Iterate the goals in tier order.
    pub fn iter(&self) -> impl Iterator<Item = &Goal> {
        [&self.low, &self.clear, &self.stretch].into_iter()
    }

    fn is_ordered(&self) -> bool {
        if self.is_additive() {
            self.low.target <= self.clear.target && self.clear.target <= self.stretch.target
        } else {
            self.low.target >= self.clear.target && self.clear.target >= self.stretch.target
        }
    }

    /// Set one tier's target, then clamp the sibling tiers until the
    /// ordering invariant holds again. The edited value is always kept.
    ///
    /// # Errors
    /// Returns an error if the new target is not finite and strictly
    /// positive.
    pub fn set_target(&mut self, tier: GoalTier, target: f64) -> Result<(), GoalError> {
        if !target.is_finite() || target <= 0.0 {
            return Err(GoalError::NonPositiveTarget { tier, target });
        }
        self.get_mut(tier).target = target;
        self.cascade_from(tier);
        Ok(())
    }

    /// Change the unit for the whole ladder. Units are shared, so the edit
    /// propagates to all three tiers.
    pub fn set_unit(&mut self, unit: impl Into<String>) {
        let unit = unit.into();
        self.low.target_unit = unit.clone();
        self.clear.target_unit = unit.clone();
        self.stretch.target_unit = unit;
    }

    fn get_mut(&mut self, tier: GoalTier) -> &mut Goal {
        match tier {
            GoalTier::Low => &mut self.low,
            GoalTier::Clear => &mut self.clear,
            GoalTier::Stretch => &mut self.stretch,
        }
    }

    // Clamp siblings outward from the edited tier. For additive ladders a
    // raised clear pushes stretch up and pulls low down; subtractive
    // ladders mirror the comparisons.
    fn cascade_from(&mut self, tier: GoalTier) {
        if self.is_additive() {
            match tier {
                GoalTier::Low => {
                    if self.clear.target < self.low.target {
                        self.clear.target = self.low.target;
                    }
                    if self.stretch.target < self.clear.target {
                        self.stretch.target = self.clear.target;
                    }
                }
                GoalTier::Clear => {
                    if self.low.target > self.clear.target {
                        self.low.target = self.clear.target;
                    }
                    if self.stretch.target < self.clear.target {
                        self.stretch.target = self.clear.target;
                    }
                }
                GoalTier::Stretch => {
                    if self.clear.target > self.stretch.target {
                        self.clear.target = self.stretch.target;
                    }
                    if self.low.target > self.clear.target {
                        self.low.target = self.clear.target;
                    }
                }
            }
        } else {
            match tier {
                GoalTier::Low => {
                    if self.clear.target > self.low.target {
                        self.clear.target = self.low.target;
                    }
                    if self.stretch.target > self.clear.target {
                        self.stretch.target = self.clear.target;
                    }
                }
                GoalTier::Clear => {
                    if self.low.target < self.clear.target {
                        self.low.target = self.clear.target;
                    }
                    if self.stretch.target > self.clear.target {
                        self.stretch.target = self.clear.target;
                    }
                }
                GoalTier::Stretch => {
                    if self.clear.target < self.stretch.target {
                        self.clear.target = self.stretch.target;
                    }
                    if self.low.target < self.clear.target {
                        self.low.target = self.clear.target;
                    }
                }
            }
        }
    }
}
