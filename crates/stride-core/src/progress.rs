//! Progress resolution over a habit's completion log.
//!
//! Pure functions, no storage access:
//! - cumulative progress (sum of completed units)
//! - current/next tier resolution against normalized targets
//! - display percentage on a single monotone scale
//! - marker positions for a progress bar, from raw targets
//!
//! Every percentage leaving this module is clamped to [0, 100].

use serde::{Deserialize, Serialize};

use crate::goal::{Goal, GoalTier};
use crate::habit::Habit;

/// Which tier a habit currently satisfies, and the next one up the ladder.
///
/// Exactly one tier is current. `next` is empty both when the whole ladder
/// is complete and when even the low tier has not been reached yet;
/// `completed_all` tells the two apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierStatus {
    pub current: GoalTier,
    pub next: Option<GoalTier>,
    pub completed_all: bool,
}

/// Marker positions along a progress bar, in percent of bar width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerPositions {
    pub low: f64,
    pub clear: f64,
    pub stretch: f64,
}

/// Cumulative progress: the sum of all completed units.
pub fn total_progress(habit: &Habit) -> f64 {
    habit.completions.iter().map(|c| c.completed_units).sum()
}

/// Resolve the tier the habit's cumulative progress currently satisfies.
///
/// Targets are compared in normalized (per-day) form, stretch first.
/// Additive habits compare upward, subtractive habits downward. Below the
/// low tier the current tier is reported as low with no next tier.
pub fn resolve_tier(habit: &Habit) -> TierStatus {
    let progress = total_progress(habit);
    let low = habit.goals.low().normalized_target();
    let clear = habit.goals.clear().normalized_target();
    let stretch = habit.goals.stretch().normalized_target();

    let (met_stretch, met_clear, met_low) = if habit.goals.is_additive() {
        (progress >= stretch, progress >= clear, progress >= low)
    } else {
        (progress <= stretch, progress <= clear, progress <= low)
    };

    if met_stretch {
        TierStatus {
            current: GoalTier::Stretch,
            next: None,
            completed_all: true,
        }
    } else if met_clear {
        TierStatus {
            current: GoalTier::Clear,
            next: Some(GoalTier::Stretch),
            completed_all: false,
        }
    } else if met_low {
        TierStatus {
            current: GoalTier::Low,
            next: Some(GoalTier::Clear),
            completed_all: false,
        }
    } else {
        TierStatus {
            current: GoalTier::Low,
            next: None,
            completed_all: false,
        }
    }
}

/// Display percentage for the habit's progress bar.
///
/// One scale for the whole ladder, monotone in logged units:
///
/// - additive: \[0, 33\] while approaching the clear target, \[33, 100\]
///   between clear and stretch, then saturated at 100
/// - subtractive: 100 at or under the stretch ceiling, falling linearly
///   to 0 at the low ceiling
///
/// Targets are compared in normalized form. The tier resolution order
/// guarantees every interpolation below runs with a positive denominator.
pub fn progress_percentage(habit: &Habit) -> f64 {
    let progress = total_progress(habit);
    let low = habit.goals.low().normalized_target();
    let clear = habit.goals.clear().normalized_target();
    let stretch = habit.goals.stretch().normalized_target();

    let raw = if habit.goals.is_additive() {
        if progress >= stretch {
            100.0
        } else if progress >= clear {
            // clear met, stretch not: stretch > clear on this branch
            (progress - clear) / (stretch - clear) * 67.0 + 33.0
        } else {
            progress / clear * 33.0
        }
    } else if progress <= stretch {
        100.0
    } else if progress >= low {
        0.0
    } else {
        // strictly between the stretch and low ceilings
        100.0 - (progress - stretch) / (low - stretch) * 100.0
    };

    clamp_percentage(raw)
}

/// Marker positions for the three tiers, computed from raw targets.
///
/// Markers describe the bar's geometry, not the fill: additive bars anchor
/// the clear target at 100% of the width, subtractive bars run from the
/// stretch target at 0% to the low ceiling at 100%. Raw targets are used
/// on purpose; normalization only applies to progress comparison.
///
/// Absent goals degrade instead of failing: no low goal collapses all
/// markers to zero, a missing clear sits at the fallback positions below.
pub fn marker_positions(
    low: Option<&Goal>,
    clear: Option<&Goal>,
    stretch: Option<&Goal>,
) -> MarkerPositions {
    let Some(low) = low else {
        return MarkerPositions {
            low: 0.0,
            clear: 0.0,
            stretch: 0.0,
        };
    };

    if low.is_additive {
        match clear {
            Some(clear_goal) => MarkerPositions {
                low: clamp_percentage(low.target / clear_goal.target * 100.0),
                clear: 100.0,
                stretch: if stretch.is_some() { 100.0 } else { 0.0 },
            },
            None => MarkerPositions {
                low: 100.0,
                clear: 0.0,
                stretch: 0.0,
            },
        }
    } else {
        let min = stretch.map(|g| g.target).unwrap_or(0.0);
        let span = low.target - min;
        // a degenerate span collapses onto the low anchor
        let normalize = |v: f64| {
            if span <= 0.0 {
                100.0
            } else {
                clamp_percentage((v - min) / span * 100.0)
            }
        };
        MarkerPositions {
            low: 100.0,
            clear: clear.map(|g| normalize(g.target)).unwrap_or(50.0),
            stretch: 0.0,
        }
    }
}

/// Marker positions for a habit's full ladder.
pub fn markers_for(habit: &Habit) -> MarkerPositions {
    marker_positions(
        Some(habit.goals.low()),
        Some(habit.goals.clear()),
        Some(habit.goals.stretch()),
    )
}

/// Clamp a percentage into [0, 100]. Total, including for NaN input.
pub fn clamp_percentage(value: f64) -> f64 {
    value.max(0.0).min(100.0)
}
