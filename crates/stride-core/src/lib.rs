//! Core habit tracking engine.
//!
//! Provides the domain logic shared by every frontend:
//! - Three-tier goal ladders (low / clear / stretch) with cascade editing
//! - Cumulative progress, tier resolution, and percentage mapping
//! - Streak counting keyed to UTC calendar days
//! - Onboarding: net-energy ranking, stage assignment, staggered starts
//! - SQLite persistence and TOML configuration

pub mod error;
pub mod goal;
pub mod habit;
pub mod onboarding;
pub mod progress;
pub mod storage;

pub use error::{ConfigError, CoreError, DatabaseError, GoalError, Result};
pub use goal::{FrequencyUnit, Goal, GoalSet, GoalTier};
pub use habit::{Completion, Habit, Stage};
pub use onboarding::{
    rank_by_net_energy, sequence, staggered_start_date, AutoGoals, OnboardingHabit,
};
pub use progress::{
    clamp_percentage, marker_positions, markers_for, progress_percentage, resolve_tier,
    total_progress, MarkerPositions, TierStatus,
};
pub use storage::{Config, HabitDb};
