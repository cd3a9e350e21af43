//! Integration tests for the progress engine.
//!
//! Walks full habits through the goal ladder via the public API and checks
//! the tier, percentage, and marker functions agree with each other.

use chrono::{DateTime, Duration, TimeZone, Utc};
use stride_core::{
    clamp_percentage, markers_for, progress_percentage, resolve_tier, total_progress,
    FrequencyUnit, Goal, GoalSet, GoalTier, Habit,
};

fn ladder(low: f64, clear: f64, stretch: f64, additive: bool) -> GoalSet {
    GoalSet::new(
        Goal::new(GoalTier::Low, low, "units", additive),
        Goal::new(GoalTier::Clear, clear, "units", additive),
        Goal::new(GoalTier::Stretch, stretch, "units", additive),
    )
    .unwrap()
}

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
}

#[test]
fn test_additive_habit_walks_up_the_ladder() {
    let habit = Habit::new("Read", ladder(2.0, 4.0, 6.0, true), start());

    // Nothing logged: below low, no next tier to aim at yet
    assert_eq!(total_progress(&habit), 0.0);
    let status = resolve_tier(&habit);
    assert_eq!(status.current, GoalTier::Low);
    assert_eq!(status.next, None);
    assert!(!status.completed_all);
    assert_eq!(progress_percentage(&habit), 0.0);

    // Day 1: two units reaches the low tier
    let habit = habit.log_units(2.0, start());
    let status = resolve_tier(&habit);
    assert_eq!(status.current, GoalTier::Low);
    assert_eq!(status.next, Some(GoalTier::Clear));
    assert_eq!(habit.streak, 1);

    // Day 2: two more units reaches clear, percentage lands on 33
    let habit = habit.log_units(2.0, start() + Duration::days(1));
    let status = resolve_tier(&habit);
    assert_eq!(status.current, GoalTier::Clear);
    assert_eq!(status.next, Some(GoalTier::Stretch));
    assert!((progress_percentage(&habit) - 33.0).abs() < 1e-9);
    assert_eq!(habit.streak, 2);

    // Day 3: stretch reached, ladder complete
    let habit = habit.log_units(2.0, start() + Duration::days(2));
    let status = resolve_tier(&habit);
    assert_eq!(status.current, GoalTier::Stretch);
    assert_eq!(status.next, None);
    assert!(status.completed_all);
    assert_eq!(progress_percentage(&habit), 100.0);
    assert_eq!(habit.streak, 3);

    // Overshooting stays saturated
    let habit = habit.log_units(5.0, start() + Duration::days(3));
    assert_eq!(progress_percentage(&habit), 100.0);
    assert!(resolve_tier(&habit).completed_all);
}

#[test]
fn test_subtractive_habit_rises_as_usage_falls() {
    // "Cups of coffee": at most 10, aim for 5, ideally 2
    let habit = Habit::new("Coffee", ladder(10.0, 5.0, 2.0, false), start());

    // An empty log counts as zero units consumed, under the stretch ceiling
    let status = resolve_tier(&habit);
    assert_eq!(status.current, GoalTier::Stretch);
    assert!(status.completed_all);
    assert_eq!(progress_percentage(&habit), 100.0);

    // Six cups lands between clear and low: halfway down the bar
    let habit = habit.log_units(6.0, start());
    let status = resolve_tier(&habit);
    assert_eq!(status.current, GoalTier::Low);
    assert_eq!(status.next, Some(GoalTier::Clear));
    assert!((progress_percentage(&habit) - 50.0).abs() < 1e-9);

    // Blowing past the low ceiling bottoms out at zero
    let habit = habit.log_units(7.0, start() + Duration::hours(2));
    let status = resolve_tier(&habit);
    assert_eq!(status.current, GoalTier::Low);
    assert_eq!(status.next, None);
    assert_eq!(progress_percentage(&habit), 0.0);
}

#[test]
fn test_weekly_targets_normalize_before_comparison() {
    // 14 per week low and 28 per week clear normalize to 2 and 4 per day
    let goals = GoalSet::new(
        Goal::new(GoalTier::Low, 14.0, "pages", true).with_frequency(1.0, FrequencyUnit::PerWeek),
        Goal::new(GoalTier::Clear, 28.0, "pages", true).with_frequency(1.0, FrequencyUnit::PerWeek),
        Goal::new(GoalTier::Stretch, 42.0, "pages", true)
            .with_frequency(1.0, FrequencyUnit::PerWeek),
    )
    .unwrap();
    let habit = Habit::new("Read", goals, start()).log_units(4.0, start());

    let status = resolve_tier(&habit);
    assert_eq!(status.current, GoalTier::Clear);
    assert_eq!(status.next, Some(GoalTier::Stretch));
    assert!((progress_percentage(&habit) - 33.0).abs() < 1e-9);
}

#[test]
fn test_goal_edit_reshapes_progress() {
    let mut habit = Habit::new("Pushups", ladder(5.0, 10.0, 20.0, true), start());
    habit = habit.log_units(10.0, start());
    assert_eq!(resolve_tier(&habit).current, GoalTier::Clear);

    // Raising the clear target above current progress drops the tier back;
    // the cascade pushes stretch up with it
    habit.goals.set_target(GoalTier::Clear, 25.0).unwrap();
    assert_eq!(habit.goals.stretch().target, 25.0);
    let status = resolve_tier(&habit);
    assert_eq!(status.current, GoalTier::Low);
    assert_eq!(status.next, Some(GoalTier::Clear));
}

#[test]
fn test_markers_and_percentage_share_saturation_point() {
    let habit = Habit::new("Read", ladder(2.0, 4.0, 6.0, true), start());
    let markers = markers_for(&habit);
    assert!((markers.low - 50.0).abs() < 1e-9);
    assert_eq!(markers.clear, 100.0);
    assert_eq!(markers.stretch, 100.0);

    // markers are raw-target geometry; a weekly ladder keeps the same shape
    let weekly = GoalSet::new(
        Goal::new(GoalTier::Low, 2.0, "units", true).with_frequency(1.0, FrequencyUnit::PerWeek),
        Goal::new(GoalTier::Clear, 4.0, "units", true).with_frequency(1.0, FrequencyUnit::PerWeek),
        Goal::new(GoalTier::Stretch, 6.0, "units", true)
            .with_frequency(1.0, FrequencyUnit::PerWeek),
    )
    .unwrap();
    let weekly_habit = Habit::new("Read", weekly, start());
    let weekly_markers = markers_for(&weekly_habit);
    assert!((weekly_markers.low - markers.low).abs() < 1e-9);
    assert_eq!(weekly_markers.clear, markers.clear);
}

#[test]
fn test_subtractive_markers_match_pinned_shape() {
    let habit = Habit::new("Coffee", ladder(10.0, 5.0, 2.0, false), start());
    let markers = markers_for(&habit);
    assert_eq!(markers.low, 100.0);
    assert_eq!(markers.stretch, 0.0);
    // clear ceiling of 5 sits at (5-2)/(10-2) = 37.5% of the span
    assert!((markers.clear - 37.5).abs() < 1e-9);
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    fn logged(goals: GoalSet, units: &[f64]) -> Habit {
        units
            .iter()
            .enumerate()
            .fold(Habit::new("P", goals, start()), |h, (i, &u)| {
                h.log_units(u, start() + Duration::hours(i as i64))
            })
    }

    proptest! {
        #[test]
        fn clamp_stays_within_bounds(v in -1e6f64..1e6) {
            let clamped = clamp_percentage(v);
            prop_assert!((0.0..=100.0).contains(&clamped));
            if (0.0..=100.0).contains(&v) {
                prop_assert_eq!(clamped, v);
            }
        }

        #[test]
        fn percentage_stays_within_bounds(
            low in 0.1f64..50.0,
            clear_gap in 0.0f64..50.0,
            stretch_gap in 0.0f64..50.0,
            additive in any::<bool>(),
            units in proptest::collection::vec(0.0f64..200.0, 0..6),
        ) {
            let goals = if additive {
                ladder(low, low + clear_gap, low + clear_gap + stretch_gap, true)
            } else {
                ladder(low + clear_gap + stretch_gap, low + clear_gap, low, false)
            };
            let habit = logged(goals, &units);
            let pct = progress_percentage(&habit);
            prop_assert!((0.0..=100.0).contains(&pct), "out of range: {pct}");
        }

        #[test]
        fn percentage_monotone_for_additive(
            a in 0.0f64..20.0,
            b in 0.0f64..20.0,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let first = logged(ladder(2.0, 4.0, 6.0, true), &[lo]);
            let second = logged(ladder(2.0, 4.0, 6.0, true), &[hi]);
            prop_assert!(
                progress_percentage(&first) <= progress_percentage(&second) + 1e-9
            );
        }

        #[test]
        fn tier_resolution_is_deterministic(
            units in proptest::collection::vec(0.0f64..50.0, 0..6),
        ) {
            let habit = logged(ladder(2.0, 4.0, 6.0, true), &units);
            prop_assert_eq!(resolve_tier(&habit), resolve_tier(&habit));
        }
    }
}
