//! Integration tests for the SQLite habit store.
//!
//! Everything here runs against in-memory databases. Tests that touch
//! process environment belong in `data_dir_integration.rs`, which owns
//! the env for its whole binary.

use chrono::{DateTime, Duration, TimeZone, Utc};
use stride_core::{
    CoreError, Goal, GoalSet, GoalTier, Habit, HabitDb, Stage,
};

fn ladder(low: f64, clear: f64, stretch: f64) -> GoalSet {
    GoalSet::new(
        Goal::new(GoalTier::Low, low, "pages", true),
        Goal::new(GoalTier::Clear, clear, "pages", true),
        Goal::new(GoalTier::Stretch, stretch, "pages", true),
    )
    .unwrap()
}

fn created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
}

#[test]
fn test_habit_lifecycle_roundtrip() {
    let mut db = HabitDb::open_memory().unwrap();

    let habit = Habit::new("Read", ladder(2.0, 4.0, 6.0), created_at())
        .with_icon("📚")
        .with_stage(Stage::Teal)
        .with_start_date(created_at() + Duration::days(21));
    db.insert_habit(&habit).unwrap();

    // Stored and loaded habits are equal field for field
    let loaded = db.get_habit(&habit.id).unwrap().unwrap();
    assert_eq!(loaded, habit);

    // Log across three days; streak and totals persist
    db.log_units(&habit.id, 2.0, created_at()).unwrap();
    db.log_units(&habit.id, 1.5, created_at() + Duration::days(1))
        .unwrap();
    let updated = db
        .log_units(&habit.id, 0.5, created_at() + Duration::days(1) + Duration::hours(3))
        .unwrap();

    assert_eq!(updated.streak, 2);
    assert_eq!(updated.completions.len(), 3);
    assert_eq!(db.total_units(&habit.id).unwrap(), 4.0);

    let reloaded = db.get_habit(&habit.id).unwrap().unwrap();
    assert_eq!(reloaded, updated);

    // Goal edits persist with the cascade applied
    let mut goals = reloaded.goals.clone();
    goals.set_target(GoalTier::Low, 5.0).unwrap();
    db.update_goals(&habit.id, &goals, created_at() + Duration::days(2))
        .unwrap();
    let after_edit = db.get_habit(&habit.id).unwrap().unwrap();
    assert_eq!(after_edit.goals.low().target, 5.0);
    assert_eq!(after_edit.goals.clear().target, 5.0);
    assert_eq!(after_edit.goals.stretch().target, 6.0);

    // Delete removes the habit and everything hanging off it
    assert!(db.delete_habit(&habit.id).unwrap());
    assert!(db.get_habit(&habit.id).unwrap().is_none());
    assert!(!db.delete_habit(&habit.id).unwrap());
}

#[test]
fn test_subsecond_timestamps_survive_storage() {
    let mut db = HabitDb::open_memory().unwrap();
    let habit = Habit::new("Read", ladder(2.0, 4.0, 6.0), created_at());
    db.insert_habit(&habit).unwrap();

    let at = created_at() + Duration::milliseconds(123);
    let updated = db.log_units(&habit.id, 1.0, at).unwrap();
    assert_eq!(updated.completions[0].timestamp, at);

    let reloaded = db.get_habit(&habit.id).unwrap().unwrap();
    assert_eq!(reloaded.completions[0].timestamp, at);
    assert_eq!(reloaded.last_completion_date, Some(at));
}

#[test]
fn test_list_orders_by_creation() {
    let mut db = HabitDb::open_memory().unwrap();
    for (i, name) in ["first", "second", "third"].iter().enumerate() {
        let habit = Habit::new(
            *name,
            ladder(2.0, 4.0, 6.0),
            created_at() + Duration::minutes(i as i64),
        );
        db.insert_habit(&habit).unwrap();
    }

    let names: Vec<String> = db
        .list_habits()
        .unwrap()
        .into_iter()
        .map(|h| h.name)
        .collect();
    assert_eq!(names, ["first", "second", "third"]);
}

#[test]
fn test_unknown_habit_is_a_typed_error() {
    let mut db = HabitDb::open_memory().unwrap();

    let result = db.log_units("missing", 1.0, created_at());
    assert!(matches!(result, Err(CoreError::HabitNotFound(_))));

    let result = db.update_goals("missing", &ladder(2.0, 4.0, 6.0), created_at());
    assert!(matches!(result, Err(CoreError::HabitNotFound(_))));

    assert!(db.get_habit("missing").unwrap().is_none());
}
