//! SQLite-backed habit storage.
//!
//! Stores habits, their three-tier goal ladders, and the completion log.
//! Timestamps are stored as RFC 3339 strings in UTC. Loading a habit
//! reassembles its ladder through [`GoalSet::from_goals`], so corrupted
//! goal rows surface as typed errors instead of partial habits.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{CoreError, DatabaseError, Result};
use crate::goal::{FrequencyUnit, Goal, GoalSet, GoalTier};
use crate::habit::{Completion, Habit, Stage};

use super::{data_dir, migrations};

/// SQLite database holding habits, goals, and completions.
pub struct HabitDb {
    conn: Connection,
}

/// Habit columns before goals and completions are attached.
struct HabitRow {
    id: String,
    name: String,
    icon: String,
    stage: String,
    streak: u32,
    last_completion_date: Option<String>,
    start_date: Option<String>,
    created_at: String,
    updated_at: String,
}

impl HabitDb {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `data_dir()/stride.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir().map_err(DatabaseError::Io)?.join("stride.db");
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database (used by tests).
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        migrations::migrate(&conn)?;
        Ok(Self { conn })
    }

    /// Insert a new habit along with its goals and any completions.
    ///
    /// # Errors
    /// Returns an error if the insert fails, e.g. on a duplicate id.
    pub fn insert_habit(&mut self, habit: &Habit) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO habits (id, name, icon, stage, streak, last_completion_date,
                                 start_date, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                habit.id,
                habit.name,
                habit.icon,
                habit.stage.as_str(),
                habit.streak,
                habit.last_completion_date.map(format_datetime),
                habit.start_date.map(format_datetime),
                format_datetime(habit.created_at),
                format_datetime(habit.updated_at),
            ],
        )?;
        for goal in habit.goals.iter() {
            insert_goal(&tx, &habit.id, goal)?;
        }
        for completion in &habit.completions {
            insert_completion(&tx, &habit.id, completion)?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Load a habit by id, with its goal ladder and completion log.
    ///
    /// # Errors
    /// Returns an error if stored rows cannot be parsed or the goal rows
    /// do not form a valid three-tier ladder.
    pub fn get_habit(&self, id: &str) -> Result<Option<Habit>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, icon, stage, streak, last_completion_date,
                        start_date, created_at, updated_at
                 FROM habits WHERE id = ?1",
                params![id],
                map_habit_row,
            )
            .optional()?;

        match row {
            Some(row) => Ok(Some(self.assemble(row)?)),
            None => Ok(None),
        }
    }

    /// All habits, oldest first.
    ///
    /// # Errors
    /// Returns an error if any stored habit fails to load.
    pub fn list_habits(&self) -> Result<Vec<Habit>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, icon, stage, streak, last_completion_date,
                    start_date, created_at, updated_at
             FROM habits ORDER BY created_at, id",
        )?;
        let rows = stmt
            .query_map([], map_habit_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(|row| self.assemble(row)).collect()
    }

    /// Delete a habit; goal and completion rows cascade.
    ///
    /// Returns whether a habit was actually removed.
    ///
    /// # Errors
    /// Returns an error if the delete fails.
    pub fn delete_habit(&self, id: &str) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM habits WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    /// Log units against a stored habit and persist the result.
    ///
    /// Applies the engine's logging rule to the stored habit, then writes
    /// the new completion and the streak fields in one transaction.
    ///
    /// # Errors
    /// Returns [`CoreError::HabitNotFound`] for an unknown id, or a
    /// database error if the write fails.
    pub fn log_units(&mut self, id: &str, units: f64, at: DateTime<Utc>) -> Result<Habit> {
        let habit = self
            .get_habit(id)?
            .ok_or_else(|| CoreError::HabitNotFound(id.to_string()))?;
        let updated = habit.log_units(units, at);

        let tx = self.conn.transaction()?;
        if let Some(completion) = updated.completions.last() {
            insert_completion(&tx, &updated.id, completion)?;
        }
        tx.execute(
            "UPDATE habits SET streak = ?2, last_completion_date = ?3, updated_at = ?4
             WHERE id = ?1",
            params![
                updated.id,
                updated.streak,
                updated.last_completion_date.map(format_datetime),
                format_datetime(updated.updated_at),
            ],
        )?;
        tx.commit()?;
        Ok(updated)
    }

    /// Persist a habit's goal ladder after an edit, replacing all three
    /// rows in one transaction.
    ///
    /// # Errors
    /// Returns [`CoreError::HabitNotFound`] for an unknown id, or a
    /// database error if the write fails.
    pub fn update_goals(&mut self, id: &str, goals: &GoalSet, now: DateTime<Utc>) -> Result<()> {
        let tx = self.conn.transaction()?;
        let touched = tx.execute(
            "UPDATE habits SET updated_at = ?2 WHERE id = ?1",
            params![id, format_datetime(now)],
        )?;
        if touched == 0 {
            return Err(CoreError::HabitNotFound(id.to_string()));
        }
        tx.execute("DELETE FROM goals WHERE habit_id = ?1", params![id])?;
        for goal in goals.iter() {
            insert_goal(&tx, id, goal)?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Lifetime completed units for a habit.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn total_units(&self, id: &str) -> Result<f64> {
        let total = self.conn.query_row(
            "SELECT COALESCE(SUM(completed_units), 0) FROM completions WHERE habit_id = ?1",
            params![id],
            |row| row.get::<_, f64>(0),
        )?;
        Ok(total)
    }

    fn assemble(&self, row: HabitRow) -> Result<Habit> {
        let stage = parse_field::<Stage>("stage", &row.stage)?;
        let goals = self.load_goals(&row.id)?;
        let completions = self.load_completions(&row.id)?;
        Ok(Habit {
            last_completion_date: parse_optional_datetime(
                "last_completion_date",
                row.last_completion_date.as_deref(),
            )?,
            start_date: parse_optional_datetime("start_date", row.start_date.as_deref())?,
            created_at: parse_datetime("created_at", &row.created_at)?,
            updated_at: parse_datetime("updated_at", &row.updated_at)?,
            id: row.id,
            name: row.name,
            icon: row.icon,
            goals,
            completions,
            streak: row.streak,
            stage,
        })
    }

    fn load_goals(&self, habit_id: &str) -> Result<GoalSet> {
        let mut stmt = self.conn.prepare(
            "SELECT tier, target, target_unit, frequency, frequency_unit, is_additive
             FROM goals WHERE habit_id = ?1",
        )?;
        let rows = stmt.query_map(params![habit_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, f64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, f64>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, bool>(5)?,
            ))
        })?;

        let mut goals = Vec::new();
        for row in rows {
            let (tier, target, target_unit, frequency, frequency_unit, is_additive) = row?;
            goals.push(Goal {
                tier: parse_field::<GoalTier>("tier", &tier)?,
                target,
                target_unit,
                frequency,
                frequency_unit: parse_field::<FrequencyUnit>("frequency_unit", &frequency_unit)?,
                is_additive,
            });
        }
        Ok(GoalSet::from_goals(goals)?)
    }

    fn load_completions(&self, habit_id: &str) -> Result<Vec<Completion>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, completed_units, logged_at FROM completions
             WHERE habit_id = ?1 ORDER BY logged_at, id",
        )?;
        let rows = stmt.query_map(params![habit_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, f64>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut completions = Vec::new();
        for row in rows {
            let (id, completed_units, logged_at) = row?;
            completions.push(Completion {
                id,
                completed_units,
                timestamp: parse_datetime("logged_at", &logged_at)?,
            });
        }
        Ok(completions)
    }
}

fn map_habit_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<HabitRow> {
    Ok(HabitRow {
        id: row.get(0)?,
        name: row.get(1)?,
        icon: row.get(2)?,
        stage: row.get(3)?,
        streak: row.get(4)?,
        last_completion_date: row.get(5)?,
        start_date: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

fn insert_goal(conn: &Connection, habit_id: &str, goal: &Goal) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO goals (habit_id, tier, target, target_unit, frequency,
                            frequency_unit, is_additive)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            habit_id,
            goal.tier.as_str(),
            goal.target,
            goal.target_unit,
            goal.frequency,
            goal.frequency_unit.as_str(),
            goal.is_additive,
        ],
    )?;
    Ok(())
}

fn insert_completion(
    conn: &Connection,
    habit_id: &str,
    completion: &Completion,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO completions (id, habit_id, completed_units, logged_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            completion.id,
            habit_id,
            completion.completed_units,
            format_datetime(completion.timestamp),
        ],
    )?;
    Ok(())
}

fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn parse_datetime(column: &str, value: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| DatabaseError::InvalidTimestamp {
            column: column.to_string(),
            value: value.to_string(),
        })
}

fn parse_optional_datetime(
    column: &str,
    value: Option<&str>,
) -> Result<Option<DateTime<Utc>>, DatabaseError> {
    value.map(|v| parse_datetime(column, v)).transpose()
}

fn parse_field<T: std::str::FromStr>(field: &str, value: &str) -> Result<T, DatabaseError> {
    value.parse::<T>().map_err(|_| DatabaseError::InvalidField {
        field: field.to_string(),
        value: value.to_string(),
    })
}
