// ABOUTME: SQLite-backed document store for workouts, exercises, and sets
// ABOUTME: Flat rows per entity, foreign keys as indexed columns, timestamps as RFC 3339 text
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::DocumentStore;
use crate::errors::{AppError, AppResult};
use crate::models::{start_of_day, Exercise, Measure, Set, Workout};

/// SQLite implementation of the document store.
///
/// Each entity is one flat row; the child projections on [`Workout`] and
/// [`Exercise`] have no columns here. Timestamps are stored as RFC 3339 text
/// in UTC, which makes string comparison agree with chronological order for
/// the `*_after` queries.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect to the database and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or migrations fail
    pub async fn new(database_url: &str) -> AppResult<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:") {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_owned()
        };

        let pool = SqlitePool::connect(&connection_options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Wrap an existing pool, without running migrations
    #[must_use]
    pub const fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the three collection tables and their indexes
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS workouts (
                id TEXT PRIMARY KEY,
                timestamp TEXT NOT NULL,
                start_of_day TEXT NOT NULL,
                emphasis TEXT NOT NULL DEFAULT '',
                notes TEXT NOT NULL DEFAULT ''
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create workouts table: {e}")))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_workouts_timestamp ON workouts(timestamp)")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to index workouts: {e}")))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS exercises (
                id TEXT PRIMARY KEY,
                workout_id TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                "order" INTEGER NOT NULL DEFAULT 0,
                name TEXT NOT NULL DEFAULT '',
                measure_type TEXT NOT NULL,
                measure_unit TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create exercises table: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_exercises_workout_id ON exercises(workout_id)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to index exercises: {e}")))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_exercises_timestamp ON exercises(timestamp)")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to index exercises: {e}")))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sets (
                id TEXT PRIMARY KEY,
                exercise_id TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                "order" INTEGER NOT NULL DEFAULT 0,
                reps INTEGER NOT NULL DEFAULT 0,
                "of" REAL NOT NULL DEFAULT 0
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create sets table: {e}")))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_sets_exercise_id ON sets(exercise_id)")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to index sets: {e}")))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_sets_timestamp ON sets(timestamp)")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to index sets: {e}")))?;

        Ok(())
    }

    fn row_to_workout(row: &SqliteRow) -> AppResult<Workout> {
        let timestamp = parse_timestamp(&row.get::<String, _>("timestamp"))?;
        Ok(Workout {
            id: parse_uuid(&row.get::<String, _>("id"))?,
            timestamp,
            // Recomputed rather than trusted; the stored copy only exists so
            // day-grouped queries can run inside SQL.
            start_of_day: start_of_day(timestamp),
            exercises: Vec::new(),
            emphasis: row.get("emphasis"),
            notes: row.get("notes"),
        })
    }

    fn row_to_exercise(row: &SqliteRow) -> AppResult<Exercise> {
        let unit_type = row.get::<String, _>("measure_type").parse()?;
        let unit = row
            .get::<Option<String>, _>("measure_unit")
            .map(|u| u.parse())
            .transpose()?;
        Ok(Exercise {
            id: parse_uuid(&row.get::<String, _>("id"))?,
            workout_id: parse_uuid(&row.get::<String, _>("workout_id"))?,
            timestamp: parse_timestamp(&row.get::<String, _>("timestamp"))?,
            order: row.get("order"),
            name: row.get("name"),
            sets: Vec::new(),
            measure: Measure { unit_type, unit },
        })
    }

    fn row_to_set(row: &SqliteRow) -> AppResult<Set> {
        Ok(Set {
            id: parse_uuid(&row.get::<String, _>("id"))?,
            exercise_id: parse_uuid(&row.get::<String, _>("exercise_id"))?,
            timestamp: parse_timestamp(&row.get::<String, _>("timestamp"))?,
            order: row.get("order"),
            reps: row.get("reps"),
            of: row.get("of"),
        })
    }
}

fn parse_uuid(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw)
        .map_err(|e| AppError::serialization(format!("Invalid stored UUID {raw}: {e}")))
}

fn parse_timestamp(raw: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::serialization(format!("Invalid stored timestamp {raw}: {e}")))
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn get_workout(&self, id: Uuid) -> AppResult<Option<Workout>> {
        let row = sqlx::query(
            "SELECT id, timestamp, start_of_day, emphasis, notes FROM workouts WHERE id = $1",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get workout: {e}")))?;

        row.map(|r| Self::row_to_workout(&r)).transpose()
    }

    async fn workout_exists(&self, id: Uuid) -> AppResult<bool> {
        let row = sqlx::query("SELECT 1 FROM workouts WHERE id = $1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to check workout existence: {e}")))?;
        Ok(row.is_some())
    }

    async fn find_workouts_after(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<Workout>> {
        let rows = sqlx::query(
            "SELECT id, timestamp, start_of_day, emphasis, notes FROM workouts WHERE timestamp > $1",
        )
        .bind(cutoff.to_rfc3339())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to find recent workouts: {e}")))?;

        rows.iter().map(Self::row_to_workout).collect()
    }

    async fn upsert_workout(&self, workout: &Workout) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT OR REPLACE INTO workouts (id, timestamp, start_of_day, emphasis, notes)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(workout.id.to_string())
        .bind(workout.timestamp.to_rfc3339())
        .bind(workout.start_of_day.to_rfc3339())
        .bind(&workout.emphasis)
        .bind(&workout.notes)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to save workout: {e}")))?;
        Ok(())
    }

    async fn delete_workout(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM workouts WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete workout: {e}")))?;
        Ok(())
    }

    async fn get_exercise(&self, id: Uuid) -> AppResult<Option<Exercise>> {
        let row = sqlx::query(
            r#"
            SELECT id, workout_id, timestamp, "order", name, measure_type, measure_unit
            FROM exercises WHERE id = $1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get exercise: {e}")))?;

        row.map(|r| Self::row_to_exercise(&r)).transpose()
    }

    async fn exercise_exists(&self, id: Uuid) -> AppResult<bool> {
        let row = sqlx::query("SELECT 1 FROM exercises WHERE id = $1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to check exercise existence: {e}")))?;
        Ok(row.is_some())
    }

    async fn find_exercises_by_workout(&self, workout_id: Uuid) -> AppResult<Vec<Exercise>> {
        let rows = sqlx::query(
            r#"
            SELECT id, workout_id, timestamp, "order", name, measure_type, measure_unit
            FROM exercises WHERE workout_id = $1
            "#,
        )
        .bind(workout_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to find exercises for workout: {e}")))?;

        rows.iter().map(Self::row_to_exercise).collect()
    }

    async fn find_exercises_after(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<Exercise>> {
        let rows = sqlx::query(
            r#"
            SELECT id, workout_id, timestamp, "order", name, measure_type, measure_unit
            FROM exercises WHERE timestamp > $1
            "#,
        )
        .bind(cutoff.to_rfc3339())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to find recent exercises: {e}")))?;

        rows.iter().map(Self::row_to_exercise).collect()
    }

    async fn upsert_exercise(&self, exercise: &Exercise) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO exercises
                (id, workout_id, timestamp, "order", name, measure_type, measure_unit)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(exercise.id.to_string())
        .bind(exercise.workout_id.to_string())
        .bind(exercise.timestamp.to_rfc3339())
        .bind(exercise.order)
        .bind(&exercise.name)
        .bind(exercise.measure.unit_type.as_str())
        .bind(exercise.measure.unit.map(|u| u.as_str()))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to save exercise: {e}")))?;
        Ok(())
    }

    async fn delete_exercise(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM exercises WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete exercise: {e}")))?;
        Ok(())
    }

    async fn get_set(&self, id: Uuid) -> AppResult<Option<Set>> {
        let row = sqlx::query(
            r#"
            SELECT id, exercise_id, timestamp, "order", reps, "of" FROM sets WHERE id = $1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get set: {e}")))?;

        row.map(|r| Self::row_to_set(&r)).transpose()
    }

    async fn find_sets_by_exercise(&self, exercise_id: Uuid) -> AppResult<Vec<Set>> {
        let rows = sqlx::query(
            r#"
            SELECT id, exercise_id, timestamp, "order", reps, "of"
            FROM sets WHERE exercise_id = $1
            "#,
        )
        .bind(exercise_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to find sets for exercise: {e}")))?;

        rows.iter().map(Self::row_to_set).collect()
    }

    async fn find_sets_after(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<Set>> {
        let rows = sqlx::query(
            r#"
            SELECT id, exercise_id, timestamp, "order", reps, "of"
            FROM sets WHERE timestamp > $1
            "#,
        )
        .bind(cutoff.to_rfc3339())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to find recent sets: {e}")))?;

        rows.iter().map(Self::row_to_set).collect()
    }

    async fn upsert_set(&self, set: &Set) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO sets (id, exercise_id, timestamp, "order", reps, "of")
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(set.id.to_string())
        .bind(set.exercise_id.to_string())
        .bind(set.timestamp.to_rfc3339())
        .bind(set.order)
        .bind(set.reps)
        .bind(set.of)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to save set: {e}")))?;
        Ok(())
    }

    async fn delete_set(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM sets WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete set: {e}")))?;
        Ok(())
    }

    async fn delete_sets_by_exercise(&self, exercise_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM sets WHERE exercise_id = $1")
            .bind(exercise_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete sets for exercise: {e}")))?;
        Ok(result.rows_affected())
    }
}
