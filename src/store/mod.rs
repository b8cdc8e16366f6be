// ABOUTME: Document store abstraction for the three workout collections
// ABOUTME: Trait capability set plus the SQLite backend implementation
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Document Store
//!
//! The persistence collaborator. Workouts, exercises, and sets live in three
//! independent collections related only by foreign-key fields; the nested
//! `exercises`/`sets` projections are assembled by the service layer and are
//! never written here. Rows returned by this trait always carry empty child
//! vectors.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::AppResult;
use crate::models::{Exercise, Set, Workout};

pub mod sqlite;

pub use sqlite::SqliteStore;

/// Capability set the aggregation service requires from persistence.
///
/// All implementations must provide a consistent keyed-document interface:
/// get by id, find by foreign key, find by creation time, insert/replace,
/// delete by id, and delete by foreign key.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    // ================================
    // Workouts
    // ================================

    /// Get a workout by id
    async fn get_workout(&self, id: Uuid) -> AppResult<Option<Workout>>;

    /// Check whether a workout exists
    async fn workout_exists(&self, id: Uuid) -> AppResult<bool>;

    /// Find workouts created strictly after the cutoff
    async fn find_workouts_after(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<Workout>>;

    /// Insert a workout, replacing any previous document with the same id
    async fn upsert_workout(&self, workout: &Workout) -> AppResult<()>;

    /// Delete a workout by id
    async fn delete_workout(&self, id: Uuid) -> AppResult<()>;

    // ================================
    // Exercises
    // ================================

    /// Get an exercise by id
    async fn get_exercise(&self, id: Uuid) -> AppResult<Option<Exercise>>;

    /// Check whether an exercise exists
    async fn exercise_exists(&self, id: Uuid) -> AppResult<bool>;

    /// Find all exercises belonging to a workout, in storage order
    async fn find_exercises_by_workout(&self, workout_id: Uuid) -> AppResult<Vec<Exercise>>;

    /// Find exercises created strictly after the cutoff
    async fn find_exercises_after(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<Exercise>>;

    /// Insert an exercise, replacing any previous document with the same id
    async fn upsert_exercise(&self, exercise: &Exercise) -> AppResult<()>;

    /// Delete an exercise by id
    async fn delete_exercise(&self, id: Uuid) -> AppResult<()>;

    // ================================
    // Sets
    // ================================

    /// Get a set by id
    async fn get_set(&self, id: Uuid) -> AppResult<Option<Set>>;

    /// Find all sets belonging to an exercise, in storage order
    async fn find_sets_by_exercise(&self, exercise_id: Uuid) -> AppResult<Vec<Set>>;

    /// Find sets created strictly after the cutoff
    async fn find_sets_after(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<Set>>;

    /// Insert a set, replacing any previous document with the same id
    async fn upsert_set(&self, set: &Set) -> AppResult<()>;

    /// Delete a set by id
    async fn delete_set(&self, id: Uuid) -> AppResult<()>;

    /// Delete every set belonging to an exercise, returning the removed count
    async fn delete_sets_by_exercise(&self, exercise_id: Uuid) -> AppResult<u64>;
}
