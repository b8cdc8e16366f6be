// ABOUTME: Aggregation service composing nested workout views from flat collections
// ABOUTME: Append-only sibling ordering, cascade deletes, and recent-activity queries
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Workout Aggregation Service
//!
//! The consistency layer over the three document collections. Every nested
//! response is recomposed through [`WorkoutService::get_workout`] or
//! [`WorkoutService::get_exercise`] so the sort/zip logic lives in exactly one
//! place. Cascade deletes are sequences of independent store operations, not
//! transactions; a crash mid-cascade can leave orphans, which the read side
//! tolerates by skipping dangling references.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::future::try_join_all;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::{AppError, AppResult, ErrorCode};
use crate::models::{Exercise, ExerciseDraft, Measure, Set, SetDraft, Workout};
use crate::store::DocumentStore;

/// Compute the next append-only sibling position: `max + 1`, or 0 for the
/// first child. Positions are never reassigned, so a gap left by historical
/// data still yields `max + 1`, not the sibling count.
fn next_order(orders: impl Iterator<Item = i32>) -> i32 {
    orders.max().map_or(0, |max| max + 1)
}

/// Aggregation service over the workout, exercise, and set collections.
///
/// Holds a shared handle to the document store; construction is the only
/// injection point.
#[derive(Clone)]
pub struct WorkoutService {
    store: Arc<dyn DocumentStore>,
}

impl WorkoutService {
    /// Create a service backed by the given store
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Fetch a workout with its exercises (and their sets) populated.
    ///
    /// The workout row and the child exercises are fetched concurrently; the
    /// row fetch alone decides existence.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the workout does not exist, or any store
    /// failure unchanged.
    pub async fn get_workout(&self, workout_id: Uuid) -> AppResult<Workout> {
        let (workout, exercises) = tokio::try_join!(
            self.fetch_workout(workout_id),
            self.get_exercises_for_workout(workout_id)
        )?;
        Ok(Workout {
            exercises,
            ..workout
        })
    }

    /// Fetch an exercise with its sets populated
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the exercise does not exist
    pub async fn get_exercise(&self, exercise_id: Uuid) -> AppResult<Exercise> {
        let (exercise, sets) = tokio::try_join!(
            self.fetch_exercise(exercise_id),
            self.sets_for_exercise(exercise_id)
        )?;
        Ok(Exercise { sets, ..exercise })
    }

    /// Fetch all exercises for a workout, each with sets populated, sorted
    /// ascending by sibling order
    ///
    /// # Errors
    ///
    /// Returns any store failure unchanged
    pub async fn get_exercises_for_workout(&self, workout_id: Uuid) -> AppResult<Vec<Exercise>> {
        let exercises = self.store.find_exercises_by_workout(workout_id).await?;
        let mut exercises =
            try_join_all(exercises.into_iter().map(|e| self.with_sets(e))).await?;
        exercises.sort_by_key(|e| e.order);
        Ok(exercises)
    }

    /// Create and persist a fresh empty workout
    ///
    /// # Errors
    ///
    /// Returns any store failure unchanged
    pub async fn start_new_workout(&self) -> AppResult<Workout> {
        let workout = Workout::new();
        self.store.upsert_workout(&workout).await?;
        debug!(workout_id = %workout.id, "started new workout");
        Ok(workout)
    }

    /// Append an exercise to a workout and return the recomposed workout.
    ///
    /// The parent workout must exist before the insert happens; the new
    /// exercise takes position `max(sibling orders) + 1` (0 when it is the
    /// first child) and the default measure.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the workout does not exist
    pub async fn add_exercise_to_workout(
        &self,
        workout_id: Uuid,
        draft: &ExerciseDraft,
    ) -> AppResult<Workout> {
        if !self.store.workout_exists(workout_id).await? {
            return Err(AppError::not_found(format!("Workout {workout_id}")));
        }

        let siblings = self.store.find_exercises_by_workout(workout_id).await?;
        let order = next_order(siblings.iter().map(|e| e.order));
        let exercise = Exercise::new(workout_id, draft.name.clone(), order);
        self.store.upsert_exercise(&exercise).await?;
        debug!(workout_id = %workout_id, exercise_id = %exercise.id, order, "added exercise");

        self.get_workout(workout_id).await
    }

    /// Append a set to an exercise and return the recomposed exercise.
    ///
    /// Parent existence is validated before the insert, the same policy as
    /// [`Self::add_exercise_to_workout`].
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the exercise does not exist
    pub async fn add_set_to_exercise(
        &self,
        exercise_id: Uuid,
        draft: &SetDraft,
    ) -> AppResult<Exercise> {
        if !self.store.exercise_exists(exercise_id).await? {
            return Err(AppError::not_found(format!("Exercise {exercise_id}")));
        }

        let siblings = self.store.find_sets_by_exercise(exercise_id).await?;
        let order = next_order(siblings.iter().map(|s| s.order));
        let set = Set::new(exercise_id, draft.reps, draft.of, order);
        self.store.upsert_set(&set).await?;
        debug!(exercise_id = %exercise_id, set_id = %set.id, order, "added set");

        self.get_exercise(exercise_id).await
    }

    /// Replace an exercise's measure, preserving every other field, and
    /// return the recomposed exercise.
    ///
    /// The (type, unit) pairing is not validated here; see
    /// [`crate::models::Measure::is_consistent`].
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the exercise does not exist
    pub async fn change_exercise_measure(
        &self,
        exercise_id: Uuid,
        measure: Measure,
    ) -> AppResult<Exercise> {
        let mut exercise = self.fetch_exercise(exercise_id).await?;
        exercise.measure = measure;
        self.store.upsert_exercise(&exercise).await?;
        self.get_exercise(exercise_id).await
    }

    /// Delete a workout and every descendant exercise and set.
    ///
    /// The cascade is a sequence of independent store operations; a failure
    /// partway through leaves already-deleted children gone.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the workout does not exist
    pub async fn delete_workout(&self, workout_id: Uuid) -> AppResult<()> {
        let workout = self.get_workout(workout_id).await?;
        for exercise in &workout.exercises {
            let removed = self.store.delete_sets_by_exercise(exercise.id).await?;
            self.store.delete_exercise(exercise.id).await?;
            debug!(exercise_id = %exercise.id, sets_removed = removed, "cascaded exercise delete");
        }
        self.store.delete_workout(workout_id).await?;
        Ok(())
    }

    /// Delete an exercise and its sets, returning the recomposed parent
    /// workout.
    ///
    /// If the parent workout no longer resolves after the delete (an already
    /// inconsistent hierarchy), an empty workout is returned instead of an
    /// error so the caller still gets a usable view. Only the post-delete
    /// recompose gets this fallback; a missing exercise is still an error.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the exercise does not exist
    pub async fn delete_exercise(&self, exercise_id: Uuid) -> AppResult<Workout> {
        let exercise = self.fetch_exercise(exercise_id).await?;
        tokio::try_join!(
            self.store.delete_sets_by_exercise(exercise_id),
            self.store.delete_exercise(exercise_id)
        )?;

        match self.get_workout(exercise.workout_id).await {
            Ok(workout) => Ok(workout),
            Err(err) if err.code == ErrorCode::ResourceNotFound => {
                warn!(
                    exercise_id = %exercise_id,
                    workout_id = %exercise.workout_id,
                    "deleted exercise had no resolvable parent workout"
                );
                Ok(Workout::new())
            }
            Err(err) => Err(err),
        }
    }

    /// Delete a set, returning the recomposed parent exercise
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the set does not exist
    pub async fn delete_set(&self, set_id: Uuid) -> AppResult<Exercise> {
        let set = self
            .store
            .get_set(set_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Set {set_id}")))?;
        self.store.delete_set(set_id).await?;
        self.get_exercise(set.exercise_id).await
    }

    /// Find every workout touched after the cutoff: created itself, or had an
    /// exercise or a set created under it. Each qualifying workout appears
    /// once, most recent first. Dangling foreign keys left by a partial
    /// cascade are skipped.
    ///
    /// # Errors
    ///
    /// Returns any store failure unchanged
    pub async fn find_recent_activity(&self, since: DateTime<Utc>) -> AppResult<Vec<Workout>> {
        let (workouts, exercises, sets) = tokio::try_join!(
            self.store.find_workouts_after(since),
            self.store.find_exercises_after(since),
            self.store.find_sets_after(since)
        )?;

        let mut seen = HashSet::new();
        let mut recent = Vec::new();

        for workout in workouts {
            if seen.insert(workout.id) {
                recent.push(workout);
            }
        }

        for exercise in exercises {
            if seen.contains(&exercise.workout_id) {
                continue;
            }
            if let Some(workout) = self.store.get_workout(exercise.workout_id).await? {
                if seen.insert(workout.id) {
                    recent.push(workout);
                }
            }
        }

        for set in sets {
            let Some(exercise) = self.store.get_exercise(set.exercise_id).await? else {
                continue;
            };
            if seen.contains(&exercise.workout_id) {
                continue;
            }
            if let Some(workout) = self.store.get_workout(exercise.workout_id).await? {
                if seen.insert(workout.id) {
                    recent.push(workout);
                }
            }
        }

        recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(recent)
    }

    async fn fetch_workout(&self, workout_id: Uuid) -> AppResult<Workout> {
        self.store
            .get_workout(workout_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Workout {workout_id}")))
    }

    async fn fetch_exercise(&self, exercise_id: Uuid) -> AppResult<Exercise> {
        self.store
            .get_exercise(exercise_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Exercise {exercise_id}")))
    }

    async fn with_sets(&self, exercise: Exercise) -> AppResult<Exercise> {
        let sets = self.sets_for_exercise(exercise.id).await?;
        Ok(Exercise { sets, ..exercise })
    }

    async fn sets_for_exercise(&self, exercise_id: Uuid) -> AppResult<Vec<Set>> {
        let mut sets = self.store.find_sets_by_exercise(exercise_id).await?;
        sets.sort_by_key(|s| s.order);
        Ok(sets)
    }
}
