// ABOUTME: Integration tests for the SQLite document store
// ABOUTME: Roundtrips, foreign-key queries, timestamp cutoffs, and replace semantics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use chrono::{Duration, Utc};
use uuid::Uuid;
use workout_tracker::models::{Exercise, Measure, Set, UnitType, Workout};
use workout_tracker::store::DocumentStore;

use common::create_test_store;

#[tokio::test]
async fn workout_roundtrip_preserves_fields() {
    let store = create_test_store().await;

    let mut workout = Workout::new();
    workout.emphasis = "legs".to_owned();
    workout.notes = "felt strong".to_owned();
    store.upsert_workout(&workout).await.unwrap();

    let fetched = store.get_workout(workout.id).await.unwrap().unwrap();
    assert_eq!(fetched.id, workout.id);
    assert_eq!(fetched.timestamp, workout.timestamp);
    assert_eq!(fetched.start_of_day, workout.start_of_day);
    assert_eq!(fetched.emphasis, "legs");
    assert_eq!(fetched.notes, "felt strong");
    // Child projection is never stored
    assert!(fetched.exercises.is_empty());
}

#[tokio::test]
async fn exercise_roundtrip_preserves_measure() {
    let store = create_test_store().await;

    let workout_id = Uuid::new_v4();
    let mut exercise = Exercise::new(workout_id, "Farmer Carry", 2);
    store.upsert_exercise(&exercise).await.unwrap();

    let fetched = store.get_exercise(exercise.id).await.unwrap().unwrap();
    assert_eq!(fetched.workout_id, workout_id);
    assert_eq!(fetched.order, 2);
    assert_eq!(fetched.measure, Measure::default());
    assert!(fetched.sets.is_empty());

    // Unitless measure stores a NULL unit
    exercise.measure = Measure {
        unit_type: UnitType::None,
        unit: None,
    };
    store.upsert_exercise(&exercise).await.unwrap();
    let fetched = store.get_exercise(exercise.id).await.unwrap().unwrap();
    assert_eq!(fetched.measure.unit_type, UnitType::None);
    assert_eq!(fetched.measure.unit, None);
}

#[tokio::test]
async fn set_roundtrip_preserves_magnitude() {
    let store = create_test_store().await;

    let exercise_id = Uuid::new_v4();
    let set = Set::new(exercise_id, 8, 72.5, 3);
    store.upsert_set(&set).await.unwrap();

    let fetched = store.get_set(set.id).await.unwrap().unwrap();
    assert_eq!(fetched.exercise_id, exercise_id);
    assert_eq!(fetched.reps, 8);
    assert_eq!(fetched.of, 72.5);
    assert_eq!(fetched.order, 3);
}

#[tokio::test]
async fn missing_rows_come_back_as_none() {
    let store = create_test_store().await;
    let id = Uuid::new_v4();

    assert!(store.get_workout(id).await.unwrap().is_none());
    assert!(store.get_exercise(id).await.unwrap().is_none());
    assert!(store.get_set(id).await.unwrap().is_none());
    assert!(!store.workout_exists(id).await.unwrap());
    assert!(!store.exercise_exists(id).await.unwrap());
}

#[tokio::test]
async fn upsert_replaces_the_whole_document() {
    let store = create_test_store().await;

    let mut workout = Workout::new();
    store.upsert_workout(&workout).await.unwrap();

    workout.emphasis = "pull".to_owned();
    store.upsert_workout(&workout).await.unwrap();

    let fetched = store.get_workout(workout.id).await.unwrap().unwrap();
    assert_eq!(fetched.emphasis, "pull");

    // Still a single row
    let all = store
        .find_workouts_after(Utc::now() - Duration::days(1))
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn foreign_key_queries_are_scoped() {
    let store = create_test_store().await;

    let workout_a = Uuid::new_v4();
    let workout_b = Uuid::new_v4();
    let in_a = Exercise::new(workout_a, "Squat", 0);
    store.upsert_exercise(&in_a).await.unwrap();
    store
        .upsert_exercise(&Exercise::new(workout_a, "Bench", 1))
        .await
        .unwrap();
    store
        .upsert_exercise(&Exercise::new(workout_b, "Row", 0))
        .await
        .unwrap();

    let found = store.find_exercises_by_workout(workout_a).await.unwrap();
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|e| e.workout_id == workout_a));

    store
        .upsert_set(&Set::new(in_a.id, 5, 135.0, 0))
        .await
        .unwrap();
    store
        .upsert_set(&Set::new(Uuid::new_v4(), 5, 95.0, 0))
        .await
        .unwrap();

    let sets = store.find_sets_by_exercise(in_a.id).await.unwrap();
    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].of, 135.0);
}

#[tokio::test]
async fn timestamp_cutoff_is_strict() {
    let store = create_test_store().await;

    let mut workout = Workout::new();
    store.upsert_workout(&workout).await.unwrap();

    let before = workout.timestamp - Duration::seconds(1);
    let after = workout.timestamp + Duration::seconds(1);

    assert_eq!(store.find_workouts_after(before).await.unwrap().len(), 1);
    assert!(store.find_workouts_after(after).await.unwrap().is_empty());
    // Not strictly after its own timestamp
    assert!(store
        .find_workouts_after(workout.timestamp)
        .await
        .unwrap()
        .is_empty());

    workout.id = Uuid::new_v4();
    workout.timestamp = workout.timestamp - Duration::days(10);
    store.upsert_workout(&workout).await.unwrap();
    assert_eq!(store.find_workouts_after(before).await.unwrap().len(), 1);
}

#[tokio::test]
async fn delete_sets_by_exercise_reports_count_and_scopes() {
    let store = create_test_store().await;

    let target = Uuid::new_v4();
    let other = Uuid::new_v4();
    for order in 0..3 {
        store
            .upsert_set(&Set::new(target, 5, 100.0, order))
            .await
            .unwrap();
    }
    let keeper = Set::new(other, 5, 60.0, 0);
    store.upsert_set(&keeper).await.unwrap();

    let removed = store.delete_sets_by_exercise(target).await.unwrap();
    assert_eq!(removed, 3);
    assert!(store.find_sets_by_exercise(target).await.unwrap().is_empty());
    assert!(store.get_set(keeper.id).await.unwrap().is_some());
}

#[tokio::test]
async fn deletes_are_idempotent_by_id() {
    let store = create_test_store().await;

    let workout = Workout::new();
    store.upsert_workout(&workout).await.unwrap();
    store.delete_workout(workout.id).await.unwrap();
    // Second delete of a gone row is not an error
    store.delete_workout(workout.id).await.unwrap();
    assert!(store.get_workout(workout.id).await.unwrap().is_none());
}
