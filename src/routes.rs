// ABOUTME: HTTP route handlers for the workout tracker REST API
// ABOUTME: Identifier-format validation at the boundary, delegation to the aggregation service
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # API Boundary
//!
//! Translates inbound identifiers and payloads into aggregation-service calls.
//! Identifier shape-checking happens here, before any service call: the
//! literal strings `null`/`undefined`, blank values, and anything that is not
//! a lowercase 8-4-4-4-12 hex UUID are rejected as 400s and never reach the
//! core.

use std::sync::{Arc, OnceLock};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
    Json, Router,
};
use chrono::{Duration, Utc};
use regex::Regex;
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::{ExerciseDraft, Measure, SetDraft, Unit, UnitType};
use crate::service::WorkoutService;

/// Default lookback window for the recent-activity query, in days
const DEFAULT_ACTIVITY_WINDOW_DAYS: i64 = 60;

fn uuid_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        #[allow(clippy::expect_used)] // Safe: hard-coded pattern
        Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
            .expect("UUID pattern compiles")
    })
}

/// Validate an inbound identifier string and parse it into a [`Uuid`].
///
/// # Errors
///
/// Returns `InvalidInput` for `null`/`undefined`/blank identifiers and
/// `InvalidFormat` for anything failing the UUID pattern.
pub fn parse_identifier(raw: &str) -> AppResult<Uuid> {
    if raw.eq_ignore_ascii_case("null") {
        return Err(AppError::invalid_input("ID cannot be 'null'"));
    }
    if raw.eq_ignore_ascii_case("undefined") {
        return Err(AppError::invalid_input("ID cannot be 'undefined'"));
    }
    if raw.trim().is_empty() {
        return Err(AppError::invalid_input("ID cannot be blank"));
    }
    if !uuid_pattern().is_match(raw) {
        return Err(AppError::invalid_format("ID failed pattern check"));
    }
    Uuid::parse_str(raw).map_err(|_| AppError::invalid_format("ID failed pattern check"))
}

/// Query parameters for the recent-activity endpoint
#[derive(Debug, Deserialize)]
pub struct RecentActivityQuery {
    /// Lookback window in days, defaulting to 60
    pub days: Option<i64>,
}

/// Workout tracker route handlers
pub struct WorkoutRoutes;

impl WorkoutRoutes {
    /// Build the API router with the service as shared state
    pub fn router(service: Arc<WorkoutService>) -> Router {
        Router::new()
            .route("/measure", get(Self::handle_measure_vocabulary))
            .route("/uuid", get(Self::handle_fresh_uuid))
            .route("/workout", post(Self::handle_start_workout))
            .route(
                "/workout/:workout_id",
                get(Self::handle_get_workout).delete(Self::handle_delete_workout),
            )
            .route(
                "/workout/:workout_id/exercises",
                get(Self::handle_get_exercises_for_workout),
            )
            .route(
                "/workout/:workout_id/exercise",
                post(Self::handle_add_exercise),
            )
            .route(
                "/exercise/:exercise_id",
                get(Self::handle_get_exercise).delete(Self::handle_delete_exercise),
            )
            .route("/exercise/:exercise_id/set", post(Self::handle_add_set))
            .route(
                "/exercise/:exercise_id/measure",
                patch(Self::handle_change_measure),
            )
            .route("/set/:set_id", delete(Self::handle_delete_set))
            .route("/activity/recent", get(Self::handle_recent_activity))
            .with_state(service)
    }

    /// Handle GET /measure - unit-type and unit vocabularies
    async fn handle_measure_vocabulary() -> Json<serde_json::Value> {
        Json(json!({
            "types": UnitType::ALL.iter().map(|t| t.as_str()).collect::<Vec<_>>(),
            "units": Unit::ALL.iter().map(|u| u.as_str()).collect::<Vec<_>>(),
        }))
    }

    /// Handle GET /uuid - fresh v4 identifier for client-side drafts
    async fn handle_fresh_uuid() -> Json<String> {
        Json(Uuid::new_v4().to_string())
    }

    /// Handle GET /workout/:id - nested workout view
    async fn handle_get_workout(
        State(service): State<Arc<WorkoutService>>,
        Path(workout_id): Path<String>,
    ) -> AppResult<Response> {
        let id = parse_identifier(&workout_id)?;
        let workout = service.get_workout(id).await?;
        Ok((StatusCode::OK, Json(workout)).into_response())
    }

    /// Handle GET /workout/:id/exercises - exercises with sets, sorted
    async fn handle_get_exercises_for_workout(
        State(service): State<Arc<WorkoutService>>,
        Path(workout_id): Path<String>,
    ) -> AppResult<Response> {
        let id = parse_identifier(&workout_id)?;
        let exercises = service.get_exercises_for_workout(id).await?;
        Ok((StatusCode::OK, Json(exercises)).into_response())
    }

    /// Handle GET /exercise/:id - exercise with sets, sorted
    async fn handle_get_exercise(
        State(service): State<Arc<WorkoutService>>,
        Path(exercise_id): Path<String>,
    ) -> AppResult<Response> {
        let id = parse_identifier(&exercise_id)?;
        let exercise = service.get_exercise(id).await?;
        Ok((StatusCode::OK, Json(exercise)).into_response())
    }

    /// Handle POST /workout - start a fresh empty workout
    async fn handle_start_workout(
        State(service): State<Arc<WorkoutService>>,
    ) -> AppResult<Response> {
        let workout = service.start_new_workout().await?;
        Ok((StatusCode::CREATED, Json(workout)).into_response())
    }

    /// Handle POST /workout/:id/exercise - append an exercise
    async fn handle_add_exercise(
        State(service): State<Arc<WorkoutService>>,
        Path(workout_id): Path<String>,
        Json(draft): Json<ExerciseDraft>,
    ) -> AppResult<Response> {
        let id = parse_identifier(&workout_id)?;
        let workout = service.add_exercise_to_workout(id, &draft).await?;
        Ok((StatusCode::OK, Json(workout)).into_response())
    }

    /// Handle POST /exercise/:id/set - append a set
    async fn handle_add_set(
        State(service): State<Arc<WorkoutService>>,
        Path(exercise_id): Path<String>,
        Json(draft): Json<SetDraft>,
    ) -> AppResult<Response> {
        let id = parse_identifier(&exercise_id)?;
        let exercise = service.add_set_to_exercise(id, &draft).await?;
        Ok((StatusCode::OK, Json(exercise)).into_response())
    }

    /// Handle PATCH /exercise/:id/measure - replace the measure
    async fn handle_change_measure(
        State(service): State<Arc<WorkoutService>>,
        Path(exercise_id): Path<String>,
        Json(measure): Json<Measure>,
    ) -> AppResult<Response> {
        let id = parse_identifier(&exercise_id)?;
        let exercise = service.change_exercise_measure(id, measure).await?;
        Ok((StatusCode::OK, Json(exercise)).into_response())
    }

    /// Handle DELETE /workout/:id - cascade-delete a workout
    async fn handle_delete_workout(
        State(service): State<Arc<WorkoutService>>,
        Path(workout_id): Path<String>,
    ) -> AppResult<Response> {
        let id = parse_identifier(&workout_id)?;
        service.delete_workout(id).await?;
        Ok((StatusCode::OK, Json(json!({}))).into_response())
    }

    /// Handle DELETE /exercise/:id - cascade-delete an exercise
    async fn handle_delete_exercise(
        State(service): State<Arc<WorkoutService>>,
        Path(exercise_id): Path<String>,
    ) -> AppResult<Response> {
        let id = parse_identifier(&exercise_id)?;
        let workout = service.delete_exercise(id).await?;
        Ok((StatusCode::OK, Json(workout)).into_response())
    }

    /// Handle DELETE /set/:id - delete a set
    async fn handle_delete_set(
        State(service): State<Arc<WorkoutService>>,
        Path(set_id): Path<String>,
    ) -> AppResult<Response> {
        let id = parse_identifier(&set_id)?;
        let exercise = service.delete_set(id).await?;
        Ok((StatusCode::OK, Json(exercise)).into_response())
    }

    /// Handle GET /activity/recent?days=N - workouts touched in the window
    async fn handle_recent_activity(
        State(service): State<Arc<WorkoutService>>,
        Query(query): Query<RecentActivityQuery>,
    ) -> AppResult<Response> {
        let days = query.days.unwrap_or(DEFAULT_ACTIVITY_WINDOW_DAYS);
        if days < 0 {
            return Err(AppError::invalid_input("days cannot be negative"));
        }
        let window = Duration::try_days(days)
            .ok_or_else(|| AppError::invalid_input("days is out of range"))?;
        let since = Utc::now()
            .checked_sub_signed(window)
            .ok_or_else(|| AppError::invalid_input("days is out of range"))?;
        let workouts = service.find_recent_activity(since).await?;
        Ok((StatusCode::OK, Json(workouts)).into_response())
    }
}

/// Health check routes for service monitoring
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health check routes
    pub fn routes() -> Router {
        async fn health_handler() -> Json<serde_json::Value> {
            Json(json!({
                "status": "healthy",
                "timestamp": Utc::now().to_rfc3339()
            }))
        }

        Router::new().route("/health", get(health_handler))
    }
}

/// Assemble the full server router: API routes, health checks, request
/// tracing, and permissive CORS for the browser UI.
pub fn server_router(service: Arc<WorkoutService>) -> Router {
    WorkoutRoutes::router(service)
        .merge(HealthRoutes::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
