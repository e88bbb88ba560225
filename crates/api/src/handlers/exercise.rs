//! Handlers for the `/exercises` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use liftlog_core::types::DbId;
use liftlog_core::workout::normalize_exercise_name;
use liftlog_db::models::exercise::{CreateExercise, Exercise};
use liftlog_db::models::workout_session::SetLogSummary;
use liftlog_db::repositories::{ExerciseRepo, WorkoutSessionRepo};
use validator::Validate;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/exercises
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Exercise>>>> {
    let exercises = ExerciseRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: exercises }))
}

/// POST /api/v1/exercises
///
/// Idempotent: returns 201 when the name was new, 200 with the existing row
/// otherwise.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateExercise>,
) -> AppResult<(StatusCode, Json<DataResponse<Exercise>>)> {
    input.validate()?;
    let name = normalize_exercise_name(&input.name)?;

    let (exercise, created) = ExerciseRepo::find_or_create(&state.pool, &name).await?;
    let status = if created {
        tracing::info!(exercise_id = exercise.id, name = %exercise.name, "Exercise registered");
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(DataResponse { data: exercise })))
}

/// GET /api/v1/exercises/{id}/last-session
///
/// Set logs from the most recent session containing the exercise, or
/// `null` if it was never logged.
pub async fn last_session(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Option<Vec<SetLogSummary>>>>> {
    let sets = WorkoutSessionRepo::last_session_sets_for_exercise(&state.pool, id).await?;
    Ok(Json(DataResponse { data: sets }))
}
