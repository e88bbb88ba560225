//! Handlers for the `/sessions` resource.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use liftlog_core::error::CoreError;
use liftlog_core::types::DbId;
use liftlog_core::workout::validate_set_sequence;
use liftlog_db::models::exercise_template::ExerciseTemplate;
use liftlog_db::models::workout_session::{LogWorkoutSession, WorkoutSessionWithDetails};
use liftlog_db::repositories::{ExerciseTemplateRepo, WorkoutSessionRepo, WorkoutTemplateRepo};
use liftlog_db::DbPool;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/sessions
///
/// Newest first, each with template, exercises and set logs.
pub async fn list(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<WorkoutSessionWithDetails>>>> {
    let sessions = WorkoutSessionRepo::list_with_details(&state.pool).await?;
    Ok(Json(DataResponse { data: sessions }))
}

/// GET /api/v1/sessions/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Option<WorkoutSessionWithDetails>>>> {
    let session = WorkoutSessionRepo::find_by_id_with_details(&state.pool, id).await?;
    Ok(Json(DataResponse { data: session }))
}

/// POST /api/v1/sessions
///
/// Writes the session, its exercises and their sets atomically.
pub async fn log(
    State(state): State<AppState>,
    Json(input): Json<LogWorkoutSession>,
) -> AppResult<(StatusCode, Json<DataResponse<WorkoutSessionWithDetails>>)> {
    input.validate()?;
    for exercise in &input.exercises {
        validate_set_sequence(&exercise.set_numbers())?;
    }

    WorkoutTemplateRepo::find_by_id(&state.pool, input.template_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "WorkoutTemplate",
            id: input.template_id,
        }))?;
    check_line_items(&state.pool, &input).await?;

    let session = WorkoutSessionRepo::log(&state.pool, &input).await?;
    tracing::info!(
        session_id = session.session.id,
        template_id = input.template_id,
        exercises = session.exercises.len(),
        "Workout session logged"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: session })))
}

/// DELETE /api/v1/sessions/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if WorkoutSessionRepo::delete(&state.pool, id).await? {
        tracing::info!(session_id = id, "Workout session deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "WorkoutSession",
            id,
        }))
    }
}

/// Every logged exercise must cite a line item of the session's template,
/// and the exercise that line item tracks.
///
/// A line item's template and exercise never change after insert, so the
/// check holds for the write that follows.
async fn check_line_items(pool: &DbPool, input: &LogWorkoutSession) -> AppResult<()> {
    let ids: Vec<DbId> = input
        .exercises
        .iter()
        .map(|exercise| exercise.exercise_template_id)
        .collect();
    let line_items: HashMap<DbId, ExerciseTemplate> = ExerciseTemplateRepo::find_many(pool, &ids)
        .await?
        .into_iter()
        .map(|item| (item.id, item))
        .collect();

    for exercise in &input.exercises {
        let line_item = line_items.get(&exercise.exercise_template_id).ok_or(
            CoreError::NotFound {
                entity: "ExerciseTemplate",
                id: exercise.exercise_template_id,
            },
        )?;
        if line_item.workout_template_id != input.template_id {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Line item {} belongs to template {}, not {}",
                line_item.id, line_item.workout_template_id, input.template_id
            ))));
        }
        if line_item.exercise_id != exercise.exercise_id {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Line item {} tracks exercise {}, not {}",
                line_item.id, line_item.exercise_id, exercise.exercise_id
            ))));
        }
    }
    Ok(())
}
