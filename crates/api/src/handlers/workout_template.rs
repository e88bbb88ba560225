//! Handlers for the `/templates` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use liftlog_core::error::CoreError;
use liftlog_core::seed::STARTER_PROGRAMME;
use liftlog_core::types::DbId;
use liftlog_core::workout::{normalize_exercise_name, validate_template_name};
use liftlog_db::models::exercise_template::NewLineItem;
use liftlog_db::models::workout_template::{
    CreateWorkoutTemplate, TemplateUpdateResult, UpdateWorkoutTemplate,
    WorkoutTemplateWithExercises,
};
use liftlog_db::repositories::{WorkoutSessionRepo, WorkoutTemplateRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/templates
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<Json<DataResponse<Vec<WorkoutTemplateWithExercises>>>> {
    let templates =
        WorkoutTemplateRepo::list_with_exercises(&state.pool, params.include_inactive).await?;
    Ok(Json(DataResponse { data: templates }))
}

/// GET /api/v1/templates/{id}
///
/// Returns `null` data for an unknown id.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Option<WorkoutTemplateWithExercises>>>> {
    let template = WorkoutTemplateRepo::find_by_id_with_exercises(&state.pool, id).await?;
    Ok(Json(DataResponse { data: template }))
}

/// POST /api/v1/templates
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateWorkoutTemplate>,
) -> AppResult<(StatusCode, Json<DataResponse<WorkoutTemplateWithExercises>>)> {
    input.validate()?;
    validate_template_name(&input.workout_name)?;
    for item in &input.exercises {
        normalize_exercise_name(&item.name)?;
    }

    let template = WorkoutTemplateRepo::create_with_exercises(&state.pool, &input).await?;
    tracing::info!(
        template_id = template.template.id,
        exercises = template.exercises.len(),
        "Workout template created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: template })))
}

/// POST /api/v1/templates/seed
///
/// Creates the built-in starter programme in one transaction.
pub async fn seed(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<DataResponse<Vec<WorkoutTemplateWithExercises>>>)> {
    let inputs: Vec<CreateWorkoutTemplate> = STARTER_PROGRAMME
        .iter()
        .map(|seed| CreateWorkoutTemplate {
            workout_day: seed.workout_day,
            workout_name: seed.workout_name.to_string(),
            exercises: seed
                .exercises
                .iter()
                .map(|e| NewLineItem {
                    name: e.name.to_string(),
                    sets: e.sets,
                    repetitions: e.repetitions,
                    weight: e.weight.to_string(),
                    rest: e.rest,
                })
                .collect(),
        })
        .collect();

    let templates = WorkoutTemplateRepo::create_many(&state.pool, &inputs).await?;
    tracing::info!(count = templates.len(), "Starter templates seeded");
    Ok((StatusCode::CREATED, Json(DataResponse { data: templates })))
}

/// PUT /api/v1/templates/{id}
///
/// Reconciles the template's line items against the payload. Entries that
/// reference a line item outside this template come back as `rejected`.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateWorkoutTemplate>,
) -> AppResult<Json<DataResponse<TemplateUpdateResult>>> {
    input.validate()?;
    validate_template_name(&input.workout_name)?;
    for entry in input.exercises.iter().filter(|entry| !entry.is_removal()) {
        if !entry.has_targets() {
            return Err(AppError::Core(CoreError::Validation(
                "Exercises need sets and repetitions unless removed".to_string(),
            )));
        }
    }
    for entry in input.exercises.iter().filter(|entry| entry.id.is_none()) {
        let name = entry.name.as_deref().ok_or_else(|| {
            CoreError::Validation("New exercises need a name".to_string())
        })?;
        normalize_exercise_name(name)?;
    }

    let result = WorkoutTemplateRepo::update_with_exercises(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "WorkoutTemplate",
            id,
        }))?;

    tracing::info!(
        template_id = id,
        processed = result.processed_exercises.len(),
        retired = result.retired_ids.len(),
        "Workout template updated"
    );
    Ok(Json(DataResponse { data: result }))
}

/// DELETE /api/v1/templates/{id}
///
/// Refused with 409 while sessions reference the template.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let sessions = WorkoutSessionRepo::count_for_template(&state.pool, id).await?;
    if sessions > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Workout template {id} has {sessions} logged session(s)"
        ))));
    }

    if WorkoutTemplateRepo::delete(&state.pool, id).await? {
        tracing::info!(template_id = id, "Workout template deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "WorkoutTemplate",
            id,
        }))
    }
}
