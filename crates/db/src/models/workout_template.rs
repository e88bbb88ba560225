//! Workout template model and DTOs.

use liftlog_core::types::{DbId, Timestamp};
use liftlog_core::workout::{MAX_TEMPLATE_NAME_LEN, MAX_WORKOUT_DAY, MIN_WORKOUT_DAY};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::exercise_template::{
    ExerciseTemplate, ExerciseTemplateWithName, LineItemOutcome, LineItemSpec, NewLineItem,
};

/// A row from the `workout_templates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkoutTemplate {
    pub id: DbId,
    pub workout_day: i32,
    pub workout_name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A template enriched with its line items and their exercise names.
#[derive(Debug, Clone, Serialize)]
pub struct WorkoutTemplateWithExercises {
    #[serde(flatten)]
    pub template: WorkoutTemplate,
    pub exercises: Vec<ExerciseTemplateWithName>,
}

/// DTO for creating a template together with its line items.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateWorkoutTemplate {
    #[validate(range(min = MIN_WORKOUT_DAY, max = MAX_WORKOUT_DAY))]
    pub workout_day: i32,
    #[validate(length(min = 1, max = MAX_TEMPLATE_NAME_LEN))]
    pub workout_name: String,
    #[serde(default)]
    #[validate(nested)]
    pub exercises: Vec<NewLineItem>,
}

/// DTO for the reconciliation update of a template.
///
/// `exercises` is the full desired list: active line items missing from it
/// are retired.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateWorkoutTemplate {
    #[validate(range(min = MIN_WORKOUT_DAY, max = MAX_WORKOUT_DAY))]
    pub workout_day: i32,
    #[validate(length(min = 1, max = MAX_TEMPLATE_NAME_LEN))]
    pub workout_name: String,
    #[serde(default)]
    #[validate(nested)]
    pub exercises: Vec<LineItemSpec>,
}

/// Result of a reconciliation update.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateUpdateResult {
    pub updated_template: WorkoutTemplate,
    /// One outcome per payload entry, in payload order.
    pub processed_exercises: Vec<LineItemOutcome>,
    /// Active line items retired because the payload no longer listed them.
    pub retired_ids: Vec<DbId>,
}

impl TemplateUpdateResult {
    /// Line items touched by this update that ended up active.
    pub fn active_line_items(&self) -> impl Iterator<Item = &ExerciseTemplate> {
        self.processed_exercises.iter().filter_map(|outcome| match outcome {
            LineItemOutcome::Created { line_item } | LineItemOutcome::Updated { line_item } => {
                Some(line_item)
            }
            LineItemOutcome::Retired { .. } | LineItemOutcome::Rejected { .. } => None,
        })
    }
}
