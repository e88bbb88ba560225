//! Workout session, session-exercise and set-log models and DTOs.

use liftlog_core::types::{DbId, Timestamp};
use liftlog_core::workout::{MAX_REPETITIONS, MAX_SETS, MAX_WEIGHT_LEN};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::exercise_template::ExerciseTemplate;
use super::workout_template::WorkoutTemplate;

/// A row from the `workout_sessions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkoutSession {
    pub id: DbId,
    pub template_id: DbId,
    pub date: Timestamp,
    pub is_completed: bool,
    pub created_at: Timestamp,
}

/// A row from the `session_exercises` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SessionExercise {
    pub id: DbId,
    pub workout_session_id: DbId,
    pub exercise_template_id: DbId,
    pub exercise_id: DbId,
    /// Number of sets actually logged, not the template target.
    pub sets: i32,
}

/// A row from the `exercise_set_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ExerciseSetLog {
    pub id: DbId,
    pub session_exercise_id: DbId,
    pub set_number: i32,
    pub repetitions: i32,
    pub weight: String,
}

/// Projection of a set log returned by the last-session lookup.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct SetLogSummary {
    pub set_number: i32,
    pub repetitions: i32,
    pub weight: String,
}

/// A session exercise with its exercise name, originating line item and sets.
#[derive(Debug, Clone, Serialize)]
pub struct SessionExerciseDetail {
    #[serde(flatten)]
    pub session_exercise: SessionExercise,
    pub exercise_name: String,
    /// The line item the exercise was logged against, whatever its status now.
    pub exercise_template: Option<ExerciseTemplate>,
    pub set_logs: Vec<ExerciseSetLog>,
}

/// A session with its template and every logged exercise and set.
#[derive(Debug, Clone, Serialize)]
pub struct WorkoutSessionWithDetails {
    #[serde(flatten)]
    pub session: WorkoutSession,
    pub template: Option<WorkoutTemplate>,
    pub exercises: Vec<SessionExerciseDetail>,
}

/// One performed set in a session logging request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SetLogInput {
    #[validate(range(min = 1, max = MAX_SETS))]
    pub set_number: i32,
    #[validate(range(min = 0, max = MAX_REPETITIONS))]
    pub repetitions: i32,
    #[serde(default)]
    #[validate(length(max = MAX_WEIGHT_LEN))]
    pub weight: String,
}

/// One exercise in a session logging request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LogSessionExercise {
    pub exercise_template_id: DbId,
    pub exercise_id: DbId,
    #[validate(nested)]
    pub set_logs: Vec<SetLogInput>,
}

impl LogSessionExercise {
    pub fn set_numbers(&self) -> Vec<i32> {
        self.set_logs.iter().map(|set| set.set_number).collect()
    }
}

/// DTO for logging a session with all of its nested exercise and set rows.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LogWorkoutSession {
    pub template_id: DbId,
    pub date: Timestamp,
    /// Defaults to `true`.
    pub is_completed: Option<bool>,
    #[serde(default)]
    #[validate(nested)]
    pub exercises: Vec<LogSessionExercise>,
}
