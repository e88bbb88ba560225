//! Template line item model, DTOs and reconciliation outcomes.
//!
//! A line item says "exercise X appears in template Y with these targets".
//! Line items are retired rather than deleted so that logged sessions keep
//! pointing at the targets they were performed against.

use liftlog_core::types::{DbId, Timestamp};
use liftlog_core::workout::{
    MAX_EXERCISE_NAME_LEN, MAX_REPETITIONS, MAX_REST_SECS, MAX_SETS, MAX_WEIGHT_LEN,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::status::{LineItemStatus, StatusId};

/// A row from the `exercise_templates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ExerciseTemplate {
    pub id: DbId,
    pub workout_template_id: DbId,
    pub exercise_id: DbId,
    pub sets: i32,
    pub repetitions: i32,
    pub weight: String,
    /// Rest between sets, in seconds.
    pub rest: i32,
    pub status_id: StatusId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ExerciseTemplate {
    pub fn is_active(&self) -> bool {
        self.status_id == LineItemStatus::Active.id()
    }
}

/// A line item joined with its exercise name, as shown in template views.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ExerciseTemplateWithName {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub line_item: ExerciseTemplate,
    pub exercise_name: String,
}

/// DTO for a brand-new line item, identified by exercise name.
///
/// The exercise is resolved through the registry (find-or-create).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewLineItem {
    #[validate(length(min = 1, max = MAX_EXERCISE_NAME_LEN))]
    pub name: String,
    #[validate(range(min = 0, max = MAX_SETS))]
    pub sets: i32,
    #[validate(range(min = 0, max = MAX_REPETITIONS))]
    pub repetitions: i32,
    #[serde(default)]
    #[validate(length(max = MAX_WEIGHT_LEN))]
    pub weight: String,
    #[serde(default)]
    #[validate(range(min = 0, max = MAX_REST_SECS))]
    pub rest: i32,
}

/// One entry of a template update payload.
///
/// - `id` set, `remove` true: retire that line item.
/// - `id` set, `remove` false: update its targets and make it active again.
/// - `id` absent: create a new line item for exercise `name`.
///
/// `sets` and `repetitions` may be omitted only on removal entries.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LineItemSpec {
    pub id: Option<DbId>,
    #[validate(length(min = 1, max = MAX_EXERCISE_NAME_LEN))]
    pub name: Option<String>,
    #[validate(range(min = 0, max = MAX_SETS))]
    pub sets: Option<i32>,
    #[validate(range(min = 0, max = MAX_REPETITIONS))]
    pub repetitions: Option<i32>,
    #[serde(default)]
    #[validate(length(max = MAX_WEIGHT_LEN))]
    pub weight: String,
    #[serde(default)]
    #[validate(range(min = 0, max = MAX_REST_SECS))]
    pub rest: i32,
    #[serde(default)]
    pub remove: bool,
}

impl LineItemSpec {
    /// Whether this entry only retires an existing line item.
    pub fn is_removal(&self) -> bool {
        self.remove && self.id.is_some()
    }

    /// Whether the entry carries the targets a create or update writes.
    pub fn has_targets(&self) -> bool {
        self.sets.is_some() && self.repetitions.is_some()
    }
}

/// What happened to one entry of a template update payload.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LineItemOutcome {
    /// A new line item was inserted.
    Created { line_item: ExerciseTemplate },
    /// An existing line item had its targets replaced and is active.
    Updated { line_item: ExerciseTemplate },
    /// The line item was explicitly retired.
    Retired { line_item: ExerciseTemplate },
    /// The referenced line item does not exist in this template; nothing changed.
    Rejected { id: DbId, reason: String },
}
