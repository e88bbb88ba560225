//! Exercise registry model and DTOs.

use liftlog_core::types::{DbId, Timestamp};
use liftlog_core::workout::MAX_EXERCISE_NAME_LEN;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `exercises` table. Names are unique and case-sensitive.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Exercise {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
}

/// DTO for registering an exercise by name.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateExercise {
    #[validate(length(min = 1, max = MAX_EXERCISE_NAME_LEN))]
    pub name: String,
}
