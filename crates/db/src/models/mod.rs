//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` + `Validate` input DTOs for inserts and updates
//! - Enriched read shapes that nest child rows under their parent

pub mod exercise;
pub mod exercise_template;
pub mod status;
pub mod workout_session;
pub mod workout_template;
