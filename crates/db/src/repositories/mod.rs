//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Multi-row writes open their own
//! transaction; `*_inner` helpers run inside a caller's transaction.

pub mod exercise_repo;
pub mod exercise_template_repo;
pub mod workout_session_repo;
pub mod workout_template_repo;

pub use exercise_repo::ExerciseRepo;
pub use exercise_template_repo::ExerciseTemplateRepo;
pub use workout_session_repo::WorkoutSessionRepo;
pub use workout_template_repo::WorkoutTemplateRepo;
