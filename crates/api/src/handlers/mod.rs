pub mod exercise;
pub mod workout_session;
pub mod workout_template;
