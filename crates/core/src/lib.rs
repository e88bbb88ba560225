//! Domain rules for LiftLog.
//!
//! Holds the id/timestamp aliases, the domain error type, workout
//! validation rules and the built-in starter programme. Nothing in this
//! crate touches the database.

pub mod error;
pub mod seed;
pub mod types;
pub mod workout;
