//! Workout validation rules shared by the repository and HTTP layers.
//!
//! Covers exercise-name normalisation, template-name limits and the
//! dense set-numbering rule for logged sessions.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Maximum length of an exercise name, in characters.
pub const MAX_EXERCISE_NAME_LEN: u64 = 100;

/// Maximum length of a workout template name, in characters.
pub const MAX_TEMPLATE_NAME_LEN: u64 = 200;

/// Maximum length of a free-form weight label such as `"60kg"`.
pub const MAX_WEIGHT_LEN: u64 = 50;

/// Lowest programme day a template can be assigned to.
pub const MIN_WORKOUT_DAY: i32 = 1;

/// Highest programme day a template can be assigned to.
pub const MAX_WORKOUT_DAY: i32 = 31;

/// Upper bound on target or logged sets for a single exercise.
pub const MAX_SETS: i32 = 50;

/// Upper bound on repetitions for a single set.
pub const MAX_REPETITIONS: i32 = 1000;

/// Upper bound on rest between sets, in seconds.
pub const MAX_REST_SECS: i32 = 3600;

// ---------------------------------------------------------------------------
// Validation functions
// ---------------------------------------------------------------------------

/// Trim an exercise name and check it is usable as a registry key.
///
/// Lookups are case-sensitive, so only surrounding whitespace is removed.
pub fn normalize_exercise_name(name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Exercise name must not be empty".to_string(),
        ));
    }
    let len = trimmed.chars().count();
    if len > MAX_EXERCISE_NAME_LEN as usize {
        return Err(CoreError::Validation(format!(
            "Exercise name too long: {len} chars (max {MAX_EXERCISE_NAME_LEN})"
        )));
    }
    Ok(trimmed.to_string())
}

/// Validate a workout template name: non-blank and within the length limit.
pub fn validate_template_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Workout name must not be empty".to_string(),
        ));
    }
    let len = name.chars().count();
    if len > MAX_TEMPLATE_NAME_LEN as usize {
        return Err(CoreError::Validation(format!(
            "Workout name too long: {len} chars (max {MAX_TEMPLATE_NAME_LEN})"
        )));
    }
    Ok(())
}

/// Validate that logged set numbers form the dense sequence `1..=N`.
///
/// Order in the payload does not matter; duplicates and gaps do.
pub fn validate_set_sequence(set_numbers: &[i32]) -> Result<(), CoreError> {
    if set_numbers.is_empty() {
        return Err(CoreError::Validation(
            "Each logged exercise needs at least one set".to_string(),
        ));
    }

    let mut sorted = set_numbers.to_vec();
    sorted.sort_unstable();

    for (expected, actual) in (1..).zip(sorted.iter()) {
        if *actual != expected {
            return Err(CoreError::Validation(format!(
                "Set numbers must run 1..{} without gaps or duplicates, got {:?}",
                set_numbers.len(),
                set_numbers
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    // -- normalize_exercise_name ---------------------------------------------

    #[test]
    fn exercise_name_is_trimmed() {
        assert_eq!(normalize_exercise_name("  Squat ").unwrap(), "Squat");
    }

    #[test]
    fn exercise_name_keeps_case() {
        assert_eq!(normalize_exercise_name("Bench Press").unwrap(), "Bench Press");
        assert_eq!(normalize_exercise_name("bench press").unwrap(), "bench press");
    }

    #[test]
    fn blank_exercise_name_rejected() {
        assert_matches!(normalize_exercise_name(""), Err(CoreError::Validation(_)));
        assert_matches!(normalize_exercise_name("   "), Err(CoreError::Validation(_)));
    }

    #[test]
    fn overlong_exercise_name_rejected() {
        let name = "x".repeat(MAX_EXERCISE_NAME_LEN as usize + 1);
        assert_matches!(
            normalize_exercise_name(&name),
            Err(CoreError::Validation(msg)) if msg.contains("too long")
        );
    }

    #[test]
    fn exercise_name_limit_counts_chars_not_bytes() {
        let name = "º".repeat(MAX_EXERCISE_NAME_LEN as usize);
        assert!(normalize_exercise_name(&name).is_ok());
    }

    // -- validate_template_name ----------------------------------------------

    #[test]
    fn template_name_accepted() {
        assert!(validate_template_name("Leg Day").is_ok());
    }

    #[test]
    fn blank_template_name_rejected() {
        assert!(validate_template_name(" ").is_err());
    }

    #[test]
    fn overlong_template_name_rejected() {
        let name = "a".repeat(MAX_TEMPLATE_NAME_LEN as usize + 1);
        assert!(validate_template_name(&name).is_err());
    }

    // -- validate_set_sequence -----------------------------------------------

    #[test]
    fn dense_sequence_accepted() {
        assert!(validate_set_sequence(&[1, 2, 3]).is_ok());
    }

    #[test]
    fn unordered_dense_sequence_accepted() {
        assert!(validate_set_sequence(&[2, 3, 1]).is_ok());
    }

    #[test]
    fn empty_sequence_rejected() {
        assert!(validate_set_sequence(&[]).is_err());
    }

    #[test]
    fn gap_rejected() {
        assert!(validate_set_sequence(&[1, 3]).is_err());
    }

    #[test]
    fn duplicate_rejected() {
        assert!(validate_set_sequence(&[1, 1, 2]).is_err());
    }

    #[test]
    fn zero_based_sequence_rejected() {
        assert!(validate_set_sequence(&[0, 1, 2]).is_err());
    }
}
