//! Integration tests for session logging, history reads and deletion.

use chrono::{Duration, Utc};
use liftlog_db::models::exercise_template::NewLineItem;
use liftlog_db::models::workout_session::{
    LogSessionExercise, LogWorkoutSession, SetLogInput, SetLogSummary,
};
use liftlog_db::models::workout_template::{CreateWorkoutTemplate, WorkoutTemplateWithExercises};
use liftlog_db::repositories::{WorkoutSessionRepo, WorkoutTemplateRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A template with one Squat line item targeting 4 x 8.
async fn squat_template(pool: &PgPool) -> WorkoutTemplateWithExercises {
    WorkoutTemplateRepo::create_with_exercises(
        pool,
        &CreateWorkoutTemplate {
            workout_day: 1,
            workout_name: "Leg Day".to_string(),
            exercises: vec![NewLineItem {
                name: "Squat".to_string(),
                sets: 4,
                repetitions: 8,
                weight: "80kg".to_string(),
                rest: 120,
            }],
        },
    )
    .await
    .unwrap()
}

fn set(set_number: i32, repetitions: i32, weight: &str) -> SetLogInput {
    SetLogInput {
        set_number,
        repetitions,
        weight: weight.to_string(),
    }
}

/// A session payload logging `sets` against the template's first line item.
fn squat_session(template: &WorkoutTemplateWithExercises, sets: Vec<SetLogInput>) -> LogWorkoutSession {
    let line_item = &template.exercises[0].line_item;
    LogWorkoutSession {
        template_id: template.template.id,
        date: Utc::now(),
        is_completed: None,
        exercises: vec![LogSessionExercise {
            exercise_template_id: line_item.id,
            exercise_id: line_item.exercise_id,
            set_logs: sets,
        }],
    }
}

async fn count(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// The stored set count reflects what was performed, not the template target.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_log_stores_performed_set_count(pool: PgPool) {
    let template = squat_template(&pool).await;

    let session = WorkoutSessionRepo::log(
        &pool,
        &squat_session(&template, vec![set(1, 8, "80kg"), set(2, 6, "80kg")]),
    )
    .await
    .unwrap();

    assert!(session.session.is_completed);
    assert_eq!(session.template.as_ref().unwrap().id, template.template.id);
    assert_eq!(session.exercises.len(), 1);

    let exercise = &session.exercises[0];
    assert_eq!(exercise.session_exercise.sets, 2);
    assert_eq!(exercise.exercise_name, "Squat");
    assert_eq!(exercise.exercise_template.as_ref().unwrap().sets, 4);
    assert_eq!(exercise.set_logs.len(), 2);
    assert_eq!(exercise.set_logs[1].repetitions, 6);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_log_respects_explicit_incomplete_flag(pool: PgPool) {
    let template = squat_template(&pool).await;
    let mut input = squat_session(&template, vec![set(1, 8, "80kg")]);
    input.is_completed = Some(false);

    let session = WorkoutSessionRepo::log(&pool, &input).await.unwrap();
    assert!(!session.session.is_completed);
}

/// A bad exercise id aborts the whole write: no session, exercise or set rows remain.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_log_is_atomic(pool: PgPool) {
    let template = squat_template(&pool).await;
    let mut input = squat_session(&template, vec![set(1, 8, "80kg")]);
    input.exercises.push(LogSessionExercise {
        exercise_template_id: template.exercises[0].line_item.id,
        exercise_id: 999_999,
        set_logs: vec![set(1, 5, "")],
    });

    let result = WorkoutSessionRepo::log(&pool, &input).await;
    assert!(result.is_err());

    assert_eq!(count(&pool, "workout_sessions").await, 0);
    assert_eq!(count(&pool, "session_exercises").await, 0);
    assert_eq!(count(&pool, "exercise_set_logs").await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_set_number_rejected_by_store(pool: PgPool) {
    let template = squat_template(&pool).await;
    let result = WorkoutSessionRepo::log(
        &pool,
        &squat_session(&template, vec![set(1, 8, ""), set(1, 8, "")]),
    )
    .await;

    assert!(result.is_err());
    assert_eq!(count(&pool, "workout_sessions").await, 0);
}

// ---------------------------------------------------------------------------
// Last-session lookup
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_last_session_returns_latest_sets(pool: PgPool) {
    let template = squat_template(&pool).await;
    let exercise_id = template.exercises[0].line_item.exercise_id;

    WorkoutSessionRepo::log(&pool, &squat_session(&template, vec![set(1, 8, "80kg")]))
        .await
        .unwrap();
    WorkoutSessionRepo::log(
        &pool,
        &squat_session(&template, vec![set(1, 5, "90kg"), set(2, 4, "90kg")]),
    )
    .await
    .unwrap();

    let sets = WorkoutSessionRepo::last_session_sets_for_exercise(&pool, exercise_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        sets,
        vec![
            SetLogSummary {
                set_number: 1,
                repetitions: 5,
                weight: "90kg".to_string(),
            },
            SetLogSummary {
                set_number: 2,
                repetitions: 4,
                weight: "90kg".to_string(),
            },
        ]
    );
}

/// Recency follows the session's creation time, not its id or workout date.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_last_session_orders_by_created_at(pool: PgPool) {
    let template = squat_template(&pool).await;
    let exercise_id = template.exercises[0].line_item.exercise_id;

    let first = WorkoutSessionRepo::log(&pool, &squat_session(&template, vec![set(1, 8, "80kg")]))
        .await
        .unwrap();
    let second = WorkoutSessionRepo::log(&pool, &squat_session(&template, vec![set(1, 3, "95kg")]))
        .await
        .unwrap();

    // Backdate the newer row so the older id becomes the latest.
    sqlx::query("UPDATE workout_sessions SET created_at = $2 WHERE id = $1")
        .bind(second.session.id)
        .bind(first.session.created_at - Duration::hours(1))
        .execute(&pool)
        .await
        .unwrap();

    let sets = WorkoutSessionRepo::last_session_sets_for_exercise(&pool, exercise_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].repetitions, 8);
    assert_eq!(sets[0].weight, "80kg");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_last_session_none_when_never_logged(pool: PgPool) {
    let template = squat_template(&pool).await;
    let exercise_id = template.exercises[0].line_item.exercise_id;

    let result = WorkoutSessionRepo::last_session_sets_for_exercise(&pool, exercise_id)
        .await
        .unwrap();
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// Listing and deletion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_newest_first(pool: PgPool) {
    let template = squat_template(&pool).await;
    let older = WorkoutSessionRepo::log(&pool, &squat_session(&template, vec![set(1, 8, "")]))
        .await
        .unwrap();
    let newer = WorkoutSessionRepo::log(&pool, &squat_session(&template, vec![set(1, 8, "")]))
        .await
        .unwrap();

    let ids: Vec<i64> = WorkoutSessionRepo::list_with_details(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.session.id)
        .collect();
    assert_eq!(ids, vec![newer.session.id, older.session.id]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_with_details(pool: PgPool) {
    let template = squat_template(&pool).await;
    let logged = WorkoutSessionRepo::log(&pool, &squat_session(&template, vec![set(1, 8, "")]))
        .await
        .unwrap();

    let found = WorkoutSessionRepo::find_by_id_with_details(&pool, logged.session.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.exercises.len(), 1);
    assert_eq!(found.exercises[0].set_logs.len(), 1);

    assert!(WorkoutSessionRepo::find_by_id_with_details(&pool, 999_999)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_cascades_nested_rows(pool: PgPool) {
    let template = squat_template(&pool).await;
    let session = WorkoutSessionRepo::log(
        &pool,
        &squat_session(&template, vec![set(1, 8, ""), set(2, 8, "")]),
    )
    .await
    .unwrap();

    assert!(WorkoutSessionRepo::delete(&pool, session.session.id).await.unwrap());

    assert_eq!(count(&pool, "workout_sessions").await, 0);
    assert_eq!(count(&pool, "session_exercises").await, 0);
    assert_eq!(count(&pool, "exercise_set_logs").await, 0);
    // The template and its line items stay.
    assert_eq!(count(&pool, "exercise_templates").await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_missing_session_returns_false(pool: PgPool) {
    assert!(!WorkoutSessionRepo::delete(&pool, 999_999).await.unwrap());
}

/// Templates with history are protected by the foreign key.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_template_with_sessions_cannot_be_deleted(pool: PgPool) {
    let template = squat_template(&pool).await;
    WorkoutSessionRepo::log(&pool, &squat_session(&template, vec![set(1, 8, "")]))
        .await
        .unwrap();

    assert_eq!(
        WorkoutSessionRepo::count_for_template(&pool, template.template.id)
            .await
            .unwrap(),
        1
    );
    assert!(WorkoutTemplateRepo::delete(&pool, template.template.id)
        .await
        .is_err());
}

/// A session filed under another template still counts against the template
/// that owns the line item it cites.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cited_line_item_counts_toward_owning_template(pool: PgPool) {
    let legs = squat_template(&pool).await;
    let push = WorkoutTemplateRepo::create_with_exercises(
        &pool,
        &CreateWorkoutTemplate {
            workout_day: 2,
            workout_name: "Push".to_string(),
            exercises: vec![NewLineItem {
                name: "Bench Press".to_string(),
                sets: 3,
                repetitions: 10,
                weight: "50kg".to_string(),
                rest: 90,
            }],
        },
    )
    .await
    .unwrap();

    let mut input = squat_session(&push, vec![set(1, 10, "50kg")]);
    input.template_id = legs.template.id;
    WorkoutSessionRepo::log(&pool, &input).await.unwrap();

    assert_eq!(
        WorkoutSessionRepo::count_for_template(&pool, push.template.id)
            .await
            .unwrap(),
        1
    );
    assert_eq!(
        WorkoutSessionRepo::count_for_template(&pool, legs.template.id)
            .await
            .unwrap(),
        1
    );
}
