//! Integration tests for the exercise registry.
//!
//! Verifies find-or-create semantics against a real database:
//! - Repeated calls with one name return the same row
//! - Concurrent calls with one name produce exactly one row
//! - Lookups are case-sensitive and ignore surrounding whitespace

use liftlog_db::repositories::ExerciseRepo;
use sqlx::PgPool;

async fn count_named(pool: &PgPool, name: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM exercises WHERE name = $1")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_or_create_creates_then_finds(pool: PgPool) {
    let (first, created) = ExerciseRepo::find_or_create(&pool, "Squat").await.unwrap();
    assert!(created);
    assert_eq!(first.name, "Squat");

    let (second, created_again) = ExerciseRepo::find_or_create(&pool, "Squat").await.unwrap();
    assert!(!created_again);
    assert_eq!(second.id, first.id);

    assert_eq!(count_named(&pool, "Squat").await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_find_or_create_yields_one_row(pool: PgPool) {
    let (a, b) = tokio::join!(
        ExerciseRepo::find_or_create(&pool, "Deadlift"),
        ExerciseRepo::find_or_create(&pool, "Deadlift"),
    );
    let (a, a_created) = a.unwrap();
    let (b, b_created) = b.unwrap();

    assert_eq!(a.id, b.id);
    assert!(a_created ^ b_created, "exactly one caller should insert");
    assert_eq!(count_named(&pool, "Deadlift").await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_many_concurrent_callers_share_one_id(pool: PgPool) {
    let mut handles = Vec::new();
    for _ in 0..8 {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            ExerciseRepo::find_or_create(&pool, "Overhead press")
                .await
                .unwrap()
                .0
                .id
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap());
    }
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 1);
    assert_eq!(count_named(&pool, "Overhead press").await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_names_are_case_sensitive(pool: PgPool) {
    let (upper, _) = ExerciseRepo::find_or_create(&pool, "Bench Press").await.unwrap();
    let (lower, created) = ExerciseRepo::find_or_create(&pool, "bench press").await.unwrap();

    assert!(created);
    assert_ne!(upper.id, lower.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_surrounding_whitespace_is_ignored(pool: PgPool) {
    let (plain, _) = ExerciseRepo::find_or_create(&pool, "Row").await.unwrap();
    let (padded, created) = ExerciseRepo::find_or_create(&pool, "  Row ").await.unwrap();

    assert!(!created);
    assert_eq!(plain.id, padded.id);
    assert_eq!(padded.name, "Row");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_and_lookup(pool: PgPool) {
    ExerciseRepo::find_or_create(&pool, "Lunge").await.unwrap();
    let (curl, _) = ExerciseRepo::find_or_create(&pool, "Curl").await.unwrap();

    let names: Vec<String> = ExerciseRepo::list(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(names, vec!["Curl".to_string(), "Lunge".to_string()]);

    let by_id = ExerciseRepo::find_by_id(&pool, curl.id).await.unwrap().unwrap();
    assert_eq!(by_id.name, "Curl");
    let by_name = ExerciseRepo::find_by_name(&pool, "Curl").await.unwrap().unwrap();
    assert_eq!(by_name.id, curl.id);

    assert!(ExerciseRepo::find_by_id(&pool, 999_999).await.unwrap().is_none());
    assert!(ExerciseRepo::find_by_name(&pool, "curl").await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_blank_name_rejected_by_store(pool: PgPool) {
    let result = ExerciseRepo::find_or_create(&pool, "   ").await;
    assert!(result.is_err());
}
