//! Repository for `workout_sessions` and its child tables
//! (`session_exercises`, `exercise_set_logs`).
//!
//! A session and all of its nested rows are written in one transaction and
//! removed together by `ON DELETE CASCADE`.

use std::collections::HashMap;

use liftlog_core::types::DbId;
use sqlx::{FromRow, PgConnection, PgPool};

use crate::models::exercise_template::ExerciseTemplate;
use crate::models::workout_session::{
    ExerciseSetLog, LogWorkoutSession, SessionExercise, SessionExerciseDetail, SetLogSummary,
    WorkoutSession, WorkoutSessionWithDetails,
};
use crate::models::workout_template::WorkoutTemplate;
use crate::repositories::exercise_template_repo::ExerciseTemplateRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, template_id, date, is_completed, created_at";

const SESSION_EXERCISE_COLUMNS: &str =
    "id, workout_session_id, exercise_template_id, exercise_id, sets";

const SET_LOG_COLUMNS: &str = "id, session_exercise_id, set_number, repetitions, weight";

const TEMPLATE_COLUMNS: &str = "id, workout_day, workout_name, created_at, updated_at";

/// A session exercise joined with its exercise name.
#[derive(Debug, FromRow)]
struct SessionExerciseRow {
    #[sqlx(flatten)]
    session_exercise: SessionExercise,
    exercise_name: String,
}

/// Provides logging, history reads and deletion for workout sessions.
pub struct WorkoutSessionRepo;

impl WorkoutSessionRepo {
    /// Create a session with all of its exercise and set rows atomically.
    ///
    /// Each session exercise stores `sets = set_logs.len()`, the number of
    /// sets actually performed. Either every row is written or none is.
    pub async fn log(
        pool: &PgPool,
        input: &LogWorkoutSession,
    ) -> Result<WorkoutSessionWithDetails, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let session_query = format!(
            "INSERT INTO workout_sessions (template_id, date, is_completed) \
             VALUES ($1, $2, COALESCE($3, TRUE)) \
             RETURNING {COLUMNS}"
        );
        let session = sqlx::query_as::<_, WorkoutSession>(&session_query)
            .bind(input.template_id)
            .bind(input.date)
            .bind(input.is_completed)
            .fetch_one(&mut *tx)
            .await?;

        let exercise_query = format!(
            "INSERT INTO session_exercises \
                (workout_session_id, exercise_template_id, exercise_id, sets) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {SESSION_EXERCISE_COLUMNS}"
        );
        let set_query =
            "INSERT INTO exercise_set_logs (session_exercise_id, set_number, repetitions, weight) \
             VALUES ($1, $2, $3, $4)";

        for exercise in &input.exercises {
            let sets = i32::try_from(exercise.set_logs.len())
                .map_err(|e| sqlx::Error::Protocol(format!("too many sets: {e}")))?;
            let session_exercise = sqlx::query_as::<_, SessionExercise>(&exercise_query)
                .bind(session.id)
                .bind(exercise.exercise_template_id)
                .bind(exercise.exercise_id)
                .bind(sets)
                .fetch_one(&mut *tx)
                .await?;

            for set in &exercise.set_logs {
                sqlx::query(set_query)
                    .bind(session_exercise.id)
                    .bind(set.set_number)
                    .bind(set.repetitions)
                    .bind(&set.weight)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        let mut detailed = load_details(&mut tx, vec![session]).await?;
        tx.commit().await?;

        detailed.pop().ok_or(sqlx::Error::RowNotFound)
    }

    /// Find a session by ID with its template, exercises and set logs.
    pub async fn find_by_id_with_details(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<WorkoutSessionWithDetails>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        let query = format!("SELECT {COLUMNS} FROM workout_sessions WHERE id = $1");
        let Some(session) = sqlx::query_as::<_, WorkoutSession>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
        else {
            return Ok(None);
        };
        let mut detailed = load_details(&mut conn, vec![session]).await?;
        Ok(detailed.pop())
    }

    /// List every session, most recently created first, with nested data.
    pub async fn list_with_details(
        pool: &PgPool,
    ) -> Result<Vec<WorkoutSessionWithDetails>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        let query =
            format!("SELECT {COLUMNS} FROM workout_sessions ORDER BY created_at DESC, id DESC");
        let sessions = sqlx::query_as::<_, WorkoutSession>(&query)
            .fetch_all(&mut *conn)
            .await?;
        load_details(&mut conn, sessions).await
    }

    /// Count sessions that depend on a template: logged against it, or
    /// citing one of its line items.
    pub async fn count_for_template(pool: &PgPool, template_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM workout_sessions ws \
             WHERE ws.template_id = $1 \
                OR EXISTS ( \
                    SELECT 1 FROM session_exercises se \
                    JOIN exercise_templates et ON et.id = se.exercise_template_id \
                    WHERE se.workout_session_id = ws.id \
                      AND et.workout_template_id = $1 \
                )",
        )
        .bind(template_id)
        .fetch_one(pool)
        .await
    }

    /// Set logs from the most recent session that included `exercise_id`.
    ///
    /// "Most recent" is the parent session with the greatest `created_at`
    /// (higher id on ties). Returns `None` if the exercise was never logged.
    pub async fn last_session_sets_for_exercise(
        pool: &PgPool,
        exercise_id: DbId,
    ) -> Result<Option<Vec<SetLogSummary>>, sqlx::Error> {
        let mut conn = pool.acquire().await?;

        let latest = sqlx::query_scalar::<_, DbId>(
            "SELECT se.id \
             FROM session_exercises se \
             JOIN workout_sessions ws ON ws.id = se.workout_session_id \
             WHERE se.exercise_id = $1 \
             ORDER BY ws.created_at DESC, ws.id DESC, se.id DESC \
             LIMIT 1",
        )
        .bind(exercise_id)
        .fetch_optional(&mut *conn)
        .await?;

        let Some(session_exercise_id) = latest else {
            return Ok(None);
        };

        let sets = sqlx::query_as::<_, SetLogSummary>(
            "SELECT set_number, repetitions, weight \
             FROM exercise_set_logs \
             WHERE session_exercise_id = $1 \
             ORDER BY set_number",
        )
        .bind(session_exercise_id)
        .fetch_all(&mut *conn)
        .await?;
        Ok(Some(sets))
    }

    /// Delete a session; its exercises and set logs go with it by cascade.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM workout_sessions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Attach templates, exercises, line items and set logs to `sessions`,
/// preserving the order of `sessions`.
async fn load_details(
    conn: &mut PgConnection,
    sessions: Vec<WorkoutSession>,
) -> Result<Vec<WorkoutSessionWithDetails>, sqlx::Error> {
    if sessions.is_empty() {
        return Ok(Vec::new());
    }

    let session_ids: Vec<DbId> = sessions.iter().map(|s| s.id).collect();
    let template_ids: Vec<DbId> = sessions.iter().map(|s| s.template_id).collect();

    let template_query =
        format!("SELECT {TEMPLATE_COLUMNS} FROM workout_templates WHERE id = ANY($1)");
    let templates: HashMap<DbId, WorkoutTemplate> =
        sqlx::query_as::<_, WorkoutTemplate>(&template_query)
            .bind(&template_ids)
            .fetch_all(&mut *conn)
            .await?
            .into_iter()
            .map(|t| (t.id, t))
            .collect();

    let exercise_query = format!(
        "SELECT se.id, se.workout_session_id, se.exercise_template_id, se.exercise_id, se.sets, \
                e.name AS exercise_name \
         FROM session_exercises se \
         JOIN exercises e ON e.id = se.exercise_id \
         WHERE se.workout_session_id = ANY($1) \
         ORDER BY se.workout_session_id, se.id"
    );
    let exercise_rows = sqlx::query_as::<_, SessionExerciseRow>(&exercise_query)
        .bind(&session_ids)
        .fetch_all(&mut *conn)
        .await?;

    let line_item_ids: Vec<DbId> = exercise_rows
        .iter()
        .map(|row| row.session_exercise.exercise_template_id)
        .collect();
    let line_items: HashMap<DbId, ExerciseTemplate> =
        ExerciseTemplateRepo::find_many(&mut *conn, &line_item_ids)
            .await?
            .into_iter()
            .map(|item| (item.id, item))
            .collect();

    let session_exercise_ids: Vec<DbId> = exercise_rows
        .iter()
        .map(|row| row.session_exercise.id)
        .collect();
    let set_query = format!(
        "SELECT {SET_LOG_COLUMNS} FROM exercise_set_logs \
         WHERE session_exercise_id = ANY($1) \
         ORDER BY session_exercise_id, set_number"
    );
    let mut set_logs: HashMap<DbId, Vec<ExerciseSetLog>> = HashMap::new();
    for log in sqlx::query_as::<_, ExerciseSetLog>(&set_query)
        .bind(&session_exercise_ids)
        .fetch_all(&mut *conn)
        .await?
    {
        set_logs.entry(log.session_exercise_id).or_default().push(log);
    }

    let mut exercises: HashMap<DbId, Vec<SessionExerciseDetail>> = HashMap::new();
    for row in exercise_rows {
        let session_exercise = row.session_exercise;
        exercises
            .entry(session_exercise.workout_session_id)
            .or_default()
            .push(SessionExerciseDetail {
                exercise_name: row.exercise_name,
                exercise_template: line_items
                    .get(&session_exercise.exercise_template_id)
                    .cloned(),
                set_logs: set_logs.remove(&session_exercise.id).unwrap_or_default(),
                session_exercise,
            });
    }

    Ok(sessions
        .into_iter()
        .map(|session| WorkoutSessionWithDetails {
            template: templates.get(&session.template_id).cloned(),
            exercises: exercises.remove(&session.id).unwrap_or_default(),
            session,
        })
        .collect())
}
