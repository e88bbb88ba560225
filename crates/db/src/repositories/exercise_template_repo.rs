//! Repository for the `exercise_templates` table (template line items).
//!
//! Line items are never hard-deleted here; removal is a status change to
//! [`LineItemStatus::Retired`].

use liftlog_core::types::DbId;
use sqlx::{PgExecutor, PgPool, Postgres, Transaction};

use crate::models::exercise_template::{ExerciseTemplate, ExerciseTemplateWithName};
use crate::models::status::LineItemStatus;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, workout_template_id, exercise_id, sets, repetitions, weight, rest, \
    status_id, created_at, updated_at";

/// Same columns, qualified for queries that join `exercises e`.
const JOINED_COLUMNS: &str = "et.id, et.workout_template_id, et.exercise_id, et.sets, \
    et.repetitions, et.weight, et.rest, et.status_id, et.created_at, et.updated_at, \
    e.name AS exercise_name";

/// Target values written by inserts and updates.
#[derive(Debug, Clone, Copy)]
pub struct LineItemTargets<'a> {
    pub sets: i32,
    pub repetitions: i32,
    pub weight: &'a str,
    pub rest: i32,
}

/// Provides queries and status transitions for template line items.
pub struct ExerciseTemplateRepo;

impl ExerciseTemplateRepo {
    /// Find a line item by its internal ID, whatever its status.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ExerciseTemplate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM exercise_templates WHERE id = $1");
        sqlx::query_as::<_, ExerciseTemplate>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List line items of a template with exercise names, in insertion order.
    ///
    /// Only active rows are returned unless `include_inactive` is set.
    pub async fn list_for_template(
        pool: &PgPool,
        workout_template_id: DbId,
        include_inactive: bool,
    ) -> Result<Vec<ExerciseTemplateWithName>, sqlx::Error> {
        Self::list_for_templates(pool, &[workout_template_id], include_inactive).await
    }

    /// Batched variant of [`Self::list_for_template`] over several templates.
    pub async fn list_for_templates(
        pool: &PgPool,
        workout_template_ids: &[DbId],
        include_inactive: bool,
    ) -> Result<Vec<ExerciseTemplateWithName>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} \
             FROM exercise_templates et \
             JOIN exercises e ON e.id = et.exercise_id \
             WHERE et.workout_template_id = ANY($1) \
               AND ($2 OR et.status_id = $3) \
             ORDER BY et.workout_template_id, et.id"
        );
        sqlx::query_as::<_, ExerciseTemplateWithName>(&query)
            .bind(workout_template_ids)
            .bind(include_inactive)
            .bind(LineItemStatus::Active.id())
            .fetch_all(pool)
            .await
    }

    /// Fetch line items by ID, whatever their status.
    ///
    /// Accepts any executor so session reads can reuse their connection.
    pub async fn find_many<'e, E>(
        executor: E,
        ids: &[DbId],
    ) -> Result<Vec<ExerciseTemplate>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM exercise_templates WHERE id = ANY($1)");
        sqlx::query_as::<_, ExerciseTemplate>(&query)
            .bind(ids)
            .fetch_all(executor)
            .await
    }

    // -----------------------------------------------------------------------
    // Transaction helpers used by template writes
    // -----------------------------------------------------------------------

    /// Insert an active line item within an existing transaction.
    pub(crate) async fn insert_inner(
        tx: &mut Transaction<'_, Postgres>,
        workout_template_id: DbId,
        exercise_id: DbId,
        targets: LineItemTargets<'_>,
    ) -> Result<ExerciseTemplate, sqlx::Error> {
        let query = format!(
            "INSERT INTO exercise_templates \
                (workout_template_id, exercise_id, sets, repetitions, weight, rest, status_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ExerciseTemplate>(&query)
            .bind(workout_template_id)
            .bind(exercise_id)
            .bind(targets.sets)
            .bind(targets.repetitions)
            .bind(targets.weight)
            .bind(targets.rest)
            .bind(LineItemStatus::Active.id())
            .fetch_one(&mut **tx)
            .await
    }

    /// Lock and return the active line items of a template.
    pub(crate) async fn active_for_template_inner(
        tx: &mut Transaction<'_, Postgres>,
        workout_template_id: DbId,
    ) -> Result<Vec<ExerciseTemplate>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM exercise_templates \
             WHERE workout_template_id = $1 AND status_id = $2 \
             ORDER BY id \
             FOR UPDATE"
        );
        sqlx::query_as::<_, ExerciseTemplate>(&query)
            .bind(workout_template_id)
            .bind(LineItemStatus::Active.id())
            .fetch_all(&mut **tx)
            .await
    }

    /// Retire a line item belonging to `workout_template_id`.
    ///
    /// Returns `None` if no such line item exists in that template.
    pub(crate) async fn retire_inner(
        tx: &mut Transaction<'_, Postgres>,
        workout_template_id: DbId,
        id: DbId,
    ) -> Result<Option<ExerciseTemplate>, sqlx::Error> {
        let query = format!(
            "UPDATE exercise_templates SET status_id = $3 \
             WHERE id = $1 AND workout_template_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ExerciseTemplate>(&query)
            .bind(id)
            .bind(workout_template_id)
            .bind(LineItemStatus::Retired.id())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Replace the targets of a line item and force it active.
    ///
    /// Returns `None` if no such line item exists in that template.
    pub(crate) async fn update_targets_inner(
        tx: &mut Transaction<'_, Postgres>,
        workout_template_id: DbId,
        id: DbId,
        targets: LineItemTargets<'_>,
    ) -> Result<Option<ExerciseTemplate>, sqlx::Error> {
        let query = format!(
            "UPDATE exercise_templates SET \
                sets = $3, \
                repetitions = $4, \
                weight = $5, \
                rest = $6, \
                status_id = $7 \
             WHERE id = $1 AND workout_template_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ExerciseTemplate>(&query)
            .bind(id)
            .bind(workout_template_id)
            .bind(targets.sets)
            .bind(targets.repetitions)
            .bind(targets.weight)
            .bind(targets.rest)
            .bind(LineItemStatus::Active.id())
            .fetch_optional(&mut **tx)
            .await
    }
}
