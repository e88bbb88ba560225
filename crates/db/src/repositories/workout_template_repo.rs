//! Repository for the `workout_templates` table.
//!
//! Template writes that touch line items run in one transaction so a
//! concurrent reader never sees a half-applied template.

use std::collections::{HashMap, HashSet};

use liftlog_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::exercise_template::{ExerciseTemplateWithName, LineItemOutcome};
use crate::models::workout_template::{
    CreateWorkoutTemplate, TemplateUpdateResult, UpdateWorkoutTemplate, WorkoutTemplate,
    WorkoutTemplateWithExercises,
};
use crate::repositories::exercise_repo::ExerciseRepo;
use crate::repositories::exercise_template_repo::{ExerciseTemplateRepo, LineItemTargets};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, workout_day, workout_name, created_at, updated_at";

/// Provides CRUD and reconciliation for workout templates.
pub struct WorkoutTemplateRepo;

impl WorkoutTemplateRepo {
    /// List all templates ordered by programme day.
    pub async fn list(pool: &PgPool) -> Result<Vec<WorkoutTemplate>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM workout_templates ORDER BY workout_day, id");
        sqlx::query_as::<_, WorkoutTemplate>(&query)
            .fetch_all(pool)
            .await
    }

    /// List all templates ordered by programme day, each with its line items.
    pub async fn list_with_exercises(
        pool: &PgPool,
        include_inactive: bool,
    ) -> Result<Vec<WorkoutTemplateWithExercises>, sqlx::Error> {
        let templates = Self::list(pool).await?;
        let ids: Vec<DbId> = templates.iter().map(|t| t.id).collect();
        let line_items =
            ExerciseTemplateRepo::list_for_templates(pool, &ids, include_inactive).await?;

        let mut by_template: HashMap<DbId, Vec<ExerciseTemplateWithName>> = HashMap::new();
        for item in line_items {
            by_template
                .entry(item.line_item.workout_template_id)
                .or_default()
                .push(item);
        }

        Ok(templates
            .into_iter()
            .map(|template| {
                let exercises = by_template.remove(&template.id).unwrap_or_default();
                WorkoutTemplateWithExercises {
                    template,
                    exercises,
                }
            })
            .collect())
    }

    /// Find a template by its internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<WorkoutTemplate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workout_templates WHERE id = $1");
        sqlx::query_as::<_, WorkoutTemplate>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a template by ID with its active line items.
    pub async fn find_by_id_with_exercises(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<WorkoutTemplateWithExercises>, sqlx::Error> {
        let Some(template) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let exercises = ExerciseTemplateRepo::list_for_template(pool, id, false).await?;
        Ok(Some(WorkoutTemplateWithExercises {
            template,
            exercises,
        }))
    }

    /// Insert a template and its line items in one transaction.
    ///
    /// Exercises are resolved by name through the registry, so repeated
    /// names reuse the same exercise row.
    pub async fn create_with_exercises(
        pool: &PgPool,
        input: &CreateWorkoutTemplate,
    ) -> Result<WorkoutTemplateWithExercises, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let created = Self::create_inner(&mut tx, input).await?;
        tx.commit().await?;
        Ok(created)
    }

    /// Insert several templates in one transaction; all or none are created.
    pub async fn create_many(
        pool: &PgPool,
        inputs: &[CreateWorkoutTemplate],
    ) -> Result<Vec<WorkoutTemplateWithExercises>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut created = Vec::with_capacity(inputs.len());
        for input in inputs {
            created.push(Self::create_inner(&mut tx, input).await?);
        }
        tx.commit().await?;
        Ok(created)
    }

    /// Apply a reconciliation update to a template and its line items.
    ///
    /// 1. Replace the template's day and name.
    /// 2. Retire every active line item whose id is missing from the payload.
    /// 3. For each payload entry: retire (`remove`), update and reactivate
    ///    (`id`), or create (no `id`).
    ///
    /// Entries whose id is unknown or belongs to another template are
    /// reported as [`LineItemOutcome::Rejected`] and do not abort the batch.
    /// Returns `None` if the template does not exist.
    pub async fn update_with_exercises(
        pool: &PgPool,
        id: DbId,
        input: &UpdateWorkoutTemplate,
    ) -> Result<Option<TemplateUpdateResult>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let update_query = format!(
            "UPDATE workout_templates SET \
                workout_day = $2, \
                workout_name = $3 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let Some(updated_template) = sqlx::query_as::<_, WorkoutTemplate>(&update_query)
            .bind(id)
            .bind(input.workout_day)
            .bind(input.workout_name.trim())
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let currently_active = ExerciseTemplateRepo::active_for_template_inner(&mut tx, id).await?;
        let payload_ids: HashSet<DbId> = input.exercises.iter().filter_map(|e| e.id).collect();

        let mut retired_ids = Vec::new();
        for line_item in currently_active
            .iter()
            .filter(|item| !payload_ids.contains(&item.id))
        {
            if ExerciseTemplateRepo::retire_inner(&mut tx, id, line_item.id)
                .await?
                .is_some()
            {
                retired_ids.push(line_item.id);
            }
        }

        let mut processed_exercises = Vec::with_capacity(input.exercises.len());
        for entry in &input.exercises {
            let targets = LineItemTargets {
                sets: entry.sets.unwrap_or_default(),
                repetitions: entry.repetitions.unwrap_or_default(),
                weight: &entry.weight,
                rest: entry.rest,
            };

            let outcome = match entry.id {
                Some(line_item_id) if entry.remove => {
                    match ExerciseTemplateRepo::retire_inner(&mut tx, id, line_item_id).await? {
                        Some(line_item) => LineItemOutcome::Retired { line_item },
                        None => rejected(line_item_id, id),
                    }
                }
                Some(line_item_id) => {
                    match ExerciseTemplateRepo::update_targets_inner(
                        &mut tx,
                        id,
                        line_item_id,
                        targets,
                    )
                    .await?
                    {
                        Some(line_item) => LineItemOutcome::Updated { line_item },
                        None => rejected(line_item_id, id),
                    }
                }
                None => {
                    let name = entry.name.as_deref().unwrap_or_default();
                    let (exercise, _) = ExerciseRepo::find_or_create_inner(&mut tx, name).await?;
                    let line_item =
                        ExerciseTemplateRepo::insert_inner(&mut tx, id, exercise.id, targets)
                            .await?;
                    LineItemOutcome::Created { line_item }
                }
            };
            processed_exercises.push(outcome);
        }

        tx.commit().await?;

        tracing::debug!(
            template_id = id,
            retired_missing = retired_ids.len(),
            processed = processed_exercises.len(),
            "Reconciled template line items"
        );

        Ok(Some(TemplateUpdateResult {
            updated_template,
            processed_exercises,
            retired_ids,
        }))
    }

    /// Delete a template and (by cascade) its line items.
    ///
    /// Returns `true` if a row was removed. Fails with a foreign-key error
    /// if sessions were logged against the template.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM workout_templates WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

impl WorkoutTemplateRepo {
    async fn create_inner(
        tx: &mut Transaction<'_, Postgres>,
        input: &CreateWorkoutTemplate,
    ) -> Result<WorkoutTemplateWithExercises, sqlx::Error> {
        let insert_query = format!(
            "INSERT INTO workout_templates (workout_day, workout_name) \
             VALUES ($1, $2) \
             RETURNING {COLUMNS}"
        );
        let template = sqlx::query_as::<_, WorkoutTemplate>(&insert_query)
            .bind(input.workout_day)
            .bind(input.workout_name.trim())
            .fetch_one(&mut **tx)
            .await?;

        let mut exercises = Vec::with_capacity(input.exercises.len());
        for item in &input.exercises {
            let (exercise, _) = ExerciseRepo::find_or_create_inner(tx, &item.name).await?;
            let line_item = ExerciseTemplateRepo::insert_inner(
                tx,
                template.id,
                exercise.id,
                LineItemTargets {
                    sets: item.sets,
                    repetitions: item.repetitions,
                    weight: &item.weight,
                    rest: item.rest,
                },
            )
            .await?;
            exercises.push(ExerciseTemplateWithName {
                line_item,
                exercise_name: exercise.name,
            });
        }

        Ok(WorkoutTemplateWithExercises {
            template,
            exercises,
        })
    }
}

fn rejected(line_item_id: DbId, template_id: DbId) -> LineItemOutcome {
    LineItemOutcome::Rejected {
        id: line_item_id,
        reason: format!("Line item {line_item_id} does not belong to template {template_id}"),
    }
}
