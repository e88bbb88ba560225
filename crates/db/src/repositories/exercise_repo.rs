//! Repository for the `exercises` table (the exercise registry).

use liftlog_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::exercise::Exercise;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, created_at";

/// Provides lookups and find-or-create for exercises.
pub struct ExerciseRepo;

impl ExerciseRepo {
    /// List all exercises ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Exercise>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM exercises ORDER BY name, id");
        sqlx::query_as::<_, Exercise>(&query).fetch_all(pool).await
    }

    /// Find an exercise by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Exercise>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM exercises WHERE id = $1");
        sqlx::query_as::<_, Exercise>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an exercise by exact (case-sensitive) name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Exercise>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM exercises WHERE name = $1");
        sqlx::query_as::<_, Exercise>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Return the exercise called `name`, creating it if absent.
    ///
    /// The boolean is `true` when this call inserted the row. Concurrent
    /// callers with the same name all receive the same row.
    pub async fn find_or_create(
        pool: &PgPool,
        name: &str,
    ) -> Result<(Exercise, bool), sqlx::Error> {
        let mut tx = pool.begin().await?;
        let result = Self::find_or_create_inner(&mut tx, name).await?;
        tx.commit().await?;
        Ok(result)
    }

    /// Find-or-create within an existing transaction.
    ///
    /// The insert is conditional on `uq_exercises_name`; when it yields no
    /// row another writer owns the name, so the committed row is re-read.
    pub(crate) async fn find_or_create_inner(
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
    ) -> Result<(Exercise, bool), sqlx::Error> {
        let name = name.trim();

        let insert_query = format!(
            "INSERT INTO exercises (name) VALUES ($1) \
             ON CONFLICT ON CONSTRAINT uq_exercises_name DO NOTHING \
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, Exercise>(&insert_query)
            .bind(name)
            .fetch_optional(&mut **tx)
            .await?;

        if let Some(exercise) = inserted {
            return Ok((exercise, true));
        }

        let select_query = format!("SELECT {COLUMNS} FROM exercises WHERE name = $1");
        let existing = sqlx::query_as::<_, Exercise>(&select_query)
            .bind(name)
            .fetch_one(&mut **tx)
            .await?;
        Ok((existing, false))
    }
}
