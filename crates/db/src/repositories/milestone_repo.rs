//! Repository for the `milestones` table.

use sqlx::PgPool;
use waypoint_core::types::DbId;

use crate::models::milestone::{CreateMilestone, Milestone, UpdateMilestone};

const COLUMNS: &str = "id, project_id, title, description, status, is_current, target_date, \
                       created_at, updated_at";

/// Provides CRUD and bulk operations for milestones.
pub struct MilestoneRepo;

impl MilestoneRepo {
    pub async fn create(pool: &PgPool, input: &CreateMilestone) -> Result<Milestone, sqlx::Error> {
        let query = format!(
            "INSERT INTO milestones (project_id, title, description, status, is_current, target_date)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Milestone>(&query)
            .bind(input.project_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status.as_str())
            .bind(input.is_current)
            .bind(input.target_date)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Milestone>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM milestones WHERE id = $1");
        sqlx::query_as::<_, Milestone>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Milestones of the given projects, newest first.
    pub async fn list_by_projects(
        pool: &PgPool,
        project_ids: &[DbId],
        current_only: bool,
    ) -> Result<Vec<Milestone>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM milestones
             WHERE project_id = ANY($1) AND ($2 = FALSE OR is_current)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Milestone>(&query)
            .bind(project_ids)
            .bind(current_only)
            .fetch_all(pool)
            .await
    }

    /// Current milestones of a project except `exclude`, oldest first.
    pub async fn list_current(
        pool: &PgPool,
        project_id: DbId,
        exclude: Option<DbId>,
    ) -> Result<Vec<Milestone>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM milestones
             WHERE project_id = $1 AND is_current AND ($2::BIGINT IS NULL OR id <> $2)
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Milestone>(&query)
            .bind(project_id)
            .bind(exclude)
            .fetch_all(pool)
            .await
    }

    /// Apply a partial update. Only non-`None` fields are written.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMilestone,
    ) -> Result<Option<Milestone>, sqlx::Error> {
        let query = format!(
            "UPDATE milestones SET
                is_current = COALESCE($2, is_current),
                status = COALESCE($3, status),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Milestone>(&query)
            .bind(id)
            .bind(input.is_current)
            .bind(input.status.map(|s| s.as_str()))
            .fetch_optional(pool)
            .await
    }

    /// Set `is_current` on many milestones at once. Returns rows changed.
    pub async fn set_current_many(
        pool: &PgPool,
        ids: &[DbId],
        is_current: bool,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE milestones SET is_current = $2, updated_at = NOW()
             WHERE id = ANY($1) AND is_current <> $2",
        )
        .bind(ids)
        .bind(is_current)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn ids_by_project(pool: &PgPool, project_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("SELECT id FROM milestones WHERE project_id = $1")
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    pub async fn delete_by_project(pool: &PgPool, project_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM milestones WHERE project_id = $1")
            .bind(project_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn count_by_projects(pool: &PgPool, project_ids: &[DbId]) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM milestones WHERE project_id = ANY($1)")
            .bind(project_ids)
            .fetch_one(pool)
            .await
    }
}
