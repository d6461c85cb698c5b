//! Repository for the `weekly_progress` table.
//!
//! Task list columns are written as serialized JSON text and decoded by the
//! model's `FromRow` impl.

use sqlx::PgPool;
use waypoint_core::types::DbId;

use crate::models::weekly_progress::{CreateWeeklyProgress, UpdateWeeklyProgress, WeeklyProgress};

const COLUMNS: &str = "id, milestone_id, week_start_date, week_end_date, completed_this_week, \
                       planned_for_next_week, task_delays, goals_achieved, notes, created_at, \
                       updated_at";

pub struct WeeklyProgressRepo;

impl WeeklyProgressRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateWeeklyProgress,
    ) -> Result<WeeklyProgress, sqlx::Error> {
        let query = format!(
            "INSERT INTO weekly_progress
                (milestone_id, week_start_date, week_end_date, completed_this_week,
                 planned_for_next_week, task_delays, goals_achieved, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WeeklyProgress>(&query)
            .bind(input.milestone_id)
            .bind(input.week_start_date)
            .bind(input.week_end_date)
            .bind(input.completed_this_week.to_text())
            .bind(input.planned_for_next_week.to_text())
            .bind(input.task_delays.to_text())
            .bind(input.goals_achieved)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<WeeklyProgress>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM weekly_progress WHERE id = $1");
        sqlx::query_as::<_, WeeklyProgress>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Entries of the given milestones, most recent week first.
    pub async fn list_by_milestones(
        pool: &PgPool,
        milestone_ids: &[DbId],
    ) -> Result<Vec<WeeklyProgress>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM weekly_progress
             WHERE milestone_id = ANY($1)
             ORDER BY week_start_date DESC, id DESC"
        );
        sqlx::query_as::<_, WeeklyProgress>(&query)
            .bind(milestone_ids)
            .fetch_all(pool)
            .await
    }

    /// Apply a partial update. `notes` is written only when `$8` is true so
    /// that an explicit clear can be told apart from an omitted field.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateWeeklyProgress,
    ) -> Result<Option<WeeklyProgress>, sqlx::Error> {
        let query = format!(
            "UPDATE weekly_progress SET
                week_start_date = COALESCE($2, week_start_date),
                week_end_date = COALESCE($3, week_end_date),
                completed_this_week = COALESCE($4, completed_this_week),
                planned_for_next_week = COALESCE($5, planned_for_next_week),
                task_delays = COALESCE($6, task_delays),
                goals_achieved = COALESCE($7, goals_achieved),
                notes = CASE WHEN $8 THEN $9 ELSE notes END,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WeeklyProgress>(&query)
            .bind(id)
            .bind(input.week_start_date)
            .bind(input.week_end_date)
            .bind(input.completed_this_week.as_ref().map(|t| t.to_text()))
            .bind(input.planned_for_next_week.as_ref().map(|t| t.to_text()))
            .bind(input.task_delays.as_ref().map(|t| t.to_text()))
            .bind(input.goals_achieved)
            .bind(input.notes.is_some())
            .bind(input.notes.clone().flatten())
            .fetch_optional(pool)
            .await
    }

    pub async fn delete_by_milestones(
        pool: &PgPool,
        milestone_ids: &[DbId],
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM weekly_progress WHERE milestone_id = ANY($1)")
            .bind(milestone_ids)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn count_by_projects(
        pool: &PgPool,
        project_ids: &[DbId],
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM weekly_progress wp
             JOIN milestones m ON m.id = wp.milestone_id
             WHERE m.project_id = ANY($1)",
        )
        .bind(project_ids)
        .fetch_one(pool)
        .await
    }
}
