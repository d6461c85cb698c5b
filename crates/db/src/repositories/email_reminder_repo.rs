//! Repository for the `email_reminders` table.

use sqlx::PgPool;
use waypoint_core::status::ReminderStatus;
use waypoint_core::types::{DbId, Timestamp};

use crate::models::email_reminder::{CreateEmailReminder, EmailReminder, ReminderListing};

const COLUMNS: &str = "id, project_id, subject, message, recipient_email, reminder_date, status, \
                       created_at, updated_at";

/// Same columns qualified with the `r` alias, for joins against `projects`.
const JOINED_COLUMNS: &str = "r.id, r.project_id, r.subject, r.message, r.recipient_email, \
                              r.reminder_date, r.status, r.created_at, r.updated_at";

pub struct EmailReminderRepo;

impl EmailReminderRepo {
    /// Insert a reminder in the `scheduled` state.
    pub async fn create(
        pool: &PgPool,
        input: &CreateEmailReminder,
    ) -> Result<EmailReminder, sqlx::Error> {
        let query = format!(
            "INSERT INTO email_reminders
                (project_id, subject, message, recipient_email, reminder_date, status)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EmailReminder>(&query)
            .bind(input.project_id)
            .bind(&input.subject)
            .bind(&input.message)
            .bind(&input.recipient_email)
            .bind(input.reminder_date)
            .bind(ReminderStatus::Scheduled.as_str())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<EmailReminder>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM email_reminders WHERE id = $1");
        sqlx::query_as::<_, EmailReminder>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Reminders with their project name, earliest reminder date first.
    pub async fn list_with_project(
        pool: &PgPool,
        created_by: Option<&str>,
    ) -> Result<Vec<ReminderListing>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}, p.name AS project_name
             FROM email_reminders r
             JOIN projects p ON p.id = r.project_id
             WHERE ($1::TEXT IS NULL OR p.created_by = $1)
             ORDER BY r.reminder_date ASC, r.id ASC"
        );
        sqlx::query_as::<_, ReminderListing>(&query)
            .bind(created_by)
            .fetch_all(pool)
            .await
    }

    /// Scheduled reminders whose date has passed, earliest first.
    pub async fn list_due(
        pool: &PgPool,
        now: Timestamp,
    ) -> Result<Vec<EmailReminder>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM email_reminders
             WHERE status = $1 AND reminder_date <= $2
             ORDER BY reminder_date ASC, id ASC"
        );
        sqlx::query_as::<_, EmailReminder>(&query)
            .bind(ReminderStatus::Scheduled.as_str())
            .bind(now)
            .fetch_all(pool)
            .await
    }

    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: ReminderStatus,
    ) -> Result<Option<EmailReminder>, sqlx::Error> {
        let query = format!(
            "UPDATE email_reminders SET status = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EmailReminder>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM email_reminders WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_by_project(pool: &PgPool, project_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM email_reminders WHERE project_id = $1")
            .bind(project_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn count_by_projects(
        pool: &PgPool,
        project_ids: &[DbId],
        status: ReminderStatus,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM email_reminders WHERE project_id = ANY($1) AND status = $2",
        )
        .bind(project_ids)
        .bind(status.as_str())
        .fetch_one(pool)
        .await
    }
}
