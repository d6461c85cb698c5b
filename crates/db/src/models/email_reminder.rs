//! E-mail reminder entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use waypoint_core::status::ReminderStatus;
use waypoint_core::types::{DbId, Timestamp};

/// A row from the `email_reminders` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EmailReminder {
    pub id: DbId,
    pub project_id: DbId,
    pub subject: String,
    pub message: String,
    pub recipient_email: String,
    pub reminder_date: Timestamp,
    #[sqlx(try_from = "String")]
    pub status: ReminderStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl EmailReminder {
    /// Whether the reminder should go out in a sweep at `now`.
    pub fn is_due(&self, now: Timestamp) -> bool {
        self.status == ReminderStatus::Scheduled && self.reminder_date <= now
    }
}

/// A reminder joined with the name of its project, for listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReminderListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub reminder: EmailReminder,
    pub project_name: String,
}

/// DTO for inserting a reminder. New reminders always start `scheduled`.
#[derive(Debug, Clone)]
pub struct CreateEmailReminder {
    pub project_id: DbId,
    pub subject: String,
    pub message: String,
    pub recipient_email: String,
    pub reminder_date: Timestamp,
}
