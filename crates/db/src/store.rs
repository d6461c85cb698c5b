//! The record-store seam used by the services.
//!
//! Each entity gets its own trait; [`RecordStore`] combines them. Methods
//! are single-statement operations with last-write-wins semantics and no
//! cross-call transactions. Deletes keyed by a parent id are idempotent:
//! deleting rows that are already gone returns `0`/`false`, not an error.

use async_trait::async_trait;
use waypoint_core::error::CoreError;
use waypoint_core::status::ReminderStatus;
use waypoint_core::types::{DbId, Timestamp};

use crate::models::email_reminder::{CreateEmailReminder, EmailReminder, ReminderListing};
use crate::models::milestone::{CreateMilestone, Milestone, UpdateMilestone};
use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::models::weekly_progress::{CreateWeeklyProgress, UpdateWeeklyProgress, WeeklyProgress};

/// Error type for record-store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The backing store refused the operation.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        CoreError::Internal(err.to_string())
    }
}

#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn insert_project(&self, input: &CreateProject) -> StoreResult<Project>;

    async fn find_project(&self, id: DbId) -> StoreResult<Option<Project>>;

    /// Projects newest first. `created_by: Some(email)` keeps only that
    /// creator's projects; `None` returns all of them.
    async fn list_projects(&self, created_by: Option<&str>) -> StoreResult<Vec<Project>>;

    async fn update_project(&self, id: DbId, input: &UpdateProject)
        -> StoreResult<Option<Project>>;

    async fn delete_project(&self, id: DbId) -> StoreResult<bool>;
}

#[async_trait]
pub trait MilestoneStore: Send + Sync {
    async fn insert_milestone(&self, input: &CreateMilestone) -> StoreResult<Milestone>;

    async fn find_milestone(&self, id: DbId) -> StoreResult<Option<Milestone>>;

    /// Milestones of the given projects, newest first.
    async fn list_milestones(
        &self,
        project_ids: &[DbId],
        current_only: bool,
    ) -> StoreResult<Vec<Milestone>>;

    /// Current milestones of a project other than `exclude`, oldest first
    /// (ties by ascending id).
    async fn list_current_milestones(
        &self,
        project_id: DbId,
        exclude: Option<DbId>,
    ) -> StoreResult<Vec<Milestone>>;

    async fn update_milestone(
        &self,
        id: DbId,
        input: &UpdateMilestone,
    ) -> StoreResult<Option<Milestone>>;

    /// Set `is_current` on every listed milestone. Returns rows changed.
    async fn set_milestones_current(&self, ids: &[DbId], is_current: bool) -> StoreResult<u64>;

    async fn milestone_ids(&self, project_id: DbId) -> StoreResult<Vec<DbId>>;

    async fn delete_milestones_by_project(&self, project_id: DbId) -> StoreResult<u64>;

    async fn count_milestones(&self, project_ids: &[DbId]) -> StoreResult<u64>;
}

#[async_trait]
pub trait ProgressStore: Send + Sync {
    async fn insert_progress(&self, input: &CreateWeeklyProgress) -> StoreResult<WeeklyProgress>;

    async fn find_progress(&self, id: DbId) -> StoreResult<Option<WeeklyProgress>>;

    /// Entries of the given milestones, most recent week first.
    async fn list_progress(&self, milestone_ids: &[DbId]) -> StoreResult<Vec<WeeklyProgress>>;

    async fn update_progress(
        &self,
        id: DbId,
        input: &UpdateWeeklyProgress,
    ) -> StoreResult<Option<WeeklyProgress>>;

    async fn delete_progress_by_milestones(&self, milestone_ids: &[DbId]) -> StoreResult<u64>;

    /// Entries whose milestone belongs to one of the given projects.
    async fn count_progress(&self, project_ids: &[DbId]) -> StoreResult<u64>;
}

#[async_trait]
pub trait ReminderStore: Send + Sync {
    async fn insert_reminder(&self, input: &CreateEmailReminder) -> StoreResult<EmailReminder>;

    async fn find_reminder(&self, id: DbId) -> StoreResult<Option<EmailReminder>>;

    /// Reminders with their project name, earliest reminder date first.
    /// `created_by` filters on the owning project's creator.
    async fn list_reminders(&self, created_by: Option<&str>) -> StoreResult<Vec<ReminderListing>>;

    /// Scheduled reminders with `reminder_date <= now`, earliest first.
    async fn list_due_reminders(&self, now: Timestamp) -> StoreResult<Vec<EmailReminder>>;

    async fn set_reminder_status(
        &self,
        id: DbId,
        status: ReminderStatus,
    ) -> StoreResult<Option<EmailReminder>>;

    async fn delete_reminder(&self, id: DbId) -> StoreResult<bool>;

    async fn delete_reminders_by_project(&self, project_id: DbId) -> StoreResult<u64>;

    async fn count_reminders(
        &self,
        project_ids: &[DbId],
        status: ReminderStatus,
    ) -> StoreResult<u64>;
}

/// The full record store: every entity store plus a liveness check.
#[async_trait]
pub trait RecordStore: ProjectStore + MilestoneStore + ProgressStore + ReminderStore {
    async fn ping(&self) -> StoreResult<()>;
}
