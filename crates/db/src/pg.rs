//! Postgres-backed [`RecordStore`] delegating to the repositories.

use async_trait::async_trait;
use sqlx::PgPool;
use waypoint_core::status::ReminderStatus;
use waypoint_core::types::{DbId, Timestamp};

use crate::models::email_reminder::{CreateEmailReminder, EmailReminder, ReminderListing};
use crate::models::milestone::{CreateMilestone, Milestone, UpdateMilestone};
use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::models::weekly_progress::{CreateWeeklyProgress, UpdateWeeklyProgress, WeeklyProgress};
use crate::repositories::{EmailReminderRepo, MilestoneRepo, ProjectRepo, WeeklyProgressRepo};
use crate::store::{
    MilestoneStore, ProgressStore, ProjectStore, RecordStore, ReminderStore, StoreResult,
};

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `COUNT(*)` never goes negative.
fn count(n: i64) -> u64 {
    u64::try_from(n).unwrap_or_default()
}

#[async_trait]
impl ProjectStore for PgStore {
    async fn insert_project(&self, input: &CreateProject) -> StoreResult<Project> {
        Ok(ProjectRepo::create(&self.pool, input).await?)
    }

    async fn find_project(&self, id: DbId) -> StoreResult<Option<Project>> {
        Ok(ProjectRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_projects(&self, created_by: Option<&str>) -> StoreResult<Vec<Project>> {
        Ok(ProjectRepo::list(&self.pool, created_by).await?)
    }

    async fn update_project(
        &self,
        id: DbId,
        input: &UpdateProject,
    ) -> StoreResult<Option<Project>> {
        Ok(ProjectRepo::update(&self.pool, id, input).await?)
    }

    async fn delete_project(&self, id: DbId) -> StoreResult<bool> {
        Ok(ProjectRepo::delete(&self.pool, id).await?)
    }
}

#[async_trait]
impl MilestoneStore for PgStore {
    async fn insert_milestone(&self, input: &CreateMilestone) -> StoreResult<Milestone> {
        Ok(MilestoneRepo::create(&self.pool, input).await?)
    }

    async fn find_milestone(&self, id: DbId) -> StoreResult<Option<Milestone>> {
        Ok(MilestoneRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_milestones(
        &self,
        project_ids: &[DbId],
        current_only: bool,
    ) -> StoreResult<Vec<Milestone>> {
        Ok(MilestoneRepo::list_by_projects(&self.pool, project_ids, current_only).await?)
    }

    async fn list_current_milestones(
        &self,
        project_id: DbId,
        exclude: Option<DbId>,
    ) -> StoreResult<Vec<Milestone>> {
        Ok(MilestoneRepo::list_current(&self.pool, project_id, exclude).await?)
    }

    async fn update_milestone(
        &self,
        id: DbId,
        input: &UpdateMilestone,
    ) -> StoreResult<Option<Milestone>> {
        Ok(MilestoneRepo::update(&self.pool, id, input).await?)
    }

    async fn set_milestones_current(&self, ids: &[DbId], is_current: bool) -> StoreResult<u64> {
        Ok(MilestoneRepo::set_current_many(&self.pool, ids, is_current).await?)
    }

    async fn milestone_ids(&self, project_id: DbId) -> StoreResult<Vec<DbId>> {
        Ok(MilestoneRepo::ids_by_project(&self.pool, project_id).await?)
    }

    async fn delete_milestones_by_project(&self, project_id: DbId) -> StoreResult<u64> {
        Ok(MilestoneRepo::delete_by_project(&self.pool, project_id).await?)
    }

    async fn count_milestones(&self, project_ids: &[DbId]) -> StoreResult<u64> {
        Ok(count(MilestoneRepo::count_by_projects(&self.pool, project_ids).await?))
    }
}

#[async_trait]
impl ProgressStore for PgStore {
    async fn insert_progress(&self, input: &CreateWeeklyProgress) -> StoreResult<WeeklyProgress> {
        Ok(WeeklyProgressRepo::create(&self.pool, input).await?)
    }

    async fn find_progress(&self, id: DbId) -> StoreResult<Option<WeeklyProgress>> {
        Ok(WeeklyProgressRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_progress(&self, milestone_ids: &[DbId]) -> StoreResult<Vec<WeeklyProgress>> {
        Ok(WeeklyProgressRepo::list_by_milestones(&self.pool, milestone_ids).await?)
    }

    async fn update_progress(
        &self,
        id: DbId,
        input: &UpdateWeeklyProgress,
    ) -> StoreResult<Option<WeeklyProgress>> {
        Ok(WeeklyProgressRepo::update(&self.pool, id, input).await?)
    }

    async fn delete_progress_by_milestones(&self, milestone_ids: &[DbId]) -> StoreResult<u64> {
        Ok(WeeklyProgressRepo::delete_by_milestones(&self.pool, milestone_ids).await?)
    }

    async fn count_progress(&self, project_ids: &[DbId]) -> StoreResult<u64> {
        Ok(count(WeeklyProgressRepo::count_by_projects(&self.pool, project_ids).await?))
    }
}

#[async_trait]
impl ReminderStore for PgStore {
    async fn insert_reminder(&self, input: &CreateEmailReminder) -> StoreResult<EmailReminder> {
        Ok(EmailReminderRepo::create(&self.pool, input).await?)
    }

    async fn find_reminder(&self, id: DbId) -> StoreResult<Option<EmailReminder>> {
        Ok(EmailReminderRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_reminders(&self, created_by: Option<&str>) -> StoreResult<Vec<ReminderListing>> {
        Ok(EmailReminderRepo::list_with_project(&self.pool, created_by).await?)
    }

    async fn list_due_reminders(&self, now: Timestamp) -> StoreResult<Vec<EmailReminder>> {
        Ok(EmailReminderRepo::list_due(&self.pool, now).await?)
    }

    async fn set_reminder_status(
        &self,
        id: DbId,
        status: ReminderStatus,
    ) -> StoreResult<Option<EmailReminder>> {
        Ok(EmailReminderRepo::set_status(&self.pool, id, status).await?)
    }

    async fn delete_reminder(&self, id: DbId) -> StoreResult<bool> {
        Ok(EmailReminderRepo::delete(&self.pool, id).await?)
    }

    async fn delete_reminders_by_project(&self, project_id: DbId) -> StoreResult<u64> {
        Ok(EmailReminderRepo::delete_by_project(&self.pool, project_id).await?)
    }

    async fn count_reminders(
        &self,
        project_ids: &[DbId],
        status: ReminderStatus,
    ) -> StoreResult<u64> {
        Ok(count(
            EmailReminderRepo::count_by_projects(&self.pool, project_ids, status).await?,
        ))
    }
}

#[async_trait]
impl RecordStore for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(crate::health_check(&self.pool).await?)
    }
}
