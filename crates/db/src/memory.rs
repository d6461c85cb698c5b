//! In-process [`RecordStore`] backed by ordered maps.
//!
//! Used by the service and HTTP test suites so they run without Postgres.
//! Ids are allocated from one shared sequence and `created_at` values are
//! strictly increasing, which keeps "oldest first" orderings deterministic.
//! Individual operations can be made to fail with [`MemoryStore::fail_on`].

use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use waypoint_core::status::ReminderStatus;
use waypoint_core::types::{DbId, Timestamp};

use crate::models::email_reminder::{CreateEmailReminder, EmailReminder, ReminderListing};
use crate::models::milestone::{CreateMilestone, Milestone, UpdateMilestone};
use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::models::weekly_progress::{CreateWeeklyProgress, UpdateWeeklyProgress, WeeklyProgress};
use crate::store::{
    MilestoneStore, ProgressStore, ProjectStore, RecordStore, ReminderStore, StoreError,
    StoreResult,
};

/// Store operations that can be set to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    InsertProject,
    FindProject,
    ListProjects,
    UpdateProject,
    DeleteProject,
    InsertMilestone,
    FindMilestone,
    /// Every milestone read that returns more than one row.
    ListMilestones,
    UpdateMilestone,
    SetMilestonesCurrent,
    DeleteMilestones,
    InsertProgress,
    FindProgress,
    ListProgress,
    UpdateProgress,
    DeleteProgress,
    InsertReminder,
    FindReminder,
    /// Both the joined listing and the due-reminder scan.
    ListReminders,
    SetReminderStatus,
    DeleteReminder,
    DeleteReminders,
    /// Every `count_*` call.
    Count,
    Ping,
}

#[derive(Default)]
struct Tables {
    next_id: DbId,
    last_stamp: Option<Timestamp>,
    projects: BTreeMap<DbId, Project>,
    milestones: BTreeMap<DbId, Milestone>,
    progress: BTreeMap<DbId, WeeklyProgress>,
    reminders: BTreeMap<DbId, EmailReminder>,
}

impl Tables {
    fn next_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }

    fn stamp(&mut self) -> Timestamp {
        let now = Utc::now();
        let stamp = match self.last_stamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_stamp = Some(stamp);
        stamp
    }

    fn project_of_milestone(&self, milestone_id: DbId) -> Option<DbId> {
        self.milestones.get(&milestone_id).map(|m| m.project_id)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    failures: Mutex<HashSet<StoreOp>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `op` fail with [`StoreError::Unavailable`].
    pub fn fail_on(&self, op: StoreOp) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(op);
    }

    pub fn clear_failures(&self) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn check(&self, op: StoreOp) -> StoreResult<()> {
        let failing = self
            .failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&op);
        if failing {
            Err(StoreError::Unavailable(format!("{op:?} failed")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn insert_project(&self, input: &CreateProject) -> StoreResult<Project> {
        self.check(StoreOp::InsertProject)?;
        let mut t = self.tables.write().await;
        let id = t.next_id();
        let now = t.stamp();
        let project = Project {
            id,
            name: input.name.clone(),
            description: input.description.clone(),
            major_goal: input.major_goal.clone(),
            status: input.status,
            created_by: input.created_by.clone(),
            created_at: now,
            updated_at: now,
        };
        t.projects.insert(id, project.clone());
        Ok(project)
    }

    async fn find_project(&self, id: DbId) -> StoreResult<Option<Project>> {
        self.check(StoreOp::FindProject)?;
        Ok(self.tables.read().await.projects.get(&id).cloned())
    }

    async fn list_projects(&self, created_by: Option<&str>) -> StoreResult<Vec<Project>> {
        self.check(StoreOp::ListProjects)?;
        let t = self.tables.read().await;
        let mut projects: Vec<Project> = t
            .projects
            .values()
            .filter(|p| created_by.is_none() || p.created_by.as_deref() == created_by)
            .cloned()
            .collect();
        projects.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(projects)
    }

    async fn update_project(
        &self,
        id: DbId,
        input: &UpdateProject,
    ) -> StoreResult<Option<Project>> {
        self.check(StoreOp::UpdateProject)?;
        let mut t = self.tables.write().await;
        let now = t.stamp();
        Ok(t.projects.get_mut(&id).map(|p| {
            p.name = input.name.clone();
            p.description = input.description.clone();
            p.major_goal = input.major_goal.clone();
            p.status = input.status;
            p.updated_at = now;
            p.clone()
        }))
    }

    async fn delete_project(&self, id: DbId) -> StoreResult<bool> {
        self.check(StoreOp::DeleteProject)?;
        Ok(self.tables.write().await.projects.remove(&id).is_some())
    }
}

#[async_trait]
impl MilestoneStore for MemoryStore {
    async fn insert_milestone(&self, input: &CreateMilestone) -> StoreResult<Milestone> {
        self.check(StoreOp::InsertMilestone)?;
        let mut t = self.tables.write().await;
        let id = t.next_id();
        let now = t.stamp();
        let milestone = Milestone {
            id,
            project_id: input.project_id,
            title: input.title.clone(),
            description: input.description.clone(),
            status: input.status,
            is_current: input.is_current,
            target_date: input.target_date,
            created_at: now,
            updated_at: now,
        };
        t.milestones.insert(id, milestone.clone());
        Ok(milestone)
    }

    async fn find_milestone(&self, id: DbId) -> StoreResult<Option<Milestone>> {
        self.check(StoreOp::FindMilestone)?;
        Ok(self.tables.read().await.milestones.get(&id).cloned())
    }

    async fn list_milestones(
        &self,
        project_ids: &[DbId],
        current_only: bool,
    ) -> StoreResult<Vec<Milestone>> {
        self.check(StoreOp::ListMilestones)?;
        let t = self.tables.read().await;
        let mut milestones: Vec<Milestone> = t
            .milestones
            .values()
            .filter(|m| project_ids.contains(&m.project_id))
            .filter(|m| !current_only || m.is_current)
            .cloned()
            .collect();
        milestones.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(milestones)
    }

    async fn list_current_milestones(
        &self,
        project_id: DbId,
        exclude: Option<DbId>,
    ) -> StoreResult<Vec<Milestone>> {
        self.check(StoreOp::ListMilestones)?;
        let t = self.tables.read().await;
        let mut current: Vec<Milestone> = t
            .milestones
            .values()
            .filter(|m| m.project_id == project_id && m.is_current)
            .filter(|m| Some(m.id) != exclude)
            .cloned()
            .collect();
        current.sort_by_key(|m| (m.created_at, m.id));
        Ok(current)
    }

    async fn update_milestone(
        &self,
        id: DbId,
        input: &UpdateMilestone,
    ) -> StoreResult<Option<Milestone>> {
        self.check(StoreOp::UpdateMilestone)?;
        let mut t = self.tables.write().await;
        let now = t.stamp();
        Ok(t.milestones.get_mut(&id).map(|m| {
            if let Some(is_current) = input.is_current {
                m.is_current = is_current;
            }
            if let Some(status) = input.status {
                m.status = status;
            }
            m.updated_at = now;
            m.clone()
        }))
    }

    async fn set_milestones_current(&self, ids: &[DbId], is_current: bool) -> StoreResult<u64> {
        self.check(StoreOp::SetMilestonesCurrent)?;
        let mut t = self.tables.write().await;
        let now = t.stamp();
        let mut changed = 0;
        for id in ids {
            if let Some(m) = t.milestones.get_mut(id) {
                if m.is_current != is_current {
                    m.is_current = is_current;
                    m.updated_at = now;
                    changed += 1;
                }
            }
        }
        Ok(changed)
    }

    async fn milestone_ids(&self, project_id: DbId) -> StoreResult<Vec<DbId>> {
        self.check(StoreOp::ListMilestones)?;
        let t = self.tables.read().await;
        Ok(t.milestones
            .values()
            .filter(|m| m.project_id == project_id)
            .map(|m| m.id)
            .collect())
    }

    async fn delete_milestones_by_project(&self, project_id: DbId) -> StoreResult<u64> {
        self.check(StoreOp::DeleteMilestones)?;
        let mut t = self.tables.write().await;
        let before = t.milestones.len();
        t.milestones.retain(|_, m| m.project_id != project_id);
        Ok((before - t.milestones.len()) as u64)
    }

    async fn count_milestones(&self, project_ids: &[DbId]) -> StoreResult<u64> {
        self.check(StoreOp::Count)?;
        let t = self.tables.read().await;
        Ok(t.milestones
            .values()
            .filter(|m| project_ids.contains(&m.project_id))
            .count() as u64)
    }
}

#[async_trait]
impl ProgressStore for MemoryStore {
    async fn insert_progress(&self, input: &CreateWeeklyProgress) -> StoreResult<WeeklyProgress> {
        self.check(StoreOp::InsertProgress)?;
        let mut t = self.tables.write().await;
        let id = t.next_id();
        let now = t.stamp();
        let entry = WeeklyProgress {
            id,
            milestone_id: input.milestone_id,
            week_start_date: input.week_start_date,
            week_end_date: input.week_end_date,
            completed_this_week: input.completed_this_week.clone(),
            planned_for_next_week: input.planned_for_next_week.clone(),
            task_delays: input.task_delays.clone(),
            goals_achieved: input.goals_achieved,
            notes: input.notes.clone(),
            created_at: now,
            updated_at: now,
        };
        t.progress.insert(id, entry.clone());
        Ok(entry)
    }

    async fn find_progress(&self, id: DbId) -> StoreResult<Option<WeeklyProgress>> {
        self.check(StoreOp::FindProgress)?;
        Ok(self.tables.read().await.progress.get(&id).cloned())
    }

    async fn list_progress(&self, milestone_ids: &[DbId]) -> StoreResult<Vec<WeeklyProgress>> {
        self.check(StoreOp::ListProgress)?;
        let t = self.tables.read().await;
        let mut entries: Vec<WeeklyProgress> = t
            .progress
            .values()
            .filter(|p| milestone_ids.contains(&p.milestone_id))
            .cloned()
            .collect();
        entries.sort_by(|a, b| (b.week_start_date, b.id).cmp(&(a.week_start_date, a.id)));
        Ok(entries)
    }

    async fn update_progress(
        &self,
        id: DbId,
        input: &UpdateWeeklyProgress,
    ) -> StoreResult<Option<WeeklyProgress>> {
        self.check(StoreOp::UpdateProgress)?;
        let mut t = self.tables.write().await;
        let now = t.stamp();
        Ok(t.progress.get_mut(&id).map(|p| {
            if let Some(start) = input.week_start_date {
                p.week_start_date = start;
            }
            if let Some(end) = input.week_end_date {
                p.week_end_date = end;
            }
            if let Some(tasks) = &input.completed_this_week {
                p.completed_this_week = tasks.clone();
            }
            if let Some(tasks) = &input.planned_for_next_week {
                p.planned_for_next_week = tasks.clone();
            }
            if let Some(delays) = &input.task_delays {
                p.task_delays = delays.clone();
            }
            if let Some(achieved) = input.goals_achieved {
                p.goals_achieved = achieved;
            }
            if let Some(notes) = &input.notes {
                p.notes = notes.clone();
            }
            p.updated_at = now;
            p.clone()
        }))
    }

    async fn delete_progress_by_milestones(&self, milestone_ids: &[DbId]) -> StoreResult<u64> {
        self.check(StoreOp::DeleteProgress)?;
        let mut t = self.tables.write().await;
        let before = t.progress.len();
        t.progress
            .retain(|_, p| !milestone_ids.contains(&p.milestone_id));
        Ok((before - t.progress.len()) as u64)
    }

    async fn count_progress(&self, project_ids: &[DbId]) -> StoreResult<u64> {
        self.check(StoreOp::Count)?;
        let t = self.tables.read().await;
        Ok(t.progress
            .values()
            .filter(|p| {
                t.project_of_milestone(p.milestone_id)
                    .is_some_and(|pid| project_ids.contains(&pid))
            })
            .count() as u64)
    }
}

#[async_trait]
impl ReminderStore for MemoryStore {
    async fn insert_reminder(&self, input: &CreateEmailReminder) -> StoreResult<EmailReminder> {
        self.check(StoreOp::InsertReminder)?;
        let mut t = self.tables.write().await;
        let id = t.next_id();
        let now = t.stamp();
        let reminder = EmailReminder {
            id,
            project_id: input.project_id,
            subject: input.subject.clone(),
            message: input.message.clone(),
            recipient_email: input.recipient_email.clone(),
            reminder_date: input.reminder_date,
            status: ReminderStatus::Scheduled,
            created_at: now,
            updated_at: now,
        };
        t.reminders.insert(id, reminder.clone());
        Ok(reminder)
    }

    async fn find_reminder(&self, id: DbId) -> StoreResult<Option<EmailReminder>> {
        self.check(StoreOp::FindReminder)?;
        Ok(self.tables.read().await.reminders.get(&id).cloned())
    }

    async fn list_reminders(&self, created_by: Option<&str>) -> StoreResult<Vec<ReminderListing>> {
        self.check(StoreOp::ListReminders)?;
        let t = self.tables.read().await;
        let mut listings: Vec<ReminderListing> = t
            .reminders
            .values()
            .filter_map(|r| {
                let project = t.projects.get(&r.project_id)?;
                if created_by.is_some() && project.created_by.as_deref() != created_by {
                    return None;
                }
                Some(ReminderListing {
                    reminder: r.clone(),
                    project_name: project.name.clone(),
                })
            })
            .collect();
        listings.sort_by_key(|l| (l.reminder.reminder_date, l.reminder.id));
        Ok(listings)
    }

    async fn list_due_reminders(&self, now: Timestamp) -> StoreResult<Vec<EmailReminder>> {
        self.check(StoreOp::ListReminders)?;
        let t = self.tables.read().await;
        let mut due: Vec<EmailReminder> = t
            .reminders
            .values()
            .filter(|r| r.is_due(now))
            .cloned()
            .collect();
        due.sort_by_key(|r| (r.reminder_date, r.id));
        Ok(due)
    }

    async fn set_reminder_status(
        &self,
        id: DbId,
        status: ReminderStatus,
    ) -> StoreResult<Option<EmailReminder>> {
        self.check(StoreOp::SetReminderStatus)?;
        let mut t = self.tables.write().await;
        let now = t.stamp();
        Ok(t.reminders.get_mut(&id).map(|r| {
            r.status = status;
            r.updated_at = now;
            r.clone()
        }))
    }

    async fn delete_reminder(&self, id: DbId) -> StoreResult<bool> {
        self.check(StoreOp::DeleteReminder)?;
        Ok(self.tables.write().await.reminders.remove(&id).is_some())
    }

    async fn delete_reminders_by_project(&self, project_id: DbId) -> StoreResult<u64> {
        self.check(StoreOp::DeleteReminders)?;
        let mut t = self.tables.write().await;
        let before = t.reminders.len();
        t.reminders.retain(|_, r| r.project_id != project_id);
        Ok((before - t.reminders.len()) as u64)
    }

    async fn count_reminders(
        &self,
        project_ids: &[DbId],
        status: ReminderStatus,
    ) -> StoreResult<u64> {
        self.check(StoreOp::Count)?;
        let t = self.tables.read().await;
        Ok(t.reminders
            .values()
            .filter(|r| project_ids.contains(&r.project_id) && r.status == status)
            .count() as u64)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        self.check(StoreOp::Ping)
    }
}
