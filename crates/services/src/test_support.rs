//! Fixtures and doubles shared by the service tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use waypoint_core::roles::Actor;
use waypoint_core::status::{MilestoneStatus, ProjectStatus};
use waypoint_core::tasks::{TaskDelays, TaskList};
use waypoint_core::types::DbId;
use waypoint_db::models::email_reminder::{CreateEmailReminder, EmailReminder};
use waypoint_db::models::milestone::{CreateMilestone, Milestone};
use waypoint_db::models::project::{CreateProject, Project};
use waypoint_db::models::weekly_progress::{CreateWeeklyProgress, WeeklyProgress};
use waypoint_db::store::{MilestoneStore, ProgressStore, ProjectStore, ReminderStore};
use waypoint_db::MemoryStore;
use waypoint_events::{MailError, Mailer, OutgoingMail, ReminderBranding, ReminderRenderer};

use crate::Services;

pub const OWNER: &str = "a@x.com";
pub const OTHER: &str = "b@x.com";

pub fn owner() -> Actor {
    Actor::user(OWNER)
}

pub fn other() -> Actor {
    Actor::user(OTHER)
}

pub fn manager() -> Actor {
    Actor::manager("boss@x.com")
}

/// Records every message and fails for recipients listed in `fail_for`.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingMail>>,
    fail_for: Mutex<HashSet<String>>,
}

impl RecordingMailer {
    pub fn fail_for(&self, recipient: &str) {
        self.fail_for.lock().unwrap().insert(recipient.to_string());
    }

    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_mail(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        if self.fail_for.lock().unwrap().contains(&mail.to) {
            return Err(MailError::Build(format!("mailbox {} unavailable", mail.to)));
        }
        self.sent.lock().unwrap().push(mail.clone());
        Ok(())
    }
}

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub mailer: Arc<RecordingMailer>,
    pub services: Services,
}

impl Harness {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let mailer = Arc::new(RecordingMailer::default());
        let renderer = Arc::new(ReminderRenderer::new(ReminderBranding::default()).unwrap());
        let services = Services::new(store.clone(), mailer.clone(), renderer);
        Self {
            store,
            mailer,
            services,
        }
    }

    pub async fn project(&self, created_by: Option<&str>, name: &str) -> Project {
        self.store
            .insert_project(&CreateProject {
                name: name.into(),
                description: None,
                major_goal: "Launch".into(),
                status: ProjectStatus::Active,
                created_by: created_by.map(str::to_string),
            })
            .await
            .unwrap()
    }

    pub async fn milestone(&self, project_id: DbId, is_current: bool) -> Milestone {
        self.store
            .insert_milestone(&CreateMilestone {
                project_id,
                title: "Milestone".into(),
                description: None,
                status: MilestoneStatus::Pending,
                is_current,
                target_date: None,
            })
            .await
            .unwrap()
    }

    pub async fn progress(&self, milestone_id: DbId, week_start: NaiveDate) -> WeeklyProgress {
        self.store
            .insert_progress(&CreateWeeklyProgress {
                milestone_id,
                week_start_date: week_start,
                week_end_date: week_start + Duration::days(6),
                completed_this_week: TaskList::new(["design"]),
                planned_for_next_week: TaskList::default(),
                task_delays: TaskDelays::default(),
                goals_achieved: false,
                notes: None,
            })
            .await
            .unwrap()
    }

    /// A reminder due `hours_ago` hours in the past (negative for future).
    pub async fn reminder(&self, project_id: DbId, recipient: &str, hours_ago: i64) -> EmailReminder {
        self.store
            .insert_reminder(&CreateEmailReminder {
                project_id,
                subject: "Weekly sync".into(),
                message: "Please update the board".into(),
                recipient_email: recipient.into(),
                reminder_date: Utc::now() - Duration::hours(hours_ago),
            })
            .await
            .unwrap()
    }

    pub async fn current_ids(&self, project_id: DbId) -> Vec<DbId> {
        let mut ids: Vec<DbId> = self
            .store
            .list_current_milestones(project_id, None)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        ids.sort_unstable();
        ids
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
