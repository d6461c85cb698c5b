//! Headline counts for the dashboard.

use std::sync::Arc;

use serde::Serialize;
use waypoint_core::access::owner_filter;
use waypoint_core::error::CoreError;
use waypoint_core::roles::Actor;
use waypoint_core::status::ReminderStatus;
use waypoint_core::types::DbId;
use waypoint_db::RecordStore;

/// Counts over the projects visible to one actor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub projects: u64,
    pub milestones: u64,
    pub weekly_progress: u64,
    pub scheduled_reminders: u64,
}

#[derive(Clone)]
pub struct DashboardService {
    store: Arc<dyn RecordStore>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn stats(&self, actor: &Actor) -> Result<DashboardStats, CoreError> {
        let projects = self.store.list_projects(owner_filter(actor)).await?;
        let ids: Vec<DbId> = projects.iter().map(|p| p.id).collect();

        let (milestones, weekly_progress, scheduled_reminders) = tokio::try_join!(
            self.store.count_milestones(&ids),
            self.store.count_progress(&ids),
            self.store.count_reminders(&ids, ReminderStatus::Scheduled),
        )?;

        Ok(DashboardStats {
            projects: ids.len() as u64,
            milestones,
            weekly_progress,
            scheduled_reminders,
        })
    }
}
