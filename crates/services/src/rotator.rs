//! Enforcement of the current-milestone bound at promotion time.

use std::sync::Arc;

use waypoint_core::error::CoreError;
use waypoint_core::rotation::select_demotions;
use waypoint_core::types::DbId;
use waypoint_db::models::milestone::Milestone;
use waypoint_db::RecordStore;

/// Makes room for a milestone about to become current.
#[derive(Clone)]
pub struct CurrentMilestoneRotator {
    store: Arc<dyn RecordStore>,
}

impl CurrentMilestoneRotator {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Demote the oldest current milestones of `project_id` so that, once the
    /// promoted milestone is written, at most two remain current.
    ///
    /// `target` is the milestone being promoted, or `None` when it does not
    /// exist yet. Returns the ids that were demoted.
    pub async fn promote(
        &self,
        project_id: DbId,
        target: Option<DbId>,
    ) -> Result<Vec<DbId>, CoreError> {
        let others = self
            .store
            .list_current_milestones(project_id, target)
            .await?;
        let slots: Vec<_> = others.iter().map(Milestone::slot).collect();

        let demoted = select_demotions(&slots);
        if demoted.is_empty() {
            return Ok(demoted);
        }

        self.store.set_milestones_current(&demoted, false).await?;
        for milestone_id in &demoted {
            tracing::info!(project_id, milestone_id, "Milestone demoted by rotation");
        }
        if demoted.len() > 1 {
            tracing::warn!(
                project_id,
                demoted = demoted.len(),
                "Project was over the current-milestone bound"
            );
        }
        Ok(demoted)
    }
}
