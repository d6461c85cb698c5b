//! Project cascade deletion.
//!
//! Runs the steps of [`CascadeStep::ORDER`] against the store. The
//! independent steps (reminders, weekly progress) run concurrently and both
//! finish before the remaining steps run in order. A failing step stops the
//! cascade with [`CoreError::DeletionFailed`]; completed steps stay done, and
//! since every step deletes by reference the whole cascade can simply be run
//! again.

use std::sync::Arc;

use futures::future::join_all;
use waypoint_core::cascade::{CascadeReport, CascadeStep};
use waypoint_core::error::CoreError;
use waypoint_core::types::DbId;
use waypoint_db::{RecordStore, StoreError};

#[derive(Clone)]
pub struct CascadeDeletionPlanner {
    store: Arc<dyn RecordStore>,
}

fn step_failed(project_id: DbId, step: CascadeStep, err: StoreError) -> CoreError {
    tracing::error!(project_id, step = %step, error = %err, "Cascade delete step failed");
    CoreError::DeletionFailed {
        step,
        reason: err.to_string(),
    }
}

impl CascadeDeletionPlanner {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Delete project `project_id` and everything that references it.
    ///
    /// Succeeds on a project that is already partly or fully gone.
    pub async fn plan_and_execute(&self, project_id: DbId) -> Result<CascadeReport, CoreError> {
        let milestone_ids = self
            .store
            .milestone_ids(project_id)
            .await
            .map_err(|e| step_failed(project_id, CascadeStep::WeeklyProgress, e))?;

        let (concurrent, sequential): (Vec<CascadeStep>, Vec<CascadeStep>) = CascadeStep::ORDER
            .into_iter()
            .partition(|step| step.is_independent());

        let mut report = CascadeReport::default();
        let outcomes = join_all(
            concurrent
                .iter()
                .map(|&step| self.run_step(project_id, step, &milestone_ids)),
        )
        .await;
        for (step, rows) in concurrent.into_iter().zip(outcomes) {
            report.record(step, rows?);
        }
        for step in sequential {
            let rows = self.run_step(project_id, step, &milestone_ids).await?;
            report.record(step, rows);
        }

        tracing::info!(
            project_id,
            dependents = report.dependents(),
            project_deleted = report.project,
            "Project cascade delete complete"
        );
        Ok(report)
    }

    async fn run_step(
        &self,
        project_id: DbId,
        step: CascadeStep,
        milestone_ids: &[DbId],
    ) -> Result<u64, CoreError> {
        let rows = match step {
            CascadeStep::Reminders => self.store.delete_reminders_by_project(project_id).await,
            CascadeStep::WeeklyProgress => {
                self.store.delete_progress_by_milestones(milestone_ids).await
            }
            CascadeStep::Milestones => self.store.delete_milestones_by_project(project_id).await,
            CascadeStep::Project => self.store.delete_project(project_id).await.map(u64::from),
        }
        .map_err(|e| step_failed(project_id, step, e))?;
        tracing::debug!(project_id, step = %step, rows, "Cascade step done");
        Ok(rows)
    }
}
