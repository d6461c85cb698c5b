//! Weekly progress reports, authorized through milestone and project.

use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use waypoint_core::error::CoreError;
use waypoint_core::roles::Actor;
use waypoint_core::tasks::{TaskDelays, TaskList};
use waypoint_core::types::{Date, DbId};
use waypoint_core::validation::{optional_text, require};
use waypoint_db::models::weekly_progress::{
    CreateWeeklyProgress, UpdateWeeklyProgress, WeeklyProgress,
};
use waypoint_db::RecordStore;

use crate::authz::authorize_milestone;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateProgressInput {
    pub milestone_id: Option<DbId>,
    pub week_start_date: Option<Date>,
    pub week_end_date: Option<Date>,
    #[serde(default)]
    pub completed_this_week: TaskList,
    #[serde(default)]
    pub planned_for_next_week: TaskList,
    #[serde(default)]
    pub task_delays: TaskDelays,
    pub goals_achieved: Option<bool>,
    pub notes: Option<String>,
}

/// Partial update. `notes: null` clears the notes; an absent key keeps them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProgressInput {
    pub week_start_date: Option<Date>,
    pub week_end_date: Option<Date>,
    pub completed_this_week: Option<TaskList>,
    pub planned_for_next_week: Option<TaskList>,
    pub task_delays: Option<TaskDelays>,
    pub goals_achieved: Option<bool>,
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Option<String>>,
}

/// Maps a present key to `Some`, including an explicit `null`.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Option<String>>, D::Error> {
    Option::<String>::deserialize(deserializer).map(Some)
}

/// A progress entry together with the project it belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressEntry {
    #[serde(flatten)]
    pub entry: WeeklyProgress,
    pub project_id: DbId,
}

#[derive(Clone)]
pub struct WeeklyProgressService {
    store: Arc<dyn RecordStore>,
}

impl WeeklyProgressService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        actor: &Actor,
        input: CreateProgressInput,
    ) -> Result<ProgressEntry, CoreError> {
        let milestone_id = require("milestone_id", input.milestone_id)?;
        let week_start_date = require("week_start_date", input.week_start_date)?;
        let week_end_date = require("week_end_date", input.week_end_date)?;
        let (_, project) =
            authorize_milestone(self.store.as_ref(), actor, milestone_id, "report progress on")
                .await?;

        let entry = self
            .store
            .insert_progress(&CreateWeeklyProgress {
                milestone_id,
                week_start_date,
                week_end_date,
                completed_this_week: input.completed_this_week,
                planned_for_next_week: input.planned_for_next_week,
                task_delays: input.task_delays,
                goals_achieved: input.goals_achieved.unwrap_or(false),
                notes: optional_text(input.notes.as_deref()),
            })
            .await?;
        tracing::info!(
            progress_id = entry.id,
            milestone_id,
            project_id = project.id,
            "Weekly progress recorded"
        );
        Ok(ProgressEntry {
            entry,
            project_id: project.id,
        })
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: DbId,
        input: UpdateProgressInput,
    ) -> Result<ProgressEntry, CoreError> {
        let current = self
            .store
            .find_progress(id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "WeeklyProgress",
                id,
            })?;
        let (_, project) = authorize_milestone(
            self.store.as_ref(),
            actor,
            current.milestone_id,
            "update progress on",
        )
        .await?;

        let update = UpdateWeeklyProgress {
            week_start_date: input.week_start_date,
            week_end_date: input.week_end_date,
            completed_this_week: input.completed_this_week,
            planned_for_next_week: input.planned_for_next_week,
            task_delays: input.task_delays,
            goals_achieved: input.goals_achieved,
            notes: input.notes.map(|n| optional_text(n.as_deref())),
        };
        let entry = self
            .store
            .update_progress(id, &update)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "WeeklyProgress",
                id,
            })?;
        tracing::info!(progress_id = id, project_id = project.id, "Weekly progress updated");
        Ok(ProgressEntry {
            entry,
            project_id: project.id,
        })
    }
}
