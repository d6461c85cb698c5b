//! Weekly progress entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use waypoint_core::tasks::{TaskDelays, TaskList};
use waypoint_core::types::{Date, DbId, Timestamp};

/// A row from the `weekly_progress` table.
///
/// The task list columns hold serialized JSON text and are decoded on read.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WeeklyProgress {
    pub id: DbId,
    pub milestone_id: DbId,
    pub week_start_date: Date,
    pub week_end_date: Date,
    #[sqlx(try_from = "String")]
    pub completed_this_week: TaskList,
    #[sqlx(try_from = "String")]
    pub planned_for_next_week: TaskList,
    #[sqlx(try_from = "String")]
    pub task_delays: TaskDelays,
    pub goals_achieved: bool,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a weekly progress entry.
#[derive(Debug, Clone)]
pub struct CreateWeeklyProgress {
    pub milestone_id: DbId,
    pub week_start_date: Date,
    pub week_end_date: Date,
    pub completed_this_week: TaskList,
    pub planned_for_next_week: TaskList,
    pub task_delays: TaskDelays,
    pub goals_achieved: bool,
    pub notes: Option<String>,
}

/// DTO for a partial weekly progress update. Only `Some` fields are applied;
/// `notes: Some(None)` clears the notes.
#[derive(Debug, Clone, Default)]
pub struct UpdateWeeklyProgress {
    pub week_start_date: Option<Date>,
    pub week_end_date: Option<Date>,
    pub completed_this_week: Option<TaskList>,
    pub planned_for_next_week: Option<TaskList>,
    pub task_delays: Option<TaskDelays>,
    pub goals_achieved: Option<bool>,
    pub notes: Option<Option<String>>,
}
