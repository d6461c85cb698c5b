//! Milestone entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use waypoint_core::ordering::MilestoneSortKey;
use waypoint_core::rotation::CurrentSlot;
use waypoint_core::status::MilestoneStatus;
use waypoint_core::types::{Date, DbId, Timestamp};

/// A milestone row from the `milestones` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Milestone {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub description: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: MilestoneStatus,
    pub is_current: bool,
    pub target_date: Option<Date>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Milestone {
    pub fn slot(&self) -> CurrentSlot {
        CurrentSlot {
            id: self.id,
            created_at: self.created_at,
        }
    }
}

impl MilestoneSortKey for Milestone {
    fn is_current(&self) -> bool {
        self.is_current
    }

    fn target_date(&self) -> Option<Date> {
        self.target_date
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

/// DTO for inserting a milestone.
#[derive(Debug, Clone)]
pub struct CreateMilestone {
    pub project_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub status: MilestoneStatus,
    pub is_current: bool,
    pub target_date: Option<Date>,
}

/// DTO for a partial milestone update. Only `Some` fields are applied.
#[derive(Debug, Clone, Default)]
pub struct UpdateMilestone {
    pub is_current: Option<bool>,
    pub status: Option<MilestoneStatus>,
}
