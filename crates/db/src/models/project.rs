//! Project entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use waypoint_core::access::Owned;
use waypoint_core::status::ProjectStatus;
use waypoint_core::types::{DbId, Timestamp};

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub major_goal: String,
    #[sqlx(try_from = "String")]
    pub status: ProjectStatus,
    /// E-mail of the creating actor. `None` on legacy rows.
    pub created_by: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Owned for Project {
    fn created_by(&self) -> Option<&str> {
        self.created_by.as_deref()
    }
}

/// DTO for inserting a project.
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub name: String,
    pub description: Option<String>,
    pub major_goal: String,
    pub status: ProjectStatus,
    pub created_by: Option<String>,
}

/// DTO for replacing a project's editable fields.
///
/// Every field is replaced as given; `description: None` clears it.
#[derive(Debug, Clone)]
pub struct UpdateProject {
    pub name: String,
    pub description: Option<String>,
    pub major_goal: String,
    pub status: ProjectStatus,
}
