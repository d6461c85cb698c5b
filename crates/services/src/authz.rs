//! Resolve the project that owns a record and apply the ownership predicate.

use waypoint_core::access::ensure_access;
use waypoint_core::error::CoreError;
use waypoint_core::roles::Actor;
use waypoint_core::types::DbId;
use waypoint_db::models::milestone::Milestone;
use waypoint_db::models::project::Project;
use waypoint_db::RecordStore;

/// Load project `id` and check that `actor` may `action` it.
pub(crate) async fn authorize_project(
    store: &dyn RecordStore,
    actor: &Actor,
    id: DbId,
    action: &str,
) -> Result<Project, CoreError> {
    let project = store
        .find_project(id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Project",
            id,
        })?;
    ensure_access(actor, &project, action)?;
    Ok(project)
}

/// Load milestone `id` and authorize against its owning project.
pub(crate) async fn authorize_milestone(
    store: &dyn RecordStore,
    actor: &Actor,
    id: DbId,
    action: &str,
) -> Result<(Milestone, Project), CoreError> {
    let milestone = store
        .find_milestone(id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Milestone",
            id,
        })?;
    let project = authorize_project(store, actor, milestone.project_id, action).await?;
    Ok((milestone, project))
}
