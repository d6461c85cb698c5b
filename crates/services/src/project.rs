//! Project lifecycle: create, read, list, update and cascade delete.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use waypoint_core::access::owner_filter;
use waypoint_core::cascade::CascadeReport;
use waypoint_core::error::CoreError;
use waypoint_core::ordering::sort_milestones;
use waypoint_core::roles::Actor;
use waypoint_core::status::ProjectStatus;
use waypoint_core::types::DbId;
use waypoint_core::validation::{optional_text, require_text};
use waypoint_db::models::milestone::Milestone;
use waypoint_db::models::project::{CreateProject, Project, UpdateProject};
use waypoint_db::models::weekly_progress::WeeklyProgress;
use waypoint_db::RecordStore;

use crate::authz::authorize_project;
use crate::cascade::CascadeDeletionPlanner;

/// Fields accepted when creating or updating a project.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub major_goal: Option<String>,
    pub status: Option<ProjectStatus>,
}

/// A project with all its milestones, each carrying its progress reports.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub milestones: Vec<MilestoneDetail>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MilestoneDetail {
    #[serde(flatten)]
    pub milestone: Milestone,
    /// Most recent week first.
    pub weekly_progress: Vec<WeeklyProgress>,
}

/// A list entry: the project with only its current milestones.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSummary {
    #[serde(flatten)]
    pub project: Project,
    pub milestones: Vec<Milestone>,
}

#[derive(Clone)]
pub struct ProjectService {
    store: Arc<dyn RecordStore>,
    planner: CascadeDeletionPlanner,
}

impl ProjectService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            planner: CascadeDeletionPlanner::new(Arc::clone(&store)),
            store,
        }
    }

    pub async fn create(&self, actor: &Actor, input: ProjectInput) -> Result<Project, CoreError> {
        let create = CreateProject {
            name: require_text("name", input.name.as_deref())?,
            description: optional_text(input.description.as_deref()),
            major_goal: require_text("major_goal", input.major_goal.as_deref())?,
            status: input.status.unwrap_or_default(),
            created_by: Some(actor.email.clone()),
        };
        let project = self.store.insert_project(&create).await?;
        tracing::info!(project_id = project.id, created_by = %actor.email, "Project created");
        Ok(project)
    }

    /// The project with its milestones in display order.
    pub async fn get(&self, actor: &Actor, id: DbId) -> Result<ProjectDetail, CoreError> {
        let project = authorize_project(self.store.as_ref(), actor, id, "view").await?;

        let mut milestones = self.store.list_milestones(&[id], false).await?;
        sort_milestones(&mut milestones);

        let milestone_ids: Vec<DbId> = milestones.iter().map(|m| m.id).collect();
        let mut progress: HashMap<DbId, Vec<WeeklyProgress>> = HashMap::new();
        for entry in self.store.list_progress(&milestone_ids).await? {
            progress.entry(entry.milestone_id).or_default().push(entry);
        }

        let milestones = milestones
            .into_iter()
            .map(|milestone| MilestoneDetail {
                weekly_progress: progress.remove(&milestone.id).unwrap_or_default(),
                milestone,
            })
            .collect();

        Ok(ProjectDetail {
            project,
            milestones,
        })
    }

    /// Projects visible to `actor`, newest first.
    pub async fn list(&self, actor: &Actor) -> Result<Vec<ProjectSummary>, CoreError> {
        let projects = self.store.list_projects(owner_filter(actor)).await?;
        let ids: Vec<DbId> = projects.iter().map(|p| p.id).collect();

        let mut current: HashMap<DbId, Vec<Milestone>> = HashMap::new();
        for milestone in self.store.list_milestones(&ids, true).await? {
            current.entry(milestone.project_id).or_default().push(milestone);
        }

        Ok(projects
            .into_iter()
            .map(|project| {
                let mut milestones = current.remove(&project.id).unwrap_or_default();
                sort_milestones(&mut milestones);
                ProjectSummary {
                    project,
                    milestones,
                }
            })
            .collect())
    }

    /// Replace the editable fields. An omitted status resets to `active`.
    pub async fn update(
        &self,
        actor: &Actor,
        id: DbId,
        input: ProjectInput,
    ) -> Result<Project, CoreError> {
        authorize_project(self.store.as_ref(), actor, id, "update").await?;

        let update = UpdateProject {
            name: require_text("name", input.name.as_deref())?,
            description: optional_text(input.description.as_deref()),
            major_goal: require_text("major_goal", input.major_goal.as_deref())?,
            status: input.status.unwrap_or_default(),
        };
        let project = self
            .store
            .update_project(id, &update)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Project",
                id,
            })?;
        tracing::info!(project_id = id, "Project updated");
        Ok(project)
    }

    /// Delete the project and everything beneath it.
    pub async fn delete(&self, actor: &Actor, id: DbId) -> Result<CascadeReport, CoreError> {
        authorize_project(self.store.as_ref(), actor, id, "delete").await?;
        self.planner.plan_and_execute(id).await
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use waypoint_db::store::{MilestoneStore, ProjectStore};
    use waypoint_db::StoreOp;

    use super::*;
    use crate::test_support::{date, manager, other, owner, Harness, OWNER};

    fn input(name: &str, goal: &str) -> ProjectInput {
        ProjectInput {
            name: Some(name.into()),
            description: None,
            major_goal: Some(goal.into()),
            status: None,
        }
    }

    #[tokio::test]
    async fn create_records_the_creator_and_defaults_to_active() {
        let h = Harness::new();
        let project = h
            .services
            .projects
            .create(&owner(), input("  Apollo ", "Ship v1"))
            .await
            .unwrap();
        assert_eq!(project.name, "Apollo");
        assert_eq!(project.status, ProjectStatus::Active);
        assert_eq!(project.created_by.as_deref(), Some(OWNER));
    }

    #[tokio::test]
    async fn create_requires_name_and_goal() {
        let h = Harness::new();
        let projects = &h.services.projects;
        assert_matches!(
            projects.create(&owner(), input("", "goal")).await,
            Err(CoreError::Validation(m)) if m.contains("name")
        );
        assert_matches!(
            projects
                .create(
                    &owner(),
                    ProjectInput {
                        name: Some("n".into()),
                        ..Default::default()
                    }
                )
                .await,
            Err(CoreError::Validation(m)) if m.contains("major_goal")
        );
        assert!(h.store.list_projects(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_filters_for_users_but_not_managers() {
        let h = Harness::new();
        h.project(Some(OWNER), "mine").await;
        h.project(Some("b@x.com"), "theirs").await;
        h.project(None, "legacy").await;

        let mine = h.services.projects.list(&owner()).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert!(mine
            .iter()
            .all(|s| s.project.created_by.as_deref() == Some(OWNER)));

        let all = h.services.projects.list(&manager()).await.unwrap();
        let names: Vec<_> = all.iter().map(|s| s.project.name.as_str()).collect();
        assert_eq!(names, ["legacy", "theirs", "mine"]);
    }

    #[tokio::test]
    async fn list_carries_only_current_milestones() {
        let h = Harness::new();
        let p = h.project(Some(OWNER), "P").await;
        let current = h.milestone(p.id, true).await;
        h.milestone(p.id, false).await;

        let list = h.services.projects.list(&owner()).await.unwrap();
        let ids: Vec<_> = list[0].milestones.iter().map(|m| m.id).collect();
        assert_eq!(ids, [current.id]);
    }

    #[tokio::test]
    async fn get_orders_milestones_and_nests_progress() {
        let h = Harness::new();
        let p = h.project(Some(OWNER), "P").await;
        let older = h.milestone(p.id, false).await;
        let cur = h.milestone(p.id, true).await;
        let newer = h.milestone(p.id, false).await;
        h.progress(cur.id, date(2026, 10, 4)).await;
        h.progress(cur.id, date(2026, 10, 11)).await;

        let detail = h.services.projects.get(&owner(), p.id).await.unwrap();
        let order: Vec<_> = detail.milestones.iter().map(|m| m.milestone.id).collect();
        assert_eq!(order, [cur.id, newer.id, older.id]);

        let weeks: Vec<_> = detail.milestones[0]
            .weekly_progress
            .iter()
            .map(|w| w.week_start_date)
            .collect();
        assert_eq!(weeks, [date(2026, 10, 11), date(2026, 10, 4)]);
        assert!(detail.milestones[1].weekly_progress.is_empty());
    }

    #[tokio::test]
    async fn get_distinguishes_missing_from_forbidden() {
        let h = Harness::new();
        let p = h.project(Some(OWNER), "P").await;
        assert_matches!(
            h.services.projects.get(&owner(), p.id + 100).await,
            Err(CoreError::NotFound { entity: "Project", .. })
        );
        assert_matches!(
            h.services.projects.get(&other(), p.id).await,
            Err(CoreError::AccessDenied(_))
        );
    }

    #[tokio::test]
    async fn legacy_projects_are_manager_only() {
        let h = Harness::new();
        let legacy = h.project(None, "legacy").await;
        assert_matches!(
            h.services.projects.get(&owner(), legacy.id).await,
            Err(CoreError::AccessDenied(_))
        );
        assert!(h.services.projects.get(&manager(), legacy.id).await.is_ok());
    }

    #[tokio::test]
    async fn update_without_status_resets_to_active() {
        let h = Harness::new();
        let projects = &h.services.projects;
        let p = projects.create(&owner(), input("P", "G")).await.unwrap();
        let mut on_hold = input("P", "G");
        on_hold.status = Some(ProjectStatus::OnHold);
        projects.update(&owner(), p.id, on_hold).await.unwrap();

        let renamed = projects
            .update(&owner(), p.id, input("Renamed", "G2"))
            .await
            .unwrap();
        assert_eq!(renamed.name, "Renamed");
        assert_eq!(renamed.major_goal, "G2");
        assert_eq!(renamed.status, ProjectStatus::Active);
    }

    #[tokio::test]
    async fn update_validates_after_access() {
        let h = Harness::new();
        let p = h.project(Some(OWNER), "P").await;
        assert_matches!(
            h.services.projects.update(&other(), p.id, input("", "")).await,
            Err(CoreError::AccessDenied(_))
        );
        assert_matches!(
            h.services.projects.update(&owner(), p.id, input("", "G")).await,
            Err(CoreError::Validation(_))
        );
    }

    #[tokio::test]
    async fn foreign_delete_is_denied_and_leaves_everything() {
        let h = Harness::new();
        let p = h.project(Some(OWNER), "P").await;
        h.milestone(p.id, true).await;
        h.milestone(p.id, false).await;

        let err = h.services.projects.delete(&other(), p.id).await.unwrap_err();
        assert_matches!(err, CoreError::AccessDenied(m) if m.contains("delete"));
        assert!(h.store.find_project(p.id).await.unwrap().is_some());
        assert_eq!(h.store.count_milestones(&[p.id]).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn delete_cascades() {
        let h = Harness::new();
        let p = h.project(Some(OWNER), "P").await;
        let m = h.milestone(p.id, true).await;
        h.progress(m.id, date(2026, 10, 11)).await;

        let report = h.services.projects.delete(&owner(), p.id).await.unwrap();
        assert!(report.project);
        assert_eq!(report.dependents(), 2);
        assert_matches!(
            h.services.projects.get(&owner(), p.id).await,
            Err(CoreError::NotFound { .. })
        );
    }

    #[tokio::test]
    async fn store_failures_surface_as_internal() {
        let h = Harness::new();
        h.store.fail_on(StoreOp::ListProjects);
        assert_matches!(
            h.services.projects.list(&owner()).await,
            Err(CoreError::Internal(_))
        );
    }
}
