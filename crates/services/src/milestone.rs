//! Milestone creation and partial updates, with current-slot rotation.

use std::sync::Arc;

use serde::Deserialize;
use waypoint_core::error::CoreError;
use waypoint_core::roles::Actor;
use waypoint_core::status::MilestoneStatus;
use waypoint_core::types::{Date, DbId};
use waypoint_core::validation::{optional_text, require, require_text};
use waypoint_db::models::milestone::{CreateMilestone, Milestone, UpdateMilestone};
use waypoint_db::RecordStore;

use crate::authz::{authorize_milestone, authorize_project};
use crate::rotator::CurrentMilestoneRotator;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateMilestoneInput {
    pub project_id: Option<DbId>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<MilestoneStatus>,
    pub is_current: Option<bool>,
    pub target_date: Option<Date>,
}

/// Partial update; only supplied fields change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMilestoneInput {
    pub is_current: Option<bool>,
    pub status: Option<MilestoneStatus>,
}

#[derive(Clone)]
pub struct MilestoneService {
    store: Arc<dyn RecordStore>,
    rotator: CurrentMilestoneRotator,
}

impl MilestoneService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            rotator: CurrentMilestoneRotator::new(Arc::clone(&store)),
            store,
        }
    }

    /// Create a milestone. A milestone created as current takes a slot,
    /// demoting the oldest current one first if both are taken.
    pub async fn create(
        &self,
        actor: &Actor,
        input: CreateMilestoneInput,
    ) -> Result<Milestone, CoreError> {
        let project_id = require("project_id", input.project_id)?;
        let title = require_text("title", input.title.as_deref())?;
        authorize_project(self.store.as_ref(), actor, project_id, "add milestones to").await?;

        let is_current = input.is_current.unwrap_or(false);
        if is_current {
            self.rotator.promote(project_id, None).await?;
        }

        let milestone = self
            .store
            .insert_milestone(&CreateMilestone {
                project_id,
                title,
                description: optional_text(input.description.as_deref()),
                status: input.status.unwrap_or_default(),
                is_current,
                target_date: input.target_date,
            })
            .await?;
        tracing::info!(
            milestone_id = milestone.id,
            project_id,
            is_current,
            "Milestone created"
        );
        Ok(milestone)
    }

    /// Update `is_current` and/or `status`. Setting `is_current: true` runs
    /// rotation before the flag is written; clearing it never does.
    pub async fn update(
        &self,
        actor: &Actor,
        id: DbId,
        input: UpdateMilestoneInput,
    ) -> Result<Milestone, CoreError> {
        let (milestone, _) =
            authorize_milestone(self.store.as_ref(), actor, id, "update milestones in").await?;

        if input.is_current == Some(true) {
            self.rotator.promote(milestone.project_id, Some(id)).await?;
        }

        let updated = self
            .store
            .update_milestone(
                id,
                &UpdateMilestone {
                    is_current: input.is_current,
                    status: input.status,
                },
            )
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Milestone",
                id,
            })?;
        tracing::info!(
            milestone_id = id,
            project_id = updated.project_id,
            is_current = updated.is_current,
            status = %updated.status,
            "Milestone updated"
        );
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use waypoint_db::store::MilestoneStore;
    use waypoint_db::StoreOp;

    use super::*;
    use crate::test_support::{manager, other, owner, Harness, OWNER};

    fn new_milestone(project_id: DbId, is_current: bool) -> CreateMilestoneInput {
        CreateMilestoneInput {
            project_id: Some(project_id),
            title: Some("Beta".into()),
            is_current: Some(is_current),
            ..Default::default()
        }
    }

    fn promote() -> UpdateMilestoneInput {
        UpdateMilestoneInput {
            is_current: Some(true),
            status: None,
        }
    }

    #[tokio::test]
    async fn promoting_a_third_demotes_the_oldest() {
        let h = Harness::new();
        let p = h.project(Some(OWNER), "P").await;
        let m1 = h.milestone(p.id, true).await;
        let m2 = h.milestone(p.id, true).await;
        let m3 = h.milestone(p.id, false).await;

        let updated = h
            .services
            .milestones
            .update(&owner(), m3.id, promote())
            .await
            .unwrap();
        assert!(updated.is_current);

        let m1 = h.store.find_milestone(m1.id).await.unwrap().unwrap();
        let m2 = h.store.find_milestone(m2.id).await.unwrap().unwrap();
        assert!(!m1.is_current);
        assert!(m2.is_current);
        assert_eq!(h.current_ids(p.id).await, [m2.id, m3.id]);
    }

    #[tokio::test]
    async fn bound_holds_across_repeated_promotions() {
        let h = Harness::new();
        let p = h.project(Some(OWNER), "P").await;
        let mut ids = Vec::new();
        for _ in 0..5 {
            ids.push(h.milestone(p.id, false).await.id);
        }
        for id in &ids {
            h.services
                .milestones
                .update(&owner(), *id, promote())
                .await
                .unwrap();
            assert!(h.current_ids(p.id).await.len() <= 2);
        }
        assert_eq!(h.current_ids(p.id).await, [ids[3], ids[4]]);
    }

    #[tokio::test]
    async fn creating_as_current_rotates_first() {
        let h = Harness::new();
        let p = h.project(Some(OWNER), "P").await;
        let m1 = h.milestone(p.id, true).await;
        let m2 = h.milestone(p.id, true).await;

        let created = h
            .services
            .milestones
            .create(&owner(), new_milestone(p.id, true))
            .await
            .unwrap();
        assert_eq!(h.current_ids(p.id).await, [m2.id, created.id]);
        assert!(!h.store.find_milestone(m1.id).await.unwrap().unwrap().is_current);
    }

    #[tokio::test]
    async fn creating_not_current_never_rotates() {
        let h = Harness::new();
        let p = h.project(Some(OWNER), "P").await;
        let m1 = h.milestone(p.id, true).await;
        let m2 = h.milestone(p.id, true).await;

        let created = h
            .services
            .milestones
            .create(&owner(), new_milestone(p.id, false))
            .await
            .unwrap();
        assert!(!created.is_current);
        assert_eq!(created.status, MilestoneStatus::Pending);
        assert_eq!(h.current_ids(p.id).await, [m1.id, m2.id]);
    }

    #[tokio::test]
    async fn clearing_current_frees_a_slot_without_rotation() {
        let h = Harness::new();
        let p = h.project(Some(OWNER), "P").await;
        let m1 = h.milestone(p.id, true).await;
        let m2 = h.milestone(p.id, true).await;

        h.services
            .milestones
            .update(
                &owner(),
                m1.id,
                UpdateMilestoneInput {
                    is_current: Some(false),
                    status: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(h.current_ids(p.id).await, [m2.id]);
    }

    #[tokio::test]
    async fn status_only_update_leaves_current_flag() {
        let h = Harness::new();
        let p = h.project(Some(OWNER), "P").await;
        let m = h.milestone(p.id, true).await;

        let updated = h
            .services
            .milestones
            .update(
                &owner(),
                m.id,
                UpdateMilestoneInput {
                    is_current: None,
                    status: Some(MilestoneStatus::InProgress),
                },
            )
            .await
            .unwrap();
        assert!(updated.is_current);
        assert_eq!(updated.status, MilestoneStatus::InProgress);
    }

    #[tokio::test]
    async fn create_validates_required_fields() {
        let h = Harness::new();
        let p = h.project(Some(OWNER), "P").await;
        let milestones = &h.services.milestones;

        assert_matches!(
            milestones
                .create(&owner(), CreateMilestoneInput { title: Some("t".into()), ..Default::default() })
                .await,
            Err(CoreError::Validation(m)) if m.contains("project_id")
        );
        assert_matches!(
            milestones
                .create(&owner(), CreateMilestoneInput { project_id: Some(p.id), ..Default::default() })
                .await,
            Err(CoreError::Validation(m)) if m.contains("title")
        );
    }

    #[tokio::test]
    async fn foreign_users_cannot_touch_milestones() {
        let h = Harness::new();
        let p = h.project(Some(OWNER), "P").await;
        let m = h.milestone(p.id, false).await;

        assert_matches!(
            h.services.milestones.create(&other(), new_milestone(p.id, true)).await,
            Err(CoreError::AccessDenied(_))
        );
        assert_matches!(
            h.services.milestones.update(&other(), m.id, promote()).await,
            Err(CoreError::AccessDenied(_))
        );
        assert!(h.current_ids(p.id).await.is_empty());
        assert!(h.services.milestones.update(&manager(), m.id, promote()).await.is_ok());
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let h = Harness::new();
        assert_matches!(
            h.services.milestones.update(&owner(), 999, promote()).await,
            Err(CoreError::NotFound { entity: "Milestone", id: 999 })
        );
        assert_matches!(
            h.services.milestones.create(&owner(), new_milestone(999, false)).await,
            Err(CoreError::NotFound { entity: "Project", id: 999 })
        );
    }

    #[tokio::test]
    async fn failed_demotion_aborts_the_promotion() {
        let h = Harness::new();
        let p = h.project(Some(OWNER), "P").await;
        let m1 = h.milestone(p.id, true).await;
        let m2 = h.milestone(p.id, true).await;
        let m3 = h.milestone(p.id, false).await;
        h.store.fail_on(StoreOp::SetMilestonesCurrent);

        assert_matches!(
            h.services.milestones.update(&owner(), m3.id, promote()).await,
            Err(CoreError::Internal(_))
        );
        assert_eq!(h.current_ids(p.id).await, [m1.id, m2.id]);
    }
}
