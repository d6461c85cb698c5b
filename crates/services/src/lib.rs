//! Waypoint application services.
//!
//! Each service resolves the project that owns the target record, applies
//! the ownership predicate and then performs its mutation against the
//! [`RecordStore`]. Milestone promotions go through
//! [`CurrentMilestoneRotator`]; project deletion goes through
//! [`CascadeDeletionPlanner`].

use std::sync::Arc;

use waypoint_db::RecordStore;
use waypoint_events::{Mailer, ReminderRenderer};

mod authz;
pub mod cascade;
pub mod dashboard;
pub mod milestone;
pub mod progress;
pub mod project;
pub mod reminder;
pub mod rotator;

#[cfg(test)]
mod test_support;

pub use cascade::CascadeDeletionPlanner;
pub use dashboard::{DashboardService, DashboardStats};
pub use milestone::MilestoneService;
pub use progress::WeeklyProgressService;
pub use project::ProjectService;
pub use reminder::{DeliveryOutcome, DeliveryResult, ReminderService};
pub use rotator::CurrentMilestoneRotator;

/// Every service, wired to one store and one mailer.
#[derive(Clone)]
pub struct Services {
    pub projects: ProjectService,
    pub milestones: MilestoneService,
    pub progress: WeeklyProgressService,
    pub reminders: ReminderService,
    pub dashboard: DashboardService,
}

impl Services {
    pub fn new(
        store: Arc<dyn RecordStore>,
        mailer: Arc<dyn Mailer>,
        renderer: Arc<ReminderRenderer>,
    ) -> Self {
        Self {
            projects: ProjectService::new(Arc::clone(&store)),
            milestones: MilestoneService::new(Arc::clone(&store)),
            progress: WeeklyProgressService::new(Arc::clone(&store)),
            reminders: ReminderService::new(Arc::clone(&store), mailer, renderer),
            dashboard: DashboardService::new(store),
        }
    }
}
