//! Per-table repositories over a [`PgPool`](sqlx::PgPool).
//!
//! Each repository is a zero-sized struct of associated functions issuing a
//! single SQL statement.

mod email_reminder_repo;
mod milestone_repo;
mod project_repo;
mod weekly_progress_repo;

pub use email_reminder_repo::EmailReminderRepo;
pub use milestone_repo::MilestoneRepo;
pub use project_repo::ProjectRepo;
pub use weekly_progress_repo::WeeklyProgressRepo;
