pub mod dashboard;
pub mod health;
pub mod milestone;
pub mod progress;
pub mod project;
pub mod reminder;

use axum::Router;

use crate::state::AppState;

/// Every authenticated resource, mounted under `/api/v1`.
///
/// ```text
/// /projects          project CRUD with cascade delete
/// /milestones        create, update (current-milestone rotation)
/// /weekly-progress   weekly reports and the current reporting week
/// /reminders         scheduled e-mail reminders and delivery
/// /dashboard         per-actor counts
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/milestones", milestone::router())
        .nest("/weekly-progress", progress::router())
        .nest("/reminders", reminder::router())
        .nest("/dashboard", dashboard::router())
}
