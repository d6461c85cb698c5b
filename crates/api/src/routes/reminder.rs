use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::reminder;
use crate::state::AppState;

/// Routes mounted at `/reminders`.
///
/// ```text
/// GET    /               -> list
/// POST   /               -> create
/// POST   /process-due    -> process_due (manager only)
/// PATCH  /{id}           -> update
/// DELETE /{id}           -> delete
/// POST   /{id}/send      -> send
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(reminder::list).post(reminder::create))
        .route("/process-due", post(reminder::process_due))
        .route("/{id}", patch(reminder::update).delete(reminder::delete))
        .route("/{id}/send", post(reminder::send))
}
