use axum::routing::{patch, post};
use axum::Router;

use crate::handlers::milestone;
use crate::state::AppState;

/// Routes mounted at `/milestones`.
///
/// ```text
/// POST   /        -> create
/// PATCH  /{id}    -> update
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(milestone::create))
        .route("/{id}", patch(milestone::update))
}
