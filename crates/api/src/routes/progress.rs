use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::progress;
use crate::state::AppState;

/// Routes mounted at `/weekly-progress`.
///
/// ```text
/// POST   /               -> create
/// GET    /current-week   -> current_week
/// PATCH  /{id}           -> update
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(progress::create))
        .route("/current-week", get(progress::current_week))
        .route("/{id}", patch(progress::update))
}
