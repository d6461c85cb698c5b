use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Routes mounted at `/dashboard`.
///
/// ```text
/// GET    /        -> stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(dashboard::stats))
}
