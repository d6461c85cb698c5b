use axum::extract::State;
use axum::Json;
use waypoint_services::DashboardStats;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/dashboard
pub async fn stats(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<DashboardStats>>> {
    let stats = state.services.dashboard.stats(&auth.actor).await?;
    Ok(Json(DataResponse { data: stats }))
}
