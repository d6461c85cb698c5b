//! Handlers for the `/milestones` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use waypoint_core::types::DbId;
use waypoint_db::models::milestone::Milestone;
use waypoint_services::milestone::{CreateMilestoneInput, UpdateMilestoneInput};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/milestones
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateMilestoneInput>,
) -> AppResult<(StatusCode, Json<DataResponse<Milestone>>)> {
    let milestone = state.services.milestones.create(&auth.actor, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: milestone })))
}

/// PATCH /api/v1/milestones/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMilestoneInput>,
) -> AppResult<Json<DataResponse<Milestone>>> {
    let milestone = state
        .services
        .milestones
        .update(&auth.actor, id, input)
        .await?;
    Ok(Json(DataResponse { data: milestone }))
}
