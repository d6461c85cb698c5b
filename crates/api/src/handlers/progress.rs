//! Handlers for the `/weekly-progress` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use waypoint_core::types::{Date, DbId};
use waypoint_core::week::{current_week as week_containing, WeekRange};
use waypoint_services::progress::{CreateProgressInput, ProgressEntry, UpdateProgressInput};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/weekly-progress
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateProgressInput>,
) -> AppResult<(StatusCode, Json<DataResponse<ProgressEntry>>)> {
    let entry = state.services.progress.create(&auth.actor, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: entry })))
}

/// PATCH /api/v1/weekly-progress/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProgressInput>,
) -> AppResult<Json<DataResponse<ProgressEntry>>> {
    let entry = state.services.progress.update(&auth.actor, id, input).await?;
    Ok(Json(DataResponse { data: entry }))
}

#[derive(Debug, Deserialize)]
pub struct CurrentWeekParams {
    /// Day to resolve instead of today (UTC).
    pub date: Option<Date>,
}

/// GET /api/v1/weekly-progress/current-week
pub async fn current_week(
    _auth: AuthUser,
    Query(params): Query<CurrentWeekParams>,
) -> Json<DataResponse<WeekRange>> {
    let today = params
        .date
        .unwrap_or_else(|| chrono::Utc::now().date_naive());
    Json(DataResponse {
        data: week_containing(today),
    })
}
