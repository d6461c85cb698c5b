//! Handlers for the `/reminders` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use waypoint_core::types::DbId;
use waypoint_db::models::email_reminder::{EmailReminder, ReminderListing};
use waypoint_services::reminder::{CreateReminderInput, UpdateReminderInput};
use waypoint_services::DeliveryOutcome;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/reminders
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ReminderListing>>>> {
    let reminders = state.services.reminders.list(&auth.actor).await?;
    Ok(Json(DataResponse { data: reminders }))
}

/// POST /api/v1/reminders
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateReminderInput>,
) -> AppResult<(StatusCode, Json<DataResponse<EmailReminder>>)> {
    let reminder = state.services.reminders.create(&auth.actor, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: reminder })))
}

/// PATCH /api/v1/reminders/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateReminderInput>,
) -> AppResult<Json<DataResponse<EmailReminder>>> {
    let reminder = state
        .services
        .reminders
        .update(&auth.actor, id, input)
        .await?;
    Ok(Json(DataResponse { data: reminder }))
}

/// DELETE /api/v1/reminders/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.services.reminders.delete(&auth.actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/reminders/{id}/send
pub async fn send(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<EmailReminder>>> {
    let reminder = state.services.reminders.send(&auth.actor, id).await?;
    Ok(Json(DataResponse { data: reminder }))
}

/// POST /api/v1/reminders/process-due
///
/// Runs the due-reminder sweep immediately, the same pass the worker runs
/// on its interval.
pub async fn process_due(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<DeliveryOutcome>>>> {
    let outcomes = state
        .services
        .reminders
        .process_due(chrono::Utc::now())
        .await?;
    tracing::info!(
        triggered_by = %auth.actor.email,
        attempted = outcomes.len(),
        "Manual reminder sweep finished"
    );
    Ok(Json(DataResponse { data: outcomes }))
}
