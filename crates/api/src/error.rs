use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use waypoint_core::error::CoreError;
use waypoint_db::StoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`StoreError`] for failures
/// surfaced directly by the record store. Implements [`IntoResponse`] with a
/// `{ "error": message, "code": CODE }` body.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::AccessDenied(msg) => {
                    (StatusCode::FORBIDDEN, "ACCESS_DENIED", msg.clone())
                }
                CoreError::AlreadySent { .. } => {
                    (StatusCode::CONFLICT, "ALREADY_SENT", core.to_string())
                }
                CoreError::DeliveryFailed(msg) => {
                    (StatusCode::BAD_GATEWAY, "DELIVERY_FAILED", msg.clone())
                }
                CoreError::DeletionFailed { step, reason } => {
                    tracing::error!(step = %step, error = %reason, "Project deletion failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "DELETION_FAILED",
                        format!("Project deletion stopped at step '{step}'; retry to finish"),
                    )
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },
            AppError::Store(err) => {
                tracing::error!(error = %err, "Record store error");
                internal()
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let AppError::Core(CoreError::DeletionFailed { step, .. }) = &self {
            body["step"] = json!(step.as_str());
        }

        (status, axum::Json(body)).into_response()
    }
}
