//! Role-gated extractors wrapping [`AuthUser`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use waypoint_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `manager` role. Rejects with 403 otherwise.
///
/// ```ignore
/// async fn sweep(RequireManager(auth): RequireManager) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireManager(pub AuthUser);

impl FromRequestParts<AppState> for RequireManager {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = AuthUser::from_request_parts(parts, state).await?;
        if !auth.actor.is_manager() {
            return Err(AppError::Core(CoreError::AccessDenied(
                "Manager role required".into(),
            )));
        }
        Ok(RequireManager(auth))
    }
}
