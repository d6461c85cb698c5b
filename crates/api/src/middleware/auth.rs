//! JWT-based authentication extractor for axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use waypoint_core::error::CoreError;
use waypoint_core::roles::{Actor, Role};

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The actor behind a request, taken from the `Authorization: Bearer` token.
///
/// The token's role claim is parsed here; a token naming an unknown role is
/// rejected before any handler runs.
///
/// ```ignore
/// async fn my_handler(auth: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(actor = %auth.actor.email, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub actor: Actor,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        let role: Role = claims
            .role
            .parse()
            .map_err(|e: waypoint_core::roles::InvalidRole| {
                AppError::Core(CoreError::Unauthorized(e.to_string()))
            })?;

        Ok(AuthUser {
            actor: Actor::new(claims.sub, role),
        })
    }
}
