//! Authentication extractors.
//!
//! The shopper session lives in [`AppState`], so these extractors read the
//! signed-in user from state rather than from a cookie.

use axum::{extract::FromRequestParts, http::request::Parts};
use sr_robot_core::User;

use crate::error::AppError;
use crate::state::AppState;

/// Extractor for the signed-in user, if any.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(CurrentUser(user): CurrentUser) -> impl IntoResponse {
///     match user {
///         Some(u) => format!("Hola, {}!", u.name),
///         None => "Hola!".to_string(),
///     }
/// }
/// ```
pub struct CurrentUser(pub Option<User>);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = state.session()?;
        Ok(Self(session.auth.current_user().cloned()))
    }
}

/// Extractor that requires a signed-in administrator.
///
/// Rejects anonymous requests with 401 and signed-in shoppers with 403.
pub struct RequireAdmin(pub User);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = state.session()?;
        match session.auth.current_user() {
            None => Err(AppError::Unauthorized(
                "Sign in to access the dashboard".to_string(),
            )),
            Some(user) if !user.is_admin => Err(AppError::Forbidden(
                "Administrator access required".to_string(),
            )),
            Some(user) => Ok(Self(user.clone())),
        }
    }
}
