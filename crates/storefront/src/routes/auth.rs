//! Authentication route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use sr_robot_core::User;
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::extract::JsonBody;
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Session status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub is_admin: bool,
}

impl From<Option<User>> for SessionView {
    fn from(user: Option<User>) -> Self {
        Self {
            is_authenticated: user.is_some(),
            is_admin: user.as_ref().is_some_and(|u| u.is_admin),
            user,
        }
    }
}

/// Sign in.
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<LoginForm>,
) -> Result<Json<User>> {
    let user = state.session()?.auth.login(&form.email, &form.password)?;
    set_sentry_user(&user.id, Some(user.email.as_str()));
    Ok(Json(user))
}

/// Create an account and sign in.
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<RegisterForm>,
) -> Result<(StatusCode, Json<User>)> {
    let user = state
        .session()?
        .auth
        .register(&form.name, &form.email, &form.password)?;
    set_sentry_user(&user.id, Some(user.email.as_str()));
    Ok((StatusCode::CREATED, Json(user)))
}

/// Sign out.
#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> Result<StatusCode> {
    state.session()?.auth.logout()?;
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}

/// Current session.
pub async fn me(CurrentUser(user): CurrentUser) -> Json<SessionView> {
    Json(SessionView::from(user))
}
