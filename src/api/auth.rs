use axum::{
    Form,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::flash::{self, Flash};
use super::{ApiError, AppState};
use crate::domain::UserId;
use crate::i18n::Msg;
use crate::services::AuthError;
use crate::views;

pub const USER_ID_KEY: &str = "user_id";

/// The logged-in user, placed in request extensions by [`require_login`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: UserId,
    pub username: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

// ============================================================================
// Session helpers
// ============================================================================

/// Starts an authenticated session for `user_id` under a fresh session id.
pub async fn log_in(session: &Session, user_id: UserId) -> Result<(), ApiError> {
    session.cycle_id().await?;
    session.insert(USER_ID_KEY, user_id).await?;
    Ok(())
}

/// Resolves the session's user. A session pointing at a deleted user counts
/// as logged out.
pub async fn current_user(
    state: &AppState,
    session: &Session,
) -> Result<Option<CurrentUser>, ApiError> {
    let Some(user_id) = session.get::<UserId>(USER_ID_KEY).await? else {
        return Ok(None);
    };

    let user = state.store().get_user(user_id).await?;
    Ok(user.map(|u| CurrentUser {
        id: u.id,
        username: u.username,
    }))
}

// ============================================================================
// Middleware
// ============================================================================

/// Lets the request through with a [`CurrentUser`] extension, or redirects
/// to the login page with an alert.
pub async fn require_login(
    State(state): State<Arc<AppState>>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(user) = current_user(&state, &session).await? {
        tracing::Span::current().record("user_id", user.id.value());
        request.extensions_mut().insert(user);
        return Ok(next.run(request).await);
    }

    flash::set(&session, Flash::alert(state.locale(), Msg::LoginRequired)).await?;
    Ok(Redirect::to("/login").into_response())
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /login
pub async fn new(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Html<String>, ApiError> {
    let user = current_user(&state, &session).await?;
    let ctx = state.page(&session, user).await;
    Ok(Html(views::sessions::login_form(&ctx, "")))
}

/// POST /login
pub async fn create(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    match state.auth_service().login(&form.email, &form.password).await {
        Ok(user) => {
            log_in(&session, user.id).await?;
            flash::set(&session, Flash::notice(state.locale(), Msg::LoginSucceeded)).await?;
            tracing::info!(user_id = %user.id, "User logged in");
            Ok(Redirect::to("/account_books").into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            let ctx = state
                .page(&session, None)
                .await
                .with_flash(Flash::alert(state.locale(), Msg::LoginFailed));
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(views::sessions::login_form(&ctx, &form.email)),
            )
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// DELETE /logout
pub async fn destroy(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Redirect, ApiError> {
    if let Some(user_id) = session.get::<UserId>(USER_ID_KEY).await? {
        tracing::info!(%user_id, "User logged out");
    }
    session.flush().await?;
    flash::set(&session, Flash::notice(state.locale(), Msg::LoggedOut)).await?;
    Ok(Redirect::to("/"))
}
