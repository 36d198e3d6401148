use axum::{
    Extension, Form,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::{self, CurrentUser};
use super::flash::{self, Flash};
use super::{ApiError, AppState};
use crate::domain::user::{Registration, UserUpdate};
use crate::domain::validation::ValidationErrors;
use crate::i18n::Msg;
use crate::services::UserError;
use crate::views;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

impl From<RegistrationForm> for Registration {
    fn from(form: RegistrationForm) -> Self {
        Self {
            username: form.username,
            email: form.email,
            password: form.password,
            password_confirmation: form.password_confirmation,
        }
    }
}

/// Fields missing from the submission keep their stored value.
#[derive(Debug, Default, Deserialize)]
pub struct UserUpdateForm {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
}

impl From<UserUpdateForm> for UserUpdate {
    fn from(form: UserUpdateForm) -> Self {
        Self {
            username: form.username,
            email: form.email,
            password: form.password,
            password_confirmation: form.password_confirmation,
        }
    }
}

/// GET /users/new
pub async fn new(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Html<String>, ApiError> {
    let user = auth::current_user(&state, &session).await?;
    let ctx = state.page(&session, user).await;
    Ok(Html(views::users::new_form(
        &ctx,
        "",
        "",
        &ValidationErrors::new(),
    )))
}

/// POST /users
pub async fn create(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<RegistrationForm>,
) -> Result<Response, ApiError> {
    let (username, email) = (form.username.clone(), form.email.clone());

    match state.user_service().register(form.into()).await {
        Ok(user) => {
            auth::log_in(&session, user.id).await?;
            flash::set(&session, Flash::notice(state.locale(), Msg::UserCreated)).await?;
            Ok(Redirect::to("/user_profiles/new").into_response())
        }
        Err(UserError::Validation(errors)) => {
            let user = auth::current_user(&state, &session).await?;
            let ctx = state
                .page(&session, user)
                .await
                .with_flash(Flash::alert(state.locale(), Msg::UserCreateFailed));
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(views::users::new_form(&ctx, &username, &email, &errors)),
            )
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /users/edit
pub async fn edit(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    session: Session,
) -> Result<Html<String>, ApiError> {
    let user = state.user_service().get(current.id).await?;
    let ctx = state.page(&session, Some(current)).await;
    Ok(Html(views::users::edit_form(
        &ctx,
        &user.username,
        &user.email,
        &ValidationErrors::new(),
    )))
}

/// PATCH /users
pub async fn update(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    session: Session,
    Form(form): Form<UserUpdateForm>,
) -> Result<Response, ApiError> {
    let (username, email) = (form.username.clone(), form.email.clone());

    match state.user_service().update(current.id, form.into()).await {
        Ok(_) => {
            flash::set(&session, Flash::notice(state.locale(), Msg::UserUpdated)).await?;
            Ok(Redirect::to("/account_books").into_response())
        }
        Err(UserError::Validation(errors)) => {
            let stored = state.user_service().get(current.id).await?;
            let username = username.unwrap_or(stored.username);
            let email = email.unwrap_or(stored.email);

            let ctx = state
                .page(&session, Some(current))
                .await
                .with_flash(Flash::alert(state.locale(), Msg::UserUpdateFailed));
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(views::users::edit_form(&ctx, &username, &email, &errors)),
            )
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// DELETE /users
pub async fn destroy(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    session: Session,
) -> Result<Redirect, ApiError> {
    state.user_service().destroy(current.id).await?;
    session.flush().await?;
    flash::set(&session, Flash::notice(state.locale(), Msg::UserDestroyed)).await?;
    Ok(Redirect::to("/"))
}
