use axum::{
    Extension, Form,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::CurrentUser;
use super::flash::{self, Flash};
use super::{ApiError, AppState};
use crate::domain::profile::UserProfileInput;
use crate::domain::validation::ValidationErrors;
use crate::i18n::Msg;
use crate::services::UserProfileError;
use crate::views::{self, FormMode};

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct UserProfileForm {
    pub nickname: String,
    pub bio: String,
}

impl From<UserProfileForm> for UserProfileInput {
    fn from(form: UserProfileForm) -> Self {
        Self {
            nickname: form.nickname,
            bio: form.bio,
        }
    }
}

/// GET /user_profiles/new
pub async fn new(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    session: Session,
) -> Result<Html<String>, ApiError> {
    let ctx = state.page(&session, Some(current)).await;
    Ok(Html(views::user_profiles::form(
        &ctx,
        FormMode::New,
        "",
        "",
        &ValidationErrors::new(),
    )))
}

/// POST /user_profiles
pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    session: Session,
    Form(form): Form<UserProfileForm>,
) -> Result<Response, ApiError> {
    match state
        .user_profile_service()
        .create(current.id, form.clone().into())
        .await
    {
        Ok(_) => {
            flash::set(&session, Flash::notice(state.locale(), Msg::ProfileCreated)).await?;
            Ok(Redirect::to("/account_books").into_response())
        }
        Err(UserProfileError::Validation(errors)) => {
            let ctx = state
                .page(&session, Some(current))
                .await
                .with_flash(Flash::alert(state.locale(), Msg::ProfileCreateFailed));
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(views::user_profiles::form(
                    &ctx,
                    FormMode::New,
                    &form.nickname,
                    &form.bio,
                    &errors,
                )),
            )
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /user_profiles/edit
pub async fn edit(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    session: Session,
) -> Result<Response, ApiError> {
    let Some(profile) = state.user_profile_service().get(current.id).await? else {
        return missing_profile(&state, &session).await;
    };

    let ctx = state.page(&session, Some(current)).await;
    Ok(Html(views::user_profiles::form(
        &ctx,
        FormMode::Edit,
        &profile.nickname,
        profile.bio.as_deref().unwrap_or_default(),
        &ValidationErrors::new(),
    ))
    .into_response())
}

/// PATCH /user_profiles
pub async fn update(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    session: Session,
    Form(form): Form<UserProfileForm>,
) -> Result<Response, ApiError> {
    match state
        .user_profile_service()
        .update(current.id, form.clone().into())
        .await
    {
        Ok(_) => {
            flash::set(&session, Flash::notice(state.locale(), Msg::ProfileUpdated)).await?;
            Ok(Redirect::to("/account_books").into_response())
        }
        Err(UserProfileError::Validation(errors)) => {
            let ctx = state
                .page(&session, Some(current))
                .await
                .with_flash(Flash::alert(state.locale(), Msg::ProfileUpdateFailed));
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(views::user_profiles::form(
                    &ctx,
                    FormMode::Edit,
                    &form.nickname,
                    &form.bio,
                    &errors,
                )),
            )
                .into_response())
        }
        Err(UserProfileError::NotFound) => missing_profile(&state, &session).await,
        Err(e) => Err(e.into()),
    }
}

/// DELETE /user_profiles
pub async fn destroy(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    session: Session,
) -> Result<Response, ApiError> {
    match state.user_profile_service().destroy(current.id).await {
        Ok(()) => {
            flash::set(&session, Flash::notice(state.locale(), Msg::ProfileDestroyed)).await?;
            Ok(Redirect::to("/account_books").into_response())
        }
        Err(UserProfileError::NotFound) => missing_profile(&state, &session).await,
        Err(e) => Err(e.into()),
    }
}

async fn missing_profile(state: &AppState, session: &Session) -> Result<Response, ApiError> {
    flash::set(session, Flash::alert(state.locale(), Msg::ProfileMissing)).await?;
    Ok(Redirect::to("/user_profiles/new").into_response())
}
