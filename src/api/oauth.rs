use axum::{
    Form,
    extract::{Path, Query, State},
    response::Redirect,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;
use uuid::Uuid;

use super::auth;
use super::flash::{self, Flash};
use super::{ApiError, AppState};
use crate::i18n::Msg;

const STATE_KEY: &str = "oauth_state";
const PROVIDER_KEY: &str = "oauth_provider";

/// Parameters the provider sends back, either as a query string or as a
/// `form_post` body.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// GET /oauth/{provider}
pub async fn start(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(provider): Path<String>,
) -> Result<Redirect, ApiError> {
    let csrf_state = Uuid::new_v4().simple().to_string();
    let url = state.oauth_service().authorize_url(&provider, &csrf_state)?;

    session.insert(STATE_KEY, &csrf_state).await?;
    session.insert(PROVIDER_KEY, &provider).await?;

    tracing::debug!(%provider, "Redirecting to OAuth provider");
    Ok(Redirect::to(&url))
}

/// GET /oauth/callback
pub async fn callback(
    State(state): State<Arc<AppState>>,
    session: Session,
    Query(params): Query<CallbackParams>,
) -> Result<Redirect, ApiError> {
    finish(&state, &session, params).await
}

/// POST /oauth/callback
pub async fn callback_form(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(params): Form<CallbackParams>,
) -> Result<Redirect, ApiError> {
    finish(&state, &session, params).await
}

async fn finish(
    state: &AppState,
    session: &Session,
    params: CallbackParams,
) -> Result<Redirect, ApiError> {
    let expected_state = session.remove::<String>(STATE_KEY).await?;
    let provider = session.remove::<String>(PROVIDER_KEY).await?;

    let (Some(provider), Some(code)) = (provider, params.code) else {
        tracing::warn!(error = ?params.error, "OAuth callback without a pending login");
        return failed(state, session).await;
    };

    if expected_state.is_none() || expected_state != params.state {
        tracing::warn!(%provider, "OAuth state mismatch");
        return failed(state, session).await;
    }

    match state.oauth_service().sign_in(&provider, &code).await {
        Ok(user) => {
            auth::log_in(session, user.id).await?;
            flash::set(session, Flash::notice(state.locale(), Msg::OAuthSucceeded)).await?;
            Ok(Redirect::to("/account_books"))
        }
        Err(e) => {
            tracing::warn!(%provider, error = %e, "OAuth sign-in failed");
            failed(state, session).await
        }
    }
}

async fn failed(state: &AppState, session: &Session) -> Result<Redirect, ApiError> {
    flash::set(session, Flash::alert(state.locale(), Msg::OAuthFailed)).await?;
    Ok(Redirect::to("/login"))
}
