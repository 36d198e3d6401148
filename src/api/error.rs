use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use std::fmt;
use std::sync::Arc;

use super::AppState;
use crate::i18n::Msg;
use crate::services::{
    AccountBookError, AuthError, LikeError, OAuthError, UserError, UserProfileError,
};
use crate::views;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    DatabaseError(String),

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// Marks a response whose body is replaced by a localized error page in
/// [`render_error_pages`].
#[derive(Debug, Clone, Copy)]
pub struct ErrorPage(pub Msg);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match &self {
            ApiError::NotFound(msg) => {
                tracing::debug!("Not found: {}", msg);
                (StatusCode::NOT_FOUND, Msg::NotFound)
            }
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, Msg::InternalError)
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, Msg::InternalError)
            }
        };

        let mut response = (status, status.canonical_reason().unwrap_or("Error")).into_response();
        response.extensions_mut().insert(ErrorPage(msg));
        response
    }
}

/// Renders [`ErrorPage`] responses, and unmatched routes, in the configured
/// locale.
pub async fn render_error_pages(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let response = next.run(req).await;

    let msg = match response.extensions().get::<ErrorPage>() {
        Some(ErrorPage(msg)) => *msg,
        None if response.status() == StatusCode::NOT_FOUND => Msg::NotFound,
        None => return response,
    };

    let status = response.status();
    let body = views::error_page(state.locale(), status, msg);
    (status, Html(body)).into_response()
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<tower_sessions::session::Error> for ApiError {
    fn from(err: tower_sessions::session::Error) -> Self {
        ApiError::InternalError(format!("Session error: {err}"))
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound => ApiError::NotFound("user".to_string()),
            UserError::Database(msg) => ApiError::DatabaseError(msg),
            other => ApiError::InternalError(other.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Database(msg) => ApiError::DatabaseError(msg),
            other => ApiError::InternalError(other.to_string()),
        }
    }
}

impl From<UserProfileError> for ApiError {
    fn from(err: UserProfileError) -> Self {
        match err {
            UserProfileError::NotFound => ApiError::NotFound("user profile".to_string()),
            UserProfileError::Database(msg) => ApiError::DatabaseError(msg),
            other => ApiError::InternalError(other.to_string()),
        }
    }
}

impl From<AccountBookError> for ApiError {
    fn from(err: AccountBookError) -> Self {
        match err {
            AccountBookError::NotFound => ApiError::NotFound("account book".to_string()),
            AccountBookError::Database(msg) => ApiError::DatabaseError(msg),
            other => ApiError::InternalError(other.to_string()),
        }
    }
}

impl From<LikeError> for ApiError {
    fn from(err: LikeError) -> Self {
        match err {
            LikeError::NotFound => ApiError::NotFound("like".to_string()),
            LikeError::Database(msg) => ApiError::DatabaseError(msg),
            other => ApiError::InternalError(other.to_string()),
        }
    }
}

impl From<OAuthError> for ApiError {
    fn from(err: OAuthError) -> Self {
        match err {
            OAuthError::UnknownProvider(name) => ApiError::NotFound(format!("provider {name}")),
            OAuthError::Database(msg) => ApiError::DatabaseError(msg),
            other => ApiError::InternalError(other.to_string()),
        }
    }
}
