use axum::{
    Extension, Form,
    extract::{Path, State},
    http::{HeaderMap, header},
    response::Redirect,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::CurrentUser;
use super::flash::{self, Flash};
use super::{ApiError, AppState};
use crate::domain::{AccountBookId, LikeId};
use crate::i18n::Msg;
use crate::services::LikeError;

#[derive(Debug, Deserialize)]
pub struct LikeForm {
    pub account_book_id: AccountBookId,
}

/// Local path of the page the form was submitted from, else `fallback`.
/// A path starting with `//` would redirect off-site, so it falls back too.
fn back_or(headers: &HeaderMap, fallback: String) -> String {
    headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .and_then(|referer| url::Url::parse(referer).ok())
        .filter(|url| !url.path().starts_with("//"))
        .map_or(fallback, |url| match url.query() {
            Some(query) => format!("{}?{query}", url.path()),
            None => url.path().to_string(),
        })
}

/// POST /likes
pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<LikeForm>,
) -> Result<Redirect, ApiError> {
    let locale = state.locale();
    let book_id = form.account_book_id;
    let back = back_or(&headers, format!("/account_books/{book_id}"));

    let flash = match state.like_service().create(current.id, book_id).await {
        Ok(_) => Flash::notice(locale, Msg::Liked),
        Err(LikeError::ConstraintViolation { .. }) => Flash::alert(locale, Msg::AlreadyLiked),
        Err(LikeError::NotFound) => {
            flash::set(&session, Flash::alert(locale, Msg::NotFound)).await?;
            return Ok(Redirect::to("/account_books"));
        }
        Err(e) => return Err(e.into()),
    };

    flash::set(&session, flash).await?;
    Ok(Redirect::to(&back))
}

/// DELETE /likes/{id}
pub async fn destroy(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<LikeId>,
) -> Result<Redirect, ApiError> {
    let locale = state.locale();

    let (flash, fallback) = match state.like_service().destroy(current.id, id).await {
        Ok(like) => (
            Flash::notice(locale, Msg::Unliked),
            format!("/account_books/{}", like.account_book_id),
        ),
        Err(LikeError::NotFound) => (
            Flash::alert(locale, Msg::LikeNotFound),
            "/account_books".to_string(),
        ),
        Err(e) => return Err(e.into()),
    };

    flash::set(&session, flash).await?;
    Ok(Redirect::to(&back_or(&headers, fallback)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_back_or_keeps_only_the_path() {
        let mut headers = HeaderMap::new();
        assert_eq!(back_or(&headers, "/x".to_string()), "/x");

        headers.insert(
            header::REFERER,
            HeaderValue::from_static("https://evil.example/account_books/3?page=2"),
        );
        assert_eq!(back_or(&headers, "/x".to_string()), "/account_books/3?page=2");
    }

    #[test]
    fn test_back_or_rejects_protocol_relative_paths() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::REFERER,
            HeaderValue::from_static("https://localhost//evil.example/account_books"),
        );
        assert_eq!(back_or(&headers, "/account_books/1".to_string()), "/account_books/1");

        headers.insert(
            header::REFERER,
            HeaderValue::from_static("https://localhost/\\evil.example/"),
        );
        assert_eq!(back_or(&headers, "/account_books/1".to_string()), "/account_books/1");
    }
}
