use axum::{
    Extension, Form,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::CurrentUser;
use super::flash::{self, Flash};
use super::{ApiError, AppState};
use crate::domain::ledger::{AccountBookInput, ExpenseItemInput};
use crate::domain::validation::ValidationErrors;
use crate::domain::{AccountBookId, ExpenseItemId, LikeId};
use crate::i18n::Msg;
use crate::services::AccountBookError;
use crate::views::{self, FormMode};

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AccountBookForm {
    pub title: String,
    pub description: String,
}

impl From<AccountBookForm> for AccountBookInput {
    fn from(form: AccountBookForm) -> Self {
        Self {
            title: form.title,
            description: form.description,
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ExpenseItemForm {
    pub amount: String,
    pub category: String,
    pub memo: String,
    pub spent_on: String,
}

impl From<ExpenseItemForm> for ExpenseItemInput {
    fn from(form: ExpenseItemForm) -> Self {
        Self {
            amount: form.amount,
            category: form.category,
            memo: form.memo,
            spent_on: form.spent_on,
        }
    }
}

fn book_path(id: AccountBookId) -> String {
    format!("/account_books/{id}")
}

/// GET /account_books
pub async fn index(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    session: Session,
) -> Result<Html<String>, ApiError> {
    let books = state.account_book_service().list(current.id).await?;
    let ctx = state.page(&session, Some(current)).await;
    Ok(Html(views::account_books::index(&ctx, &books)))
}

/// GET /account_books/new
pub async fn new(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    session: Session,
) -> Result<Html<String>, ApiError> {
    let ctx = state.page(&session, Some(current)).await;
    Ok(Html(views::account_books::form(
        &ctx,
        FormMode::New,
        None,
        &AccountBookInput::default(),
        &ValidationErrors::new(),
    )))
}

/// POST /account_books
pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    session: Session,
    Form(form): Form<AccountBookForm>,
) -> Result<Response, ApiError> {
    match state
        .account_book_service()
        .create(current.id, form.clone().into())
        .await
    {
        Ok(book) => {
            flash::set(&session, Flash::notice(state.locale(), Msg::AccountBookCreated)).await?;
            Ok(Redirect::to(&book_path(book.id)).into_response())
        }
        Err(AccountBookError::Validation(errors)) => {
            let ctx = state
                .page(&session, Some(current))
                .await
                .with_flash(Flash::alert(state.locale(), Msg::AccountBookCreateFailed));
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(views::account_books::form(
                    &ctx,
                    FormMode::New,
                    None,
                    &form.into(),
                    &errors,
                )),
            )
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// The current user's like on the book, for the like/unlike toggle.
async fn my_like(
    state: &AppState,
    current: &CurrentUser,
    id: AccountBookId,
) -> Result<Option<LikeId>, ApiError> {
    let like = state.like_service().find(current.id, id).await?;
    Ok(like.map(|like| like.id))
}

/// GET /account_books/{id}
pub async fn show(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    session: Session,
    Path(id): Path<AccountBookId>,
) -> Result<Html<String>, ApiError> {
    let detail = state.account_book_service().show(id).await?;
    let my_like = my_like(&state, &current, id).await?;
    let ctx = state.page(&session, Some(current)).await;
    Ok(Html(views::account_books::show(
        &ctx,
        &detail,
        my_like,
        &ExpenseItemInput::default(),
        &ValidationErrors::new(),
    )))
}

/// GET /account_books/{id}/edit
pub async fn edit(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    session: Session,
    Path(id): Path<AccountBookId>,
) -> Result<Html<String>, ApiError> {
    let book = state.account_book_service().get_owned(current.id, id).await?;
    let form = AccountBookInput {
        title: book.title,
        description: book.description.unwrap_or_default(),
    };

    let ctx = state.page(&session, Some(current)).await;
    Ok(Html(views::account_books::form(
        &ctx,
        FormMode::Edit,
        Some(id),
        &form,
        &ValidationErrors::new(),
    )))
}

/// PATCH /account_books/{id}
pub async fn update(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    session: Session,
    Path(id): Path<AccountBookId>,
    Form(form): Form<AccountBookForm>,
) -> Result<Response, ApiError> {
    match state
        .account_book_service()
        .update(current.id, id, form.clone().into())
        .await
    {
        Ok(book) => {
            flash::set(&session, Flash::notice(state.locale(), Msg::AccountBookUpdated)).await?;
            Ok(Redirect::to(&book_path(book.id)).into_response())
        }
        Err(AccountBookError::Validation(errors)) => {
            let ctx = state
                .page(&session, Some(current))
                .await
                .with_flash(Flash::alert(state.locale(), Msg::AccountBookUpdateFailed));
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(views::account_books::form(
                    &ctx,
                    FormMode::Edit,
                    Some(id),
                    &form.into(),
                    &errors,
                )),
            )
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// DELETE /account_books/{id}
pub async fn destroy(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    session: Session,
    Path(id): Path<AccountBookId>,
) -> Result<Redirect, ApiError> {
    state.account_book_service().destroy(current.id, id).await?;
    flash::set(&session, Flash::notice(state.locale(), Msg::AccountBookDestroyed)).await?;
    Ok(Redirect::to("/account_books"))
}

/// POST /account_books/{id}/expense_items
pub async fn create_item(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    session: Session,
    Path(id): Path<AccountBookId>,
    Form(form): Form<ExpenseItemForm>,
) -> Result<Response, ApiError> {
    match state
        .account_book_service()
        .add_item(current.id, id, form.clone().into())
        .await
    {
        Ok(_) => {
            flash::set(&session, Flash::notice(state.locale(), Msg::ExpenseItemCreated)).await?;
            Ok(Redirect::to(&book_path(id)).into_response())
        }
        Err(AccountBookError::Validation(errors)) => {
            let detail = state.account_book_service().show(id).await?;
            let my_like = my_like(&state, &current, id).await?;
            let ctx = state
                .page(&session, Some(current))
                .await
                .with_flash(Flash::alert(state.locale(), Msg::ExpenseItemCreateFailed));
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(views::account_books::show(
                    &ctx,
                    &detail,
                    my_like,
                    &form.into(),
                    &errors,
                )),
            )
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// DELETE /account_books/{id}/expense_items/{item_id}
pub async fn destroy_item(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    session: Session,
    Path((id, item_id)): Path<(AccountBookId, ExpenseItemId)>,
) -> Result<Redirect, ApiError> {
    state
        .account_book_service()
        .remove_item(current.id, id, item_id)
        .await?;
    flash::set(&session, Flash::notice(state.locale(), Msg::ExpenseItemDestroyed)).await?;
    Ok(Redirect::to(&book_path(id)))
}
