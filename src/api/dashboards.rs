use axum::{
    Extension,
    extract::{Path, State},
    response::Html,
};
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::CurrentUser;
use super::{ApiError, AppState};
use crate::domain::UserId;
use crate::views;

/// GET /dashboards/{id}. Only the user's own dashboard is visible.
pub async fn show(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    session: Session,
    Path(id): Path<UserId>,
) -> Result<Html<String>, ApiError> {
    let dashboard = state.account_book_service().dashboard(current.id, id).await?;
    let ctx = state.page(&session, Some(current)).await;
    Ok(Html(views::dashboards::show(&ctx, &dashboard)))
}
