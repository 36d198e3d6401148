use axum::{extract::State, response::Html};
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, AppState, auth};
use crate::views;

/// GET /
pub async fn top(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Html<String>, ApiError> {
    let user = auth::current_user(&state, &session).await?;
    let ctx = state.page(&session, user).await;
    Ok(Html(views::static_pages::top(&ctx)))
}
