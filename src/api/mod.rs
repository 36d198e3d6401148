use axum::{
    Router,
    extract::Request,
    http::Method,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post},
};
use std::sync::Arc;
use tower::Layer;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::clients::oauth::OAuthClient;
use crate::config::Config;
use crate::db::Store;
use crate::i18n::Locale;
use crate::services::{
    AccountBookService, AuthService, LikeService, OAuthService, UserProfileService, UserService,
};
use crate::state::SharedState;
use crate::views::PageContext;

mod account_books;
mod assets;
pub mod auth;
mod dashboards;
mod error;
pub mod flash;
mod likes;
mod oauth;
mod observability;
mod static_pages;
mod user_profiles;
mod users;

pub use auth::CurrentUser;
pub use error::ApiError;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn locale(&self) -> Locale {
        self.shared.config.general.locale
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.shared.store
    }

    #[must_use]
    pub fn user_service(&self) -> &Arc<dyn UserService> {
        &self.shared.user_service
    }

    #[must_use]
    pub fn auth_service(&self) -> &Arc<dyn AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn user_profile_service(&self) -> &Arc<dyn UserProfileService> {
        &self.shared.user_profile_service
    }

    #[must_use]
    pub fn account_book_service(&self) -> &Arc<dyn AccountBookService> {
        &self.shared.account_book_service
    }

    #[must_use]
    pub fn like_service(&self) -> &Arc<dyn LikeService> {
        &self.shared.like_service
    }

    #[must_use]
    pub fn oauth_service(&self) -> &Arc<dyn OAuthService> {
        &self.shared.oauth_service
    }

    /// Layout context for a page, consuming any pending flash.
    pub async fn page(
        &self,
        session: &tower_sessions::Session,
        user: Option<CurrentUser>,
    ) -> PageContext {
        PageContext {
            locale: self.locale(),
            current_user: user,
            flash: flash::take(session).await,
            oauth_providers: self
                .config()
                .oauth
                .iter()
                .map(|p| p.name.clone())
                .collect(),
        }
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

/// Like [`create_app_state_from_config`] with a caller-supplied OAuth client.
pub async fn create_app_state_with_oauth_client(
    config: Config,
    oauth_client: Arc<dyn OAuthClient>,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::with_oauth_client(config, oauth_client).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let (secure_cookies, inactivity_minutes) = {
        let server = &state.config().server;
        (server.secure_cookies, server.session_inactivity_minutes)
    };

    let protected_routes = create_protected_router(state.clone());

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            inactivity_minutes,
        )));

    let app = Router::new()
        .merge(protected_routes)
        .route("/", get(static_pages::top))
        .route("/login", get(auth::new).post(auth::create))
        .route("/logout", delete(auth::destroy))
        .route("/users/new", get(users::new))
        .route("/users", post(users::create))
        .route("/oauth/callback", get(oauth::callback).post(oauth::callback_form))
        .route("/oauth/{provider}", get(oauth::start))
        .route("/assets/{*file}", get(assets::serve_asset))
        .route("/metrics", get(observability::get_metrics))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            error::render_error_pages,
        ))
        .layer(session_layer)
        .layer(middleware::from_fn(
            observability::security_headers_middleware,
        ))
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // The override has to see the request before routing picks a method.
    Router::new().fallback_service(middleware::from_fn(method_override).layer(app))
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboards/{id}", get(dashboards::show))
        .route("/users/edit", get(users::edit))
        .route("/users", axum::routing::patch(users::update).delete(users::destroy))
        .route("/user_profiles/new", get(user_profiles::new))
        .route("/user_profiles/edit", get(user_profiles::edit))
        .route(
            "/user_profiles",
            post(user_profiles::create)
                .patch(user_profiles::update)
                .delete(user_profiles::destroy),
        )
        .route(
            "/account_books",
            get(account_books::index).post(account_books::create),
        )
        .route("/account_books/new", get(account_books::new))
        .route(
            "/account_books/{id}",
            get(account_books::show)
                .patch(account_books::update)
                .delete(account_books::destroy),
        )
        .route("/account_books/{id}/edit", get(account_books::edit))
        .route(
            "/account_books/{id}/expense_items",
            post(account_books::create_item),
        )
        .route(
            "/account_books/{id}/expense_items/{item_id}",
            delete(account_books::destroy_item),
        )
        .route("/likes", post(likes::create))
        .route("/likes/{id}", delete(likes::destroy))
        .route_layer(middleware::from_fn_with_state(state, auth::require_login))
}

/// Lets HTML forms reach PATCH and DELETE routes: a POST whose query string
/// carries `_method=patch|put|delete` is dispatched with that method.
pub async fn method_override(mut req: Request, next: Next) -> Response {
    if req.method() == Method::POST
        && let Some(method) = req.uri().query().and_then(override_method)
    {
        *req.method_mut() = method;
    }
    next.run(req).await
}

fn override_method(query: &str) -> Option<Method> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "_method")
        .and_then(|(_, value)| match value.to_ascii_uppercase().as_str() {
            "PATCH" => Some(Method::PATCH),
            "PUT" => Some(Method::PUT),
            "DELETE" => Some(Method::DELETE),
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_method() {
        assert_eq!(override_method("_method=PATCH"), Some(Method::PATCH));
        assert_eq!(override_method("a=1&_method=delete"), Some(Method::DELETE));
        assert_eq!(override_method("_method=GET"), None);
        assert_eq!(override_method("method=DELETE"), None);
    }
}
