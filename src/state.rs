use std::sync::Arc;

use crate::clients::oauth::{HttpOAuthClient, OAuthClient};
use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AccountBookService, AuthService, LikeService, OAuthService, SeaOrmAccountBookService,
    SeaOrmAuthService, SeaOrmLikeService, SeaOrmOAuthService, SeaOrmUserProfileService,
    SeaOrmUserService, UserProfileService, UserService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub user_service: Arc<dyn UserService>,

    pub auth_service: Arc<dyn AuthService>,

    pub user_profile_service: Arc<dyn UserProfileService>,

    pub account_book_service: Arc<dyn AccountBookService>,

    pub like_service: Arc<dyn LikeService>,

    pub oauth_service: Arc<dyn OAuthService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let client = Arc::new(HttpOAuthClient::new()?);
        Self::with_oauth_client(config, client).await
    }

    /// Same as [`SharedState::new`] with a caller-supplied OAuth client.
    pub async fn with_oauth_client(
        config: Config,
        oauth_client: Arc<dyn OAuthClient>,
    ) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let user_service = Arc::new(SeaOrmUserService::new(
            store.clone(),
            config.security.clone(),
        )) as Arc<dyn UserService>;

        let auth_service = Arc::new(SeaOrmAuthService::new(store.clone())) as Arc<dyn AuthService>;

        let user_profile_service =
            Arc::new(SeaOrmUserProfileService::new(store.clone())) as Arc<dyn UserProfileService>;

        let account_book_service =
            Arc::new(SeaOrmAccountBookService::new(store.clone())) as Arc<dyn AccountBookService>;

        let like_service = Arc::new(SeaOrmLikeService::new(store.clone())) as Arc<dyn LikeService>;

        let oauth_service = Arc::new(SeaOrmOAuthService::new(
            store.clone(),
            config.oauth.clone(),
            oauth_client,
            config.security.clone(),
        )) as Arc<dyn OAuthService>;

        Ok(Self {
            config: Arc::new(config),
            store,
            user_service,
            auth_service,
            user_profile_service,
            account_book_service,
            like_service,
            oauth_service,
        })
    }
}
