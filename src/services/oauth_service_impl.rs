//! `SeaORM` implementation of the `OAuthService` trait.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::clients::oauth::{OAuthClient, OAuthIdentity};
use crate::config::{OAuthProviderConfig, SecurityConfig};
use crate::db::repositories::user::generate_random_password;
use crate::db::{Store, User};
use crate::domain::user::{is_valid_email, normalize_email};
use crate::services::oauth_service::{OAuthError, OAuthService};

pub struct SeaOrmOAuthService {
    store: Store,
    providers: Vec<OAuthProviderConfig>,
    client: Arc<dyn OAuthClient>,
    security: SecurityConfig,
}

impl SeaOrmOAuthService {
    #[must_use]
    pub fn new(
        store: Store,
        providers: Vec<OAuthProviderConfig>,
        client: Arc<dyn OAuthClient>,
        security: SecurityConfig,
    ) -> Self {
        Self {
            store,
            providers,
            client,
            security,
        }
    }

    fn provider(&self, name: &str) -> Result<&OAuthProviderConfig, OAuthError> {
        self.providers
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| OAuthError::UnknownProvider(name.to_string()))
    }

    async fn linked_user(
        &self,
        provider: &str,
        uid: &str,
    ) -> Result<Option<User>, OAuthError> {
        match self.store.find_user_by_identity(provider, uid).await? {
            Some(user_id) => Ok(self.store.get_user(user_id).await?),
            None => Ok(None),
        }
    }

    /// Returns the user linked to `identity`, or registers a new one.
    ///
    /// An existing account with the same email is never reused: the provider
    /// may report addresses it has not verified. The new account then gets
    /// the placeholder address instead.
    async fn find_or_create(
        &self,
        provider: &str,
        identity: &OAuthIdentity,
    ) -> Result<User, OAuthError> {
        if let Some(user) = self.linked_user(provider, &identity.uid).await? {
            return Ok(user);
        }

        let placeholder = placeholder_email(provider, &identity.uid);
        let shared_email = identity
            .email
            .as_deref()
            .map(normalize_email)
            .filter(|e| is_valid_email(e));

        let username = identity
            .name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .or_else(|| {
                shared_email
                    .as_deref()
                    .and_then(|e| e.split('@').next())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| provider.to_string());

        let password = generate_random_password();
        for email in shared_email.iter().chain(std::iter::once(&placeholder)) {
            if let Some(user) = self
                .store
                .create_user(&username, email, &password, &self.security)
                .await?
            {
                metrics::counter!("users_registered_total").increment(1);
                info!(user_id = %user.id, provider, "User registered through OAuth");
                return Ok(user);
            }
            if email != &placeholder {
                warn!(provider, "OAuth email already belongs to a local account");
            }
        }

        // The placeholder is unique to this identity, so its owner came from
        // a concurrent sign-in with the same provider account.
        self.store
            .get_user_by_email(&placeholder)
            .await?
            .ok_or_else(|| OAuthError::Internal("user vanished after conflict".to_string()))
    }
}

/// Address used when the provider does not share a usable email.
fn placeholder_email(provider: &str, uid: &str) -> String {
    normalize_email(&format!("{uid}@{provider}.oauth.invalid"))
}

#[async_trait]
impl OAuthService for SeaOrmOAuthService {
    fn authorize_url(&self, provider: &str, state: &str) -> Result<String, OAuthError> {
        let provider = self.provider(provider)?;

        let mut url = url::Url::parse(&provider.authorize_url)
            .map_err(|e| OAuthError::Internal(format!("Invalid authorize_url: {e}")))?;
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &provider.client_id)
            .append_pair("redirect_uri", &provider.redirect_uri)
            .append_pair("state", state);
        if !provider.scope.is_empty() {
            url.query_pairs_mut().append_pair("scope", &provider.scope);
        }

        Ok(url.into())
    }

    async fn sign_in(&self, provider: &str, code: &str) -> Result<User, OAuthError> {
        let config = self.provider(provider)?;

        let identity = self
            .client
            .fetch_identity(config, code)
            .await
            .map_err(|e| {
                warn!(provider, error = %e, "OAuth exchange failed");
                OAuthError::Exchange(e.to_string())
            })?;

        let user = self.find_or_create(provider, &identity).await?;

        if self
            .store
            .link_identity(user.id, provider, &identity.uid)
            .await?
        {
            info!(user_id = %user.id, provider, "Linked OAuth identity");
            return Ok(user);
        }

        // Another request linked this identity first; sign in as that user.
        Ok(self
            .linked_user(provider, &identity.uid)
            .await?
            .unwrap_or(user))
    }
}
