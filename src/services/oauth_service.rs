//! Domain service for signing in through an external OAuth provider.

use thiserror::Error;

use crate::db::User;

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("Unknown OAuth provider: {0}")]
    UnknownProvider(String),

    #[error("OAuth state mismatch")]
    StateMismatch,

    #[error("OAuth exchange failed: {0}")]
    Exchange(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for OAuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for OAuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait OAuthService: Send + Sync {
    /// Provider authorize URL carrying `state`.
    fn authorize_url(&self, provider: &str, state: &str) -> Result<String, OAuthError>;

    /// Resolves `code` to a local user: the one linked to the (provider,
    /// uid) pair, else a new account. A provider email that a local account
    /// already uses is not trusted; the new account gets a placeholder
    /// address. The link is recorded in every case.
    async fn sign_in(&self, provider: &str, code: &str) -> Result<User, OAuthError>;
}
