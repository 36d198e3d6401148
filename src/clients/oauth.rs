//! Authorization-code exchange against a configured OAuth 2 provider.

use anyhow::{Context, Result, bail};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::OAuthProviderConfig;

/// Who the provider says the user is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthIdentity {
    pub uid: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

#[async_trait::async_trait]
pub trait OAuthClient: Send + Sync {
    /// Trades an authorization `code` for the user's identity.
    async fn fetch_identity(
        &self,
        provider: &OAuthProviderConfig,
        code: &str,
    ) -> Result<OAuthIdentity>;
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

pub struct HttpOAuthClient {
    client: Client,
}

impl HttpOAuthClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .user_agent("Kakeibo/1.0")
            .build()
            .context("Failed to build OAuth HTTP client")?;
        Ok(Self { client })
    }

    async fn exchange_code(&self, provider: &OAuthProviderConfig, code: &str) -> Result<String> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", provider.redirect_uri.as_str()),
            ("client_id", provider.client_id.as_str()),
            ("client_secret", provider.client_secret.as_str()),
        ];

        let response = self
            .client
            .post(&provider.token_url)
            .header("Accept", "application/json")
            .form(&params)
            .send()
            .await
            .with_context(|| format!("Failed to reach {} token endpoint", provider.name))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            bail!("{} token exchange failed: status={status}, body={body}", provider.name);
        }

        let token: TokenResponse = response
            .json()
            .await
            .context("Token response did not contain an access_token")?;
        Ok(token.access_token)
    }
}

#[async_trait::async_trait]
impl OAuthClient for HttpOAuthClient {
    async fn fetch_identity(
        &self,
        provider: &OAuthProviderConfig,
        code: &str,
    ) -> Result<OAuthIdentity> {
        let access_token = self.exchange_code(provider, code).await?;

        let response = self
            .client
            .get(&provider.userinfo_url)
            .bearer_auth(access_token)
            .header("Accept", "application/json")
            .send()
            .await
            .with_context(|| format!("Failed to reach {} userinfo endpoint", provider.name))?;

        let status = response.status();
        if status != StatusCode::OK {
            bail!("{} userinfo request failed: status={status}", provider.name);
        }

        let body: Value = response.json().await.context("Invalid userinfo JSON")?;
        debug!(provider = %provider.name, "Fetched OAuth userinfo");
        identity_from_userinfo(provider, &body)
    }
}

/// Reads the configured uid/email/name fields out of a userinfo document.
/// Numeric uids (GitHub) are accepted as well as strings.
pub fn identity_from_userinfo(
    provider: &OAuthProviderConfig,
    body: &Value,
) -> Result<OAuthIdentity> {
    let text = |field: &str| -> Option<String> {
        match body.get(field)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    };

    let Some(uid) = text(&provider.uid_field) else {
        bail!(
            "{} userinfo is missing the '{}' field",
            provider.name,
            provider.uid_field
        );
    };

    Ok(OAuthIdentity {
        uid,
        email: text(&provider.email_field),
        name: text(&provider.name_field),
    })
}
