use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::i18n::Locale;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub observability: ObservabilityConfig,

    pub security: SecurityConfig,

    #[serde(default)]
    pub oauth: Vec<OAuthProviderConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Emit logs as JSON lines instead of the human-readable format.
    pub log_json: bool,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,

    /// Language used for flash and validation messages.
    pub locale: Locale,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/kakeibo.db".to_string(),
            log_level: "info".to_string(),
            log_json: false,
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
            locale: Locale::Ja,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    /// Whether to set the Secure flag on session cookies.
    /// Set to false for local development without HTTPS.
    pub secure_cookies: bool,

    /// Sessions expire after this many minutes without a request.
    pub session_inactivity_minutes: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            secure_cookies: true,
            session_inactivity_minutes: 60 * 24,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    pub loki_enabled: bool,

    pub loki_url: String,

    pub loki_labels: std::collections::HashMap<String, String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        let mut labels = std::collections::HashMap::new();
        labels.insert("app".to_string(), "kakeibo".to_string());

        Self {
            metrics_enabled: true,
            loki_enabled: false,
            loki_url: "http://localhost:3100".to_string(),
            loki_labels: labels,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Argon2 memory cost in KiB (default: 8192 = 8MB)
    pub argon2_memory_cost_kib: u32,

    /// Argon2 time cost (iterations)
    pub argon2_time_cost: u32,

    /// Argon2 parallelism (default: 1)
    pub argon2_parallelism: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            argon2_memory_cost_kib: 8192,
            argon2_time_cost: 3,
            argon2_parallelism: 1,
        }
    }
}

/// An OAuth2 authorization-code provider, e.g. GitHub or Google.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthProviderConfig {
    /// Path segment used in `/oauth/{name}`.
    pub name: String,

    pub client_id: String,

    pub client_secret: String,

    pub authorize_url: String,

    pub token_url: String,

    pub userinfo_url: String,

    pub redirect_uri: String,

    #[serde(default)]
    pub scope: String,

    /// JSON field of the userinfo response holding the stable account id.
    #[serde(default = "default_uid_field")]
    pub uid_field: String,

    #[serde(default = "default_email_field")]
    pub email_field: String,

    #[serde(default = "default_name_field")]
    pub name_field: String,
}

fn default_uid_field() -> String {
    "id".to_string()
}

fn default_email_field() -> String {
    "email".to_string()
}

fn default_name_field() -> String {
    "name".to_string()
}

impl Default for OAuthProviderConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            authorize_url: String::new(),
            token_url: String::new(),
            userinfo_url: String::new(),
            redirect_uri: String::new(),
            scope: String::new(),
            uid_field: default_uid_field(),
            email_field: default_email_field(),
            name_field: default_name_field(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            server: ServerConfig::default(),
            observability: ObservabilityConfig::default(),
            security: SecurityConfig::default(),
            oauth: Vec::new(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("kakeibo").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".kakeibo").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.general.database_path.trim().is_empty() {
            anyhow::bail!("general.database_path cannot be empty");
        }

        if self.server.port == 0 {
            anyhow::bail!("server.port must be > 0");
        }

        let mut seen = std::collections::HashSet::new();
        for provider in &self.oauth {
            if provider.name.is_empty() {
                anyhow::bail!("OAuth provider name cannot be empty");
            }
            if !seen.insert(provider.name.as_str()) {
                anyhow::bail!("Duplicate OAuth provider: {}", provider.name);
            }
            for (field, value) in [
                ("authorize_url", &provider.authorize_url),
                ("token_url", &provider.token_url),
                ("userinfo_url", &provider.userinfo_url),
                ("redirect_uri", &provider.redirect_uri),
            ] {
                url::Url::parse(value).with_context(|| {
                    format!("OAuth provider '{}' has an invalid {field}", provider.name)
                })?;
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn find_oauth_provider(&self, name: &str) -> Option<&OAuthProviderConfig> {
        self.oauth.iter().find(|p| p.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn github() -> OAuthProviderConfig {
        OAuthProviderConfig {
            name: "github".to_string(),
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            authorize_url: "https://github.com/login/oauth/authorize".to_string(),
            token_url: "https://github.com/login/oauth/access_token".to_string(),
            userinfo_url: "https://api.github.com/user".to_string(),
            redirect_uri: "http://localhost:3000/oauth/callback".to_string(),
            scope: "user:email".to_string(),
            uid_field: default_uid_field(),
            email_field: default_email_field(),
            name_field: default_name_field(),
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.general.locale, Locale::Ja);
        assert!(config.oauth.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[server]"));
        assert!(toml_str.contains("[security]"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"
            locale = "en"

            [[oauth]]
            name = "github"
            client_id = "abc"
            client_secret = "def"
            authorize_url = "https://github.com/login/oauth/authorize"
            token_url = "https://github.com/login/oauth/access_token"
            userinfo_url = "https://api.github.com/user"
            redirect_uri = "http://localhost:3000/oauth/callback"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.general.locale, Locale::En);
        assert_eq!(config.server.port, 3000);

        let provider = config.find_oauth_provider("github").unwrap();
        assert_eq!(provider.uid_field, "id");
        assert_eq!(provider.email_field, "email");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicate_providers() {
        let mut config = Config::default();
        config.oauth = vec![github(), github()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_provider_url() {
        let mut config = Config::default();
        let mut provider = github();
        provider.token_url = "not a url".to_string();
        config.oauth = vec![provider];
        assert!(config.validate().is_err());
    }
}
