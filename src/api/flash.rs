//! One-shot messages carried across a redirect in the session.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::i18n::{Locale, Msg};

const FLASH_KEY: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Notice,
    Alert,
}

impl FlashKind {
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Notice => "flash notice",
            Self::Alert => "flash alert",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    #[must_use]
    pub fn notice(locale: Locale, msg: Msg) -> Self {
        Self {
            kind: FlashKind::Notice,
            message: msg.text(locale).to_string(),
        }
    }

    #[must_use]
    pub fn alert(locale: Locale, msg: Msg) -> Self {
        Self {
            kind: FlashKind::Alert,
            message: msg.text(locale).to_string(),
        }
    }
}

/// Stores `flash` for the next page the browser loads.
pub async fn set(session: &Session, flash: Flash) -> Result<(), tower_sessions::session::Error> {
    session.insert(FLASH_KEY, flash).await
}

/// Removes and returns the pending flash, if any. A corrupt entry is dropped.
pub async fn take(session: &Session) -> Option<Flash> {
    match session.remove::<Flash>(FLASH_KEY).await {
        Ok(flash) => flash,
        Err(e) => {
            tracing::warn!(error = %e, "Discarding unreadable flash");
            None
        }
    }
}
