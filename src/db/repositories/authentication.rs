use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::db::is_unique_violation;
use crate::domain::UserId;
use crate::entities::authentications;

/// Repository for OAuth identities linked to local users.
pub struct AuthenticationRepository {
    conn: DatabaseConnection,
}

impl AuthenticationRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn find_user(&self, provider: &str, uid: &str) -> Result<Option<UserId>> {
        let row = authentications::Entity::find()
            .filter(authentications::Column::Provider.eq(provider))
            .filter(authentications::Column::Uid.eq(uid))
            .one(&self.conn)
            .await
            .context("Failed to query authentication")?;

        Ok(row.map(|r| UserId::new(r.user_id)))
    }

    /// Links the identity. Returns false if `(provider, uid)` is already linked.
    pub async fn link(&self, user_id: UserId, provider: &str, uid: &str) -> Result<bool> {
        let active = authentications::ActiveModel {
            user_id: Set(user_id.value()),
            provider: Set(provider.to_string()),
            uid: Set(uid.to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        match active.insert(&self.conn).await {
            Ok(_) => Ok(true),
            Err(e) if is_unique_violation(&e) => Ok(false),
            Err(e) => Err(anyhow::Error::new(e).context("Failed to insert authentication")),
        }
    }
}
