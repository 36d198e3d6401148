use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::db::is_unique_violation;
use crate::domain::UserId;
use crate::domain::profile::UserProfileFields;
use crate::entities::user_profiles;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: i32,
    pub user_id: UserId,
    pub nickname: String,
    pub bio: Option<String>,
    pub updated_at: String,
}

impl From<user_profiles::Model> for UserProfile {
    fn from(model: user_profiles::Model) -> Self {
        Self {
            id: model.id,
            user_id: UserId::new(model.user_id),
            nickname: model.nickname,
            bio: model.bio,
            updated_at: model.updated_at,
        }
    }
}

pub struct UserProfileRepository {
    conn: DatabaseConnection,
}

impl UserProfileRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    async fn find_model(&self, user_id: UserId) -> Result<Option<user_profiles::Model>> {
        user_profiles::Entity::find()
            .filter(user_profiles::Column::UserId.eq(user_id.value()))
            .one(&self.conn)
            .await
            .context("Failed to query user profile")
    }

    pub async fn get_for_user(&self, user_id: UserId) -> Result<Option<UserProfile>> {
        Ok(self.find_model(user_id).await?.map(UserProfile::from))
    }

    /// Returns `None` when the user already has a profile.
    pub async fn create(
        &self,
        user_id: UserId,
        fields: UserProfileFields,
    ) -> Result<Option<UserProfile>> {
        let now = chrono::Utc::now().to_rfc3339();
        let active = user_profiles::ActiveModel {
            user_id: Set(user_id.value()),
            nickname: Set(fields.nickname),
            bio: Set(fields.bio),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        match active.insert(&self.conn).await {
            Ok(model) => Ok(Some(UserProfile::from(model))),
            Err(e) if is_unique_violation(&e) => Ok(None),
            Err(e) => Err(anyhow::Error::new(e).context("Failed to insert user profile")),
        }
    }

    /// Returns `None` when the user has no profile to update.
    pub async fn update(
        &self,
        user_id: UserId,
        fields: UserProfileFields,
    ) -> Result<Option<UserProfile>> {
        let Some(model) = self.find_model(user_id).await? else {
            return Ok(None);
        };

        let mut active: user_profiles::ActiveModel = model.into();
        active.nickname = Set(fields.nickname);
        active.bio = Set(fields.bio);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update user profile")?;
        Ok(Some(UserProfile::from(model)))
    }

    pub async fn delete(&self, user_id: UserId) -> Result<bool> {
        let result = user_profiles::Entity::delete_many()
            .filter(user_profiles::Column::UserId.eq(user_id.value()))
            .exec(&self.conn)
            .await
            .context("Failed to delete user profile")?;

        Ok(result.rows_affected > 0)
    }
}
