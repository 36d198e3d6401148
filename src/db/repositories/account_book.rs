use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::ledger::AccountBookFields;
use crate::domain::{AccountBookId, UserId};
use crate::entities::{account_books, users};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountBook {
    pub id: AccountBookId,
    pub user_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<account_books::Model> for AccountBook {
    fn from(model: account_books::Model) -> Self {
        Self {
            id: AccountBookId::new(model.id),
            user_id: UserId::new(model.user_id),
            title: model.title,
            description: model.description,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Repository for account book operations
pub struct AccountBookRepository {
    conn: DatabaseConnection,
}

impl AccountBookRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Every account book, newest first, with its owner's username.
    pub async fn list_with_owner(&self) -> Result<Vec<(AccountBook, String)>> {
        let rows = account_books::Entity::find()
            .find_also_related(users::Entity)
            .order_by_desc(account_books::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list account books")?;

        Ok(rows
            .into_iter()
            .map(|(book, owner)| {
                let owner = owner.map(|u| u.username).unwrap_or_default();
                (AccountBook::from(book), owner)
            })
            .collect())
    }

    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<AccountBook>> {
        let rows = account_books::Entity::find()
            .filter(account_books::Column::UserId.eq(user_id.value()))
            .order_by_desc(account_books::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list account books for user")?;

        Ok(rows.into_iter().map(AccountBook::from).collect())
    }

    pub async fn get(&self, id: AccountBookId) -> Result<Option<AccountBook>> {
        let row = account_books::Entity::find_by_id(id.value())
            .one(&self.conn)
            .await
            .context("Failed to query account book")?;

        Ok(row.map(AccountBook::from))
    }

    pub async fn get_with_owner(&self, id: AccountBookId) -> Result<Option<(AccountBook, String)>> {
        let row = account_books::Entity::find_by_id(id.value())
            .find_also_related(users::Entity)
            .one(&self.conn)
            .await
            .context("Failed to query account book")?;

        Ok(row.map(|(book, owner)| {
            let owner = owner.map(|u| u.username).unwrap_or_default();
            (AccountBook::from(book), owner)
        }))
    }

    pub async fn create(&self, user_id: UserId, fields: AccountBookFields) -> Result<AccountBook> {
        let now = chrono::Utc::now().to_rfc3339();
        let active = account_books::ActiveModel {
            user_id: Set(user_id.value()),
            title: Set(fields.title),
            description: Set(fields.description),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert account book")?;
        Ok(AccountBook::from(model))
    }

    /// Returns `None` if the book does not exist or is owned by someone else.
    pub async fn update_owned(
        &self,
        user_id: UserId,
        id: AccountBookId,
        fields: AccountBookFields,
    ) -> Result<Option<AccountBook>> {
        let Some(model) = self.find_owned(user_id, id).await? else {
            return Ok(None);
        };

        let mut active: account_books::ActiveModel = model.into();
        active.title = Set(fields.title);
        active.description = Set(fields.description);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update account book")?;
        Ok(Some(AccountBook::from(model)))
    }

    pub async fn delete_owned(&self, user_id: UserId, id: AccountBookId) -> Result<bool> {
        let result = account_books::Entity::delete_many()
            .filter(account_books::Column::Id.eq(id.value()))
            .filter(account_books::Column::UserId.eq(user_id.value()))
            .exec(&self.conn)
            .await
            .context("Failed to delete account book")?;

        Ok(result.rows_affected > 0)
    }

    async fn find_owned(
        &self,
        user_id: UserId,
        id: AccountBookId,
    ) -> Result<Option<account_books::Model>> {
        account_books::Entity::find_by_id(id.value())
            .filter(account_books::Column::UserId.eq(user_id.value()))
            .one(&self.conn)
            .await
            .context("Failed to query owned account book")
    }
}
