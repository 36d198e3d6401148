use anyhow::{Context, Result};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QuerySelect, RelationTrait, Set,
};
use std::collections::HashMap;

use crate::db::is_unique_violation;
use crate::domain::{AccountBookId, LikeId, UserId};
use crate::entities::{account_books, likes};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Like {
    pub id: LikeId,
    pub user_id: UserId,
    pub account_book_id: AccountBookId,
}

impl From<likes::Model> for Like {
    fn from(model: likes::Model) -> Self {
        Self {
            id: LikeId::new(model.id),
            user_id: UserId::new(model.user_id),
            account_book_id: AccountBookId::new(model.account_book_id),
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct LikeCountRow {
    account_book_id: i32,
    count: i64,
}

/// Repository for the like relation. Uniqueness of
/// `(user_id, account_book_id)` lives in the database index, so inserts are
/// atomic check-and-insert.
pub struct LikeRepository {
    conn: DatabaseConnection,
}

impl LikeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Returns `None` when this user already likes this book.
    pub async fn insert_if_absent(
        &self,
        user_id: UserId,
        book_id: AccountBookId,
    ) -> Result<Option<Like>> {
        let active = likes::ActiveModel {
            user_id: Set(user_id.value()),
            account_book_id: Set(book_id.value()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        match active.insert(&self.conn).await {
            Ok(model) => Ok(Some(Like::from(model))),
            Err(e) if is_unique_violation(&e) => Ok(None),
            Err(e) => Err(anyhow::Error::new(e).context("Failed to insert like")),
        }
    }

    pub async fn get(&self, id: LikeId) -> Result<Option<Like>> {
        let row = likes::Entity::find_by_id(id.value())
            .one(&self.conn)
            .await
            .context("Failed to query like")?;

        Ok(row.map(Like::from))
    }

    pub async fn find(&self, user_id: UserId, book_id: AccountBookId) -> Result<Option<Like>> {
        let row = likes::Entity::find()
            .filter(likes::Column::UserId.eq(user_id.value()))
            .filter(likes::Column::AccountBookId.eq(book_id.value()))
            .one(&self.conn)
            .await
            .context("Failed to query like by pair")?;

        Ok(row.map(Like::from))
    }

    /// Deletes the like only when `user_id` owns it.
    pub async fn delete_owned(&self, user_id: UserId, id: LikeId) -> Result<bool> {
        let result = likes::Entity::delete_many()
            .filter(likes::Column::Id.eq(id.value()))
            .filter(likes::Column::UserId.eq(user_id.value()))
            .exec(&self.conn)
            .await
            .context("Failed to delete like")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_for_book(&self, book_id: AccountBookId) -> Result<u64> {
        likes::Entity::find()
            .filter(likes::Column::AccountBookId.eq(book_id.value()))
            .count(&self.conn)
            .await
            .context("Failed to count likes")
    }

    /// Like counts keyed by book id. Books without likes are absent.
    pub async fn counts_by_book(&self) -> Result<HashMap<AccountBookId, u64>> {
        let rows = likes::Entity::find()
            .select_only()
            .column(likes::Column::AccountBookId)
            .column_as(Expr::col(likes::Column::Id).count(), "count")
            .group_by(likes::Column::AccountBookId)
            .into_model::<LikeCountRow>()
            .all(&self.conn)
            .await
            .context("Failed to count likes per account book")?;

        Ok(rows
            .into_iter()
            .map(|r| {
                (
                    AccountBookId::new(r.account_book_id),
                    u64::try_from(r.count).unwrap_or_default(),
                )
            })
            .collect())
    }

    /// The like ids this user holds, keyed by book id.
    pub async fn liked_by(&self, user_id: UserId) -> Result<HashMap<AccountBookId, LikeId>> {
        let rows = likes::Entity::find()
            .filter(likes::Column::UserId.eq(user_id.value()))
            .all(&self.conn)
            .await
            .context("Failed to list likes for user")?;

        Ok(rows
            .into_iter()
            .map(|m| (AccountBookId::new(m.account_book_id), LikeId::new(m.id)))
            .collect())
    }

    /// Likes on any book owned by `owner`.
    pub async fn count_received(&self, owner: UserId) -> Result<u64> {
        likes::Entity::find()
            .join(
                sea_orm::JoinType::InnerJoin,
                likes::Relation::AccountBook.def(),
            )
            .filter(account_books::Column::UserId.eq(owner.value()))
            .count(&self.conn)
            .await
            .context("Failed to count likes received")
    }
}
