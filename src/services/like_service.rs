//! Domain service for the like relation between users and account books.
//!
//! A user likes a given account book at most once. The database enforces
//! this with a composite unique index; a second like surfaces as
//! [`LikeError::ConstraintViolation`] whether it was caught by the index or
//! raced another request.

use thiserror::Error;

use crate::db::Like;
use crate::domain::{AccountBookId, LikeId, UserId};

#[derive(Debug, Error)]
pub enum LikeError {
    #[error("User {user_id} already likes account book {account_book_id}")]
    ConstraintViolation {
        user_id: UserId,
        account_book_id: AccountBookId,
    },

    #[error("Not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for LikeError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for LikeError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait LikeService: Send + Sync {
    /// # Errors
    ///
    /// - [`LikeError::NotFound`] if the account book does not exist.
    /// - [`LikeError::ConstraintViolation`] if the pair already exists.
    async fn create(&self, user_id: UserId, account_book_id: AccountBookId)
    -> Result<Like, LikeError>;

    /// Removes one of `user_id`'s likes and returns it.
    ///
    /// # Errors
    ///
    /// [`LikeError::NotFound`] if the like does not exist or belongs to
    /// someone else.
    async fn destroy(&self, user_id: UserId, like_id: LikeId) -> Result<Like, LikeError>;

    async fn find(
        &self,
        user_id: UserId,
        account_book_id: AccountBookId,
    ) -> Result<Option<Like>, LikeError>;

    async fn count_for(&self, account_book_id: AccountBookId) -> Result<u64, LikeError>;
}
