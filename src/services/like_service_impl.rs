//! `SeaORM` implementation of the `LikeService` trait.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::db::{Like, Store};
use crate::domain::{AccountBookId, LikeId, UserId};
use crate::services::like_service::{LikeError, LikeService};

pub struct SeaOrmLikeService {
    store: Store,
}

impl SeaOrmLikeService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl LikeService for SeaOrmLikeService {
    async fn create(
        &self,
        user_id: UserId,
        account_book_id: AccountBookId,
    ) -> Result<Like, LikeError> {
        if self.store.get_account_book(account_book_id).await?.is_none() {
            return Err(LikeError::NotFound);
        }

        let Some(like) = self
            .store
            .insert_like_if_absent(user_id, account_book_id)
            .await?
        else {
            debug!(%user_id, %account_book_id, "Duplicate like rejected");
            return Err(LikeError::ConstraintViolation {
                user_id,
                account_book_id,
            });
        };

        metrics::counter!("likes_created_total").increment(1);
        info!(like_id = %like.id, %user_id, %account_book_id, "Like created");
        Ok(like)
    }

    async fn destroy(&self, user_id: UserId, like_id: LikeId) -> Result<Like, LikeError> {
        let like = self
            .store
            .get_like(like_id)
            .await?
            .filter(|like| like.user_id == user_id)
            .ok_or(LikeError::NotFound)?;

        if !self.store.delete_like(user_id, like_id).await? {
            return Err(LikeError::NotFound);
        }

        info!(%like_id, %user_id, "Like removed");
        Ok(like)
    }

    async fn find(
        &self,
        user_id: UserId,
        account_book_id: AccountBookId,
    ) -> Result<Option<Like>, LikeError> {
        Ok(self.store.find_like(user_id, account_book_id).await?)
    }

    async fn count_for(&self, account_book_id: AccountBookId) -> Result<u64, LikeError> {
        Ok(self.store.count_likes(account_book_id).await?)
    }
}
