use anyhow::Result;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::domain::ledger::{AccountBookFields, ExpenseItemFields};
use crate::domain::profile::UserProfileFields;
use crate::domain::{AccountBookId, ExpenseItemId, LikeId, UserId};

pub mod migrator;
pub mod repositories;

pub use repositories::account_book::AccountBook;
pub use repositories::expense_item::ExpenseItem;
pub use repositories::like::Like;
pub use repositories::user::{User, UserChanges};
pub use repositories::user_profile::UserProfile;

/// True when `err` comes from a UNIQUE constraint or index.
#[must_use]
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let path_str = db_url.trim_start_matches("sqlite:");
        if !path_str.starts_with(":memory:") {
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn user_profile_repo(&self) -> repositories::user_profile::UserProfileRepository {
        repositories::user_profile::UserProfileRepository::new(self.conn.clone())
    }

    fn account_book_repo(&self) -> repositories::account_book::AccountBookRepository {
        repositories::account_book::AccountBookRepository::new(self.conn.clone())
    }

    fn expense_item_repo(&self) -> repositories::expense_item::ExpenseItemRepository {
        repositories::expense_item::ExpenseItemRepository::new(self.conn.clone())
    }

    fn like_repo(&self) -> repositories::like::LikeRepository {
        repositories::like::LikeRepository::new(self.conn.clone())
    }

    fn authentication_repo(&self) -> repositories::authentication::AuthenticationRepository {
        repositories::authentication::AuthenticationRepository::new(self.conn.clone())
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    pub async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn email_taken(&self, email: &str, except: Option<UserId>) -> Result<bool> {
        self.user_repo().email_taken(email, except).await
    }

    /// Hashes `password` and inserts the user; `None` if the email is taken.
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
        security: &SecurityConfig,
    ) -> Result<Option<User>> {
        let hash = repositories::user::hash_password_blocking(password, security).await?;
        self.user_repo().create(username, email, hash).await
    }

    pub async fn update_user(&self, id: UserId, changes: UserChanges) -> Result<Option<User>> {
        self.user_repo().update(id, changes).await
    }

    pub async fn delete_user(&self, id: UserId) -> Result<bool> {
        self.user_repo().delete(id).await
    }

    pub async fn verify_user_password(&self, email: &str, password: &str) -> Result<Option<User>> {
        self.user_repo().verify_password(email, password).await
    }

    // ------------------------------------------------------------------
    // Profiles
    // ------------------------------------------------------------------

    pub async fn get_user_profile(&self, user_id: UserId) -> Result<Option<UserProfile>> {
        self.user_profile_repo().get_for_user(user_id).await
    }

    pub async fn create_user_profile(
        &self,
        user_id: UserId,
        fields: UserProfileFields,
    ) -> Result<Option<UserProfile>> {
        self.user_profile_repo().create(user_id, fields).await
    }

    pub async fn update_user_profile(
        &self,
        user_id: UserId,
        fields: UserProfileFields,
    ) -> Result<Option<UserProfile>> {
        self.user_profile_repo().update(user_id, fields).await
    }

    pub async fn delete_user_profile(&self, user_id: UserId) -> Result<bool> {
        self.user_profile_repo().delete(user_id).await
    }

    // ------------------------------------------------------------------
    // Account books & expense items
    // ------------------------------------------------------------------

    pub async fn list_account_books_with_owner(&self) -> Result<Vec<(AccountBook, String)>> {
        self.account_book_repo().list_with_owner().await
    }

    pub async fn list_account_books_for_user(&self, user_id: UserId) -> Result<Vec<AccountBook>> {
        self.account_book_repo().list_for_user(user_id).await
    }

    pub async fn get_account_book(&self, id: AccountBookId) -> Result<Option<AccountBook>> {
        self.account_book_repo().get(id).await
    }

    pub async fn get_account_book_with_owner(
        &self,
        id: AccountBookId,
    ) -> Result<Option<(AccountBook, String)>> {
        self.account_book_repo().get_with_owner(id).await
    }

    pub async fn create_account_book(
        &self,
        user_id: UserId,
        fields: AccountBookFields,
    ) -> Result<AccountBook> {
        self.account_book_repo().create(user_id, fields).await
    }

    pub async fn update_account_book(
        &self,
        user_id: UserId,
        id: AccountBookId,
        fields: AccountBookFields,
    ) -> Result<Option<AccountBook>> {
        self.account_book_repo()
            .update_owned(user_id, id, fields)
            .await
    }

    pub async fn delete_account_book(&self, user_id: UserId, id: AccountBookId) -> Result<bool> {
        self.account_book_repo().delete_owned(user_id, id).await
    }

    pub async fn list_expense_items(&self, book_id: AccountBookId) -> Result<Vec<ExpenseItem>> {
        self.expense_item_repo().list_for_book(book_id).await
    }

    pub async fn list_expense_items_for_books(
        &self,
        book_ids: &[AccountBookId],
    ) -> Result<Vec<ExpenseItem>> {
        self.expense_item_repo().list_for_books(book_ids).await
    }

    pub async fn create_expense_item(
        &self,
        book_id: AccountBookId,
        fields: ExpenseItemFields,
    ) -> Result<ExpenseItem> {
        self.expense_item_repo().create(book_id, fields).await
    }

    pub async fn delete_expense_item(
        &self,
        book_id: AccountBookId,
        id: ExpenseItemId,
    ) -> Result<bool> {
        self.expense_item_repo().delete_in_book(book_id, id).await
    }

    // ------------------------------------------------------------------
    // Likes
    // ------------------------------------------------------------------

    pub async fn insert_like_if_absent(
        &self,
        user_id: UserId,
        book_id: AccountBookId,
    ) -> Result<Option<Like>> {
        self.like_repo().insert_if_absent(user_id, book_id).await
    }

    pub async fn get_like(&self, id: LikeId) -> Result<Option<Like>> {
        self.like_repo().get(id).await
    }

    pub async fn find_like(&self, user_id: UserId, book_id: AccountBookId) -> Result<Option<Like>> {
        self.like_repo().find(user_id, book_id).await
    }

    pub async fn delete_like(&self, user_id: UserId, id: LikeId) -> Result<bool> {
        self.like_repo().delete_owned(user_id, id).await
    }

    pub async fn count_likes(&self, book_id: AccountBookId) -> Result<u64> {
        self.like_repo().count_for_book(book_id).await
    }

    pub async fn like_counts_by_book(&self) -> Result<HashMap<AccountBookId, u64>> {
        self.like_repo().counts_by_book().await
    }

    pub async fn likes_by_user(&self, user_id: UserId) -> Result<HashMap<AccountBookId, LikeId>> {
        self.like_repo().liked_by(user_id).await
    }

    pub async fn count_likes_received(&self, owner: UserId) -> Result<u64> {
        self.like_repo().count_received(owner).await
    }

    // ------------------------------------------------------------------
    // OAuth identities
    // ------------------------------------------------------------------

    pub async fn find_user_by_identity(&self, provider: &str, uid: &str) -> Result<Option<UserId>> {
        self.authentication_repo().find_user(provider, uid).await
    }

    pub async fn link_identity(&self, user_id: UserId, provider: &str, uid: &str) -> Result<bool> {
        self.authentication_repo().link(user_id, provider, uid).await
    }
}
