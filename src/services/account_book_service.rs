//! Domain service for account books, their expense items and the per-user
//! dashboard.
//!
//! Mutations take the acting user explicitly. A book owned by someone else
//! is indistinguishable from a missing one: both are [`AccountBookError::NotFound`].

use thiserror::Error;

use crate::db::{AccountBook, ExpenseItem};
use crate::domain::ledger::{AccountBookInput, ExpenseItemInput};
use crate::domain::validation::ValidationErrors;
use crate::domain::{AccountBookId, ExpenseItemId, LikeId, UserId};

#[derive(Debug, Error)]
pub enum AccountBookError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Account book not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AccountBookError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AccountBookError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<ValidationErrors> for AccountBookError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

/// One row of the account book index.
#[derive(Debug, Clone)]
pub struct AccountBookSummary {
    pub book: AccountBook,
    pub owner: String,
    pub like_count: u64,
    /// The viewer's like on this book, if any.
    pub my_like: Option<LikeId>,
}

#[derive(Debug, Clone)]
pub struct AccountBookDetail {
    pub book: AccountBook,
    pub owner: String,
    pub items: Vec<ExpenseItem>,
    pub total: i64,
    pub like_count: u64,
}

impl AccountBookDetail {
    #[must_use]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.book.user_id == user_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: i64,
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub user_id: UserId,
    pub book_count: usize,
    pub total_spent: i64,
    /// Largest amount first.
    pub category_totals: Vec<CategoryTotal>,
    pub likes_received: u64,
}

#[async_trait::async_trait]
pub trait AccountBookService: Send + Sync {
    /// Every account book, newest first, as seen by `viewer`.
    async fn list(&self, viewer: UserId) -> Result<Vec<AccountBookSummary>, AccountBookError>;

    async fn show(&self, id: AccountBookId) -> Result<AccountBookDetail, AccountBookError>;

    /// The book, if `owner` owns it. Used to fill the edit form.
    async fn get_owned(
        &self,
        owner: UserId,
        id: AccountBookId,
    ) -> Result<AccountBook, AccountBookError>;

    async fn create(
        &self,
        owner: UserId,
        input: AccountBookInput,
    ) -> Result<AccountBook, AccountBookError>;

    async fn update(
        &self,
        owner: UserId,
        id: AccountBookId,
        input: AccountBookInput,
    ) -> Result<AccountBook, AccountBookError>;

    async fn destroy(&self, owner: UserId, id: AccountBookId) -> Result<(), AccountBookError>;

    async fn add_item(
        &self,
        owner: UserId,
        book_id: AccountBookId,
        input: ExpenseItemInput,
    ) -> Result<ExpenseItem, AccountBookError>;

    async fn remove_item(
        &self,
        owner: UserId,
        book_id: AccountBookId,
        item_id: ExpenseItemId,
    ) -> Result<(), AccountBookError>;

    /// Summary of `subject`'s books. Only the subject may view it.
    async fn dashboard(
        &self,
        viewer: UserId,
        subject: UserId,
    ) -> Result<Dashboard, AccountBookError>;
}
