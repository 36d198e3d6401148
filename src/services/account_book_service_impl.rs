//! `SeaORM` implementation of the `AccountBookService` trait.

use async_trait::async_trait;
use std::collections::HashMap;
use tracing::info;

use crate::db::{AccountBook, ExpenseItem, Store};
use crate::domain::ledger::{
    AccountBookInput, ExpenseItemInput, validate_account_book, validate_expense_item,
};
use crate::domain::{AccountBookId, ExpenseItemId, UserId};
use crate::services::account_book_service::{
    AccountBookDetail, AccountBookError, AccountBookService, AccountBookSummary, CategoryTotal,
    Dashboard,
};

pub struct SeaOrmAccountBookService {
    store: Store,
}

impl SeaOrmAccountBookService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn require_owned(
        &self,
        owner: UserId,
        id: AccountBookId,
    ) -> Result<AccountBook, AccountBookError> {
        self.store
            .get_account_book(id)
            .await?
            .filter(|book| book.user_id == owner)
            .ok_or(AccountBookError::NotFound)
    }
}

/// Total of `items`, saturating at `i64::MAX`.
#[must_use]
pub fn total_amount(items: &[ExpenseItem]) -> i64 {
    items
        .iter()
        .fold(0_i64, |total, item| total.saturating_add(item.amount))
}

/// Sums amounts per category, largest first, ties by name.
#[must_use]
pub fn category_totals(items: &[ExpenseItem]) -> Vec<CategoryTotal> {
    let mut sums: HashMap<&str, i64> = HashMap::new();
    for item in items {
        let sum = sums.entry(item.category.as_str()).or_default();
        *sum = sum.saturating_add(item.amount);
    }

    let mut totals: Vec<CategoryTotal> = sums
        .into_iter()
        .map(|(category, amount)| CategoryTotal {
            category: category.to_string(),
            amount,
        })
        .collect();
    totals.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.category.cmp(&b.category)));
    totals
}

#[async_trait]
impl AccountBookService for SeaOrmAccountBookService {
    async fn list(&self, viewer: UserId) -> Result<Vec<AccountBookSummary>, AccountBookError> {
        let books = self.store.list_account_books_with_owner().await?;
        let counts = self.store.like_counts_by_book().await?;
        let mine = self.store.likes_by_user(viewer).await?;

        Ok(books
            .into_iter()
            .map(|(book, owner)| AccountBookSummary {
                like_count: counts.get(&book.id).copied().unwrap_or(0),
                my_like: mine.get(&book.id).copied(),
                book,
                owner,
            })
            .collect())
    }

    async fn show(&self, id: AccountBookId) -> Result<AccountBookDetail, AccountBookError> {
        let (book, owner) = self
            .store
            .get_account_book_with_owner(id)
            .await?
            .ok_or(AccountBookError::NotFound)?;

        let items = self.store.list_expense_items(id).await?;
        let total = total_amount(&items);
        let like_count = self.store.count_likes(id).await?;

        Ok(AccountBookDetail {
            book,
            owner,
            items,
            total,
            like_count,
        })
    }

    async fn get_owned(
        &self,
        owner: UserId,
        id: AccountBookId,
    ) -> Result<AccountBook, AccountBookError> {
        self.require_owned(owner, id).await
    }

    async fn create(
        &self,
        owner: UserId,
        input: AccountBookInput,
    ) -> Result<AccountBook, AccountBookError> {
        let fields = validate_account_book(&input)?;
        let book = self.store.create_account_book(owner, fields).await?;
        info!(account_book_id = %book.id, user_id = %owner, "Account book created");
        Ok(book)
    }

    async fn update(
        &self,
        owner: UserId,
        id: AccountBookId,
        input: AccountBookInput,
    ) -> Result<AccountBook, AccountBookError> {
        self.require_owned(owner, id).await?;
        let fields = validate_account_book(&input)?;

        self.store
            .update_account_book(owner, id, fields)
            .await?
            .ok_or(AccountBookError::NotFound)
    }

    async fn destroy(&self, owner: UserId, id: AccountBookId) -> Result<(), AccountBookError> {
        if !self.store.delete_account_book(owner, id).await? {
            return Err(AccountBookError::NotFound);
        }
        info!(account_book_id = %id, user_id = %owner, "Account book deleted");
        Ok(())
    }

    async fn add_item(
        &self,
        owner: UserId,
        book_id: AccountBookId,
        input: ExpenseItemInput,
    ) -> Result<ExpenseItem, AccountBookError> {
        self.require_owned(owner, book_id).await?;
        let fields = validate_expense_item(&input)?;
        Ok(self.store.create_expense_item(book_id, fields).await?)
    }

    async fn remove_item(
        &self,
        owner: UserId,
        book_id: AccountBookId,
        item_id: ExpenseItemId,
    ) -> Result<(), AccountBookError> {
        self.require_owned(owner, book_id).await?;
        if self.store.delete_expense_item(book_id, item_id).await? {
            Ok(())
        } else {
            Err(AccountBookError::NotFound)
        }
    }

    async fn dashboard(
        &self,
        viewer: UserId,
        subject: UserId,
    ) -> Result<Dashboard, AccountBookError> {
        if viewer != subject {
            return Err(AccountBookError::NotFound);
        }

        let books = self.store.list_account_books_for_user(subject).await?;
        let ids: Vec<AccountBookId> = books.iter().map(|book| book.id).collect();
        let items = self.store.list_expense_items_for_books(&ids).await?;

        Ok(Dashboard {
            user_id: subject,
            book_count: books.len(),
            total_spent: total_amount(&items),
            category_totals: category_totals(&items),
            likes_received: self.store.count_likes_received(subject).await?,
        })
    }
}
