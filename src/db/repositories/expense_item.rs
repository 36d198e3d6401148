use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::ledger::ExpenseItemFields;
use crate::domain::{AccountBookId, ExpenseItemId};
use crate::entities::expense_items;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseItem {
    pub id: ExpenseItemId,
    pub account_book_id: AccountBookId,
    pub amount: i64,
    pub category: String,
    pub memo: Option<String>,
    pub spent_on: String,
}

impl From<expense_items::Model> for ExpenseItem {
    fn from(model: expense_items::Model) -> Self {
        Self {
            id: ExpenseItemId::new(model.id),
            account_book_id: AccountBookId::new(model.account_book_id),
            amount: model.amount,
            category: model.category,
            memo: model.memo,
            spent_on: model.spent_on,
        }
    }
}

pub struct ExpenseItemRepository {
    conn: DatabaseConnection,
}

impl ExpenseItemRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Items of one book, most recent spending first.
    pub async fn list_for_book(&self, book_id: AccountBookId) -> Result<Vec<ExpenseItem>> {
        self.list_for_books(&[book_id]).await
    }

    pub async fn list_for_books(&self, book_ids: &[AccountBookId]) -> Result<Vec<ExpenseItem>> {
        if book_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = expense_items::Entity::find()
            .filter(
                expense_items::Column::AccountBookId
                    .is_in(book_ids.iter().map(|id| id.value())),
            )
            .order_by_desc(expense_items::Column::SpentOn)
            .order_by_desc(expense_items::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list expense items")?;

        Ok(rows.into_iter().map(ExpenseItem::from).collect())
    }

    pub async fn create(
        &self,
        book_id: AccountBookId,
        fields: ExpenseItemFields,
    ) -> Result<ExpenseItem> {
        let now = chrono::Utc::now().to_rfc3339();
        let active = expense_items::ActiveModel {
            account_book_id: Set(book_id.value()),
            amount: Set(fields.amount),
            category: Set(fields.category),
            memo: Set(fields.memo),
            spent_on: Set(fields.spent_on.format("%Y-%m-%d").to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert expense item")?;
        Ok(ExpenseItem::from(model))
    }

    /// Deletes the item only if it belongs to `book_id`.
    pub async fn delete_in_book(&self, book_id: AccountBookId, id: ExpenseItemId) -> Result<bool> {
        let result = expense_items::Entity::delete_many()
            .filter(expense_items::Column::Id.eq(id.value()))
            .filter(expense_items::Column::AccountBookId.eq(book_id.value()))
            .exec(&self.conn)
            .await
            .context("Failed to delete expense item")?;

        Ok(result.rows_affected > 0)
    }
}
