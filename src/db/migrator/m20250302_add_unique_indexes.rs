use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        // A user may like a given account book at most once.
        conn.execute_unprepared(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_likes_user_account_book ON likes(user_id, account_book_id)",
        )
        .await?;

        conn.execute_unprepared(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_authentications_provider_uid ON authentications(provider, uid)",
        )
        .await?;

        conn.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_expense_items_account_book ON expense_items(account_book_id)",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        conn.execute_unprepared("DROP INDEX IF EXISTS idx_expense_items_account_book")
            .await?;
        conn.execute_unprepared("DROP INDEX IF EXISTS idx_authentications_provider_uid")
            .await?;
        conn.execute_unprepared("DROP INDEX IF EXISTS idx_likes_user_account_book")
            .await?;

        Ok(())
    }
}
