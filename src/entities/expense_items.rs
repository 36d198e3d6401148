use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "expense_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub account_book_id: i32,

    /// Whole yen.
    pub amount: i64,

    pub category: String,

    pub memo: Option<String>,

    /// `YYYY-MM-DD`
    pub spent_on: String,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account_books::Entity",
        from = "Column::AccountBookId",
        to = "super::account_books::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    AccountBook,
}

impl Related<super::account_books::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountBook.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
