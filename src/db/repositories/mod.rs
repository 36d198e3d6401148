pub mod account_book;
pub mod authentication;
pub mod expense_item;
pub mod like;
pub mod user;
pub mod user_profile;
