pub mod prelude;

pub mod account_books;
pub mod authentications;
pub mod expense_items;
pub mod likes;
pub mod user_profiles;
pub mod users;
