pub use super::account_books::Entity as AccountBooks;
pub use super::authentications::Entity as Authentications;
pub use super::expense_items::Entity as ExpenseItems;
pub use super::likes::Entity as Likes;
pub use super::user_profiles::Entity as UserProfiles;
pub use super::users::Entity as Users;
