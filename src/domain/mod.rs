//! Domain types for the account-book application.
//!
//! Identifiers are newtypes so a user id can never be passed where an
//! account book id is expected. The submodules hold the pure validation
//! rules that every write goes through before it reaches the database.

pub mod ledger;
pub mod profile;
pub mod user;
pub mod validation;

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn value(self) -> i32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

id_newtype!(
    /// Primary key of a row in `users`.
    ///
    /// ```rust
    /// use kakeibo::domain::UserId;
    ///
    /// let id = UserId::new(7);
    /// assert_eq!(id.value(), 7);
    /// assert_eq!(id.to_string(), "7");
    /// ```
    UserId
);
id_newtype!(
    /// Primary key of a row in `account_books`.
    AccountBookId
);
id_newtype!(
    /// Primary key of a row in `expense_items`.
    ExpenseItemId
);
id_newtype!(
    /// Primary key of a row in `likes`.
    LikeId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_round_trip_through_i32() {
        let id = AccountBookId::from(12);
        assert_eq!(i32::from(id), 12);
        assert_eq!(id, AccountBookId::new(12));
    }

    #[test]
    fn test_ids_serialize_as_plain_numbers() {
        let json = serde_json::to_string(&LikeId::new(3)).unwrap();
        assert_eq!(json, "3");
        let back: LikeId = serde_json::from_str("3").unwrap();
        assert_eq!(back.value(), 3);
    }
}
