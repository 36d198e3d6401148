//! Domain service for the registration and account-edit workflow.
//!
//! Every write is preceded by the pure validators in [`crate::domain::user`].
//! A failed submission comes back as [`UserError::Validation`] carrying every
//! violated rule, and nothing is persisted.

use thiserror::Error;

use crate::db::User;
use crate::domain::UserId;
use crate::domain::user::{Registration, UserUpdate};
use crate::domain::validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("User not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for UserError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for UserError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<ValidationErrors> for UserError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    /// Validates and stores a new user.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::Validation`] with every violated rule, including
    /// `email.taken` when a concurrent sign-up wins the unique index.
    async fn register(&self, input: Registration) -> Result<User, UserError>;

    /// Applies the submitted fields of `update` to `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::Validation`] if any submitted field is invalid
    /// and [`UserError::NotFound`] if the user no longer exists.
    async fn update(&self, user_id: UserId, update: UserUpdate) -> Result<User, UserError>;

    /// Deletes the user and everything they own.
    async fn destroy(&self, user_id: UserId) -> Result<(), UserError>;

    async fn get(&self, user_id: UserId) -> Result<User, UserError>;
}
