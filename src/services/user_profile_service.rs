//! Domain service for the current user's profile.

use thiserror::Error;

use crate::db::UserProfile;
use crate::domain::UserId;
use crate::domain::profile::UserProfileInput;
use crate::domain::validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum UserProfileError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Profile not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for UserProfileError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for UserProfileError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<ValidationErrors> for UserProfileError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

#[async_trait::async_trait]
pub trait UserProfileService: Send + Sync {
    async fn get(&self, user_id: UserId) -> Result<Option<UserProfile>, UserProfileError>;

    /// # Errors
    ///
    /// A second profile for the same user is reported as `user.taken`.
    async fn create(
        &self,
        user_id: UserId,
        input: UserProfileInput,
    ) -> Result<UserProfile, UserProfileError>;

    async fn update(
        &self,
        user_id: UserId,
        input: UserProfileInput,
    ) -> Result<UserProfile, UserProfileError>;

    async fn destroy(&self, user_id: UserId) -> Result<(), UserProfileError>;
}
