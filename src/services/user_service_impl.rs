//! `SeaORM` implementation of the `UserService` trait.

use async_trait::async_trait;
use tracing::info;

use crate::config::SecurityConfig;
use crate::db::repositories::user::hash_password_blocking;
use crate::db::{Store, User, UserChanges};
use crate::domain::UserId;
use crate::domain::user::{Registration, UserUpdate, normalize_email};
use crate::domain::user::{validate_registration, validate_user_update};
use crate::domain::validation::{Field, Rule, ValidationErrors};
use crate::services::user_service::{UserError, UserService};

pub struct SeaOrmUserService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmUserService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }
}

fn email_taken_error() -> UserError {
    let mut errors = ValidationErrors::new();
    errors.add(Field::Email, Rule::Taken);
    UserError::Validation(errors)
}

#[async_trait]
impl UserService for SeaOrmUserService {
    async fn register(&self, input: Registration) -> Result<User, UserError> {
        let email = normalize_email(&input.email);
        let taken = !email.is_empty() && self.store.email_taken(&email, None).await?;

        validate_registration(&input, taken).into_result()?;

        let user = self
            .store
            .create_user(input.username.trim(), &email, &input.password, &self.security)
            .await?
            .ok_or_else(email_taken_error)?;

        metrics::counter!("users_registered_total").increment(1);
        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    async fn update(&self, user_id: UserId, update: UserUpdate) -> Result<User, UserError> {
        if self.store.get_user(user_id).await?.is_none() {
            return Err(UserError::NotFound);
        }

        let email = update.normalized_email();
        let taken = match email.as_deref() {
            Some(email) if !email.is_empty() => {
                self.store.email_taken(email, Some(user_id)).await?
            }
            _ => false,
        };

        validate_user_update(&update, taken).into_result()?;

        let password_hash = match update.password.as_deref() {
            Some(password) if update.changes_password() => {
                Some(hash_password_blocking(password, &self.security).await?)
            }
            _ => None,
        };

        let changes = UserChanges {
            username: update.username.map(|u| u.trim().to_string()),
            email,
            password_hash,
        };

        let user = self
            .store
            .update_user(user_id, changes)
            .await?
            .ok_or_else(email_taken_error)?;

        info!(user_id = %user.id, "User updated");
        Ok(user)
    }

    async fn destroy(&self, user_id: UserId) -> Result<(), UserError> {
        if !self.store.delete_user(user_id).await? {
            return Err(UserError::NotFound);
        }
        info!(user_id = %user_id, "User deleted");
        Ok(())
    }

    async fn get(&self, user_id: UserId) -> Result<User, UserError> {
        self.store
            .get_user(user_id)
            .await?
            .ok_or(UserError::NotFound)
    }
}
