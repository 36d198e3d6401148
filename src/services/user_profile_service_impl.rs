//! `SeaORM` implementation of the `UserProfileService` trait.

use async_trait::async_trait;

use crate::db::{Store, UserProfile};
use crate::domain::UserId;
use crate::domain::profile::{UserProfileInput, validate_user_profile};
use crate::domain::validation::{Field, Rule, ValidationErrors};
use crate::services::user_profile_service::{UserProfileError, UserProfileService};

pub struct SeaOrmUserProfileService {
    store: Store,
}

impl SeaOrmUserProfileService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserProfileService for SeaOrmUserProfileService {
    async fn get(&self, user_id: UserId) -> Result<Option<UserProfile>, UserProfileError> {
        Ok(self.store.get_user_profile(user_id).await?)
    }

    async fn create(
        &self,
        user_id: UserId,
        input: UserProfileInput,
    ) -> Result<UserProfile, UserProfileError> {
        let duplicate = self.store.get_user_profile(user_id).await?.is_some();
        let fields = validate_user_profile(&input, duplicate)?;

        self.store
            .create_user_profile(user_id, fields)
            .await?
            .ok_or_else(|| {
                let mut errors = ValidationErrors::new();
                errors.add(Field::User, Rule::Taken);
                UserProfileError::Validation(errors)
            })
    }

    async fn update(
        &self,
        user_id: UserId,
        input: UserProfileInput,
    ) -> Result<UserProfile, UserProfileError> {
        if self.store.get_user_profile(user_id).await?.is_none() {
            return Err(UserProfileError::NotFound);
        }
        let fields = validate_user_profile(&input, false)?;

        self.store
            .update_user_profile(user_id, fields)
            .await?
            .ok_or(UserProfileError::NotFound)
    }

    async fn destroy(&self, user_id: UserId) -> Result<(), UserProfileError> {
        if self.store.delete_user_profile(user_id).await? {
            Ok(())
        } else {
            Err(UserProfileError::NotFound)
        }
    }
}
