use super::validation::{Field, Rule, ValidationErrors};

pub const NICKNAME_MAX_CHARS: usize = 50;
pub const BIO_MAX_CHARS: usize = 500;

#[derive(Debug, Clone, Default)]
pub struct UserProfileInput {
    pub nickname: String,
    pub bio: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfileFields {
    pub nickname: String,
    pub bio: Option<String>,
}

/// `duplicate` is true when creating a profile for a user who already has one.
pub fn validate_user_profile(
    input: &UserProfileInput,
    duplicate: bool,
) -> Result<UserProfileFields, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let nickname = input.nickname.trim();
    let bio = input.bio.trim();

    if duplicate {
        errors.add(Field::User, Rule::Taken);
    }
    errors.require(Field::Nickname, nickname);
    errors.max_chars(Field::Nickname, nickname, NICKNAME_MAX_CHARS);
    errors.max_chars(Field::Bio, bio, BIO_MAX_CHARS);

    errors.into_result()?;
    Ok(UserProfileFields {
        nickname: nickname.to_string(),
        bio: (!bio.is_empty()).then(|| bio.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_rules() {
        let fields = validate_user_profile(
            &UserProfileInput {
                nickname: "たろう".to_string(),
                bio: String::new(),
            },
            false,
        )
        .unwrap();
        assert_eq!(fields.nickname, "たろう");
        assert!(fields.bio.is_none());

        let errors = validate_user_profile(&UserProfileInput::default(), true).unwrap_err();
        assert_eq!(errors.codes(), vec!["user.taken", "nickname.required"]);
    }

    #[test]
    fn test_bio_too_long() {
        let errors = validate_user_profile(
            &UserProfileInput {
                nickname: "a".to_string(),
                bio: "b".repeat(BIO_MAX_CHARS + 1),
            },
            false,
        )
        .unwrap_err();
        assert_eq!(errors.codes(), vec!["bio.too_long"]);
    }
}
