//! Registration and account-edit rules.

use regex::Regex;
use std::sync::OnceLock;

use super::validation::{Field, Rule, ValidationErrors};

pub const USERNAME_MIN_CHARS: usize = 1;
pub const PASSWORD_MIN_CHARS: usize = 8;
/// 30 characters or more is rejected.
pub const PASSWORD_MAX_CHARS: usize = 29;

/// Raw registration form input.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

/// Submitted changes to an existing user. `None` means the field was not
/// part of the submission and keeps its stored value.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
}

impl UserUpdate {
    /// Password rules only apply when either password field is filled in.
    #[must_use]
    pub fn changes_password(&self) -> bool {
        let filled = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        filled(&self.password) || filled(&self.password_confirmation)
    }

    /// The email this update would store, if it touches the email at all.
    #[must_use]
    pub fn normalized_email(&self) -> Option<String> {
        self.email.as_deref().map(normalize_email)
    }
}

#[must_use]
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex")
    });
    re.is_match(email)
}

/// Runs every registration rule. `email_taken` is the result of the
/// uniqueness lookup for the normalized email.
#[must_use]
pub fn validate_registration(input: &Registration, email_taken: bool) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    check_username(&mut errors, &input.username);
    check_email(&mut errors, &input.email, email_taken);
    check_password(&mut errors, &input.password, &input.password_confirmation);

    errors
}

/// Runs the rules that apply to the fields present in `update`.
#[must_use]
pub fn validate_user_update(update: &UserUpdate, email_taken: bool) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if let Some(username) = &update.username {
        check_username(&mut errors, username);
    }
    if let Some(email) = &update.email {
        check_email(&mut errors, email, email_taken);
    }
    if update.changes_password() {
        check_password(
            &mut errors,
            update.password.as_deref().unwrap_or_default(),
            update.password_confirmation.as_deref().unwrap_or_default(),
        );
    }

    errors
}

fn check_username(errors: &mut ValidationErrors, username: &str) {
    let username = username.trim();
    errors.require(Field::Username, username);
    errors.min_chars(Field::Username, username, USERNAME_MIN_CHARS);
}

fn check_email(errors: &mut ValidationErrors, email: &str, taken: bool) {
    let email = normalize_email(email);
    errors.require(Field::Email, &email);
    if !email.is_empty() && !is_valid_email(&email) {
        errors.add(Field::Email, Rule::Invalid);
    }
    if taken {
        errors.add(Field::Email, Rule::Taken);
    }
}

fn check_password(errors: &mut ValidationErrors, password: &str, confirmation: &str) {
    errors.min_chars(Field::Password, password, PASSWORD_MIN_CHARS);
    errors.max_chars(Field::Password, password, PASSWORD_MAX_CHARS);
    errors.require(Field::PasswordConfirmation, confirmation);
    if password != confirmation {
        errors.add(Field::PasswordConfirmation, Rule::Confirmation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(password: &str, confirmation: &str) -> Registration {
        Registration {
            username: "Test-user".to_string(),
            email: "test@example.com".to_string(),
            password: password.to_string(),
            password_confirmation: confirmation.to_string(),
        }
    }

    #[test]
    fn test_valid_registration() {
        let errors = validate_registration(&registration("password", "password"), false);
        assert!(errors.is_empty(), "unexpected: {errors}");
    }

    #[test]
    fn test_password_length_boundaries() {
        let at = |n: usize| {
            let p = "p".repeat(n);
            validate_registration(&registration(&p, &p), false)
        };

        assert_eq!(at(7).codes(), vec!["password.too_short"]);
        assert!(at(8).is_empty());
        assert!(at(29).is_empty());
        assert_eq!(at(30).codes(), vec!["password.too_long"]);
        assert_eq!(at(31).codes(), vec!["password.too_long"]);
    }

    #[test]
    fn test_confirmation_mismatch_regardless_of_length() {
        let errors = validate_registration(&registration("password", "wrongpassword"), false);
        assert_eq!(errors.codes(), vec!["password_confirmation.confirmation"]);

        let errors = validate_registration(&registration("short", "shorter"), false);
        assert!(errors.contains(Field::Password, Rule::TooShort { min: 8 }));
        assert!(errors.contains(Field::PasswordConfirmation, Rule::Confirmation));
    }

    #[test]
    fn test_all_empty_reports_every_rule() {
        let errors = validate_registration(&Registration::default(), false);
        assert_eq!(
            errors.codes(),
            vec![
                "username.required",
                "username.too_short",
                "email.required",
                "password.too_short",
                "password_confirmation.required",
            ]
        );
    }

    #[test]
    fn test_taken_email_is_reported_with_other_errors() {
        let mut input = registration("password", "password");
        input.username = String::new();
        let errors = validate_registration(&input, true);
        assert!(errors.contains(Field::Username, Rule::Required));
        assert!(errors.contains(Field::Email, Rule::Taken));
    }

    #[test]
    fn test_email_format() {
        assert!(is_valid_email("a@example.com"));
        assert!(!is_valid_email("example.com"));
        assert!(!is_valid_email("a b@example.com"));
        assert_eq!(normalize_email("  Foo@Example.COM "), "foo@example.com");

        let mut input = registration("password", "password");
        input.email = "not-an-email".to_string();
        assert_eq!(
            validate_registration(&input, false).codes(),
            vec!["email.invalid"]
        );
    }

    #[test]
    fn test_partial_update_skips_blank_password() {
        let update = UserUpdate {
            email: Some("other@example.com".to_string()),
            password: Some(String::new()),
            password_confirmation: Some(String::new()),
            ..UserUpdate::default()
        };
        assert!(!update.changes_password());
        assert!(validate_user_update(&update, false).is_empty());
        assert_eq!(
            validate_user_update(&update, true).codes(),
            vec!["email.taken"]
        );
    }

    #[test]
    fn test_update_with_blank_fields() {
        let update = UserUpdate {
            username: Some(String::new()),
            email: Some(String::new()),
            password: Some(String::new()),
            password_confirmation: Some(String::new()),
        };
        assert_eq!(
            validate_user_update(&update, false).codes(),
            vec!["username.required", "username.too_short", "email.required"]
        );
    }

    #[test]
    fn test_update_with_only_confirmation_checks_password() {
        let update = UserUpdate {
            password_confirmation: Some("password".to_string()),
            ..UserUpdate::default()
        };
        let errors = validate_user_update(&update, false);
        assert!(errors.contains(Field::Password, Rule::TooShort { min: 8 }));
        assert!(errors.contains(Field::PasswordConfirmation, Rule::Confirmation));
    }
}
