//! Field-level validation results.
//!
//! Validators never stop at the first failure: every violated rule is pushed
//! onto a [`ValidationErrors`] so a form can show all of them at once. Each
//! error carries a stable machine code (`"password.too_short"`) and is turned
//! into a localized sentence only at render time.

use std::fmt;

use crate::i18n::{self, Locale};

/// A form field that a rule can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// The record as a whole, e.g. "this user already has a profile".
    User,
    Username,
    Email,
    Password,
    PasswordConfirmation,
    Nickname,
    Bio,
    Title,
    Description,
    Amount,
    Category,
    Memo,
    SpentOn,
}

impl Field {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Username => "username",
            Self::Email => "email",
            Self::Password => "password",
            Self::PasswordConfirmation => "password_confirmation",
            Self::Nickname => "nickname",
            Self::Bio => "bio",
            Self::Title => "title",
            Self::Description => "description",
            Self::Amount => "amount",
            Self::Category => "category",
            Self::Memo => "memo",
            Self::SpentOn => "spent_on",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    TooShort { min: usize },
    TooLong { max: usize },
    /// Uniqueness: another record already holds this value.
    Taken,
    /// Confirmation field does not equal the field it confirms.
    Confirmation,
    /// Present but malformed (bad email, unparsable date or number).
    Invalid,
    NotPositive,
    TooLarge { max: i64 },
}

impl Rule {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::TooShort { .. } => "too_short",
            Self::TooLong { .. } => "too_long",
            Self::Taken => "taken",
            Self::Confirmation => "confirmation",
            Self::Invalid => "invalid",
            Self::NotPositive => "not_positive",
            Self::TooLarge { .. } => "too_large",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub rule: Rule,
}

impl FieldError {
    #[must_use]
    pub const fn new(field: Field, rule: Rule) -> Self {
        Self { field, rule }
    }

    /// Stable identifier such as `email.taken`.
    #[must_use]
    pub fn code(&self) -> String {
        format!("{}.{}", self.field.key(), self.rule.key())
    }

    #[must_use]
    pub fn message(&self, locale: Locale) -> String {
        i18n::field_error(locale, self.field, self.rule)
    }
}

/// Ordered list of every rule a submission violated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, field: Field, rule: Rule) {
        self.errors.push(FieldError::new(field, rule));
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    #[must_use]
    pub fn contains(&self, field: Field, rule: Rule) -> bool {
        self.errors
            .iter()
            .any(|e| e.field == field && e.rule.key() == rule.key())
    }

    #[must_use]
    pub fn codes(&self) -> Vec<String> {
        self.errors.iter().map(FieldError::code).collect()
    }

    /// `Ok(())` when nothing was violated.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    // ------------------------------------------------------------------
    // Reusable checks. Each one only records, it never short-circuits.
    // ------------------------------------------------------------------

    pub fn require(&mut self, field: Field, value: &str) {
        if value.trim().is_empty() {
            self.add(field, Rule::Required);
        }
    }

    pub fn min_chars(&mut self, field: Field, value: &str, min: usize) {
        if value.chars().count() < min {
            self.add(field, Rule::TooShort { min });
        }
    }

    pub fn max_chars(&mut self, field: Field, value: &str, max: usize) {
        if value.chars().count() > max {
            self.add(field, Rule::TooLong { max });
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.codes().join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_field_dot_rule() {
        let err = FieldError::new(Field::PasswordConfirmation, Rule::Required);
        assert_eq!(err.code(), "password_confirmation.required");
        let err = FieldError::new(Field::Password, Rule::TooShort { min: 8 });
        assert_eq!(err.code(), "password.too_short");
    }

    #[test]
    fn test_checks_accumulate() {
        let mut errors = ValidationErrors::new();
        errors.require(Field::Username, "");
        errors.min_chars(Field::Username, "", 1);
        errors.max_chars(Field::Title, "abcdef", 5);

        assert_eq!(errors.len(), 3);
        assert!(errors.contains(Field::Username, Rule::Required));
        assert!(errors.contains(Field::Username, Rule::TooShort { min: 1 }));
        assert!(errors.contains(Field::Title, Rule::TooLong { max: 5 }));
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let mut errors = ValidationErrors::new();
        errors.max_chars(Field::Nickname, "家計簿", 3);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_empty_into_result_is_ok() {
        assert!(ValidationErrors::new().into_result().is_ok());
    }
}
