//! Account model and signup input validation.

use crate::model::form::{FormErrors, REQUIRED_MESSAGE};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a user, stored in the session.
pub type UserId = Uuid;

pub const USERNAME_MAX_CHARS: usize = 150;
pub const PASSWORD_MIN_CHARS: usize = 8;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w.@+-]+$").expect("valid username regex"));

/// Registered account. The password hash never leaves the repository layer
/// except through the credentials lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    /// Epoch milliseconds.
    pub created_at: i64,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            created_at: 0,
        }
    }
}

/// Signup form input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SignupInput {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
}

impl SignupInput {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        let password = password.into();
        Self {
            username: username.into(),
            password1: password.clone(),
            password2: password,
        }
    }

    /// Validates field shapes and returns the trimmed username.
    ///
    /// Username uniqueness is checked against the store by the account service.
    pub fn clean(&self) -> Result<String, FormErrors> {
        let mut errors = FormErrors::new();

        let username = self.username.trim();
        if username.is_empty() {
            errors.add("username", REQUIRED_MESSAGE);
        } else if username.chars().count() > USERNAME_MAX_CHARS
            || !USERNAME_RE.is_match(username)
        {
            errors.add(
                "username",
                format!(
                    "Enter a valid username. This value may contain at most {USERNAME_MAX_CHARS} letters, numbers, and @/./+/-/_ characters."
                ),
            );
        }

        if self.password1.is_empty() {
            errors.add("password1", REQUIRED_MESSAGE);
        }
        if self.password2.is_empty() {
            errors.add("password2", REQUIRED_MESSAGE);
        } else if self.password1 != self.password2 {
            errors.add("password2", "The two password fields didn't match.");
        } else if self.password1.chars().count() < PASSWORD_MIN_CHARS {
            errors.add(
                "password2",
                format!(
                    "This password is too short. It must contain at least {PASSWORD_MIN_CHARS} characters."
                ),
            );
        }

        errors.into_result(username.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::SignupInput;

    #[test]
    fn clean_accepts_unicode_usernames() {
        let input = SignupInput::new("Читатель", "long-enough");
        assert_eq!(input.clean().expect("valid signup"), "Читатель");
    }

    #[test]
    fn clean_rejects_mismatched_and_short_passwords() {
        let mut input = SignupInput::new("reader", "long-enough");
        input.password2 = "different-one".to_string();
        let errors = input.clean().unwrap_err();
        assert!(errors.field("password2")[0].contains("didn't match"));

        let errors = SignupInput::new("reader", "short").clean().unwrap_err();
        assert!(errors.field("password2")[0].contains("too short"));
    }

    #[test]
    fn clean_rejects_usernames_with_spaces() {
        let errors = SignupInput::new("two words", "long-enough")
            .clean()
            .unwrap_err();
        assert_eq!(errors.field("username").len(), 1);
    }
}
