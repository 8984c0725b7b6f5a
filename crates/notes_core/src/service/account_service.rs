//! Account use-case service: signup and credential checks.
//!
//! Argon2 work is split from store access: [`PreparedSignup::new`] and
//! [`check_credentials`] never touch the repository, so callers sharing one
//! connection can hash and verify without holding it.
//!
//! # Invariants
//! - Plaintext passwords are never persisted or logged.
//! - A failed login does not reveal whether the username exists.

use crate::model::form::FormErrors;
use crate::model::user::{SignupInput, User, UserId};
use crate::password::{hash_password, verify_password};
use crate::repo::user_repo::UserRepository;
use crate::repo::{RepoError, RepoResult};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Message shown for a rejected login.
pub const INVALID_LOGIN_MESSAGE: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

/// Service error for account use-cases.
#[derive(Debug)]
pub enum AccountError {
    /// Signup input failed validation.
    Invalid(FormErrors),
    /// Username/password pair did not match a stored account.
    InvalidCredentials,
    /// Hashing backend failure or unreadable stored hash.
    PasswordHash(String),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for AccountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(errors) => write!(f, "invalid signup: {errors}"),
            Self::InvalidCredentials => write!(f, "invalid credentials"),
            Self::PasswordHash(message) => write!(f, "{message}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AccountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(errors) => Some(errors),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for AccountError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Signup input that passed validation, with its password already hashed.
#[derive(Debug, Clone)]
pub struct PreparedSignup {
    username: String,
    password_hash: String,
}

impl PreparedSignup {
    /// Validates `input` and hashes its password. Does no store access.
    pub fn new(input: &SignupInput) -> Result<Self, AccountError> {
        let username = input.clean().map_err(AccountError::Invalid)?;
        let password_hash = hash_password(&input.password1).map_err(AccountError::PasswordHash)?;
        Ok(Self {
            username,
            password_hash,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

/// Stored account and password hash, as returned by a credentials lookup.
pub type Credentials = (User, String);

/// Verifies `password` against looked-up credentials. Does no store access.
pub fn check_credentials(
    credentials: Option<Credentials>,
    password: &str,
) -> Result<User, AccountError> {
    let Some((user, hash)) = credentials else {
        warn!("event=user_login module=service status=rejected reason=unknown_user");
        return Err(AccountError::InvalidCredentials);
    };

    if !verify_password(password, &hash).map_err(AccountError::PasswordHash)? {
        warn!(
            "event=user_login module=service status=rejected reason=bad_password user_id={}",
            user.id
        );
        return Err(AccountError::InvalidCredentials);
    }

    info!("event=user_login module=service status=ok user_id={}", user.id);
    Ok(user)
}

/// Account service facade over a user repository.
pub struct AccountService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> AccountService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates, hashes and registers in one call.
    pub fn signup(&self, input: &SignupInput) -> Result<User, AccountError> {
        self.register(PreparedSignup::new(input)?)
    }

    /// Persists a prepared signup after checking the username is free.
    pub fn register(&self, prepared: PreparedSignup) -> Result<User, AccountError> {
        if self.repo.find_credentials(&prepared.username)?.is_some() {
            return Err(username_taken());
        }

        let user = User::new(prepared.username);
        match self.repo.create_user(&user, &prepared.password_hash) {
            Ok(_) => {}
            Err(RepoError::Conflict(_)) => return Err(username_taken()),
            Err(err) => return Err(err.into()),
        }

        let stored = self
            .repo
            .get_user(user.id)?
            .ok_or_else(|| RepoError::NotFound(format!("user {}", user.id)))?;
        info!(
            "event=user_signup module=service status=ok user_id={}",
            stored.id
        );
        Ok(stored)
    }

    /// Looks up the stored hash for `username`; pair with [`check_credentials`].
    pub fn find_credentials(&self, username: &str) -> RepoResult<Option<Credentials>> {
        self.repo.find_credentials(username.trim())
    }

    /// Returns the account matching `username` and `password`.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<User, AccountError> {
        check_credentials(self.find_credentials(username)?, password)
    }

    /// Gets one account by id.
    pub fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        self.repo.get_user(id)
    }
}

fn username_taken() -> AccountError {
    AccountError::Invalid(FormErrors::single(
        "username",
        "A user with that username already exists.",
    ))
}
