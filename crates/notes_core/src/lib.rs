//! Core domain logic for the notes application.
//! This crate is the single source of truth for note and account invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod password;
pub mod repo;
pub mod service;
pub mod slug;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::form::FormErrors;
pub use model::note::{CleanedNote, Note, NoteId, NoteInput, TITLE_MAX_CHARS};
pub use model::user::{SignupInput, User, UserId};
pub use repo::note_repo::{NoteRepository, SqliteNoteRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::account_service::{
    check_credentials, AccountError, AccountService, Credentials, PreparedSignup,
    INVALID_LOGIN_MESSAGE,
};
pub use service::note_service::{NoteService, NoteServiceError};
pub use slug::{derive_slug, duplicate_slug_message, slugify, SLUG_MAX_CHARS};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
