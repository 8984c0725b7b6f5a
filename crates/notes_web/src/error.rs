//! Web-layer error type and its HTTP rendering.

use crate::pages;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::error;
use notes_core::{AccountError, NoteServiceError, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure surfaced by a handler.
///
/// Validation problems never reach this type; handlers re-render their form.
#[derive(Debug)]
pub enum AppError {
    /// Missing note, or a note owned by someone else.
    NotFound,
    /// Storage, session, hashing or runtime failure.
    Internal(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::Internal(message) => write!(f, "internal error: {message}"),
        }
    }
}

impl Error for AppError {}

impl From<RepoError> for AppError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(_) => Self::NotFound,
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<NoteServiceError> for AppError {
    fn from(value: NoteServiceError) -> Self {
        match value {
            NoteServiceError::NoteNotFound(_) => Self::NotFound,
            NoteServiceError::Repo(err) => err.into(),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<AccountError> for AppError {
    fn from(value: AccountError) -> Self {
        match value {
            AccountError::Repo(err) => err.into(),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(value: tower_sessions::session::Error) -> Self {
        Self::Internal(format!("session store: {value}"))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::Internal(format!("blocking task: {value}"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => (StatusCode::NOT_FOUND, pages::not_found()).into_response(),
            Self::Internal(message) => {
                error!("event=http_error module=web status=error message={message}");
                (StatusCode::INTERNAL_SERVER_ERROR, pages::server_error()).into_response()
            }
        }
    }
}
