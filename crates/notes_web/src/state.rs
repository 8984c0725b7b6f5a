//! Shared router state.

use crate::error::AppError;
use notes_core::{AccountService, NoteService, SqliteNoteRepository, SqliteUserRepository};
use rusqlite::Connection;
use std::sync::Arc;
use tokio::sync::Mutex;

/// State cloned into every handler.
///
/// The connection lock is awaited, never spun on a worker thread, and is held
/// only while the synchronous closure passed to a `with_*` helper runs.
/// Password hashing and verification happen outside these closures.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Wraps a migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs `f` against a note service bound to the shared connection.
    pub async fn with_notes<T>(
        &self,
        f: impl FnOnce(&NoteService<SqliteNoteRepository<'_>>) -> T + Send,
    ) -> Result<T, AppError> {
        let conn = self.db.lock().await;
        let service = NoteService::new(SqliteNoteRepository::try_new(&conn)?);
        Ok(f(&service))
    }

    /// Runs `f` against an account service bound to the shared connection.
    pub async fn with_accounts<T>(
        &self,
        f: impl FnOnce(&AccountService<SqliteUserRepository<'_>>) -> T + Send,
    ) -> Result<T, AppError> {
        let conn = self.db.lock().await;
        let service = AccountService::new(SqliteUserRepository::try_new(&conn)?);
        Ok(f(&service))
    }
}
