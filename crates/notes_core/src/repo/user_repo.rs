//! User repository contract and SQLite implementation.
//!
//! # Invariants
//! - `username` is unique; a duplicate insert surfaces as `RepoError::Conflict`.
//! - Password hashes are only returned by `find_credentials`.

use crate::model::user::{User, UserId};
use crate::repo::{ensure_table_shape, parse_uuid, RepoResult};
use rusqlite::{params, Connection, Row};

/// Repository interface for account persistence.
pub trait UserRepository {
    /// Inserts one user with an already-hashed password.
    fn create_user(&self, user: &User, password_hash: &str) -> RepoResult<UserId>;
    /// Gets one user by id.
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    /// Gets one user and its stored password hash by exact username.
    fn find_credentials(&self, username: &str) -> RepoResult<Option<(User, String)>>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_shape(
            conn,
            "users",
            &["uuid", "username", "password_hash", "created_at"],
        )?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, user: &User, password_hash: &str) -> RepoResult<UserId> {
        self.conn.execute(
            "INSERT INTO users (uuid, username, password_hash) VALUES (?1, ?2, ?3);",
            params![user.id.to_string(), user.username.as_str(), password_hash],
        )?;
        Ok(user.id)
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, username, created_at
             FROM users
             WHERE uuid = ?1;",
        )?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_user_row(row)?)),
            None => Ok(None),
        }
    }

    fn find_credentials(&self, username: &str) -> RepoResult<Option<(User, String)>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, username, created_at, password_hash
             FROM users
             WHERE username = ?1;",
        )?;
        let mut rows = stmt.query([username])?;
        match rows.next()? {
            Some(row) => {
                let user = parse_user_row(row)?;
                let hash: String = row.get("password_hash")?;
                Ok(Some((user, hash)))
            }
            None => Ok(None),
        }
    }
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    let uuid_text: String = row.get("uuid")?;
    Ok(User {
        id: parse_uuid(&uuid_text, "users.uuid")?,
        username: row.get("username")?,
        created_at: row.get("created_at")?,
    })
}
