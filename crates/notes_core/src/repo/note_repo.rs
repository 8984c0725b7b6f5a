//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist notes and answer owner-scoped lookups.
//! - Provide the slug existence probe used by the uniqueness rule.
//!
//! # Invariants
//! - Owner-scoped reads and writes always filter on `author_uuid`; a note owned
//!   by someone else behaves exactly like a missing one.
//! - Updates never touch `author_uuid`.
//! - Timestamps are epoch milliseconds taken from SQLite's clock.
//! - List order is `updated_at DESC, created_at DESC, rowid DESC`, so notes
//!   written within the same millisecond still list newest first.

use crate::model::note::{Note, NoteId};
use crate::model::user::UserId;
use crate::repo::{ensure_table_shape, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const NOTE_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    text,
    slug,
    author_uuid,
    created_at,
    updated_at
FROM notes";

/// Repository interface for note persistence.
pub trait NoteRepository {
    /// Inserts one note and returns its id.
    fn create_note(&self, note: &Note) -> RepoResult<NoteId>;
    /// Replaces title, text and slug of a note owned by `note.author`.
    fn update_note(&self, note: &Note) -> RepoResult<()>;
    /// Gets one note by id regardless of owner.
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Gets the note with `slug` only when `author` owns it.
    fn find_note_for_author(&self, slug: &str, author: UserId) -> RepoResult<Option<Note>>;
    /// Lists every note owned by `author`.
    fn list_notes_for_author(&self, author: UserId) -> RepoResult<Vec<Note>>;
    /// Returns whether another note (other than `exclude`) already uses `slug`.
    fn slug_taken(&self, slug: &str, exclude: Option<NoteId>) -> RepoResult<bool>;
    /// Hard-deletes a note owned by `author`.
    fn delete_note(&self, id: NoteId, author: UserId) -> RepoResult<()>;
    /// Counts all stored notes.
    fn count_notes(&self) -> RepoResult<u64>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// Fails when the `notes` table is missing or lacks a required column.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_shape(
            conn,
            "notes",
            &[
                "uuid",
                "title",
                "text",
                "slug",
                "author_uuid",
                "created_at",
                "updated_at",
            ],
        )?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn create_note(&self, note: &Note) -> RepoResult<NoteId> {
        self.conn.execute(
            "INSERT INTO notes (uuid, title, text, slug, author_uuid)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                note.id.to_string(),
                note.title.as_str(),
                note.text.as_str(),
                note.slug.as_str(),
                note.author.to_string(),
            ],
        )?;

        Ok(note.id)
    }

    fn update_note(&self, note: &Note) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE notes
             SET
                title = ?3,
                text = ?4,
                slug = ?5,
                updated_at = CAST((julianday('now') - 2440587.5) * 86400000 AS INTEGER)
             WHERE uuid = ?1
               AND author_uuid = ?2;",
            params![
                note.id.to_string(),
                note.author.to_string(),
                note.title.as_str(),
                note.text.as_str(),
                note.slug.as_str(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(format!("note {}", note.id)));
        }

        Ok(())
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_note_row(row)?)),
            None => Ok(None),
        }
    }

    fn find_note_for_author(&self, slug: &str, author: UserId) -> RepoResult<Option<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL}
             WHERE slug = ?1
               AND author_uuid = ?2;"
        ))?;
        let mut rows = stmt.query(params![slug, author.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_note_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_notes_for_author(&self, author: UserId) -> RepoResult<Vec<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL}
             WHERE author_uuid = ?1
             ORDER BY updated_at DESC, created_at DESC, rowid DESC;"
        ))?;
        let mut rows = stmt.query([author.to_string()])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }

    fn slug_taken(&self, slug: &str, exclude: Option<NoteId>) -> RepoResult<bool> {
        let exclude = exclude.map(|id| id.to_string());
        let taken: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM notes
                WHERE slug = ?1
                  AND (?2 IS NULL OR uuid <> ?2)
            );",
            params![slug, exclude],
            |row| row.get(0),
        )?;
        Ok(taken == 1)
    }

    fn delete_note(&self, id: NoteId, author: UserId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM notes WHERE uuid = ?1 AND author_uuid = ?2;",
            params![id.to_string(), author.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(format!("note {id}")));
        }

        Ok(())
    }

    fn count_notes(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM notes;", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let uuid_text: String = row.get("uuid")?;
    let author_text: String = row.get("author_uuid")?;
    Ok(Note {
        id: parse_uuid(&uuid_text, "notes.uuid")?,
        title: row.get("title")?,
        text: row.get("text")?,
        slug: row.get("slug")?,
        author: parse_uuid(&author_text, "notes.author_uuid")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
