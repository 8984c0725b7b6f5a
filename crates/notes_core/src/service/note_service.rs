//! Note use-case service.
//!
//! # Responsibility
//! - Provide owner-scoped create/update/get/list/delete APIs.
//! - Assign slugs and enforce their uniqueness before persistence.
//!
//! # Invariants
//! - A note whose slug collides with another note is never persisted; the
//!   caller receives `NoteServiceError::Invalid` with a slug field error.
//! - Notes of other authors are reported as `NoteNotFound`, never as a
//!   permission failure.
//! - Update keeps the stored slug unless the input supplies one.

use crate::model::form::FormErrors;
use crate::model::note::{Note, NoteId, NoteInput};
use crate::model::user::UserId;
use crate::repo::note_repo::NoteRepository;
use crate::repo::{RepoError, RepoResult};
use crate::slug::{derive_slug, duplicate_slug_message};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Input failed field validation or the slug rule.
    Invalid(FormErrors),
    /// No note with this slug is visible to the caller.
    NoteNotFound(String),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(errors) => write!(f, "invalid note: {errors}"),
            Self::NoteNotFound(slug) => write!(f, "note not found: {slug}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent note state: {details}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(errors) => Some(errors),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(what) => Self::NoteNotFound(what),
            other => Self::Repo(other),
        }
    }
}

impl From<FormErrors> for NoteServiceError {
    fn from(value: FormErrors) -> Self {
        Self::Invalid(value)
    }
}

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one note owned by `author`.
    ///
    /// When `input.slug` is absent the slug is derived from the title.
    pub fn create_note(&self, author: UserId, input: &NoteInput) -> Result<Note, NoteServiceError> {
        let cleaned = input.clean()?;
        let slug = match cleaned.slug {
            Some(slug) => slug,
            None => derived_slug_or_error(&cleaned.title)?,
        };
        self.ensure_slug_free(&slug, None)?;

        let note = Note::new(author, cleaned.title, cleaned.text, slug);
        self.repo
            .create_note(&note)
            .map_err(|err| conflict_as_duplicate(err, &note.slug))?;

        let stored = self
            .repo
            .get_note(note.id)?
            .ok_or(NoteServiceError::InconsistentState(
                "created note not found in read-back",
            ))?;
        info!(
            "event=note_create module=service status=ok note_id={} author_id={}",
            stored.id, stored.author
        );
        Ok(stored)
    }

    /// Updates title/text (and slug when supplied) of a note owned by `author`.
    pub fn update_note(
        &self,
        author: UserId,
        slug: &str,
        input: &NoteInput,
    ) -> Result<Note, NoteServiceError> {
        let mut note = self.get_note(author, slug)?;
        let cleaned = input.clean()?;
        if let Some(new_slug) = cleaned.slug {
            self.ensure_slug_free(&new_slug, Some(note.id))?;
            note.slug = new_slug;
        }
        note.title = cleaned.title;
        note.text = cleaned.text;

        self.repo
            .update_note(&note)
            .map_err(|err| conflict_as_duplicate(err, &note.slug))?;

        let stored = self
            .repo
            .get_note(note.id)?
            .ok_or(NoteServiceError::InconsistentState(
                "updated note not found in read-back",
            ))?;
        info!(
            "event=note_update module=service status=ok note_id={} author_id={}",
            stored.id, stored.author
        );
        Ok(stored)
    }

    /// Gets the note with `slug` when `author` owns it.
    pub fn get_note(&self, author: UserId, slug: &str) -> Result<Note, NoteServiceError> {
        self.repo
            .find_note_for_author(slug, author)?
            .ok_or_else(|| NoteServiceError::NoteNotFound(slug.to_string()))
    }

    /// Lists the notes owned by `author`, most recently updated first.
    pub fn list_notes(&self, author: UserId) -> RepoResult<Vec<Note>> {
        self.repo.list_notes_for_author(author)
    }

    /// Deletes the note with `slug` when `author` owns it.
    pub fn delete_note(&self, author: UserId, slug: &str) -> Result<(), NoteServiceError> {
        let note = self.get_note(author, slug)?;
        self.repo.delete_note(note.id, author)?;
        info!(
            "event=note_delete module=service status=ok note_id={} author_id={}",
            note.id, author
        );
        Ok(())
    }

    /// Counts all stored notes across authors.
    pub fn count_notes(&self) -> RepoResult<u64> {
        self.repo.count_notes()
    }

    fn ensure_slug_free(
        &self,
        slug: &str,
        exclude: Option<NoteId>,
    ) -> Result<(), NoteServiceError> {
        if self.repo.slug_taken(slug, exclude)? {
            warn!("event=note_slug_conflict module=service status=rejected");
            return Err(duplicate_slug(slug));
        }
        Ok(())
    }
}

fn derived_slug_or_error(title: &str) -> Result<String, NoteServiceError> {
    let slug = derive_slug(title);
    if slug.is_empty() {
        return Err(NoteServiceError::Invalid(FormErrors::single(
            "slug",
            "Could not derive a slug from the title; enter one explicitly.",
        )));
    }
    Ok(slug)
}

fn duplicate_slug(slug: &str) -> NoteServiceError {
    NoteServiceError::Invalid(FormErrors::single("slug", duplicate_slug_message(slug)))
}

// The existence probe and the insert are separate statements; the unique index
// still catches a concurrent writer.
fn conflict_as_duplicate(err: RepoError, slug: &str) -> NoteServiceError {
    match err {
        RepoError::Conflict(target) if target == "notes.slug" => duplicate_slug(slug),
        other => other.into(),
    }
}
