//! Note domain model and input validation.
//!
//! # Invariants
//! - `slug` is unique across all notes and URL-safe.
//! - `author` is set once at creation and never reassigned.
//! - `title` is non-blank and at most [`TITLE_MAX_CHARS`] characters.

use crate::model::form::{FormErrors, REQUIRED_MESSAGE};
use crate::model::user::UserId;
use crate::slug::{is_valid_slug, SLUG_MAX_CHARS};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable internal identifier of a note. Never exposed in URLs.
pub type NoteId = Uuid;

/// Maximum title length in characters.
pub const TITLE_MAX_CHARS: usize = 100;

/// Persisted note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub text: String,
    pub slug: String,
    pub author: UserId,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds.
    pub updated_at: i64,
}

impl Note {
    /// Creates an unsaved note with a fresh id. Timestamps are assigned by the store.
    pub fn new(
        author: UserId,
        title: impl Into<String>,
        text: impl Into<String>,
        slug: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            text: text.into(),
            slug: slug.into(),
            author,
            created_at: 0,
            updated_at: 0,
        }
    }
}

/// Raw note form input as submitted by a client.
///
/// `slug` is optional; a blank value counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub slug: Option<String>,
}

/// Note input that passed field validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedNote {
    pub title: String,
    pub text: String,
    /// Explicit slug, when the caller supplied one.
    pub slug: Option<String>,
}

impl NoteInput {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            slug: None,
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// Builds form input pre-populated from a stored note.
    pub fn from_note(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            text: note.text.clone(),
            slug: Some(note.slug.clone()),
        }
    }

    /// Validates field shapes. Slug uniqueness is checked later against the store.
    pub fn clean(&self) -> Result<CleanedNote, FormErrors> {
        let mut errors = FormErrors::new();

        let title = self.title.trim();
        let title_chars = title.chars().count();
        if title.is_empty() {
            errors.add("title", REQUIRED_MESSAGE);
        } else if title_chars > TITLE_MAX_CHARS {
            errors.add(
                "title",
                format!(
                    "Ensure this value has at most {TITLE_MAX_CHARS} characters (it has {title_chars})."
                ),
            );
        }

        let text = self.text.trim();
        if text.is_empty() {
            errors.add("text", REQUIRED_MESSAGE);
        }

        let slug = self
            .slug
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty());
        if let Some(value) = slug {
            if value.chars().count() > SLUG_MAX_CHARS {
                errors.add(
                    "slug",
                    format!("Ensure this value has at most {SLUG_MAX_CHARS} characters."),
                );
            } else if !is_valid_slug(value) {
                errors.add(
                    "slug",
                    "Enter a valid slug consisting of letters, numbers, underscores or hyphens.",
                );
            }
        }

        errors.into_result(CleanedNote {
            title: title.to_string(),
            text: text.to_string(),
            slug: slug.map(str::to_string),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{NoteInput, TITLE_MAX_CHARS};

    #[test]
    fn clean_trims_fields_and_treats_blank_slug_as_absent() {
        let input = NoteInput::new("  Title ", " body ").with_slug("   ");
        let cleaned = input.clean().expect("input should be valid");
        assert_eq!(cleaned.title, "Title");
        assert_eq!(cleaned.text, "body");
        assert_eq!(cleaned.slug, None);
    }

    #[test]
    fn clean_reports_required_fields() {
        let errors = NoteInput::new(" ", "").clean().unwrap_err();
        assert_eq!(errors.field("title").len(), 1);
        assert_eq!(errors.field("text").len(), 1);
        assert!(errors.field("slug").is_empty());
    }

    #[test]
    fn clean_rejects_long_titles_and_unsafe_slugs() {
        let errors = NoteInput::new("t".repeat(TITLE_MAX_CHARS + 1), "body")
            .with_slug("not a slug")
            .clean()
            .unwrap_err();
        assert!(errors.field("title")[0].contains("at most 100"));
        assert!(errors.field("slug")[0].contains("valid slug"));
    }
}
