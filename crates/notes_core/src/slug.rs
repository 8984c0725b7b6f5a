//! Slug derivation and validation for note URLs.
//!
//! # Responsibility
//! - Turn a free-form title into a URL-safe identifier.
//! - Decide whether a caller-supplied slug is acceptable.
//!
//! # Invariants
//! - `slugify` output only contains `[a-z0-9_-]`.
//! - `slugify` is deterministic: the same title always yields the same slug.
//! - Derived slugs never exceed [`SLUG_MAX_CHARS`].

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum slug length accepted by the store.
pub const SLUG_MAX_CHARS: usize = 100;

/// Suffix appended to a colliding slug in the form warning.
pub const DUPLICATE_SLUG_WARNING: &str =
    " - такой slug уже существует, придумайте уникальное значение!";

static AMPERSAND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&amp;|&").expect("valid ampersand regex"));
static SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-\s]+").expect("valid separator regex"));
static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid slug regex"));

/// Derives a URL-safe slug from arbitrary text.
///
/// Cyrillic letters are transliterated to Latin, whitespace and hyphen runs
/// collapse into a single `-`, and every other character outside
/// `[a-z0-9_-]` is dropped.
pub fn slugify(value: &str) -> String {
    let lowered = value.to_lowercase();
    let with_and = AMPERSAND_RE.replace_all(&lowered, " and ");
    let hyphenated = SEPARATOR_RE.replace_all(with_and.trim(), "-");

    let mut slug = String::with_capacity(hyphenated.len());
    for ch in hyphenated.chars() {
        match ch {
            'a'..='z' | '0'..='9' | '-' | '_' => slug.push(ch),
            other => {
                if let Some(latin) = transliterate(other) {
                    slug.push_str(latin);
                }
            }
        }
    }

    // Dropped characters can leave doubled or dangling separators behind.
    let collapsed = SEPARATOR_RE.replace_all(&slug, "-");
    collapsed.trim_matches(|ch: char| ch == '-' || ch == '_').to_string()
}

/// Derives the stored slug for a title, truncated to [`SLUG_MAX_CHARS`].
pub fn derive_slug(title: &str) -> String {
    slugify(title).chars().take(SLUG_MAX_CHARS).collect()
}

/// Returns whether `value` is acceptable as an explicit slug.
pub fn is_valid_slug(value: &str) -> bool {
    value.chars().count() <= SLUG_MAX_CHARS && SLUG_RE.is_match(value)
}

/// Builds the validation message shown when `slug` is already in use.
pub fn duplicate_slug_message(slug: &str) -> String {
    format!("{slug}{DUPLICATE_SLUG_WARNING}")
}

fn transliterate(ch: char) -> Option<&'static str> {
    let latin = match ch {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "yo",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "j",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ъ' | 'ь' => "",
        'ы' => "y",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        _ => return None,
    };
    Some(latin)
}

#[cfg(test)]
mod tests {
    use super::{derive_slug, duplicate_slug_message, is_valid_slug, slugify, SLUG_MAX_CHARS};

    #[test]
    fn slugify_transliterates_cyrillic_titles() {
        assert_eq!(slugify("Заголовок"), "zagolovok");
        assert_eq!(slugify("Заголовок Читателя"), "zagolovok-chitatelya");
        assert_eq!(slugify("Щука и ёж"), "schuka-i-yozh");
    }

    #[test]
    fn slugify_hyphenates_whitespace_and_drops_symbols() {
        assert_eq!(slugify("  Fighting Otto   Octavius! "), "fighting-otto-octavius");
        assert_eq!(slugify("Tom & Jerry"), "tom-and-jerry");
        assert_eq!(slugify("a -- b"), "a-b");
        assert_eq!(slugify("snake_case stays"), "snake_case-stays");
    }

    #[test]
    fn slugify_drops_soft_and_hard_signs() {
        assert_eq!(slugify("объём соль"), "obyom-sol");
    }

    #[test]
    fn slugify_can_produce_empty_output() {
        assert_eq!(slugify("!!! ???"), "");
    }

    #[test]
    fn derive_slug_truncates_long_titles() {
        let title = "x".repeat(SLUG_MAX_CHARS + 20);
        assert_eq!(derive_slug(&title).chars().count(), SLUG_MAX_CHARS);
    }

    #[test]
    fn is_valid_slug_accepts_only_url_safe_values() {
        assert!(is_valid_slug("note-1_a"));
        assert!(!is_valid_slug("with space"));
        assert!(!is_valid_slug("заметка"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug(&"a".repeat(SLUG_MAX_CHARS + 1)));
    }

    #[test]
    fn duplicate_message_starts_with_slug() {
        let message = duplicate_slug_message("taken");
        assert!(message.starts_with("taken - "));
        assert!(message.ends_with("уникальное значение!"));
    }
}
