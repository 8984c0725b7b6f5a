//! Field-level validation error collection.

use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Message for a required field left blank.
pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// Validation errors keyed by form field name.
///
/// Errors that are not tied to one field (bad credentials, for instance) are
/// kept separately in `non_field`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors {
    fields: BTreeMap<&'static str, Vec<String>>,
    non_field: Vec<String>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an error set holding one message for `field`.
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_default().push(message.into());
    }

    pub fn add_non_field(&mut self, message: impl Into<String>) {
        self.non_field.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.non_field.is_empty()
    }

    /// Messages attached to `field`, empty when the field is valid.
    pub fn field(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn non_field(&self) -> &[String] {
        &self.non_field
    }

    /// Returns `Ok(value)` when no error was collected.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl Display for FormErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        for message in &self.non_field {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{message}")?;
            first = false;
        }
        Ok(())
    }
}

impl Error for FormErrors {}

#[cfg(test)]
mod tests {
    use super::FormErrors;

    #[test]
    fn collects_messages_per_field() {
        let mut errors = FormErrors::new();
        errors.add("title", "first");
        errors.add("title", "second");
        errors.add_non_field("general");

        assert_eq!(errors.field("title"), ["first", "second"]);
        assert!(errors.field("text").is_empty());
        assert_eq!(errors.non_field(), ["general"]);
        assert_eq!(errors.to_string(), "title: first; title: second; general");
    }

    #[test]
    fn into_result_passes_value_through_when_empty() {
        assert_eq!(FormErrors::new().into_result(7), Ok(7));
        assert!(FormErrors::single("slug", "bad").into_result(7).is_err());
    }

    #[test]
    fn serializes_fields_and_non_field_messages() {
        let mut errors = FormErrors::single("slug", "taken");
        errors.add_non_field("general");

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"fields": {"slug": ["taken"]}, "non_field": ["general"]})
        );
    }
}
