//! Domain model for notes and their owners.
//!
//! # Responsibility
//! - Define the records shared by repositories, services and the web layer.
//! - Own field-level validation for note and account input.
//!
//! # Invariants
//! - Every note carries exactly one author for its whole lifetime.
//! - Validation errors are reported per field, never as panics.

pub mod form;
pub mod note;
pub mod user;
