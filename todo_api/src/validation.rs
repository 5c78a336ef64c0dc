//! Validation Support
//!
//! Request payloads implement [`Validatable`] and report *every* violated rule
//! at once, so a 400 envelope can list one message per field/rule.
//!
//! # Example
//!
//! ```rust
//! use todo_api::validation::{Validatable, ValidationError, ValidationErrors};
//!
//! struct Rename {
//!     title: String,
//! }
//!
//! impl Validatable for Rename {
//!     fn validate(&self) -> Result<(), ValidationErrors> {
//!         let mut errors = ValidationErrors::new();
//!         if self.title.trim().is_empty() {
//!             errors.add(ValidationError::new("title", "Title is required"));
//!         }
//!         errors.result()
//!     }
//! }
//!
//! assert!(Rename { title: " ".into() }.validate().is_err());
//! ```

use serde::Serialize;
use std::fmt;

/// Validation error with field name and message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Collection of validation errors, in the order they were found
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// User-facing messages, one per violation
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.message.clone()).collect()
    }

    /// Convert to Result
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one error was recorded.
    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed with {} error(s):", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Trait for request payloads that can be validated before reaching storage
pub trait Validatable {
    /// # Errors
    ///
    /// Returns every rule the value violates.
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Record an error when `value` is blank.
pub fn require_non_blank(errors: &mut ValidationErrors, field: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.add(ValidationError::new(field, message));
    }
}

/// Record an error when `value` has more than `max` characters.
pub fn require_max_chars(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
    max: usize,
    message: &str,
) {
    if value.chars().count() > max {
        errors.add(ValidationError::new(field, message));
    }
}
