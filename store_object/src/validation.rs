//! Validation module
//!
//! Payload rules for entities. Checks are collected rather than stopping at the
//! first failure, and only the first failure per field is recorded.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$")
        .unwrap_or_else(|e| unreachable!("email pattern is a valid regex: {e}"))
});

/// One rejected field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every violation found in one payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", self.summary())]
pub struct ValidationErrors {
    violations: Vec<Violation>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.violations.push(Violation {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }

    pub fn summary(&self) -> String {
        self.violations
            .iter()
            .map(Violation::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Create payloads must carry every required field; update payloads only what changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    Create,
    Update,
}

pub trait Validate {
    fn validate(&self, mode: ValidationMode) -> Result<(), ValidationErrors>;
}

/// Fluent collector used by `Validate` impls
///
/// ```
/// use store_object::validation::{ValidationMode, Validator};
///
/// let name = Some("A".to_string());
/// let mut v = Validator::new(ValidationMode::Create);
/// v.field("name", name.as_ref()).required().min_chars(2, "Name must be at least 2 characters.");
/// assert!(v.finish().is_err());
/// ```
#[derive(Debug)]
pub struct Validator {
    mode: ValidationMode,
    errors: ValidationErrors,
}

impl Validator {
    pub fn new(mode: ValidationMode) -> Self {
        Self {
            mode,
            errors: ValidationErrors::new(),
        }
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    pub fn field<'v, T>(&'v mut self, name: &'static str, value: Option<&'v T>) -> FieldCheck<'v, T> {
        FieldCheck {
            validator: self,
            name,
            value,
            failed: false,
        }
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        self.errors.into_result()
    }
}

pub struct FieldCheck<'v, T> {
    validator: &'v mut Validator,
    name: &'static str,
    value: Option<&'v T>,
    failed: bool,
}

impl<T> FieldCheck<'_, T> {
    fn fail(&mut self, message: String) {
        if !self.failed {
            self.validator.errors.push(self.name, message);
            self.failed = true;
        }
    }

    /// Absent values are an error when creating
    pub fn required(mut self) -> Self {
        if self.value.is_none() && self.validator.mode == ValidationMode::Create {
            self.fail("is required".to_string());
        }
        self
    }

    /// Run `ok` against a present value
    pub fn check(mut self, ok: impl FnOnce(&T) -> bool, message: &str) -> Self {
        if let Some(value) = self.value {
            if !self.failed && !ok(value) {
                self.fail(message.to_string());
            }
        }
        self
    }
}

impl FieldCheck<'_, String> {
    pub fn min_chars(self, min: usize, message: &str) -> Self {
        self.check(|s| s.chars().count() >= min, message)
    }

    pub fn non_empty(self, message: &str) -> Self {
        self.check(|s| !s.is_empty(), message)
    }

    pub fn email(self, message: &str) -> Self {
        self.check(|s| EMAIL_PATTERN.is_match(s), message)
    }

    /// Absolute http(s) URL with a host
    pub fn http_url(self, message: &str) -> Self {
        self.check(
            |s| match url::Url::parse(s) {
                Ok(parsed) => {
                    matches!(parsed.scheme(), "http" | "https") && parsed.host().is_some()
                }
                Err(_) => false,
            },
            message,
        )
    }
}

impl FieldCheck<'_, f64> {
    pub fn positive(self, message: &str) -> Self {
        self.check(|n| n.is_finite() && *n > 0.0, message)
    }

    pub fn non_zero(self, message: &str) -> Self {
        self.check(|n| n.is_finite() && *n != 0.0, message)
    }
}

impl FieldCheck<'_, i32> {
    pub fn at_least(self, min: i32, message: &str) -> Self {
        self.check(|n| *n >= min, message)
    }

    pub fn positive(self, message: &str) -> Self {
        self.check(|n| *n > 0, message)
    }
}
