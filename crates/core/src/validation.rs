//! Structural validation of inbound payloads.
//!
//! A `Validator` walks every field of a payload and records each violated
//! constraint instead of stopping at the first one, so a single response can
//! report everything the caller has to fix.

use thiserror::Error;

/// Which constraint a field violated.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// The field was absent (or `null`).
    Missing,
    /// The text exceeded `max` characters.
    TooLong { max: usize },
    /// A number that must be strictly greater than zero was not.
    NotPositive,
    /// The text contained a NUL (U+0000) character.
    ContainsNul,
}

impl ViolationKind {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ViolationKind::Missing => "missing",
            ViolationKind::TooLong { .. } => "too_long",
            ViolationKind::NotPositive => "not_positive",
            ViolationKind::ContainsNul => "invalid_character",
        }
    }
}

/// One violated constraint on one field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Violation {
    pub field: &'static str,
    pub kind: ViolationKind,
}

impl Violation {
    pub fn new(field: &'static str, kind: ViolationKind) -> Self {
        Self { field, kind }
    }

    pub fn message(&self) -> String {
        match self.kind {
            ViolationKind::Missing => "field required".to_string(),
            ViolationKind::TooLong { max } => format!("must be at most {max} characters"),
            ViolationKind::NotPositive => "must be greater than 0".to_string(),
            ViolationKind::ContainsNul => "must not contain NUL characters".to_string(),
        }
    }
}

impl core::fmt::Display for Violation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.field, self.message())
    }
}

/// Every constraint a payload violated, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed: {}", join_violations(.violations))]
pub struct ValidationError {
    violations: Vec<Violation>,
}

impl ValidationError {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn fields(&self) -> Vec<&'static str> {
        self.violations.iter().map(|v| v.field).collect()
    }

    pub fn contains(&self, field: &str, kind: ViolationKind) -> bool {
        self.violations
            .iter()
            .any(|v| v.field == field && v.kind == kind)
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(Violation::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Violation collector.
///
/// Each check returns `Some(value)` only when the value is present and valid;
/// otherwise the violation is recorded and `None` is returned. A payload is
/// valid iff every check returned `Some`.
#[derive(Debug, Default)]
pub struct Validator {
    violations: Vec<Violation>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Required text of at most `max_chars` characters.
    ///
    /// Length is measured in characters, not bytes. An empty string counts as
    /// present.
    pub fn text(
        &mut self,
        field: &'static str,
        value: Option<String>,
        max_chars: usize,
    ) -> Option<String> {
        let Some(value) = value else {
            self.record(field, ViolationKind::Missing);
            return None;
        };
        if value.chars().count() > max_chars {
            self.record(field, ViolationKind::TooLong { max: max_chars });
            return None;
        }
        if value.contains('\0') {
            self.record(field, ViolationKind::ContainsNul);
            return None;
        }
        Some(value)
    }

    /// Required, finite, strictly positive number.
    pub fn positive_f64(&mut self, field: &'static str, value: Option<f64>) -> Option<f64> {
        let Some(value) = value else {
            self.record(field, ViolationKind::Missing);
            return None;
        };
        if !(value.is_finite() && value > 0.0) {
            self.record(field, ViolationKind::NotPositive);
            return None;
        }
        Some(value)
    }

    /// Required, strictly positive integer (reference ids).
    pub fn positive_i64(&mut self, field: &'static str, value: Option<i64>) -> Option<i64> {
        let Some(value) = value else {
            self.record(field, ViolationKind::Missing);
            return None;
        };
        if value <= 0 {
            self.record(field, ViolationKind::NotPositive);
            return None;
        }
        Some(value)
    }

    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn into_error(self) -> ValidationError {
        ValidationError::new(self.violations)
    }

    fn record(&mut self, field: &'static str, kind: ViolationKind) {
        self.violations.push(Violation::new(field, kind));
    }
}
