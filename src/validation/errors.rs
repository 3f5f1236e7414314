//! Field-scoped validation errors
//!
//! These describe bad document data. They are collected, never thrown:
//! one document can produce many of them and validation always completes.

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Kind of validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ValidationErrorKind {
    RequiredFieldMissing,
    TypeMismatch,
    RegexMismatch,
    OutOfBoundaries,
    InsufficientRights,
    CustomValidationFailed,
}

impl ValidationErrorKind {
    /// Returns the kind name
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationErrorKind::RequiredFieldMissing => "RequiredFieldMissing",
            ValidationErrorKind::TypeMismatch => "TypeMismatch",
            ValidationErrorKind::RegexMismatch => "RegexMismatch",
            ValidationErrorKind::OutOfBoundaries => "OutOfBoundaries",
            ValidationErrorKind::InsufficientRights => "InsufficientRights",
            ValidationErrorKind::CustomValidationFailed => "CustomValidationFailed",
        }
    }

    /// Returns the standard human-readable reason
    pub fn default_reason(&self) -> &'static str {
        match self {
            ValidationErrorKind::RequiredFieldMissing => "Required",
            ValidationErrorKind::TypeMismatch => "Type mismatch",
            ValidationErrorKind::RegexMismatch => "Regex not match",
            ValidationErrorKind::OutOfBoundaries => "Out of boundaries",
            ValidationErrorKind::InsufficientRights => "Insufficient rights",
            ValidationErrorKind::CustomValidationFailed => "Custom validation failed",
        }
    }
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One validation failure for one field
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("{kind} for {field} = {}: {reason}", display_value(.value))]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub reason: String,
    pub field: String,
    /// The offending value, or a description of its type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

fn display_value(value: &Option<Value>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "<none>".to_string(),
    }
}

impl ValidationError {
    /// Error of `kind` with its standard reason
    pub fn new(kind: ValidationErrorKind, field: impl Into<String>) -> Self {
        Self {
            kind,
            reason: kind.default_reason().to_string(),
            field: field.into(),
            value: None,
        }
    }

    /// Attach the offending value
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn required(field: impl Into<String>) -> Self {
        Self::new(ValidationErrorKind::RequiredFieldMissing, field)
    }

    /// Type mismatch carrying a description of the runtime type
    pub fn type_mismatch(field: impl Into<String>, found: impl Into<String>) -> Self {
        Self::new(ValidationErrorKind::TypeMismatch, field).with_value(Value::String(found.into()))
    }

    pub fn regex_mismatch(field: impl Into<String>, value: &str) -> Self {
        Self::new(ValidationErrorKind::RegexMismatch, field).with_value(Value::String(value.to_string()))
    }

    pub fn out_of_boundaries(field: impl Into<String>, value: Value) -> Self {
        Self::new(ValidationErrorKind::OutOfBoundaries, field).with_value(value)
    }

    pub fn insufficient_rights(field: impl Into<String>) -> Self {
        Self::new(ValidationErrorKind::InsufficientRights, field)
    }
}
