//! Schema construction errors
//!
//! These report a broken schema, never bad document data. They are raised
//! when a schema is built or loaded, before any document is validated.
//!
//! Error codes:
//! - FG_MALFORMED_PATH (FATAL)
//! - FG_INVALID_PATTERN (FATAL)
//! - FG_INVALID_TYPE_DESCRIPTOR (FATAL)
//! - FG_INVALID_BOUNDARIES (FATAL)
//! - FG_DUPLICATE_FIELD (FATAL)
//! - FG_MALFORMED_SCHEMA_FILE (FATAL)
//! - FG_SCHEMA_IMMUTABLE (REJECT)
//! - FG_UNKNOWN_SCHEMA (REJECT)

use std::fmt;

use super::types::TypeDescriptor;
use crate::path::PathError;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Request rejected, process keeps serving
    Reject,
    /// Schema is unusable; the host must not start with it
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Schema error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Field path is empty, has empty segments, or cannot be written
    MalformedPath,
    /// Field pattern does not compile
    InvalidPattern,
    /// Type descriptor text does not parse
    InvalidTypeDescriptor,
    /// Boundaries with min > max or a NaN bound
    InvalidBoundaries,
    /// Two rules for the same path
    DuplicateField,
    /// Schema file unreadable or not valid JSON
    MalformedSchemaFile,
    /// Attempt to register a schema name twice
    SchemaImmutable,
    /// Schema name not registered
    UnknownSchema,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::MalformedPath => "FG_MALFORMED_PATH",
            SchemaErrorCode::InvalidPattern => "FG_INVALID_PATTERN",
            SchemaErrorCode::InvalidTypeDescriptor => "FG_INVALID_TYPE_DESCRIPTOR",
            SchemaErrorCode::InvalidBoundaries => "FG_INVALID_BOUNDARIES",
            SchemaErrorCode::DuplicateField => "FG_DUPLICATE_FIELD",
            SchemaErrorCode::MalformedSchemaFile => "FG_MALFORMED_SCHEMA_FILE",
            SchemaErrorCode::SchemaImmutable => "FG_SCHEMA_IMMUTABLE",
            SchemaErrorCode::UnknownSchema => "FG_UNKNOWN_SCHEMA",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            SchemaErrorCode::SchemaImmutable | SchemaErrorCode::UnknownSchema => Severity::Reject,
            _ => Severity::Fatal,
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error type with full context
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    /// Field path the error is about, if any
    field: Option<String>,
}

impl SchemaError {
    fn new(code: SchemaErrorCode, message: String, field: Option<String>) -> Self {
        Self {
            code,
            message,
            field,
        }
    }

    /// Create a malformed path error
    pub fn malformed_path(field: impl Into<String>, source: &PathError) -> Self {
        let field = field.into();
        Self::new(SchemaErrorCode::MalformedPath, source.to_string(), Some(field))
    }

    /// Create an invalid pattern error
    pub fn invalid_pattern(field: impl Into<String>, pattern: &str, reason: impl fmt::Display) -> Self {
        Self::new(
            SchemaErrorCode::InvalidPattern,
            format!("Pattern '{}' does not compile: {}", pattern, reason),
            Some(field.into()),
        )
    }

    /// Create an invalid type descriptor error
    pub fn invalid_type(descriptor: &str, reason: impl Into<String>) -> Self {
        Self::new(
            SchemaErrorCode::InvalidTypeDescriptor,
            format!("Type descriptor '{}' is invalid: {}", descriptor, reason.into()),
            None,
        )
    }

    /// Create an invalid boundaries error
    pub fn invalid_boundaries(field: impl Into<String>, min: f64, max: f64) -> Self {
        Self::new(
            SchemaErrorCode::InvalidBoundaries,
            format!("Boundaries [{}, {}] are not a valid inclusive range", min, max),
            Some(field.into()),
        )
    }

    /// Create an error for boundaries declared on a non-numeric type
    pub fn boundaries_not_numeric(field: impl Into<String>, descriptor: &TypeDescriptor) -> Self {
        Self::new(
            SchemaErrorCode::InvalidBoundaries,
            format!("Boundaries require type 'number', field is declared '{}'", descriptor),
            Some(field.into()),
        )
    }

    /// Create a duplicate field error
    pub fn duplicate_field(field: impl Into<String>) -> Self {
        let field = field.into();
        Self::new(
            SchemaErrorCode::DuplicateField,
            format!("Field '{}' is declared more than once", field),
            Some(field),
        )
    }

    /// Create an error for a malformed schema file
    pub fn malformed_schema(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(
            SchemaErrorCode::MalformedSchemaFile,
            format!("Malformed schema file '{}': {}", path.into(), reason.into()),
            None,
        )
    }

    /// Create a schema immutable error
    pub fn schema_immutable(name: &str) -> Self {
        Self::new(
            SchemaErrorCode::SchemaImmutable,
            format!("Schema '{}' is already registered and immutable", name),
            None,
        )
    }

    /// Create an unknown schema error
    pub fn unknown_schema(name: &str) -> Self {
        Self::new(
            SchemaErrorCode::UnknownSchema,
            format!("Schema '{}' not found", name),
            None,
        )
    }

    /// Attach the field the error is about
    pub fn for_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the field path if applicable
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Returns whether this is a fatal error
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)?;
        if let Some(field) = &self.field {
            write!(f, " (field '{}')", field)?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SchemaErrorCode::MalformedPath.code(), "FG_MALFORMED_PATH");
        assert_eq!(SchemaErrorCode::InvalidPattern.code(), "FG_INVALID_PATTERN");
        assert_eq!(SchemaErrorCode::UnknownSchema.code(), "FG_UNKNOWN_SCHEMA");
    }

    #[test]
    fn test_severity_levels() {
        assert_eq!(SchemaErrorCode::InvalidPattern.severity(), Severity::Fatal);
        assert_eq!(SchemaErrorCode::MalformedPath.severity(), Severity::Fatal);
        assert_eq!(SchemaErrorCode::UnknownSchema.severity(), Severity::Reject);
        assert_eq!(SchemaErrorCode::SchemaImmutable.severity(), Severity::Reject);
    }

    #[test]
    fn test_display_includes_code_and_field() {
        let err = SchemaError::invalid_pattern("email", "([a-z", "unclosed group");
        let display = err.to_string();
        assert!(display.contains("FATAL"));
        assert!(display.contains("FG_INVALID_PATTERN"));
        assert!(display.contains("email"));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_malformed_path_keeps_source_message() {
        let err = SchemaError::malformed_path("a..b", &PathError::Empty);
        assert_eq!(err.field(), Some("a..b"));
        assert!(err.message().contains("empty"));
    }
}
