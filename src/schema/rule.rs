//! Field rules
//!
//! A `FieldRule` holds everything the engine knows about one field path.
//! Rules are assembled with `FieldRule::builder` and become immutable once
//! built: the path is parsed, the type descriptor parsed and the pattern
//! compiled at that point, so no validation call ever sees a broken rule.
//!
//! Default providers and custom checks must be pure. A schema is shared
//! across threads and the engine calls them without synchronization.

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{SchemaError, SchemaResult};
use super::types::TypeDescriptor;
use crate::access::RequiredRights;
use crate::path::FieldPath;

/// Inclusive numeric range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boundaries {
    pub min: f64,
    pub max: f64,
}

impl Boundaries {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns true if `value` lies in `[min, max]`
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    fn is_valid(&self) -> bool {
        !self.min.is_nan() && !self.max.is_nan() && self.min <= self.max
    }
}

/// A compiled pattern that must match the whole string
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    anchored: Regex,
}

impl Pattern {
    /// Compiles `source`, anchored at both ends
    pub fn compile(source: &str) -> Result<Self, regex::Error> {
        let anchored = Regex::new(&format!("^(?:{})$", source))?;
        Ok(Self {
            source: source.to_string(),
            anchored,
        })
    }

    /// Returns the pattern as declared
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns true if the entire string matches
    pub fn is_full_match(&self, s: &str) -> bool {
        self.anchored.is_match(s)
    }
}

/// Failure reported by a custom check
#[derive(Debug, Clone, PartialEq)]
pub struct CustomFailure {
    pub reason: String,
    pub value: Option<Value>,
}

impl CustomFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            value: None,
        }
    }

    /// Attach the offending value
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }
}

impl Default for CustomFailure {
    fn default() -> Self {
        Self::new("Custom validation failed")
    }
}

/// Computes a default value from the caller's external args.
#[derive(Clone)]
pub struct DefaultProvider(Arc<dyn Fn(&Value) -> Value + Send + Sync>);

impl DefaultProvider {
    pub fn new(f: impl Fn(&Value) -> Value + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Always yields `value`
    pub fn constant(value: Value) -> Self {
        Self::new(move |_| value.clone())
    }

    /// Yields `args[key]`, or null when args has no such key
    pub fn from_arg(key: impl Into<String>) -> Self {
        let key = key.into();
        Self::new(move |args| args.get(&key).cloned().unwrap_or(Value::Null))
    }

    pub fn provide(&self, args: &Value) -> Value {
        (self.0)(args)
    }
}

impl fmt::Debug for DefaultProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DefaultProvider(..)")
    }
}

/// Predicate run after the built-in value checks.
#[derive(Clone)]
pub struct CustomCheck(Arc<dyn Fn(&Value) -> Result<(), CustomFailure> + Send + Sync>);

impl CustomCheck {
    pub fn new(f: impl Fn(&Value) -> Result<(), CustomFailure> + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn run(&self, value: &Value) -> Result<(), CustomFailure> {
        (self.0)(value)
    }
}

impl fmt::Debug for CustomCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomCheck(..)")
    }
}

/// Everything the engine checks for one field path
#[derive(Debug, Clone)]
pub struct FieldRule {
    path: FieldPath,
    descriptor: TypeDescriptor,
    pattern: Option<Pattern>,
    boundaries: Option<Boundaries>,
    rights: RequiredRights,
    required: bool,
    default: Option<DefaultProvider>,
    custom: Option<CustomCheck>,
}

impl FieldRule {
    /// Start a rule for `path` with the given type descriptor text
    pub fn builder(path: impl Into<String>, descriptor: impl Into<String>) -> FieldRuleBuilder {
        FieldRuleBuilder {
            path: path.into(),
            descriptor: descriptor.into(),
            pattern: None,
            boundaries: None,
            rights: RequiredRights::default(),
            required: false,
            default: None,
            custom: None,
        }
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    pub fn pattern(&self) -> Option<&Pattern> {
        self.pattern.as_ref()
    }

    pub fn boundaries(&self) -> Option<Boundaries> {
        self.boundaries
    }

    pub fn rights(&self) -> &RequiredRights {
        &self.rights
    }

    /// Whether the field must be present on Init
    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn default_provider(&self) -> Option<&DefaultProvider> {
        self.default.as_ref()
    }

    pub fn custom_check(&self) -> Option<&CustomCheck> {
        self.custom.as_ref()
    }
}

/// Builder for `FieldRule`
pub struct FieldRuleBuilder {
    path: String,
    descriptor: String,
    pattern: Option<String>,
    boundaries: Option<Boundaries>,
    rights: RequiredRights,
    required: bool,
    default: Option<DefaultProvider>,
    custom: Option<CustomCheck>,
}

impl FieldRuleBuilder {
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn boundaries(mut self, min: f64, max: f64) -> Self {
        self.boundaries = Some(Boundaries::new(min, max));
        self
    }

    pub fn rights(mut self, rights: RequiredRights) -> Self {
        self.rights = rights;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn default_with(mut self, provider: DefaultProvider) -> Self {
        self.default = Some(provider);
        self
    }

    pub fn default_value(self, value: Value) -> Self {
        self.default_with(DefaultProvider::constant(value))
    }

    pub fn custom_check(
        mut self,
        check: impl Fn(&Value) -> Result<(), CustomFailure> + Send + Sync + 'static,
    ) -> Self {
        self.custom = Some(CustomCheck::new(check));
        self
    }

    /// Parses the path and descriptor and compiles the pattern.
    pub fn build(self) -> SchemaResult<FieldRule> {
        let path = FieldPath::parse(&self.path)
            .map_err(|e| SchemaError::malformed_path(&self.path, &e))?;

        let descriptor: TypeDescriptor = self
            .descriptor
            .parse()
            .map_err(|e: SchemaError| e.for_field(&self.path))?;

        let pattern = match &self.pattern {
            Some(source) => Some(
                Pattern::compile(source)
                    .map_err(|e| SchemaError::invalid_pattern(&self.path, source, e))?,
            ),
            None => None,
        };

        if let Some(b) = self.boundaries {
            if !descriptor.is_numeric() {
                return Err(SchemaError::boundaries_not_numeric(&self.path, &descriptor));
            }
            if !b.is_valid() {
                return Err(SchemaError::invalid_boundaries(&self.path, b.min, b.max));
            }
        }

        Ok(FieldRule {
            path,
            descriptor,
            pattern,
            boundaries: self.boundaries,
            rights: self.rights,
            required: self.required,
            default: self.default,
            custom: self.custom,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Role;
    use crate::schema::SchemaErrorCode;
    use serde_json::json;

    #[test]
    fn test_build_full_rule() {
        let rule = FieldRule::builder("profile.age", "number")
            .boundaries(0.0, 120.0)
            .rights(RequiredRights::new(Role::User, Role::Unauthenticated, Role::Owner))
            .required(true)
            .build()
            .unwrap();

        assert_eq!(rule.path().as_str(), "profile.age");
        assert!(rule.descriptor().is_numeric());
        assert_eq!(rule.boundaries(), Some(Boundaries::new(0.0, 120.0)));
        assert!(rule.is_required());
        assert!(rule.pattern().is_none());
    }

    #[test]
    fn test_bad_pattern_fails_at_build() {
        let err = FieldRule::builder("email", "string")
            .pattern("([a-z")
            .build()
            .unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::InvalidPattern);
        assert_eq!(err.field(), Some("email"));
    }

    #[test]
    fn test_bad_path_fails_at_build() {
        let err = FieldRule::builder("a..b", "string").build().unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::MalformedPath);
    }

    #[test]
    fn test_bad_descriptor_reports_field() {
        let err = FieldRule::builder("count", "int").build().unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::InvalidTypeDescriptor);
        assert_eq!(err.field(), Some("count"));
    }

    #[test]
    fn test_inverted_boundaries_rejected() {
        let err = FieldRule::builder("n", "number")
            .boundaries(10.0, 1.0)
            .build()
            .unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::InvalidBoundaries);

        assert!(FieldRule::builder("n", "number")
            .boundaries(f64::NAN, 1.0)
            .build()
            .is_err());
    }

    #[test]
    fn test_boundaries_need_numeric_type() {
        for descriptor in ["[]number", "string", "map[string]number", "bool"] {
            let err = FieldRule::builder("xs", descriptor)
                .boundaries(0.0, 1.0)
                .build()
                .unwrap_err();
            assert_eq!(err.code(), SchemaErrorCode::InvalidBoundaries, "{}", descriptor);
            assert_eq!(err.field(), Some("xs"));
        }

        assert!(FieldRule::builder("n", "float64").boundaries(0.0, 1.0).build().is_ok());
    }

    #[test]
    fn test_pattern_is_full_match() {
        let pattern = Pattern::compile("[a-z]+").unwrap();
        assert!(pattern.is_full_match("abc"));
        assert!(!pattern.is_full_match("abc1"));
        assert!(!pattern.is_full_match("1abc"));
        assert_eq!(pattern.as_str(), "[a-z]+");

        let alternation = Pattern::compile("cat|dog").unwrap();
        assert!(alternation.is_full_match("dog"));
        assert!(!alternation.is_full_match("catdog"));
    }

    #[test]
    fn test_default_providers() {
        let constant = DefaultProvider::constant(json!("member"));
        assert_eq!(constant.provide(&Value::Null), json!("member"));

        let from_arg = DefaultProvider::from_arg("user_id");
        assert_eq!(from_arg.provide(&json!({"user_id": "u1"})), json!("u1"));
        assert_eq!(from_arg.provide(&json!({})), Value::Null);
        assert_eq!(from_arg.provide(&Value::Null), Value::Null);
    }

    #[test]
    fn test_custom_failure_default_reason() {
        let failure = CustomFailure::default();
        assert_eq!(failure.reason, "Custom validation failed");
        assert!(failure.value.is_none());
    }
}
