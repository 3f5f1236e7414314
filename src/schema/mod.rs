//! Schemas for document validation
//!
//! A schema is a flat, ordered list of field rules keyed by dot path.
//!
//! # Design Principles
//!
//! - Built once, immutable afterwards, shared read-only by every call
//! - Every construction defect (bad path, bad pattern, bad type descriptor)
//!   is reported when the schema is built, never during validation
//! - Rule order is preserved but carries no meaning

mod errors;
mod loader;
mod rule;
mod types;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, Severity};
pub use loader::{FieldDecl, SchemaDecl, SchemaLoader};
pub use rule::{
    Boundaries, CustomCheck, CustomFailure, DefaultProvider, FieldRule, FieldRuleBuilder, Pattern,
};
pub use types::{KeyKind, ScalarType, TypeDescriptor};

use std::collections::HashSet;

/// An immutable, ordered set of field rules
#[derive(Debug, Clone)]
pub struct Schema {
    rules: Vec<FieldRule>,
}

impl Schema {
    /// Creates a schema from built rules.
    ///
    /// # Errors
    ///
    /// Returns `FG_DUPLICATE_FIELD` if two rules share a path.
    pub fn new(rules: Vec<FieldRule>) -> SchemaResult<Self> {
        let mut seen = HashSet::new();
        for rule in &rules {
            if !seen.insert(rule.path().as_str()) {
                return Err(SchemaError::duplicate_field(rule.path().as_str()));
            }
        }
        Ok(Self { rules })
    }

    /// Builds every rule, then the schema. Stops at the first defect.
    pub fn from_builders(builders: impl IntoIterator<Item = FieldRuleBuilder>) -> SchemaResult<Self> {
        let rules = builders
            .into_iter()
            .map(FieldRuleBuilder::build)
            .collect::<SchemaResult<Vec<_>>>()?;
        Self::new(rules)
    }

    /// Returns the rules in declaration order
    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// Returns the rule for a path
    pub fn rule(&self, path: &str) -> Option<&FieldRule> {
        self.rules.iter().find(|r| r.path().as_str() == path)
    }

    /// Returns the number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_schema_is_shareable() {
        assert_send_sync::<Schema>();
    }

    #[test]
    fn test_schema_preserves_order() {
        let schema = Schema::from_builders([
            FieldRule::builder("b", "string"),
            FieldRule::builder("a", "number"),
        ])
        .unwrap();

        let paths: Vec<_> = schema.rules().iter().map(|r| r.path().as_str()).collect();
        assert_eq!(paths, ["b", "a"]);
        assert_eq!(schema.len(), 2);
        assert!(schema.rule("a").is_some());
        assert!(schema.rule("c").is_none());
    }

    #[test]
    fn test_duplicate_paths_rejected() {
        let err = Schema::from_builders([
            FieldRule::builder("name", "string"),
            FieldRule::builder("name", "string"),
        ])
        .unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::DuplicateField);
    }

    #[test]
    fn test_first_defect_surfaces() {
        let err = Schema::from_builders([
            FieldRule::builder("ok", "string"),
            FieldRule::builder("bad", "string").pattern("("),
        ])
        .unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::InvalidPattern);
        assert_eq!(err.field(), Some("bad"));
    }
}
