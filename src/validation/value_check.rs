//! Format, range and custom predicate checks
//!
//! Runs only after the type check passed. Order is pattern, boundaries,
//! custom check; the first failure ends the value stage for the field.

use serde_json::Value;

use super::errors::{ValidationError, ValidationErrorKind};
use crate::schema::FieldRule;

/// Checks `value` against the rule's pattern, boundaries and custom check.
pub fn check_value(rule: &FieldRule, value: &Value) -> Result<(), ValidationError> {
    let field = rule.path().as_str();

    match value {
        Value::String(s) => {
            if let Some(pattern) = rule.pattern() {
                if !pattern.is_full_match(s) {
                    return Err(ValidationError::regex_mismatch(field, s));
                }
            }
        }
        Value::Number(n) => {
            if let (Some(boundaries), Some(number)) = (rule.boundaries(), n.as_f64()) {
                if !boundaries.contains(number) {
                    return Err(ValidationError::out_of_boundaries(field, value.clone()));
                }
            }
        }
        _ => {}
    }

    if let Some(check) = rule.custom_check() {
        // Field is always the rule's path, whatever the predicate reports.
        check.run(value).map_err(|failure| ValidationError {
            kind: ValidationErrorKind::CustomValidationFailed,
            reason: failure.reason,
            field: field.to_string(),
            value: failure.value,
        })?;
    }

    Ok(())
}
