//! Runtime type conformance
//!
//! Identifier-typed fields travel as plain strings, so a string in the
//! identifier's canonical form is accepted wherever `ObjectId` or `string`
//! is declared. Sequences and mappings are checked element by element and
//! the first bad element fails the whole field.

use serde_json::Value;

use super::errors::ValidationError;
use crate::schema::{KeyKind, ScalarType, TypeDescriptor};
use crate::value::{is_object_id_hex, ValueKind};

/// Checks `value` against `descriptor`, reporting failures against `field`.
pub fn check_type(field: &str, descriptor: &TypeDescriptor, value: &Value) -> Result<(), ValidationError> {
    match descriptor {
        TypeDescriptor::Scalar(scalar) => {
            if scalar_matches(*scalar, value) {
                Ok(())
            } else {
                Err(ValidationError::type_mismatch(field, ValueKind::of(value).name()))
            }
        }
        TypeDescriptor::Sequence(element) => {
            let items = value
                .as_array()
                .ok_or_else(|| ValidationError::type_mismatch(field, ValueKind::of(value).name()))?;

            match items.iter().find(|item| !conforms(element, item)) {
                Some(bad) => Err(ValidationError::type_mismatch(
                    field,
                    format!("[] contains {}", ValueKind::of(bad)),
                )),
                None => Ok(()),
            }
        }
        TypeDescriptor::Mapping(key_kind, element) => {
            let map = value
                .as_object()
                .ok_or_else(|| ValidationError::type_mismatch(field, ValueKind::of(value).name()))?;

            for (key, item) in map {
                if *key_kind == KeyKind::ObjectId && !is_object_id_hex(key) {
                    return Err(ValidationError::type_mismatch(
                        field,
                        format!("key is not a valid ObjectId: {}", key),
                    ));
                }
                if !conforms(element, item) {
                    return Err(ValidationError::type_mismatch(
                        field,
                        format!("map value is of type: {}", ValueKind::of(item)),
                    ));
                }
            }
            Ok(())
        }
    }
}

/// Returns true if `value` conforms to `descriptor`, recursively.
pub fn conforms(descriptor: &TypeDescriptor, value: &Value) -> bool {
    match descriptor {
        TypeDescriptor::Scalar(scalar) => scalar_matches(*scalar, value),
        TypeDescriptor::Sequence(element) => value
            .as_array()
            .map_or(false, |items| items.iter().all(|item| conforms(element, item))),
        TypeDescriptor::Mapping(key_kind, element) => value.as_object().map_or(false, |map| {
            map.iter().all(|(key, item)| {
                (*key_kind == KeyKind::String || is_object_id_hex(key)) && conforms(element, item)
            })
        }),
    }
}

fn scalar_matches(scalar: ScalarType, value: &Value) -> bool {
    match (scalar, value) {
        (ScalarType::String, Value::String(_)) => true,
        (ScalarType::ObjectId, Value::String(s)) => is_object_id_hex(s),
        (ScalarType::Number, Value::Number(_)) => true,
        (ScalarType::Bool, Value::Bool(_)) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;
    use serde_json::json;

    const OID: &str = "507f1f77bcf86cd799439011";

    fn d(text: &str) -> TypeDescriptor {
        text.parse().unwrap()
    }

    #[test]
    fn test_scalar_match() {
        assert!(check_type("f", &d("string"), &json!("x")).is_ok());
        assert!(check_type("f", &d("number"), &json!(1.25)).is_ok());
        assert!(check_type("f", &d("number"), &json!(-3)).is_ok());
        assert!(check_type("f", &d("bool"), &json!(false)).is_ok());
    }

    #[test]
    fn test_scalar_mismatch_names_runtime_kind() {
        let err = check_type("age", &d("number"), &json!("12")).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::TypeMismatch);
        assert_eq!(err.field, "age");
        assert_eq!(err.value, Some(json!("string")));

        let err = check_type("name", &d("string"), &json!({"first": "a"})).unwrap_err();
        assert_eq!(err.value, Some(json!("mapping")));
    }

    #[test]
    fn test_identifier_exception() {
        assert!(check_type("owner", &d("ObjectId"), &json!(OID)).is_ok());
        assert!(check_type("owner", &d("string"), &json!(OID)).is_ok());
        assert!(check_type("owner", &d("ObjectId"), &json!(&OID[..23])).is_err());
        assert!(check_type("owner", &d("ObjectId"), &json!("zzzzzzzzzzzzzzzzzzzzzzzz")).is_err());
        assert!(check_type("owner", &d("ObjectId"), &json!(42)).is_err());
    }

    #[test]
    fn test_sequence_elements() {
        assert!(check_type("tags", &d("[]string"), &json!(["a", "b"])).is_ok());
        assert!(check_type("ids", &d("[]ObjectId"), &json!([OID, OID])).is_ok());

        let err = check_type("tags", &d("[]string"), &json!(["a", 1, "c"])).unwrap_err();
        assert_eq!(err.value, Some(json!("[] contains number")));

        let err = check_type("ids", &d("[]ObjectId"), &json!([OID, "nope"])).unwrap_err();
        assert_eq!(err.value, Some(json!("[] contains string")));

        let err = check_type("tags", &d("[]string"), &json!("a")).unwrap_err();
        assert_eq!(err.value, Some(json!("string")));
    }

    #[test]
    fn test_nested_sequences() {
        assert!(check_type("grid", &d("[][]number"), &json!([[1, 2], [3]])).is_ok());
        let err = check_type("grid", &d("[][]number"), &json!([[1], ["x"]])).unwrap_err();
        assert_eq!(err.value, Some(json!("[] contains sequence")));
    }

    #[test]
    fn test_mapping_keys_and_values() {
        let scores = json!({ "507f1f77bcf86cd799439011": 3, "6a7f1f77bcf86cd799439011": 4 });
        assert!(check_type("scores", &d("map[ObjectId]number"), &scores).is_ok());
        assert!(check_type("scores", &d("map[string]number"), &json!({"a": 1})).is_ok());

        let err = check_type("scores", &d("map[ObjectId]number"), &json!({"bob": 1})).unwrap_err();
        assert_eq!(err.value, Some(json!("key is not a valid ObjectId: bob")));

        let err = check_type("scores", &d("map[string]number"), &json!({"a": "1"})).unwrap_err();
        assert_eq!(err.value, Some(json!("map value is of type: string")));

        let err = check_type("scores", &d("map[string]number"), &json!([1])).unwrap_err();
        assert_eq!(err.value, Some(json!("sequence")));
    }

    #[test]
    fn test_null_never_conforms() {
        assert!(!conforms(&d("string"), &Value::Null));
        assert!(check_type("tags", &d("[]string"), &json!(["a", null])).is_err());
    }
}
