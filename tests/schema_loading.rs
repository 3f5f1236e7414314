//! Schema Loading Tests
//!
//! Schema files on disk, as the CLI boots them:
//! - Every construction defect fails the load with its own code
//! - Loaded schemas are immutable and looked up by name
//! - Declared defaults and rights behave like programmatic ones

use std::fs;

use fieldguard::schema::{FieldDecl, SchemaDecl, SchemaErrorCode, SchemaLoader};
use fieldguard::{validate, Options, RequiredRights, Role, Usage, ValidationErrorKind};
use serde_json::json;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn write_schema(dir: &TempDir, file: &str, body: serde_json::Value) {
    fs::write(dir.path().join(file), body.to_string()).unwrap();
}

fn load_error(body: serde_json::Value) -> SchemaErrorCode {
    let tmp = TempDir::new().unwrap();
    write_schema(&tmp, "s.json", body);
    let mut loader = SchemaLoader::new(tmp.path());
    loader.load_all().unwrap_err().code()
}

// =============================================================================
// Load Tests
// =============================================================================

/// A declared schema validates like a built one.
#[test]
fn test_loaded_schema_validates() {
    let tmp = TempDir::new().unwrap();
    write_schema(
        &tmp,
        "posts.json",
        json!({
            "name": "posts",
            "fields": [
                {"path": "title", "type": "string", "required": true, "pattern": "[^\\n]{1,80}"},
                {"path": "author", "type": "bson.ObjectId", "default_from_arg": "user_id",
                 "rights": ["user", "unauthenticated", "none"]},
                {"path": "stats.views", "type": "float64", "boundaries": {"min": 0, "max": 1e9},
                 "default": 0}
            ]
        }),
    );

    let mut loader = SchemaLoader::new(tmp.path());
    loader.load_all().unwrap();
    let schema = loader.require("posts").unwrap();

    let options = Options::new(Usage::Init, Role::User).with_args(json!({"user_id": "507f1f77bcf86cd799439011"}));
    let result = validate(schema, &json!({"title": "Hello"}), &options);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    assert_eq!(
        result.document,
        json!({"title": "Hello", "author": "507f1f77bcf86cd799439011", "stats": {"views": 0}})
    );

    let update = validate(
        schema,
        &json!({"author": "507f1f77bcf86cd799439011"}),
        &Options::new(Usage::Set, Role::Admin),
    );
    assert_eq!(update.errors[0].kind, ValidationErrorKind::InsufficientRights);
}

/// Files load in name order and only `.json` files are read.
#[test]
fn test_load_all_reads_json_only() {
    let tmp = TempDir::new().unwrap();
    write_schema(&tmp, "b.json", json!({"name": "beta", "fields": []}));
    write_schema(&tmp, "a.json", json!({"name": "alpha", "fields": []}));
    fs::write(tmp.path().join("notes.txt"), "ignored").unwrap();

    let mut loader = SchemaLoader::new(tmp.path());
    loader.load_all().unwrap();

    assert_eq!(loader.names(), vec!["alpha", "beta"]);
    assert!(loader.get("notes").is_none());
}

/// A missing schema directory fails the load.
#[test]
fn test_missing_directory() {
    let tmp = TempDir::new().unwrap();
    let mut loader = SchemaLoader::new(&tmp.path().join("absent"));
    assert_eq!(loader.load_all().unwrap_err().code(), SchemaErrorCode::MalformedSchemaFile);
}

// =============================================================================
// Construction Defect Tests
// =============================================================================

/// Every construction defect is fatal and carries its own code.
#[test]
fn test_construction_defects() {
    let cases = [
        (json!({"path": "a..b", "type": "string"}), SchemaErrorCode::MalformedPath),
        (json!({"path": "a", "type": "string", "pattern": "("}), SchemaErrorCode::InvalidPattern),
        (json!({"path": "a", "type": "int"}), SchemaErrorCode::InvalidTypeDescriptor),
        (
            json!({"path": "a", "type": "number", "boundaries": {"min": 5, "max": 1}}),
            SchemaErrorCode::InvalidBoundaries,
        ),
        (
            json!({"path": "a", "type": "[]number", "boundaries": {"min": 0, "max": 1}}),
            SchemaErrorCode::InvalidBoundaries,
        ),
        (
            json!({"path": "a", "type": "string", "default": "x", "default_from_arg": "y"}),
            SchemaErrorCode::MalformedSchemaFile,
        ),
    ];

    for (field, code) in cases {
        assert_eq!(load_error(json!({"name": "s", "fields": [field]})), code);
    }

    let duplicate = json!({"name": "s", "fields": [
        {"path": "a", "type": "string"},
        {"path": "a", "type": "number"}
    ]});
    assert_eq!(load_error(duplicate), SchemaErrorCode::DuplicateField);
    assert_eq!(load_error(json!({"fields": []})), SchemaErrorCode::MalformedSchemaFile);
}

/// Two files naming the same schema cannot both load.
#[test]
fn test_schema_name_registered_once() {
    let tmp = TempDir::new().unwrap();
    write_schema(&tmp, "one.json", json!({"name": "users", "fields": []}));
    write_schema(&tmp, "two.json", json!({"name": "users", "fields": []}));

    let mut loader = SchemaLoader::new(tmp.path());
    let err = loader.load_all().unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::SchemaImmutable);
    assert!(!err.is_fatal());
}

/// A serialized declaration loads back into an equivalent schema.
#[test]
fn test_serialized_decl_loads() {
    let tmp = TempDir::new().unwrap();
    let decl = SchemaDecl {
        name: "tags".to_string(),
        fields: vec![FieldDecl {
            path: "labels".to_string(),
            type_descriptor: "[]string".to_string(),
            pattern: None,
            boundaries: None,
            rights: RequiredRights::new(Role::User, Role::Unauthenticated, Role::Owner),
            required: true,
            default: None,
            default_from_arg: None,
        }],
    };

    fs::write(tmp.path().join("tags.json"), serde_json::to_string_pretty(&decl).unwrap()).unwrap();

    let mut reloaded = SchemaLoader::new(tmp.path());
    reloaded.load_all().unwrap();
    let rule = reloaded.require("tags").unwrap().rule("labels").unwrap();
    assert!(rule.is_required());
    assert_eq!(rule.descriptor().to_string(), "[]string");
    assert_eq!(rule.rights().set, Role::Owner);
}
