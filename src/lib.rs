//! fieldguard - schema-driven document validation
//!
//! A schema is a list of field rules. Validating a document against it
//! checks each field's type, value and access rights for one usage (Init,
//! Get or Set), fills in defaults on Init and returns a sanitized document
//! holding only the fields that passed, together with one error per
//! rejected field.

pub mod access;
pub mod cli;
pub mod observability;
pub mod path;
pub mod schema;
pub mod validation;
pub mod value;

pub use access::{check_rights, RequiredRights, Role, Usage};
pub use schema::{FieldRule, Schema, SchemaError, SchemaLoader, TypeDescriptor};
pub use validation::{validate, Options, ValidationError, ValidationErrorKind, ValidationResult, Validator};
