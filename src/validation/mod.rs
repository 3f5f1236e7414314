//! Document validation
//!
//! Checks a decoded document against a `Schema` for one usage mode and
//! caller role, producing a sanitized output document and every field error.
//!
//! # Design Principles
//!
//! - Pure and synchronous: no I/O, no locks, fresh output per call
//! - Per field: type, then value, then rights; first failure wins
//! - Across fields: failures are independent and all collected
//! - Schema defects never surface here as field errors

mod errors;
mod options;
mod type_check;
mod validator;
mod value_check;

pub use errors::{ValidationError, ValidationErrorKind};
pub use options::Options;
pub use type_check::{check_type, conforms};
pub use validator::{validate, ValidationResult, Validator};
pub use value_check::check_value;
