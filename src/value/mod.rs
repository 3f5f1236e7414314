//! Dynamic document values
//!
//! Documents arrive already decoded as a tree of mappings, sequences and
//! scalars. The tree is `serde_json::Value`; this module adds the runtime
//! kind used for type diagnostics and the identifier lexical check.

use std::fmt;

use serde_json::Value;

/// A decoded, dynamically shaped document value.
pub type DynamicValue = Value;

/// Length of the canonical hexadecimal identifier form.
pub const OBJECT_ID_HEX_LEN: usize = 24;

/// Runtime kind of a dynamic value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Sequence,
    Mapping,
}

impl ValueKind {
    /// Returns the kind of the given value
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Sequence,
            Value::Object(_) => ValueKind::Mapping,
        }
    }

    /// Returns the kind name used in error values
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Sequence => "sequence",
            ValueKind::Mapping => "mapping",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Returns true if `s` has the identifier's canonical form: 24 hex digits.
///
/// Both cases are accepted, matching how identifiers decode from hex.
pub fn is_object_id_hex(s: &str) -> bool {
    s.len() == OBJECT_ID_HEX_LEN && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Returns true if the value counts as absent: null or an empty sequence.
pub fn is_absent(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
