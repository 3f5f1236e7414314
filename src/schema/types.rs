//! Type descriptors
//!
//! Grammar:
//!
//! ```text
//! descriptor := scalar | "[]" descriptor | "map[" keykind "]" descriptor
//! scalar     := "string" | "number" | "bool" | "ObjectId"
//! keykind    := "string" | "ObjectId"
//! ```
//!
//! Descriptors are parsed once, when the rule is built. The legacy names
//! `float64`, `json.Number`, `boolean` and `bson.ObjectId` are accepted as
//! aliases and render back in canonical form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::errors::SchemaError;

/// Scalar types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// UTF-8 string
    String,
    /// Any JSON number
    Number,
    /// Boolean
    Bool,
    /// 24 hex digit object identifier carried as a string
    ObjectId,
}

impl ScalarType {
    /// Returns the canonical type name
    pub fn type_name(&self) -> &'static str {
        match self {
            ScalarType::String => "string",
            ScalarType::Number => "number",
            ScalarType::Bool => "bool",
            ScalarType::ObjectId => "ObjectId",
        }
    }

    fn parse(name: &str) -> Option<Self> {
        match name {
            "string" => Some(ScalarType::String),
            "number" | "float64" | "json.Number" => Some(ScalarType::Number),
            "bool" | "boolean" => Some(ScalarType::Bool),
            "ObjectId" | "bson.ObjectId" => Some(ScalarType::ObjectId),
            _ => None,
        }
    }
}

/// Constraint on mapping keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    /// Any string key
    String,
    /// Every key must be an identifier
    ObjectId,
}

impl KeyKind {
    /// Returns the canonical key kind name
    pub fn type_name(&self) -> &'static str {
        match self {
            KeyKind::String => "string",
            KeyKind::ObjectId => "ObjectId",
        }
    }
}

/// Parsed type descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    /// A single scalar
    Scalar(ScalarType),
    /// Homogeneous sequence
    Sequence(Box<TypeDescriptor>),
    /// Mapping whose values share one descriptor
    Mapping(KeyKind, Box<TypeDescriptor>),
}

impl TypeDescriptor {
    /// Shorthand for a scalar descriptor
    pub fn scalar(scalar: ScalarType) -> Self {
        TypeDescriptor::Scalar(scalar)
    }

    /// Shorthand for `[]element`
    pub fn sequence_of(element: TypeDescriptor) -> Self {
        TypeDescriptor::Sequence(Box::new(element))
    }

    /// Shorthand for `map[key]value`
    pub fn mapping_of(key: KeyKind, value: TypeDescriptor) -> Self {
        TypeDescriptor::Mapping(key, Box::new(value))
    }

    /// Returns true if numeric boundaries can apply to this descriptor
    pub fn is_numeric(&self) -> bool {
        matches!(self, TypeDescriptor::Scalar(ScalarType::Number))
    }

    fn parse_with(text: &str, original: &str) -> Result<Self, SchemaError> {
        if let Some(rest) = text.strip_prefix("[]") {
            return Ok(Self::sequence_of(Self::parse_with(rest, original)?));
        }

        if let Some(rest) = text.strip_prefix("map[") {
            let (key, value) = rest
                .split_once(']')
                .ok_or_else(|| SchemaError::invalid_type(original, "unterminated map key"))?;
            let key = match ScalarType::parse(key) {
                Some(ScalarType::String) => KeyKind::String,
                Some(ScalarType::ObjectId) => KeyKind::ObjectId,
                _ => {
                    return Err(SchemaError::invalid_type(
                        original,
                        format!("unsupported map key kind '{}'", key),
                    ))
                }
            };
            return Ok(Self::mapping_of(key, Self::parse_with(value, original)?));
        }

        if text.is_empty() {
            return Err(SchemaError::invalid_type(original, "missing element type"));
        }

        ScalarType::parse(text)
            .map(TypeDescriptor::Scalar)
            .ok_or_else(|| SchemaError::invalid_type(original, format!("unknown type '{}'", text)))
    }
}

impl FromStr for TypeDescriptor {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_with(s.trim(), s)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Scalar(scalar) => write!(f, "{}", scalar.type_name()),
            TypeDescriptor::Sequence(element) => write!(f, "[]{}", element),
            TypeDescriptor::Mapping(key, value) => write!(f, "map[{}]{}", key.type_name(), value),
        }
    }
}

impl Serialize for TypeDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TypeDescriptor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(|e: SchemaError| serde::de::Error::custom(e.message().to_string()))
    }
}
