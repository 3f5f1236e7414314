//! Dot-separated field paths
//!
//! A path such as `profile.address.city` addresses a nested field.
//! Segments descend mappings by key and sequences by decimal index.
//!
//! Paths are parsed once when a schema is built. Reads never fail: anything
//! that cannot be followed is simply not found. Writes create intermediate
//! mappings and fail only when an intermediate value cannot hold a child.

use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

/// Path accessor errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The path text is empty
    #[error("Malformed path: path is empty")]
    Empty,

    /// A segment between dots is empty
    #[error("Malformed path '{path}': empty segment at position {position}")]
    EmptySegment { path: String, position: usize },

    /// A write met a value that cannot contain the next segment
    #[error("Malformed path '{path}': cannot descend into {found} at segment '{segment}'")]
    NotAContainer {
        path: String,
        segment: String,
        found: &'static str,
    },

    /// A write addressed a sequence index that does not exist
    #[error("Malformed path '{path}': index {index} out of range")]
    IndexOutOfRange { path: String, index: usize },
}

/// Result type for path operations
pub type PathResult<T> = Result<T, PathError>;

/// A parsed, non-empty dot-separated path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    raw: String,
    segments: Vec<String>,
}

impl FieldPath {
    /// Parses a dot-separated path
    pub fn parse(path: &str) -> PathResult<Self> {
        if path.is_empty() {
            return Err(PathError::Empty);
        }

        let mut segments = Vec::new();
        for (position, segment) in path.split('.').enumerate() {
            if segment.is_empty() {
                return Err(PathError::EmptySegment {
                    path: path.to_string(),
                    position,
                });
            }
            segments.push(segment.to_string());
        }

        Ok(Self {
            raw: path.to_string(),
            segments,
        })
    }

    /// Returns the original dot-separated text
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the path segments
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Reads the value at `path`, or `None` if it cannot be reached.
pub fn read<'a>(document: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    let mut current = document;
    for segment in path.segments() {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Writes `value` at `path`, creating intermediate mappings as needed.
///
/// A null intermediate is replaced by a mapping. The root must be a
/// mapping or null.
pub fn write(document: &mut Value, path: &FieldPath, value: Value) -> PathResult<()> {
    let (last, parents) = match path.segments().split_last() {
        Some(split) => split,
        None => return Err(PathError::Empty),
    };

    let mut current = document;
    for segment in parents {
        current = child_mut(current, path, segment)?;
    }

    if current.is_null() {
        *current = Value::Object(Map::new());
    }

    match current {
        Value::Object(map) => {
            map.insert(last.clone(), value);
            Ok(())
        }
        Value::Array(items) => {
            let index = parse_index(path, last, "sequence")?;
            match items.get_mut(index) {
                Some(slot) => {
                    *slot = value;
                    Ok(())
                }
                None => Err(PathError::IndexOutOfRange {
                    path: path.to_string(),
                    index,
                }),
            }
        }
        other => Err(PathError::NotAContainer {
            path: path.to_string(),
            segment: last.clone(),
            found: crate::value::ValueKind::of(other).name(),
        }),
    }
}

/// Writes `value` under the literal root key `key`, dots included.
///
/// Partial updates address nested fields by their full dot path as a single
/// top-level key, leaving the rest of the stored document untouched.
pub fn write_flat(document: &mut Value, key: &str, value: Value) -> PathResult<()> {
    if document.is_null() {
        *document = Value::Object(Map::new());
    }

    match document {
        Value::Object(map) => {
            map.insert(key.to_string(), value);
            Ok(())
        }
        other => Err(PathError::NotAContainer {
            path: key.to_string(),
            segment: key.to_string(),
            found: crate::value::ValueKind::of(other).name(),
        }),
    }
}

/// Descends one segment for writing, creating a mapping if nothing is there.
fn child_mut<'a>(current: &'a mut Value, path: &FieldPath, segment: &str) -> PathResult<&'a mut Value> {
    if current.is_null() {
        *current = Value::Object(Map::new());
    }

    match current {
        Value::Object(map) => {
            let child = map
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if child.is_null() {
                *child = Value::Object(Map::new());
            }
            Ok(child)
        }
        Value::Array(items) => {
            let index = parse_index(path, segment, "sequence")?;
            items.get_mut(index).ok_or_else(|| PathError::IndexOutOfRange {
                path: path.to_string(),
                index,
            })
        }
        other => Err(PathError::NotAContainer {
            path: path.to_string(),
            segment: segment.to_string(),
            found: crate::value::ValueKind::of(other).name(),
        }),
    }
}

fn parse_index(path: &FieldPath, segment: &str, found: &'static str) -> PathResult<usize> {
    segment.parse::<usize>().map_err(|_| PathError::NotAContainer {
        path: path.to_string(),
        segment: segment.to_string(),
        found,
    })
}
