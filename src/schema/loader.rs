//! Schema loader for declarative schema files
//!
//! - One JSON file per schema, `<schema_dir>/<name>.json`
//! - Files are loaded once at startup; a malformed file fails the load
//! - Registered schemas are immutable: a name can be registered only once
//!
//! Custom checks cannot be declared in a file; attach them programmatically
//! with `FieldRule::builder` and `SchemaLoader::register`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{SchemaError, SchemaResult};
use super::rule::{Boundaries, DefaultProvider, FieldRule};
use super::Schema;
use crate::access::RequiredRights;

/// Declaration of one field in a schema file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    /// Dot-separated field path
    pub path: String,
    /// Type descriptor text
    #[serde(rename = "type")]
    pub type_descriptor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundaries: Option<Boundaries>,
    /// `[init, get, set]`
    #[serde(default)]
    pub rights: RequiredRights,
    #[serde(default)]
    pub required: bool,
    /// Constant default applied on Init
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Default read from this key of the external args on Init
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_from_arg: Option<String>,
}

impl FieldDecl {
    /// Builds the rule this declaration describes
    pub fn to_rule(&self) -> SchemaResult<FieldRule> {
        let mut builder = FieldRule::builder(&self.path, &self.type_descriptor)
            .rights(self.rights)
            .required(self.required);

        if let Some(pattern) = &self.pattern {
            builder = builder.pattern(pattern);
        }
        if let Some(b) = self.boundaries {
            builder = builder.boundaries(b.min, b.max);
        }

        match (&self.default, &self.default_from_arg) {
            (Some(_), Some(_)) => {
                return Err(SchemaError::malformed_schema(
                    &self.path,
                    "'default' and 'default_from_arg' are mutually exclusive",
                )
                .for_field(&self.path))
            }
            (Some(value), None) => builder = builder.default_value(value.clone()),
            (None, Some(key)) => builder = builder.default_with(DefaultProvider::from_arg(key)),
            (None, None) => {}
        }

        builder.build()
    }
}

/// A schema file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDecl {
    /// Schema name used to look it up
    pub name: String,
    pub fields: Vec<FieldDecl>,
}

impl SchemaDecl {
    /// Builds the immutable schema
    pub fn build(&self) -> SchemaResult<Schema> {
        let rules = self
            .fields
            .iter()
            .map(FieldDecl::to_rule)
            .collect::<SchemaResult<Vec<_>>>()?;
        Schema::new(rules)
    }
}

/// Reads schema files from disk and keeps the built schemas by name.
#[derive(Debug)]
pub struct SchemaLoader {
    schema_dir: PathBuf,
    schemas: HashMap<String, Schema>,
}

impl SchemaLoader {
    /// Creates a loader reading from `schema_dir`.
    pub fn new(schema_dir: &Path) -> Self {
        Self {
            schema_dir: schema_dir.to_path_buf(),
            schemas: HashMap::new(),
        }
    }

    /// Returns the schema directory path.
    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Loads every `*.json` file in the schema directory.
    ///
    /// A missing directory is an error; an empty one loads nothing.
    pub fn load_all(&mut self) -> SchemaResult<()> {
        let entries = fs::read_dir(&self.schema_dir).map_err(|e| {
            SchemaError::malformed_schema(
                self.schema_dir.display().to_string(),
                format!("Failed to read schema directory: {}", e),
            )
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                SchemaError::malformed_schema(
                    self.schema_dir.display().to_string(),
                    format!("Failed to read directory entry: {}", e),
                )
            })?;
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in paths {
            self.load_schema_file(&path)?;
        }

        Ok(())
    }

    /// Loads a single schema file.
    pub fn load_schema_file(&mut self, path: &Path) -> SchemaResult<()> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::malformed_schema(path.display().to_string(), format!("Failed to read file: {}", e))
        })?;

        let decl: SchemaDecl = serde_json::from_str(&content).map_err(|e| {
            SchemaError::malformed_schema(path.display().to_string(), format!("Invalid JSON: {}", e))
        })?;

        let schema = decl.build()?;
        self.register(&decl.name, schema)
    }

    /// Registers a built schema under `name`.
    pub fn register(&mut self, name: &str, schema: Schema) -> SchemaResult<()> {
        if self.schemas.contains_key(name) {
            return Err(SchemaError::schema_immutable(name));
        }
        self.schemas.insert(name.to_string(), schema);
        Ok(())
    }

    /// Gets a schema by name.
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    /// Gets a schema by name or fails with `FG_UNKNOWN_SCHEMA`.
    pub fn require(&self, name: &str) -> SchemaResult<&Schema> {
        self.get(name).ok_or_else(|| SchemaError::unknown_schema(name))
    }

    /// Returns the registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of loaded schemas.
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }
}
