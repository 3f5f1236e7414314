//! Per-call validation options

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::access::{Role, Usage};

/// Secondary parameters of a validation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Options {
    /// Init, Get or Set
    pub usage: Usage,
    /// Role of the caller
    pub role: Role,
    /// Opaque value handed to default providers
    #[serde(default)]
    pub args: Value,
}

impl Options {
    pub fn new(usage: Usage, role: Role) -> Self {
        Self {
            usage,
            role,
            args: Value::Null,
        }
    }

    /// Set the args passed to default providers
    pub fn with_args(mut self, args: Value) -> Self {
        self.args = args;
        self
    }
}
