//! # Field Access Control
//!
//! Role-based access to individual fields, per usage mode.
//!
//! ## Invariants
//! - Roles are totally ordered: Unauthenticated < User < Owner < Admin < None
//! - A caller passes iff its role is at least the required role
//! - `None` is never held by a caller in practice; requiring it disables
//!   the usage mode for the field

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Caller authorization level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Anonymous caller
    Unauthenticated,
    /// Any authenticated user
    User,
    /// Owner of the document
    Owner,
    /// Administrator
    Admin,
    /// Unattainable threshold
    None,
}

impl Role {
    /// All roles in ascending order
    pub const ALL: [Role; 5] = [
        Role::Unauthenticated,
        Role::User,
        Role::Owner,
        Role::Admin,
        Role::None,
    ];

    /// Returns the lowercase role name
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Unauthenticated => "unauthenticated",
            Role::User => "user",
            Role::Owner => "owner",
            Role::Admin => "admin",
            Role::None => "none",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| format!("unknown role '{}'", s))
    }
}

/// Operation context a document is validated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Usage {
    /// Document creation
    Init,
    /// Read / projection
    Get,
    /// Partial update
    Set,
}

impl Usage {
    /// Returns the lowercase usage name
    pub fn as_str(&self) -> &'static str {
        match self {
            Usage::Init => "init",
            Usage::Get => "get",
            Usage::Set => "set",
        }
    }
}

impl fmt::Display for Usage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Usage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "init" => Ok(Usage::Init),
            "get" => Ok(Usage::Get),
            "set" => Ok(Usage::Set),
            other => Err(format!("unknown usage '{}'", other)),
        }
    }
}

/// Minimum role per usage mode for one field.
///
/// Serializes as `[init, get, set]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[Role; 3]", into = "[Role; 3]")]
pub struct RequiredRights {
    pub init: Role,
    pub get: Role,
    pub set: Role,
}

impl RequiredRights {
    /// Create rights from the three slots
    pub fn new(init: Role, get: Role, set: Role) -> Self {
        Self { init, get, set }
    }

    /// Same role for every usage
    pub fn uniform(role: Role) -> Self {
        Self::new(role, role, role)
    }

    /// Returns the role required for the given usage
    pub fn for_usage(&self, usage: Usage) -> Role {
        match usage {
            Usage::Init => self.init,
            Usage::Get => self.get,
            Usage::Set => self.set,
        }
    }

    /// Returns whether `caller` may act on the field for `usage`
    pub fn allows(&self, usage: Usage, caller: Role) -> bool {
        check_rights(self.for_usage(usage), caller)
    }
}

impl Default for RequiredRights {
    fn default() -> Self {
        Self::uniform(Role::Unauthenticated)
    }
}

impl From<[Role; 3]> for RequiredRights {
    fn from(slots: [Role; 3]) -> Self {
        Self::new(slots[0], slots[1], slots[2])
    }
}

impl From<RequiredRights> for [Role; 3] {
    fn from(rights: RequiredRights) -> Self {
        [rights.init, rights.get, rights.set]
    }
}

/// Returns true iff `caller` is at least `required`.
pub fn check_rights(required: Role, caller: Role) -> bool {
    caller >= required
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_ordering() {
        assert!(Role::Unauthenticated < Role::User);
        assert!(Role::User < Role::Owner);
        assert!(Role::Owner < Role::Admin);
        assert!(Role::Admin < Role::None);
    }

    #[test]
    fn test_check_rights_polarity() {
        assert!(check_rights(Role::User, Role::User));
        assert!(check_rights(Role::User, Role::Admin));
        assert!(!check_rights(Role::Owner, Role::User));
        assert!(!check_rights(Role::None, Role::Admin));
    }

    #[test]
    fn test_role_monotonicity() {
        for required in Role::ALL {
            for low in Role::ALL {
                for high in Role::ALL.into_iter().filter(|r| *r >= low) {
                    if check_rights(required, low) {
                        assert!(check_rights(required, high), "{} >= {} must pass {}", high, low, required);
                    }
                }
            }
        }
    }

    #[test]
    fn test_rights_per_usage() {
        let rights = RequiredRights::new(Role::Admin, Role::User, Role::Owner);
        assert_eq!(rights.for_usage(Usage::Init), Role::Admin);
        assert_eq!(rights.for_usage(Usage::Get), Role::User);
        assert_eq!(rights.for_usage(Usage::Set), Role::Owner);
        assert!(rights.allows(Usage::Get, Role::User));
        assert!(!rights.allows(Usage::Init, Role::Owner));
    }

    #[test]
    fn test_rights_serde_as_triple() {
        let rights: RequiredRights = serde_json::from_str(r#"["admin","user","none"]"#).unwrap();
        assert_eq!(rights, RequiredRights::new(Role::Admin, Role::User, Role::None));
        assert_eq!(serde_json::to_string(&rights).unwrap(), r#"["admin","user","none"]"#);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("owner".parse::<Role>().unwrap(), Role::Owner);
        assert!("root".parse::<Role>().is_err());
        assert_eq!("set".parse::<Usage>().unwrap(), Usage::Set);
        assert!("delete".parse::<Usage>().is_err());
    }
}
