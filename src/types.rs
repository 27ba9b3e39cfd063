/// Shared types used across the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse-grained permission category stored on every user record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Publisher,
    Admin,
}

/// Roles allowed to create and manage bootcamps
pub const PUBLISHER_ROLES: &[Role] = &[Role::Publisher, Role::Admin];

/// Roles allowed to manage user accounts
pub const ADMIN_ROLES: &[Role] = &[Role::Admin];

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Publisher => "publisher",
            Role::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Roles a caller may pick for themselves at registration
    pub fn is_self_assignable(&self) -> bool {
        !self.is_admin()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "publisher" => Ok(Role::Publisher),
            "admin" => Ok(Role::Admin),
            other => Err(format!("Unknown role '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_stored_role_names() {
        assert_eq!("publisher".parse::<Role>().unwrap(), Role::Publisher);
        assert_eq!(Role::Admin.to_string(), "admin");
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_value(Role::Publisher).unwrap(), "publisher");
        let role: Role = serde_json::from_value(serde_json::json!("user")).unwrap();
        assert_eq!(role, Role::User);
    }

    #[test]
    fn admin_is_not_self_assignable() {
        assert!(Role::User.is_self_assignable());
        assert!(Role::Publisher.is_self_assignable());
        assert!(!Role::Admin.is_self_assignable());
    }
}
