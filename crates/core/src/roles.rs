//! Actor roles and the authenticated actor identity.
//!
//! Roles arrive as strings from the session layer and are parsed into the
//! closed [`Role`] enum at that boundary; nothing past it handles raw role
//! names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_USER: &str = "user";

/// All valid role names.
pub const VALID_ROLES: &[&str] = &[ROLE_MANAGER, ROLE_USER];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Sees and mutates every project.
    Manager,
    /// Sees and mutates only projects it created.
    User,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Manager => ROLE_MANAGER,
            Role::User => ROLE_USER,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid role '{0}'. Must be one of: manager, user")]
pub struct InvalidRole(pub String);

impl FromStr for Role {
    type Err = InvalidRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_MANAGER => Ok(Role::Manager),
            ROLE_USER => Ok(Role::User),
            other => Err(InvalidRole(other.to_string())),
        }
    }
}

/// The authenticated identity performing an operation.
///
/// `email` is the ownership key matched against `Project::created_by`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub email: String,
    pub role: Role,
}

impl Actor {
    pub fn new(email: impl Into<String>, role: Role) -> Self {
        Self {
            email: email.into(),
            role,
        }
    }

    pub fn manager(email: impl Into<String>) -> Self {
        Self::new(email, Role::Manager)
    }

    pub fn user(email: impl Into<String>) -> Self {
        Self::new(email, Role::User)
    }

    pub fn is_manager(&self) -> bool {
        self.role == Role::Manager
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_roles() {
        assert_eq!("manager".parse::<Role>(), Ok(Role::Manager));
        assert_eq!("user".parse::<Role>(), Ok(Role::User));
    }

    #[test]
    fn rejects_unknown_and_differently_cased_roles() {
        assert!("admin".parse::<Role>().is_err());
        assert!("Manager".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for name in VALID_ROLES {
            let role: Role = name.parse().unwrap();
            assert_eq!(role.to_string(), *name);
        }
    }
}
