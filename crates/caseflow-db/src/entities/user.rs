//! User entity and roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Caller role. Admins implicitly hold user permissions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    /// Anything that is not `admin` is a plain user.
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("admin") {
            Role::Admin
        } else {
            Role::User
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// A registered caller. The first registered user is bootstrapped as
/// `admin`; later self-registrations default to `user`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,

    pub username: String,

    /// Argon2 hash; never serialized into responses.
    #[serde(skip_serializing)]
    pub hashed_password: String,

    pub role: String,

    pub tmstamp: DateTime<Utc>,

    /// Who created this account ("system" for self-registration).
    pub usrid: String,
}

impl User {
    pub fn get_role(&self) -> Role {
        Role::parse(&self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("admin"), Role::Admin);
        assert_eq!(Role::parse("Admin"), Role::Admin);
        assert_eq!(Role::parse("user"), Role::User);
        assert_eq!(Role::parse("operator"), Role::User);
    }

    #[test]
    fn test_admin_implies_user() {
        assert!(Role::Admin.is_admin());
        assert!(!Role::User.is_admin());
    }
}
