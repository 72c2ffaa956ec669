// SPDX-License-Identifier: MIT

//! Access-role classification.
//!
//! Roles form a closed set; anything the backend hands us that is not a
//! known role resolves to `Client`, never to an implicit "no role".

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Access role for a principal. Stored as a lowercase string in the
/// `profiles` table and in provider user metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Operator,
    Client,
}

impl Role {
    /// Parse a role string strictly. Returns `None` for unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Role::Admin),
            "operator" => Some(Role::Operator),
            "client" => Some(Role::Client),
            _ => None,
        }
    }

    /// Map a value read off a provider object to a role.
    /// Missing or unknown values deterministically become `Client`.
    pub fn from_provider(value: Option<&str>) -> Self {
        value.and_then(Role::parse).unwrap_or(Role::Client)
    }

    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }

    pub fn is_admin_or_operator(self) -> bool {
        matches!(self, Role::Admin | Role::Operator)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Operator => "operator",
            Role::Client => "client",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Client
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lenient deserializer for role columns: null or unknown strings map to
/// `Client` instead of failing the whole row.
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Role, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(Role::from_provider(raw.as_deref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_roles() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("operator"), Some(Role::Operator));
        assert_eq!(Role::parse("client"), Some(Role::Client));
        assert_eq!(Role::parse("superuser"), None);
        assert_eq!(Role::parse("Admin"), None);
    }

    #[test]
    fn provider_values_default_to_client() {
        assert_eq!(Role::from_provider(None), Role::Client);
        assert_eq!(Role::from_provider(Some("")), Role::Client);
        assert_eq!(Role::from_provider(Some("root")), Role::Client);
        assert_eq!(Role::from_provider(Some("operator")), Role::Operator);
    }

    #[test]
    fn derived_accessors() {
        assert!(Role::Admin.is_admin());
        assert!(Role::Admin.is_admin_or_operator());
        assert!(!Role::Operator.is_admin());
        assert!(Role::Operator.is_admin_or_operator());
        assert!(!Role::Client.is_admin());
        assert!(!Role::Client.is_admin_or_operator());
    }

    #[test]
    fn serde_round_trip() {
        let json = serde_json::to_string(&Role::Operator).unwrap();
        assert_eq!(json, "\"operator\"");
        let back: Role = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Role::Operator);
    }
}
