// SPDX-License-Identifier: MIT

//! Profile/role record keyed by the principal's id.

use crate::models::role::{self, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Row in the `profiles` table. One record per principal; the id is the
/// identity provider's user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub full_name: Option<String>,
    /// Unknown or null role columns resolve to `client`.
    #[serde(default, deserialize_with = "role::deserialize_lenient")]
    pub role: Role,
    pub created_at: Option<DateTime<Utc>>,
}

/// Insert payload for a new profile row, created at sign-up.
#[derive(Debug, Clone, Serialize)]
pub struct NewProfile {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_role_column_becomes_client() {
        let profile: Profile = serde_json::from_value(serde_json::json!({
            "id": "8f7b9a1e-1111-4222-8333-444455556666",
            "full_name": "Ana",
            "role": "moderator",
            "created_at": null,
        }))
        .unwrap();
        assert_eq!(profile.role, Role::Client);
    }

    #[test]
    fn missing_role_column_becomes_client() {
        let profile: Profile = serde_json::from_value(serde_json::json!({
            "id": "8f7b9a1e-1111-4222-8333-444455556666",
            "full_name": null,
            "created_at": null,
        }))
        .unwrap();
        assert_eq!(profile.role, Role::Client);
    }
}
