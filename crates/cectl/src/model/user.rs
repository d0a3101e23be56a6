//! Account user payloads.

use serde::{Deserialize, Serialize};

use super::nullable;

/// A user of the account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    /// User ID.
    #[serde(deserialize_with = "nullable")]
    pub id: i64,
    /// Creation timestamp.
    #[serde(deserialize_with = "nullable")]
    pub created_date: String,
    /// Last login timestamp.
    #[serde(deserialize_with = "nullable")]
    pub last_login_date: String,
    /// Full name.
    #[serde(deserialize_with = "nullable")]
    pub full_name: String,
    /// First name.
    #[serde(deserialize_with = "nullable")]
    pub first_name: String,
    /// Last name.
    #[serde(deserialize_with = "nullable")]
    pub last_name: String,
    /// Email address.
    #[serde(deserialize_with = "nullable")]
    pub email: String,
    /// Whether the user is active.
    #[serde(deserialize_with = "nullable")]
    pub active: bool,
    /// Roles; filled by a separate lookup.
    #[serde(deserialize_with = "nullable")]
    pub roles: Vec<Role>,
}

impl User {
    /// Role keys joined with commas.
    pub fn role_keys(&self) -> String {
        self.roles
            .iter()
            .map(|r| r.key.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// A role assigned to a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Role {
    /// Role ID.
    #[serde(deserialize_with = "nullable")]
    pub id: i64,
    /// Role key, e.g. `admin`.
    #[serde(deserialize_with = "nullable")]
    pub key: String,
    /// Display name.
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    /// Free-form description.
    #[serde(deserialize_with = "nullable")]
    pub description: String,
    /// Whether the role is active.
    #[serde(deserialize_with = "nullable")]
    pub active: bool,
}
