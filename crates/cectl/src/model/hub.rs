//! Hub payloads.

use serde::{Deserialize, Serialize};

use super::nullable;

/// A category of elements, e.g. `crm`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Hub {
    /// Hub ID.
    #[serde(deserialize_with = "nullable")]
    pub id: i64,
    /// Display name.
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    /// Hub key.
    #[serde(deserialize_with = "nullable")]
    pub key: String,
    /// Description.
    #[serde(deserialize_with = "nullable")]
    pub description: String,
    /// Whether the hub is active.
    #[serde(deserialize_with = "nullable")]
    pub active: bool,
    /// Promotional video link.
    #[serde(deserialize_with = "nullable")]
    pub video_link: String,
}
