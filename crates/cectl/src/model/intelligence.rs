//! Element intelligence metadata.

use serde::{Deserialize, Serialize};

use super::nullable;

use crate::output::bracketed;

/// Capability and usage metadata for an element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementMetadata {
    /// Element ID.
    #[serde(deserialize_with = "nullable")]
    pub id: i64,
    /// Element key.
    #[serde(deserialize_with = "nullable")]
    pub key: String,
    /// Element name.
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    /// Hub key.
    #[serde(deserialize_with = "nullable")]
    pub hub: String,
    /// API style.
    #[serde(deserialize_with = "nullable")]
    pub api: ApiInfo,
    /// Supported authentication types.
    #[serde(deserialize_with = "nullable")]
    pub authentication_types: Vec<String>,
    /// Whether transformations are supported.
    #[serde(deserialize_with = "nullable")]
    pub transformations: bool,
    /// Whether the element is active.
    #[serde(deserialize_with = "nullable")]
    pub active: bool,
    /// Whether the element is in beta.
    #[serde(deserialize_with = "nullable")]
    pub beta: bool,
    /// Discovery capabilities.
    #[serde(deserialize_with = "nullable")]
    pub discovery: Discovery,
    /// Usage counters.
    #[serde(deserialize_with = "nullable")]
    pub usage: Usage,
}

impl ElementMetadata {
    /// Authentication types, e.g. `[oauth2 basic]`.
    pub fn authn(&self) -> String {
        bracketed(&self.authentication_types)
    }
}

/// API style of an element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiInfo {
    /// API style, e.g. `REST`.
    #[serde(rename = "type")]
    #[serde(deserialize_with = "nullable")]
    pub kind: String,
}

/// Discovery capabilities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Discovery {
    /// Whether object metadata is discovered from the vendor.
    #[serde(deserialize_with = "nullable")]
    pub native_object_metadata_discovery: bool,
    /// Whether objects are discovered from the vendor.
    #[serde(deserialize_with = "nullable")]
    pub native_object_discovery: bool,
}

/// Usage counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Usage {
    /// API calls made through the element.
    #[serde(deserialize_with = "nullable")]
    pub traffic: i64,
    /// Customers using the element.
    #[serde(deserialize_with = "nullable")]
    pub customer_count: i64,
    /// Instances of the element.
    #[serde(deserialize_with = "nullable")]
    pub instance_count: i64,
}
