//! Common resource (canonical object) payloads.

use serde::{Deserialize, Serialize};

use super::nullable;

use crate::output::bracketed;

/// A canonical data model shared across elements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommonResource {
    /// Object name.
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    /// Element instances mapped to this object.
    #[serde(deserialize_with = "nullable")]
    pub element_instance_ids: Vec<i64>,
    /// Definition level, e.g. `organization`.
    #[serde(deserialize_with = "nullable")]
    pub level: String,
    /// Fields of the object.
    #[serde(deserialize_with = "nullable")]
    pub fields: Vec<Field>,
}

impl CommonResource {
    /// `count [ids]` summary of mapped instances.
    pub fn mapped_summary(&self) -> String {
        let ids: Vec<String> = self
            .element_instance_ids
            .iter()
            .map(ToString::to_string)
            .collect();
        format!("{} {}", ids.len(), bracketed(&ids))
    }

    /// `[paths]` summary of the fields.
    pub fn field_paths(&self) -> String {
        let paths: Vec<&str> = self.fields.iter().map(|f| f.path.as_str()).collect();
        bracketed(&paths)
    }
}

/// A field of a common resource or transformation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Field {
    /// Field type, e.g. `string`.
    #[serde(rename = "type")]
    #[serde(deserialize_with = "nullable")]
    pub kind: String,
    /// Field path.
    #[serde(deserialize_with = "nullable")]
    pub path: String,
    /// Level the field is defined on.
    #[serde(skip_serializing_if = "String::is_empty")]
    #[serde(deserialize_with = "nullable")]
    pub associated_level: String,
    /// ID of the owner at that level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub associated_id: Option<i64>,
}
