//! Transformation payloads.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::element::Element;
use super::nullable;
use super::resource::Field;

/// Transformations keyed by resource name, as listed by the platform.
pub type Transformations = BTreeMap<String, Transformation>;

/// A mapping from a vendor object onto a common resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Transformation {
    /// Vendor-side object name.
    #[serde(deserialize_with = "nullable")]
    pub vendor_name: String,
    /// Definition level.
    #[serde(deserialize_with = "nullable")]
    pub level: String,
    /// Mapped fields.
    #[serde(deserialize_with = "nullable")]
    pub fields: Vec<Field>,
    /// Transformation configuration.
    #[serde(deserialize_with = "nullable")]
    pub configuration: Vec<Value>,
    /// Whether this is a legacy transformation.
    #[serde(deserialize_with = "nullable")]
    pub is_legacy: bool,
    /// Start date.
    #[serde(deserialize_with = "nullable")]
    pub start_date: String,
    /// Optional JavaScript body.
    #[serde(deserialize_with = "nullable")]
    pub script: Script,
    /// Common resource name; only present on import files.
    #[serde(skip_serializing_if = "String::is_empty")]
    #[serde(deserialize_with = "nullable")]
    pub object_name: String,
}

impl Transformation {
    /// Whether a non-empty script is attached.
    pub fn has_script(&self) -> bool {
        !self.script.body.is_empty()
    }
}

/// Transformation script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Script {
    /// JavaScript source.
    #[serde(deserialize_with = "nullable")]
    pub body: String,
}

/// An element associated with a transformation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountElement {
    /// The associated element.
    #[serde(deserialize_with = "nullable")]
    pub element: Element,
}
