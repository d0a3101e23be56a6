//! Element and Element Instance payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::nullable;

/// A connector definition on the platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Element {
    /// Element ID.
    #[serde(deserialize_with = "nullable")]
    pub id: i64,
    /// Display name.
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    /// Unique key, e.g. `sfdc`.
    #[serde(deserialize_with = "nullable")]
    pub key: String,
    /// Free-form description.
    #[serde(deserialize_with = "nullable")]
    pub description: String,
    /// Logo URL.
    #[serde(deserialize_with = "nullable")]
    pub image: String,
    /// Whether the element is active.
    #[serde(deserialize_with = "nullable")]
    pub active: bool,
    /// Whether the element is deleted.
    #[serde(deserialize_with = "nullable")]
    pub deleted: bool,
    /// Whether the element authenticates with OAuth.
    #[serde(rename = "typeOauth")]
    #[serde(deserialize_with = "nullable")]
    pub oauth: bool,
    /// Whether the element offers a trial account.
    #[serde(deserialize_with = "nullable")]
    pub trial_account: bool,
    /// Help text for the configuration screen.
    #[serde(rename = "configuration_description")]
    #[serde(deserialize_with = "nullable")]
    pub configuration_description: String,
    /// Vendor signup URL.
    #[serde(rename = "signup_url")]
    #[serde(deserialize_with = "nullable")]
    pub signup_url: String,
    /// Default transformations.
    #[serde(rename = "default_transformations")]
    #[serde(deserialize_with = "nullable")]
    pub default_transformations: Vec<DefaultTransformation>,
    /// Configuration parameters.
    #[serde(deserialize_with = "nullable")]
    pub configuration: Vec<ElementConfiguration>,
    /// Resources exposed by the element.
    #[serde(deserialize_with = "nullable")]
    pub resources: Vec<ElementResource>,
    /// Object metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objects: Option<Value>,
    /// Whether transformations are enabled.
    #[serde(deserialize_with = "nullable")]
    pub transformations_enabled: bool,
    /// Whether bulk download is enabled.
    #[serde(deserialize_with = "nullable")]
    pub bulk_download_enabled: bool,
    /// Whether the element can be cloned.
    #[serde(deserialize_with = "nullable")]
    pub cloneable: bool,
    /// Whether the element can be extended.
    #[serde(deserialize_with = "nullable")]
    pub extendable: bool,
    /// Whether the element is in beta.
    #[serde(deserialize_with = "nullable")]
    pub beta: bool,
    /// Authentication scheme.
    #[serde(deserialize_with = "nullable")]
    pub authentication: ElementAuthentication,
    /// Hooks attached to the element.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hooks: Option<Value>,
    /// Whether the element has been extended by this account.
    #[serde(deserialize_with = "nullable")]
    pub extended: bool,
    /// Hub the element belongs to, e.g. `crm`.
    #[serde(deserialize_with = "nullable")]
    pub hub: String,
    /// Protocol, e.g. `http`.
    #[serde(deserialize_with = "nullable")]
    pub protocol_type: String,
    /// Element parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
    /// Whether the element is private to this account.
    #[serde(deserialize_with = "nullable")]
    pub private: bool,
}

/// Element configuration parameter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementConfiguration {
    /// Parameter ID.
    #[serde(deserialize_with = "nullable")]
    pub id: i64,
    /// Display name.
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    /// Configuration key, e.g. `oauth.api.key`.
    #[serde(deserialize_with = "nullable")]
    pub key: String,
    /// Help text.
    #[serde(deserialize_with = "nullable")]
    pub description: String,
    /// Value used when none is supplied.
    #[serde(deserialize_with = "nullable")]
    pub default_value: String,
    /// Whether resellers supply the value.
    #[serde(deserialize_with = "nullable")]
    pub reseller_config: bool,
    /// Whether the company supplies the value.
    #[serde(deserialize_with = "nullable")]
    pub company_config: bool,
    /// Whether the parameter is active.
    #[serde(deserialize_with = "nullable")]
    pub active: bool,
    /// Whether the parameter is internal to the platform.
    #[serde(deserialize_with = "nullable")]
    pub internal: bool,
    /// Whether the parameter controls a group of others.
    #[serde(deserialize_with = "nullable")]
    pub group_control: bool,
    /// Position on the configuration screen.
    #[serde(deserialize_with = "nullable")]
    pub display_order: i64,
    /// Value type, e.g. `TEXTFIELD_32`.
    #[serde(rename = "type")]
    #[serde(deserialize_with = "nullable")]
    pub kind: String,
    /// Whether the console hides the parameter.
    #[serde(deserialize_with = "nullable")]
    pub hide_from_console: bool,
    /// Whether a value is required.
    #[serde(deserialize_with = "nullable")]
    pub required: bool,
}

/// Resource (endpoint) exposed by an element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementResource {
    /// Resource ID.
    #[serde(deserialize_with = "nullable")]
    pub id: i64,
    /// Creation timestamp.
    #[serde(deserialize_with = "nullable")]
    pub created_date: String,
    /// Last update timestamp.
    #[serde(rename = "updateDate")]
    #[serde(deserialize_with = "nullable")]
    pub updated_date: String,
    /// Free-form description.
    #[serde(deserialize_with = "nullable")]
    pub description: String,
    /// Path on the platform, e.g. `/hubs/crm/contacts`.
    #[serde(deserialize_with = "nullable")]
    pub path: String,
    /// Path on the vendor API.
    #[serde(deserialize_with = "nullable")]
    pub vendor_path: String,
    /// HTTP method on the platform.
    #[serde(deserialize_with = "nullable")]
    pub method: String,
    /// HTTP method on the vendor API.
    #[serde(deserialize_with = "nullable")]
    pub vendor_method: String,
    /// Request parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
    /// Resource type, e.g. `api`.
    #[serde(rename = "type")]
    #[serde(deserialize_with = "nullable")]
    pub kind: String,
    /// Hooks attached to the resource.
    #[serde(deserialize_with = "nullable")]
    pub hooks: Vec<String>,
    /// Response description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    /// Pagination scheme.
    #[serde(deserialize_with = "nullable")]
    pub pagination_type: String,
    /// Account that owns the resource.
    #[serde(deserialize_with = "nullable")]
    pub owner_account_id: i64,
}

/// Default transformation mapping on an element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultTransformation {
    /// Common resource name.
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    /// Vendor object name.
    #[serde(rename = "vendor_name")]
    #[serde(deserialize_with = "nullable")]
    pub vendor_name: String,
}

/// Authentication scheme of an element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementAuthentication {
    /// Scheme, e.g. `oauth2`.
    #[serde(rename = "type")]
    #[serde(deserialize_with = "nullable")]
    pub kind: String,
}

/// A configured, authenticated occurrence of an element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementInstance {
    /// Instance ID.
    #[serde(deserialize_with = "nullable")]
    pub id: i64,
    /// Instance name.
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    /// Element token used in `Element <token>` authorization.
    #[serde(deserialize_with = "nullable")]
    pub token: String,
    /// The element this instance was created from.
    #[serde(deserialize_with = "nullable")]
    pub element: Element,
    /// Instance tags.
    #[serde(deserialize_with = "nullable")]
    pub tags: Vec<String>,
    /// Whether the instance credentials are valid.
    #[serde(deserialize_with = "nullable")]
    pub valid: bool,
    /// Whether the instance is disabled.
    #[serde(deserialize_with = "nullable")]
    pub disabled: bool,
    /// Instance configuration, vendor specific.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration: Option<Value>,
    /// Whether events are enabled.
    #[serde(deserialize_with = "nullable")]
    pub events_enabled: bool,
    /// External authentication mode.
    #[serde(deserialize_with = "nullable")]
    pub external_authentication: String,
    /// Owner of the instance.
    #[serde(deserialize_with = "nullable")]
    pub user: InstanceUser,
}

/// Owner of an element instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstanceUser {
    /// User ID.
    #[serde(deserialize_with = "nullable")]
    pub id: i64,
    /// Email address.
    #[serde(deserialize_with = "nullable")]
    pub email_address: String,
    /// First name.
    #[serde(deserialize_with = "nullable")]
    pub first_name: String,
    /// Last name.
    #[serde(deserialize_with = "nullable")]
    pub last_name: String,
}
