//! Formula templates, formula instances and their executions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::nullable;

/// A workflow template made of a trigger and steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Formula {
    /// Formula ID.
    #[serde(deserialize_with = "nullable")]
    pub id: i64,
    /// Formula name.
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    /// Owning user.
    #[serde(deserialize_with = "nullable")]
    pub user_id: i64,
    /// Owning account.
    #[serde(deserialize_with = "nullable")]
    pub account_id: i64,
    /// Creation timestamp as sent by the platform.
    #[serde(deserialize_with = "nullable")]
    pub created_date: String,
    /// Steps run after the trigger.
    #[serde(deserialize_with = "nullable")]
    pub steps: Vec<Step>,
    /// Triggers; a well-formed formula has at least one.
    #[serde(deserialize_with = "nullable")]
    pub triggers: Vec<Trigger>,
    /// Whether the formula is active.
    #[serde(deserialize_with = "nullable")]
    pub active: bool,
    /// Whether executions are serialized.
    #[serde(deserialize_with = "nullable")]
    pub single_threaded: bool,
    /// Configuration parameters instances must supply.
    #[serde(deserialize_with = "nullable")]
    pub configuration: Vec<FormulaConfiguration>,
    /// Manual trigger API, e.g. `POST /formulas/instances/executions`.
    #[serde(deserialize_with = "nullable")]
    pub api: String,
    /// Instances embedded by some endpoints.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(deserialize_with = "nullable")]
    pub instances: Vec<FormulaInstance>,
}

impl Formula {
    /// Type of the first trigger, if any.
    pub fn trigger_type(&self) -> Option<&str> {
        self.triggers.first().map(|t| t.kind.as_str())
    }

    /// The manual trigger API, shown only for manual formulas.
    pub fn manual_api(&self) -> &str {
        match self.trigger_type() {
            Some("manual") => &self.api,
            _ => "N/A",
        }
    }
}

/// A formula step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Step {
    /// Step ID.
    #[serde(deserialize_with = "nullable")]
    pub id: i64,
    /// Step type, e.g. `script`.
    #[serde(rename = "type")]
    #[serde(deserialize_with = "nullable")]
    pub kind: String,
    /// Steps run on success.
    #[serde(deserialize_with = "nullable")]
    pub on_success: Vec<String>,
    /// Steps run on failure.
    #[serde(deserialize_with = "nullable")]
    pub on_failure: Vec<String>,
    /// Step name.
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    /// Type specific properties.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Value>,
}

/// A formula trigger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Trigger {
    /// Trigger ID.
    #[serde(deserialize_with = "nullable")]
    pub id: i64,
    /// Trigger type, e.g. `manual` or `event`.
    #[serde(rename = "type")]
    #[serde(deserialize_with = "nullable")]
    pub kind: String,
    /// Whether the trigger runs asynchronously.
    #[serde(rename = "async")]
    #[serde(deserialize_with = "nullable")]
    pub is_async: bool,
    /// Steps run on success.
    #[serde(deserialize_with = "nullable")]
    pub on_success: Vec<String>,
    /// Steps run on failure.
    #[serde(deserialize_with = "nullable")]
    pub on_failure: Vec<String>,
    /// Trigger name.
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    /// Type specific properties.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Value>,
}

/// Configuration parameter declared by a formula.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormulaConfiguration {
    /// Parameter ID.
    #[serde(deserialize_with = "nullable")]
    pub id: i64,
    /// Key instances use to supply the value.
    #[serde(deserialize_with = "nullable")]
    pub key: String,
    /// Display name.
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    /// Value type, e.g. `elementInstance`.
    #[serde(rename = "type")]
    #[serde(deserialize_with = "nullable")]
    pub kind: String,
    /// Whether a value is required.
    #[serde(deserialize_with = "nullable")]
    pub required: bool,
}

/// A formula bound to concrete configuration values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormulaInstance {
    /// Formula instance ID.
    #[serde(deserialize_with = "nullable")]
    pub id: i64,
    /// The formula this instance was created from.
    #[serde(deserialize_with = "nullable")]
    pub formula: Formula,
    /// Instance name.
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    /// Creation timestamp.
    #[serde(deserialize_with = "nullable")]
    pub created_date: String,
    /// Instance settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,
    /// Whether the instance is active.
    #[serde(deserialize_with = "nullable")]
    pub active: bool,
    /// Configuration values keyed by parameter key.
    #[serde(deserialize_with = "nullable")]
    pub configuration: BTreeMap<String, Value>,
}

impl FormulaInstance {
    /// Configuration rendered as `key:value` pairs, sorted by key.
    pub fn configuration_pairs(&self) -> String {
        self.configuration
            .iter()
            .map(|(k, v)| match v {
                Value::String(s) => format!("{k}:{s}"),
                other => format!("{k}:{other}"),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A single run of a formula instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormulaInstanceExecution {
    /// Execution ID.
    #[serde(deserialize_with = "nullable")]
    pub id: i64,
    /// Formula instance that ran.
    #[serde(deserialize_with = "nullable")]
    pub formula_instance_id: i64,
    /// Execution status, e.g. `success`.
    #[serde(deserialize_with = "nullable")]
    pub status: String,
    /// Start timestamp.
    #[serde(deserialize_with = "nullable")]
    pub created_date: String,
    /// Last update timestamp.
    #[serde(deserialize_with = "nullable")]
    pub updated_date: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_api_shown_only_for_manual_trigger() {
        let mut formula: Formula = serde_json::from_str(
            r#"{"id": 1, "api": "POST /formulas/instances/executions",
                "triggers": [{"id": 9, "type": "manual", "async": true}]}"#,
        )
        .expect("decode");
        assert_eq!(formula.manual_api(), "POST /formulas/instances/executions");
        assert!(formula.triggers[0].is_async);

        formula.triggers[0].kind = "event".into();
        assert_eq!(formula.manual_api(), "N/A");

        formula.triggers.clear();
        assert_eq!(formula.trigger_type(), None);
        assert_eq!(formula.manual_api(), "N/A");
    }

    #[test]
    fn configuration_pairs_are_sorted() {
        let instance: FormulaInstance = serde_json::from_str(
            r#"{"id": 5, "configuration": {"target": "12", "source": "11", "count": 3}}"#,
        )
        .expect("decode");
        assert_eq!(instance.configuration_pairs(), "count:3, source:11, target:12");
    }
}
