//! Scheduled job payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::nullable;

/// A scheduled job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Job {
    /// Job ID; the platform uses opaque strings.
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    /// Whether overlapping runs are prevented.
    #[serde(deserialize_with = "nullable")]
    pub disallow_concurrent: bool,
    /// Job data.
    #[serde(deserialize_with = "nullable")]
    pub data: JobData,
    /// Job name.
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    /// Job description.
    #[serde(deserialize_with = "nullable")]
    pub description: String,
    /// Trigger definition, passed through untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<Value>,
}

/// Data carried by a job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobData {
    /// Element instance ID.
    #[serde(deserialize_with = "nullable")]
    pub id: i64,
    /// Element key.
    #[serde(deserialize_with = "nullable")]
    pub element_key: String,
    /// Job topic, e.g. `poll`.
    #[serde(deserialize_with = "nullable")]
    pub topic: String,
    /// Notification settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_decodes_nested_data() {
        let job: Job = serde_json::from_str(
            r#"{"id": "a1b2", "name": "poller", "data": {"elementKey": "sfdc", "topic": "poll"},
                "trigger": {"cron": "0 * * * * ?"}}"#,
        )
        .expect("decode");
        assert_eq!(job.id, "a1b2");
        assert_eq!(job.data.element_key, "sfdc");
        assert!(job.trigger.is_some());
    }
}
