//! Concurrent request fan-out.
//!
//! Two shapes are supported: an unbounded sweep that pings every element
//! instance at once, and a bounded pool that deletes jobs with at most
//! `workers` requests in flight. Both yield results in completion order and
//! never stop early on a failed request.

use std::fmt;

use futures::stream::{self, FuturesUnordered, Stream, StreamExt};
use reqwest::{Method, StatusCode};
use tracing::debug;

use crate::client::ApiClient;
use crate::model::ElementInstance;

/// Default number of concurrent deletes.
pub const DEFAULT_WORKERS: usize = 8;

/// Result of pinging one element instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingCheck {
    /// Instance ID.
    pub instance_id: i64,
    /// Element display name.
    pub element_name: String,
    /// Instance name.
    pub instance_name: String,
    /// Status, or `None` when the request never completed.
    pub status: Option<StatusCode>,
}

impl PingCheck {
    /// Whether the ping answered 200.
    pub fn is_ok(&self) -> bool {
        self.status == Some(StatusCode::OK)
    }

    /// Status text such as `404 Not Found`, or `unreachable`.
    pub fn status_text(&self) -> String {
        status_text(self.status)
    }
}

impl fmt::Display for PingCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>5} {} ({}) {}",
            self.instance_id,
            self.element_name,
            self.instance_name,
            self.status_text()
        )
    }
}

/// Result of deleting one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// Job ID.
    pub id: String,
    /// Status, or `None` when the request never completed.
    pub status: Option<StatusCode>,
}

impl DeleteOutcome {
    /// Whether the delete answered 200.
    pub fn is_ok(&self) -> bool {
        self.status == Some(StatusCode::OK)
    }
}

impl fmt::Display for DeleteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{}: unable to delete {}", status.as_u16(), self.id),
            None => write!(f, "unreachable: unable to delete {}", self.id),
        }
    }
}

/// Success count over a batch, displayed as `{ok}/{total} 200`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    /// Requests that answered 200.
    pub ok: usize,
    /// Requests issued.
    pub total: usize,
}

impl Tally {
    /// Record one result.
    pub fn record(&mut self, ok: bool) {
        self.total += 1;
        if ok {
            self.ok += 1;
        }
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} 200", self.ok, self.total)
    }
}

fn status_text(status: Option<StatusCode>) -> String {
    status.map_or_else(|| "unreachable".to_string(), |s| s.to_string())
}

/// Ping every instance at `{base}/hubs/{hub}/ping`, all at once.
///
/// Each request authenticates as `{auth}, Element {token}`. Results arrive
/// in completion order, one per instance.
pub fn ping_instances<'a>(
    client: &'a ApiClient,
    instances: &'a [ElementInstance],
) -> impl Stream<Item = PingCheck> + 'a {
    instances
        .iter()
        .map(move |instance| async move {
            let url = client.url(&format!("/hubs/{}/ping", instance.element.hub));
            let auth = format!("{}, Element {}", client.auth(), instance.token);
            let status = match client.send(Method::GET, &url, &auth, None).await {
                Ok(response) => Some(response.status()),
                Err(e) => {
                    debug!(instance_id = instance.id, error = %e, "ping failed");
                    None
                }
            };
            debug!(instance_id = instance.id, ?status, "ping complete");
            PingCheck {
                instance_id: instance.id,
                element_name: instance.element.name.clone(),
                instance_name: instance.name.clone(),
                status,
            }
        })
        .collect::<FuturesUnordered<_>>()
}

/// Delete jobs with at most `workers` requests in flight.
///
/// Yields exactly one outcome per id, in completion order.
pub fn delete_jobs(
    client: &ApiClient,
    ids: Vec<String>,
    workers: usize,
) -> impl Stream<Item = DeleteOutcome> + '_ {
    stream::iter(ids)
        .map(move |id| async move {
            let status = match client.delete(&format!("/jobs/{id}")).await {
                Ok(response) => Some(response.status()),
                Err(e) => {
                    debug!(job_id = %id, error = %e, "delete failed");
                    None
                }
            };
            debug!(job_id = %id, ?status, "delete complete");
            DeleteOutcome { id, status }
        })
        .buffer_unordered(workers.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::MockServer;

    const AUTH: &str = "User u, Organization o";

    fn instance(id: i64, hub: &str, token: &str) -> ElementInstance {
        let mut instance = ElementInstance {
            id,
            name: format!("inst-{id}"),
            token: token.to_string(),
            ..Default::default()
        };
        instance.element.hub = hub.to_string();
        instance.element.name = hub.to_uppercase();
        instance
    }

    #[test]
    fn ping_check_line() {
        let check = PingCheck {
            instance_id: 42,
            element_name: "Salesforce".into(),
            instance_name: "prod sfdc".into(),
            status: Some(StatusCode::UNAUTHORIZED),
        };
        assert_eq!(check.to_string(), "   42 Salesforce (prod sfdc) 401 Unauthorized");
        let unreachable = PingCheck { status: None, ..check };
        assert!(unreachable.to_string().ends_with(" unreachable"));
    }

    #[test]
    fn delete_outcome_line() {
        let outcome = DeleteOutcome {
            id: "abc".into(),
            status: Some(StatusCode::NOT_FOUND),
        };
        assert_eq!(outcome.to_string(), "404: unable to delete abc");
    }

    #[test]
    fn tally_counts() {
        let mut tally = Tally::default();
        tally.record(true);
        tally.record(false);
        tally.record(true);
        assert_eq!(tally.to_string(), "2/3 200");
    }

    #[tokio::test]
    async fn ping_reports_every_instance() {
        let server = MockServer::start();
        let crm = server.mock(|when, then| {
            when.method("GET")
                .path("/hubs/crm/ping")
                .header("authorization", "User u, Organization o, Element good");
            then.status(200).body("{}");
        });
        let docs = server.mock(|when, then| {
            when.method("GET")
                .path("/hubs/documents/ping")
                .header("authorization", "User u, Organization o, Element bad");
            then.status(401).body("{}");
        });

        let client = ApiClient::new(server.base_url(), AUTH).expect("client");
        let instances = vec![instance(1, "crm", "good"), instance(2, "documents", "bad")];
        let mut checks: Vec<PingCheck> = ping_instances(&client, &instances).collect().await;
        checks.sort_by_key(|c| c.instance_id);

        crm.assert();
        docs.assert();
        assert_eq!(checks.len(), 2);
        assert!(checks[0].is_ok());
        assert_eq!(checks[1].status, Some(StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn ping_unreachable_instances_are_counted() {
        let client = ApiClient::new("http://127.0.0.1:1", AUTH).expect("client");
        let instances = vec![instance(7, "crm", "t")];
        let checks: Vec<PingCheck> = ping_instances(&client, &instances).collect().await;
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].status, None);
    }

    #[tokio::test]
    async fn delete_jobs_counts_exact_successes() {
        let server = MockServer::start();
        for id in ["a", "b", "c", "d"] {
            server.mock(|when, then| {
                when.method("DELETE").path(format!("/jobs/{id}"));
                then.status(200);
            });
        }
        server.mock(|when, then| {
            when.method("DELETE").path("/jobs/e");
            then.status(404).body(r#"{"message":"no job"}"#);
        });

        let client = ApiClient::new(server.base_url(), AUTH).expect("client");
        let ids = ["a", "b", "c", "d", "e"].map(String::from).to_vec();
        let outcomes: Vec<DeleteOutcome> = delete_jobs(&client, ids, 2).collect().await;

        let mut tally = Tally::default();
        for outcome in &outcomes {
            tally.record(outcome.is_ok());
        }
        assert_eq!(tally, Tally { ok: 4, total: 5 });
        let failed: Vec<_> = outcomes.iter().filter(|o| !o.is_ok()).collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].id, "e");
    }

    #[tokio::test]
    async fn zero_workers_still_makes_progress() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("DELETE").path("/jobs/only");
            then.status(200);
        });

        let client = ApiClient::new(server.base_url(), AUTH).expect("client");
        let outcomes: Vec<DeleteOutcome> =
            delete_jobs(&client, vec!["only".into()], 0).collect().await;
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].is_ok());
    }
}
