//! Element instance command implementation.
//!
//! Provides subcommands for:
//! - Listing instances and showing one in detail
//! - Reading instance docs, transformations and object definitions
//! - Deleting instances
//! - Health checking every instance at once

use std::io::Write;

use futures::StreamExt;
use serde::Serialize;

use super::passthrough;
use crate::cli::InstanceCommands;
use crate::client::{require_int, ApiClient};
use crate::error::CliError;
use crate::fanout::{ping_instances, PingCheck, Tally};
use crate::model::{ElementInstance, Transformations};
use crate::output::{bracketed, pretty_json, write_raw, OutputFormat, Table, TableDisplay};

const ID_REQUIRED: &str = "Please provide an Instance ID that is an integer";

/// Instance command executor.
pub struct InstanceCommand {
    client: ApiClient,
}

impl InstanceCommand {
    /// Create a new instance command.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Execute an instance subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if an id is not an integer or a request fails.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &InstanceCommands,
    ) -> Result<(), CliError> {
        match command {
            InstanceCommands::List => self.list(writer, format).await,
            InstanceCommands::Details { id } => {
                let id = require_int(id, ID_REQUIRED)?;
                let response = self.client.get(&format!("/instances/{id}")).await?;
                if passthrough(writer, format, &response)? {
                    return Ok(());
                }
                let instance: ElementInstance = response.ensure_ok()?.json()?;
                format.write(writer, &InstanceDetail(instance))
            }
            InstanceCommands::Docs { id } => {
                let id = require_int(id, ID_REQUIRED)?;
                let response = self.client.get(&format!("/instances/{id}/docs")).await?;
                write_raw(writer, response.ensure_ok()?.body())
            }
            InstanceCommands::Transformations { id } => {
                let id = require_int(id, ID_REQUIRED)?;
                let response = self
                    .client
                    .get(&format!("/instances/{id}/transformations"))
                    .await?;
                if passthrough(writer, format, &response)? {
                    return Ok(());
                }
                if !response.is_ok() {
                    writeln!(writer, "No Transformations for {id}")?;
                    return Ok(());
                }
                let transformations: Transformations = response.json()?;
                format.write(writer, &InstanceTransformations(transformations))
            }
            InstanceCommands::Definitions { id } => {
                let id = require_int(id, ID_REQUIRED)?;
                let response = self
                    .client
                    .get(&format!("/instances/{id}/objects/definitions"))
                    .await?;
                if passthrough(writer, format, &response)? {
                    return Ok(());
                }
                let response = response.ensure_ok()?;
                writeln!(writer, "{}", pretty_json(response.body(), 2)?)?;
                Ok(())
            }
            InstanceCommands::Operation { id, name } => {
                let id = require_int(id, ID_REQUIRED)?;
                let response = self
                    .client
                    .get(&format!("/instances/{id}/docs/{name}"))
                    .await?;
                if passthrough(writer, format, &response)? {
                    return Ok(());
                }
                let response = response.ensure_ok()?;
                writeln!(writer, "{}", pretty_json(response.body(), 4)?)?;
                Ok(())
            }
            InstanceCommands::Delete { id } => {
                let id = require_int(id, ID_REQUIRED)?;
                let response = self.client.delete(&format!("/instances/{id}")).await?;
                if passthrough(writer, format, &response)? {
                    return Ok(());
                }
                response.ensure_ok()?;
                writeln!(writer, "Deleted Element Instance {id}")?;
                Ok(())
            }
            InstanceCommands::Test { delete } => self.test(writer, *delete).await,
        }
    }

    /// List every instance in the account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list<W: Write>(&self, writer: &mut W, format: &OutputFormat) -> Result<(), CliError> {
        let response = self.client.get("/instances").await?;
        if passthrough(writer, format, &response)? {
            return Ok(());
        }
        let instances: Vec<ElementInstance> = response.ensure_ok()?.json()?;
        format.write(writer, &InstanceList(instances))
    }

    /// Ping every instance, report the failures and optionally delete them.
    async fn test<W: Write>(&self, writer: &mut W, delete: bool) -> Result<(), CliError> {
        let instances: Vec<ElementInstance> =
            self.client.get("/instances").await?.ensure_ok()?.json()?;
        writeln!(writer, "Checking {} instances", instances.len())?;

        let mut tally = Tally::default();
        let mut failed: Vec<PingCheck> = Vec::new();
        let mut checks = Box::pin(ping_instances(&self.client, &instances));
        while let Some(check) = checks.next().await {
            tally.record(check.is_ok());
            if !check.is_ok() {
                writeln!(writer, "{check}")?;
                failed.push(check);
            }
        }
        writeln!(writer, "{tally}")?;

        if delete {
            for check in &failed {
                let id = check.instance_id;
                let response = self.client.delete(&format!("/instances/{id}")).await?;
                if response.is_ok() {
                    writeln!(writer, "Deleted Element Instance {id}")?;
                } else {
                    writeln!(
                        writer,
                        "{}: unable to delete Element Instance {id}",
                        response.status().as_u16()
                    )?;
                }
            }
        }
        Ok(())
    }
}

/// Element instances as a table.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct InstanceList(pub Vec<ElementInstance>);

impl InstanceList {
    fn table(&self) -> Table {
        let mut table = Table::new([
            "ID", "Key", "Name", "Valid", "Disabled", "Events", "Tags", "Token",
        ]);
        for instance in &self.0 {
            table.push([
                instance.id.to_string(),
                instance.element.key.clone(),
                instance.name.clone(),
                instance.valid.to_string(),
                instance.disabled.to_string(),
                instance.events_enabled.to_string(),
                bracketed(&instance.tags),
                instance.token.clone(),
            ]);
        }
        table
    }
}

impl TableDisplay for InstanceList {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        self.table().write(writer)
    }

    fn write_csv<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        self.table().write_csv(writer, false)
    }
}

/// One instance as key/value lines.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct InstanceDetail(pub ElementInstance);

impl InstanceDetail {
    fn pairs(&self) -> Vec<(&'static str, String)> {
        let instance = &self.0;
        let user = &instance.user;
        vec![
            ("ID", instance.id.to_string()),
            ("Name", instance.name.clone()),
            (
                "Element",
                format!("{} ({})", instance.element.name, instance.element.key),
            ),
            ("Hub", instance.element.hub.clone()),
            ("Token", instance.token.clone()),
            ("Valid", instance.valid.to_string()),
            ("Disabled", instance.disabled.to_string()),
            ("Events", instance.events_enabled.to_string()),
            ("Tags", bracketed(&instance.tags)),
            ("Auth", instance.external_authentication.clone()),
            (
                "User",
                format!("{} {} {}", user.first_name, user.last_name, user.email_address)
                    .trim()
                    .to_string(),
            ),
        ]
    }
}

impl TableDisplay for InstanceDetail {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        for (key, value) in self.pairs() {
            writeln!(writer, "{:<10} {value}", format!("{key}:"))?;
        }
        Ok(())
    }

    fn write_csv<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        let mut table = Table::new(["Field", "Value"]);
        for (key, value) in self.pairs() {
            table.push([key.to_string(), value]);
        }
        table.write_csv(writer, false)
    }
}

/// Transformations mapped to one instance.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct InstanceTransformations(pub Transformations);

impl InstanceTransformations {
    fn table(&self) -> Table {
        let mut table = Table::new([
            "Resource", "Vendor", "# Fields", "# Configs", "Legacy", "Start Date",
        ]);
        for (resource, t) in &self.0 {
            table.push([
                resource.clone(),
                t.vendor_name.clone(),
                t.fields.len().to_string(),
                t.configuration.len().to_string(),
                t.is_legacy.to_string(),
                t.start_date.clone(),
            ]);
        }
        table
    }
}

impl TableDisplay for InstanceTransformations {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        self.table().write(writer)
    }

    fn write_csv<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        self.table().write_csv(writer, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{client, csv, json, table, text};
    use httpmock::MockServer;

    const INSTANCES: &str = r#"[
        {"id": 4, "name": "prod sfdc", "token": "tok4", "valid": true, "disabled": false,
         "eventsEnabled": true, "tags": ["crm", "prod"],
         "element": {"id": 39, "key": "sfdc", "name": "Salesforce", "hub": "crm"}},
        {"id": 5, "name": "box docs", "token": "tok5", "valid": false, "disabled": true,
         "element": {"id": 22, "key": "box", "name": "Box", "hub": "documents"}}
    ]"#;

    fn command(server: &MockServer) -> InstanceCommand {
        InstanceCommand::new(client(server))
    }

    #[tokio::test]
    async fn list_table() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/instances");
            then.status(200).body(INSTANCES);
        });

        let mut buf = Vec::new();
        command(&server)
            .execute(&mut buf, &table(), &InstanceCommands::List)
            .await
            .expect("list");
        let output = text(buf);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines[0],
            "ID  KEY   NAME       VALID  DISABLED  EVENTS  TAGS        TOKEN"
        );
        assert_eq!(
            lines[2],
            "4   sfdc  prod sfdc  true   false     true    [crm prod]  tok4"
        );
    }

    #[tokio::test]
    async fn list_csv() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/instances");
            then.status(200).body(INSTANCES);
        });

        let mut buf = Vec::new();
        command(&server)
            .execute(&mut buf, &csv(), &InstanceCommands::List)
            .await
            .expect("list");
        assert_eq!(
            text(buf),
            "4,sfdc,prod sfdc,true,false,true,[crm prod],tok4\n\
             5,box,box docs,false,true,false,[],tok5\n"
        );
    }

    #[tokio::test]
    async fn ids_must_be_integers() {
        let server = MockServer::start();
        let mut buf = Vec::new();
        let err = command(&server)
            .execute(
                &mut buf,
                &table(),
                &InstanceCommands::Details { id: "abc".into() },
            )
            .await
            .expect_err("not an integer");
        assert_eq!(err.to_string(), ID_REQUIRED);
    }

    #[tokio::test]
    async fn details_key_values() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/instances/4");
            then.status(200).body(
                r#"{"id": 4, "name": "prod sfdc", "token": "tok4", "valid": true,
                    "element": {"key": "sfdc", "name": "Salesforce", "hub": "crm"}}"#,
            );
        });

        let mut buf = Vec::new();
        command(&server)
            .execute(&mut buf, &table(), &InstanceCommands::Details { id: "4".into() })
            .await
            .expect("details");
        let output = text(buf);
        assert!(output.contains("ID:        4\n"));
        assert!(output.contains("Element:   Salesforce (sfdc)\n"));
        assert!(output.contains("Hub:       crm\n"));
    }

    #[tokio::test]
    async fn transformations_missing() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/instances/9/transformations");
            then.status(404).body(r#"{"message": "none"}"#);
        });

        let mut buf = Vec::new();
        command(&server)
            .execute(
                &mut buf,
                &table(),
                &InstanceCommands::Transformations { id: "9".into() },
            )
            .await
            .expect("handled");
        assert_eq!(text(buf), "No Transformations for 9\n");
    }

    #[tokio::test]
    async fn transformations_table() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/instances/4/transformations");
            then.status(200).body(
                r#"{"contact": {"vendorName": "Contact", "fields": [{"type": "string", "path": "a"}],
                    "isLegacy": false, "startDate": "2019-01-01"}}"#,
            );
        });

        let mut buf = Vec::new();
        command(&server)
            .execute(
                &mut buf,
                &table(),
                &InstanceCommands::Transformations { id: "4".into() },
            )
            .await
            .expect("table");
        let output = text(buf);
        assert_eq!(
            output.lines().nth(2),
            Some("contact   Contact  1         0          false   2019-01-01")
        );
    }

    #[tokio::test]
    async fn definitions_two_space_indent() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/instances/4/objects/definitions");
            then.status(200).body(r#"{"contact":{"fields":[]}}"#);
        });

        let mut buf = Vec::new();
        command(&server)
            .execute(
                &mut buf,
                &table(),
                &InstanceCommands::Definitions { id: "4".into() },
            )
            .await
            .expect("definitions");
        assert_eq!(text(buf), "{\n  \"contact\": {\n    \"fields\": []\n  }\n}\n");
    }

    #[tokio::test]
    async fn delete_prints_confirmation() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("DELETE").path("/instances/4");
            then.status(200);
        });

        let mut buf = Vec::new();
        command(&server)
            .execute(&mut buf, &table(), &InstanceCommands::Delete { id: "4".into() })
            .await
            .expect("delete");
        mock.assert();
        assert_eq!(text(buf), "Deleted Element Instance 4\n");
    }

    #[tokio::test]
    async fn delete_json_passes_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("DELETE").path("/instances/4");
            then.status(404).body(r#"{"message":"gone"}"#);
        });

        let mut buf = Vec::new();
        command(&server)
            .execute(&mut buf, &json(), &InstanceCommands::Delete { id: "4".into() })
            .await
            .expect("json");
        assert_eq!(text(buf), "{\"message\":\"gone\"}\n");
    }

    #[tokio::test]
    async fn test_reports_failures_and_deletes() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/instances");
            then.status(200).body(INSTANCES);
        });
        server.mock(|when, then| {
            when.method("GET")
                .path("/hubs/crm/ping")
                .header("authorization", "User u, Organization o, Element tok4");
            then.status(200).body("{}");
        });
        server.mock(|when, then| {
            when.method("GET").path("/hubs/documents/ping");
            then.status(401).body("{}");
        });
        let delete = server.mock(|when, then| {
            when.method("DELETE").path("/instances/5");
            then.status(200);
        });

        let mut buf = Vec::new();
        command(&server)
            .execute(&mut buf, &table(), &InstanceCommands::Test { delete: true })
            .await
            .expect("test");
        delete.assert();
        assert_eq!(
            text(buf),
            "Checking 2 instances\n\
             \x20   5 Box (box docs) 401 Unauthorized\n\
             1/2 200\n\
             Deleted Element Instance 5\n"
        );
    }
}
