//! Account summary command implementation.

use std::io::Write;

use serde::Serialize;

use super::elements::ElementList;
use super::formulas::{with_counts, FormulaList};
use super::instances::InstanceList;
use super::resources::ResourceList;
use super::users::{load_users, UserList};
use crate::cli::InfoScope;
use crate::client::ApiClient;
use crate::error::CliError;
use crate::model::{CommonResource, Element, ElementInstance, Formula};
use crate::output::{OutputFormat, TableDisplay};

/// Info command executor.
pub struct InfoCommand {
    client: ApiClient,
}

impl InfoCommand {
    /// Create a new info command.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Summarize formulas, custom elements, instances, resources and users.
    ///
    /// # Errors
    ///
    /// Returns an error if one of the listings fails.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        scope: Option<InfoScope>,
    ) -> Result<(), CliError> {
        let summary = self.summary(scope.is_some()).await?;
        format.write(writer, &summary)
    }

    async fn summary(&self, all: bool) -> Result<InfoSummary, CliError> {
        let formulas: Vec<Formula> = self.client.get("/formulas").await?.ensure_ok()?.json()?;
        let formulas = with_counts(&self.client, formulas).await;

        let mut elements: Vec<Element> =
            self.client.get("/elements").await?.ensure_ok()?.json()?;
        elements.retain(|e| e.private);

        let instances: Vec<ElementInstance> =
            self.client.get("/instances").await?.ensure_ok()?.json()?;
        let resources: Vec<CommonResource> = self
            .client
            .get("/common-resources")
            .await?
            .ensure_ok()?
            .json()?;
        let users = load_users(&self.client).await?;

        Ok(InfoSummary {
            formulas: FormulaList(formulas),
            custom_elements: ElementList(elements),
            instances: InstanceList(instances),
            resources: ResourceList(resources),
            users: UserList(users),
            all,
        })
    }
}

/// Everything `info` reports about an account.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoSummary {
    /// Formulas with instance counts.
    pub formulas: FormulaList,
    /// Elements private to the account.
    pub custom_elements: ElementList,
    /// Element instances.
    pub instances: InstanceList,
    /// Common resources.
    pub resources: ResourceList,
    /// Users with their roles.
    pub users: UserList,
    #[serde(skip)]
    all: bool,
}

impl TableDisplay for InfoSummary {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Formulas: {}", self.formulas.0.len())?;
        for summary in &self.formulas.0 {
            writeln!(
                writer,
                "{:>6} {:>2} {}",
                summary.formula.id, summary.instance_count, summary.formula.name
            )?;
        }
        if self.all {
            self.formulas.write_table(writer)?;
        }

        writeln!(writer)?;
        writeln!(writer, "Custom Elements: {}", self.custom_elements.0.len())?;
        if !self.custom_elements.0.is_empty() {
            self.custom_elements.write_table(writer)?;
        }

        writeln!(writer)?;
        writeln!(writer, "Element Instances: {}", self.instances.0.len())?;
        for instance in &self.instances.0 {
            writeln!(
                writer,
                "{:>7} {:>14} {}",
                instance.id, instance.element.key, instance.name
            )?;
        }

        writeln!(writer)?;
        writeln!(writer, "Common Resource Objects")?;
        self.resources.write_table(writer)?;

        writeln!(writer)?;
        writeln!(writer, "Users")?;
        self.users.write_table(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{client, json, table, text};
    use httpmock::MockServer;

    fn mock_account(server: &MockServer) {
        server.mock(|when, then| {
            when.method("GET").path("/formulas");
            then.status(200).body(
                r#"[{"id": 12, "name": "Sync Contacts", "active": true,
                     "triggers": [{"id": 1, "type": "manual"}]}]"#,
            );
        });
        server.mock(|when, then| {
            when.method("GET").path("/formulas/12/instances");
            then.status(200).body(r#"[{"id": 1}, {"id": 2}, {"id": 3}]"#);
        });
        server.mock(|when, then| {
            when.method("GET").path("/elements");
            then.status(200).body(
                r#"[{"id": 39, "key": "sfdc", "name": "Salesforce", "private": false},
                    {"id": 9001, "key": "acme", "name": "Acme", "hub": "crm", "private": true}]"#,
            );
        });
        server.mock(|when, then| {
            when.method("GET").path("/instances");
            then.status(200).body(
                r#"[{"id": 4211, "name": "SFDC prod", "element": {"key": "sfdc"}}]"#,
            );
        });
        server.mock(|when, then| {
            when.method("GET").path("/common-resources");
            then.status(200).body(r#"[{"name": "contact", "fields": []}]"#);
        });
        server.mock(|when, then| {
            when.method("GET").path("/users");
            then.status(200).body(
                r#"[{"id": 5, "firstName": "Ada", "lastName": "Lovelace", "email": "ada@example.com", "active": true}]"#,
            );
        });
        server.mock(|when, then| {
            when.method("GET").path("/users/5/roles");
            then.status(404).body("{}");
        });
    }

    #[tokio::test]
    async fn summary_sections() {
        let server = MockServer::start();
        mock_account(&server);

        let mut buf = Vec::new();
        InfoCommand::new(client(&server))
            .execute(&mut buf, &table(), None)
            .await
            .expect("info");
        let output = text(buf);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "Formulas: 1");
        assert_eq!(lines[1], "    12  3 Sync Contacts");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "Custom Elements: 1");
        assert!(lines[4].starts_with("ID"));
        assert!(lines[6].starts_with("9001"));
        assert!(output.contains("Element Instances: 1\n   4211           sfdc SFDC prod\n"));
        assert!(output.contains("\nCommon Resource Objects\n"));
        assert!(output.contains("\nUsers\n"));
        assert!(output.contains("ada@example.com"));
    }

    #[tokio::test]
    async fn all_adds_the_formula_table() {
        let server = MockServer::start();
        mock_account(&server);

        let mut buf = Vec::new();
        InfoCommand::new(client(&server))
            .execute(&mut buf, &table(), Some(InfoScope::All))
            .await
            .expect("info");
        let output = text(buf);
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[2].starts_with("ID"));
        assert!(lines[2].contains("TRIGGER ID"));
    }

    #[tokio::test]
    async fn json_summary() {
        let server = MockServer::start();
        mock_account(&server);

        let mut buf = Vec::new();
        InfoCommand::new(client(&server))
            .execute(&mut buf, &json(), None)
            .await
            .expect("info");
        let value: serde_json::Value = serde_json::from_slice(&buf).expect("json");
        assert_eq!(value["formulas"][0]["instanceCount"], "3");
        assert_eq!(value["customElements"][0]["key"], "acme");
        assert_eq!(value["instances"][0]["id"], 4211);
    }
}
