//! Formula instance command implementation.

use std::io::Write;

use serde::Serialize;
use serde_json::{Map, Value};

use super::{passthrough, write_failure};
use crate::cli::FormulaInstanceCommands;
use crate::client::ApiClient;
use crate::error::CliError;
use crate::model::{FormulaInstance, FormulaInstanceExecution};
use crate::output::{OutputFormat, Table, TableDisplay};

/// Formula instance command executor.
pub struct FormulaInstanceCommand {
    client: ApiClient,
}

#[derive(Debug, Serialize)]
struct NewInstance<'a> {
    name: &'a str,
    active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    configuration: Option<Map<String, Value>>,
}

impl FormulaInstanceCommand {
    /// Create a new formula instance command.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Execute a formula instance subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error on invalid JSON arguments or a failed request.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &FormulaInstanceCommands,
    ) -> Result<(), CliError> {
        match command {
            FormulaInstanceCommands::List => {
                let response = self.client.get("/formulas/instances").await?;
                if passthrough(writer, format, &response)? {
                    return Ok(());
                }
                let instances: Vec<FormulaInstance> = response.ensure_ok()?.json()?;
                format.write(writer, &FormulaInstanceList(instances))
            }
            FormulaInstanceCommands::Create {
                formula_id,
                name,
                configuration,
            } => {
                let name = name
                    .as_deref()
                    .filter(|n| !n.is_empty())
                    .ok_or_else(|| CliError::invalid("A name is required for the Formula Instance"))?;
                let configuration = configuration
                    .as_deref()
                    .map(parse_configuration)
                    .transpose()?;
                let body = NewInstance {
                    name,
                    active: true,
                    configuration,
                };
                let response = self
                    .client
                    .post_json(&format!("/formulas/{formula_id}/instances"), &body)
                    .await?;
                if passthrough(writer, format, &response)? {
                    return Ok(());
                }
                writeln!(writer, "{}", response.status())?;
                response.ensure_ok()?;
                Ok(())
            }
            FormulaInstanceCommands::Trigger { id, data, text } => {
                let data: Value = match data {
                    Some(data) => serde_json::from_str(data)
                        .map_err(|e| CliError::invalid(format!("trigger data is not valid JSON: {e}")))?,
                    None => Value::Object(Map::new()),
                };
                let response = self
                    .client
                    .post_json(&format!("/formulas/instances/{id}/executions"), &data)
                    .await?;
                if passthrough(writer, format, &response)? {
                    return Ok(());
                }
                if !response.is_ok() {
                    return write_failure(writer, id, &response);
                }
                let executions: Vec<FormulaInstanceExecution> = response.json()?;
                let execution = executions
                    .first()
                    .ok_or_else(|| CliError::Decode("no execution returned".into()))?;
                if *text {
                    writeln!(writer, "{}", execution.id)?;
                } else {
                    writeln!(writer, "Execution ID: {}", execution.id)?;
                }
                Ok(())
            }
            FormulaInstanceCommands::Delete { id } => {
                let response = self
                    .client
                    .delete(&format!("/formulas/instances/{id}"))
                    .await?;
                if passthrough(writer, format, &response)? {
                    return Ok(());
                }
                response.ensure_ok()?;
                writeln!(writer, "Deleted Formula Instance {id}")?;
                Ok(())
            }
        }
    }
}

fn parse_configuration(raw: &str) -> Result<Map<String, Value>, CliError> {
    match serde_json::from_str(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(CliError::invalid("configuration must be a JSON object")),
        Err(e) => Err(CliError::invalid(format!(
            "configuration must be a JSON object: {e}"
        ))),
    }
}

/// All formula instances of the account.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct FormulaInstanceList(pub Vec<FormulaInstance>);

impl FormulaInstanceList {
    fn table(&self) -> Table {
        let mut table = Table::new(["ID", "Instance", "Active", "Formula"]);
        for instance in &self.0 {
            table.push([
                instance.id.to_string(),
                instance.name.clone(),
                instance.active.to_string(),
                format!("{} {}", instance.formula.id, instance.formula.name),
            ]);
        }
        table
    }
}

impl TableDisplay for FormulaInstanceList {
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
    use crate::commands::testing::{client, table, text};
    use httpmock::MockServer;
    use test_case::test_case;

    fn command(server: &MockServer) -> FormulaInstanceCommand {
        FormulaInstanceCommand::new(client(server))
    }

    fn trigger(data: Option<&str>, text: bool) -> FormulaInstanceCommands {
        FormulaInstanceCommands::Trigger {
            id: "31".into(),
            data: data.map(String::from),
            text,
        }
    }

    #[test_case(r#"{"a": 1}"#, true ; "object")]
    #[test_case("[1]", false ; "array")]
    #[test_case("nope", false ; "garbage")]
    fn configuration_must_be_object(raw: &str, ok: bool) {
        assert_eq!(parse_configuration(raw).is_ok(), ok);
    }

    #[tokio::test]
    async fn list_table() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/formulas/instances");
            then.status(200).body(
                r#"[{"id": 31, "name": "nightly", "active": true, "formula": {"id": 7, "name": "sync"}}]"#,
            );
        });

        let mut buf = Vec::new();
        command(&server)
            .execute(&mut buf, &table(), &FormulaInstanceCommands::List)
            .await
            .expect("list");
        let output = text(buf);
        assert_eq!(output.lines().next(), Some("ID  INSTANCE  ACTIVE  FORMULA"));
        assert_eq!(output.lines().nth(2), Some("31  nightly   true    7 sync"));
    }

    #[tokio::test]
    async fn create_posts_instance() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("POST")
                .path("/formulas/7/instances")
                .json_body_includes(r#"{"name": "nightly", "active": true, "configuration": {"source": "11"}}"#);
            then.status(200).body(r#"{"id": 31}"#);
        });

        let mut buf = Vec::new();
        command(&server)
            .execute(
                &mut buf,
                &table(),
                &FormulaInstanceCommands::Create {
                    formula_id: "7".into(),
                    name: Some("nightly".into()),
                    configuration: Some(r#"{"source": "11"}"#.into()),
                },
            )
            .await
            .expect("create");
        mock.assert();
        assert_eq!(text(buf), "200 OK\n");
    }

    #[tokio::test]
    async fn create_requires_name() {
        let server = MockServer::start();
        let mut buf = Vec::new();
        let err = command(&server)
            .execute(
                &mut buf,
                &table(),
                &FormulaInstanceCommands::Create {
                    formula_id: "7".into(),
                    name: None,
                    configuration: None,
                },
            )
            .await
            .expect_err("no name");
        assert!(matches!(err, CliError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn trigger_prints_execution_id() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("POST")
                .path("/formulas/instances/31/executions")
                .json_body_includes(r#"{"contact": "x"}"#);
            then.status(200).body(r#"[{"id": 9001, "status": "pending"}]"#);
        });

        let mut buf = Vec::new();
        command(&server)
            .execute(&mut buf, &table(), &trigger(Some(r#"{"contact": "x"}"#), false))
            .await
            .expect("trigger");
        mock.assert();
        assert_eq!(text(buf), "Execution ID: 9001\n");
    }

    #[tokio::test]
    async fn trigger_text_prints_bare_id() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("POST").path("/formulas/instances/31/executions");
            then.status(200).body(r#"[{"id": 9001}]"#);
        });

        let mut buf = Vec::new();
        command(&server)
            .execute(&mut buf, &table(), &trigger(None, true))
            .await
            .expect("trigger");
        assert_eq!(text(buf), "9001\n");
    }

    #[tokio::test]
    async fn trigger_failure_reports_envelope() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("POST").path("/formulas/instances/31/executions");
            then.status(400)
                .body(r#"{"requestId": "req-9", "message": "Formula instance is inactive"}"#);
        });

        let mut buf = Vec::new();
        command(&server)
            .execute(&mut buf, &table(), &trigger(None, false))
            .await
            .expect("reported");
        assert_eq!(
            text(buf),
            "Formula instance is inactive\nID: 31 (req-9)\n400 Bad Request\n"
        );
    }

    #[tokio::test]
    async fn delete_confirms() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("DELETE").path("/formulas/instances/31");
            then.status(200);
        });

        let mut buf = Vec::new();
        command(&server)
            .execute(
                &mut buf,
                &table(),
                &FormulaInstanceCommands::Delete { id: "31".into() },
            )
            .await
            .expect("delete");
        assert_eq!(text(buf), "Deleted Formula Instance 31\n");
    }
}
