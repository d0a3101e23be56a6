//! Formula instance execution command implementation.

use std::io::Write;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use serde_json::json;

use super::{passthrough, write_failure};
use crate::cli::ExecutionCommands;
use crate::client::ApiClient;
use crate::error::CliError;
use crate::model::FormulaInstanceExecution;
use crate::output::{OutputFormat, Table, TableDisplay};

/// Execution command executor.
pub struct ExecutionCommand {
    client: ApiClient,
}

impl ExecutionCommand {
    /// Create a new execution command.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Execute an execution subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if a request fails.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &ExecutionCommands,
    ) -> Result<(), CliError> {
        match command {
            ExecutionCommands::List { instance_id, top } => {
                let response = self
                    .client
                    .get(&format!("/formulas/instances/{instance_id}/executions"))
                    .await?;
                if passthrough(writer, format, &response)? {
                    return Ok(());
                }
                let mut executions: Vec<FormulaInstanceExecution> =
                    response.ensure_ok()?.json()?;
                if let Some(top) = top {
                    executions.truncate(usize::try_from(*top).unwrap_or(usize::MAX));
                }
                format.write(writer, &ExecutionList(executions))
            }
            ExecutionCommands::Cancel { id } => {
                let response = self
                    .client
                    .patch_json(
                        &format!("/formulas/instances/executions/{id}"),
                        &json!({"status": "cancelled"}),
                    )
                    .await?;
                if passthrough(writer, format, &response)? {
                    return Ok(());
                }
                writeln!(writer, "{}", response.status())?;
                if !response.is_ok() {
                    if let Some(envelope) = response.error_envelope() {
                        writeln!(writer, "{}", envelope.message)?;
                    }
                }
                Ok(())
            }
            ExecutionCommands::Retry { id } => {
                let response = self
                    .client
                    .put(&format!("/formulas/instances/executions/{id}/retries"), None)
                    .await?;
                if passthrough(writer, format, &response)? {
                    return Ok(());
                }
                if !response.is_ok() {
                    return write_failure(writer, id, &response);
                }
                writeln!(writer, "{}", response.status())?;
                Ok(())
            }
        }
    }
}

fn parse_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .ok()
}

/// Time between creation and last update: `{seconds} s`, `pending` while the
/// update predates the creation, `N/A` when a date cannot be read.
pub fn duration(created: &str, updated: &str) -> String {
    let (Some(created), Some(updated)) = (parse_date(created), parse_date(updated)) else {
        return "N/A".to_string();
    };
    if updated < created {
        return "pending".to_string();
    }
    let elapsed = updated - created;
    #[allow(clippy::cast_precision_loss)]
    let seconds = elapsed.num_milliseconds() as f64 / 1000.0;
    format!("{seconds} s")
}

/// Executions of one formula instance.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct ExecutionList(pub Vec<FormulaInstanceExecution>);

impl ExecutionList {
    fn table(&self) -> Table {
        let mut table = Table::new(["ID", "Instance", "Status", "Created", "Updated", "Duration"]);
        for execution in &self.0 {
            table.push([
                execution.id.to_string(),
                execution.formula_instance_id.to_string(),
                execution.status.clone(),
                execution.created_date.clone(),
                execution.updated_date.clone(),
                duration(&execution.created_date, &execution.updated_date),
            ]);
        }
        table
    }
}

impl TableDisplay for ExecutionList {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        self.table().write(writer)
    }

    fn write_csv<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        self.table().write_csv(writer, false)
    }
}
