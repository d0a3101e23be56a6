//! Common resource command implementation.

use std::io::Write;

use serde::Serialize;

use super::{passthrough, read_input};
use crate::cli::ResourceCommands;
use crate::client::ApiClient;
use crate::error::CliError;
use crate::model::CommonResource;
use crate::output::{OutputFormat, Table, TableDisplay};

/// Common resource command executor.
pub struct ResourceCommand {
    client: ApiClient,
}

impl ResourceCommand {
    /// Create a new resource command.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Execute a resource subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if a request fails or the input file is not a
    /// common resource.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &ResourceCommands,
    ) -> Result<(), CliError> {
        match command {
            ResourceCommands::List => {
                let response = self.client.get("/common-resources").await?;
                if passthrough(writer, format, &response)? {
                    return Ok(());
                }
                let resources: Vec<CommonResource> = response.ensure_ok()?.json()?;
                format.write(writer, &ResourceList(resources))
            }
            ResourceCommands::Definition { name } => {
                let response = self
                    .client
                    .get(&format!("/common-resources/{name}"))
                    .await?;
                if passthrough(writer, format, &response)? {
                    return Ok(());
                }
                let resource: CommonResource = response.ensure_ok()?.json()?;
                writeln!(writer, "Common Resource Object: {name}")?;
                write_definition(writer, &resource)
            }
            ResourceCommands::Add { name, file } => {
                let body = read_input(file)?;
                let local: CommonResource = serde_json::from_slice(&body)?;
                let response = self
                    .client
                    .post(&format!("/common-resources/{name}"), body)
                    .await?;
                if passthrough(writer, format, &response)? {
                    return Ok(());
                }
                if response.status() == reqwest::StatusCode::CONFLICT {
                    let envelope = response.error_envelope().unwrap_or_default();
                    writeln!(writer, "{}", envelope.message)?;
                    writeln!(writer, "request: {}", envelope.request_id)?;
                    return Ok(());
                }
                let response = response.ensure_ok()?;
                let resource = response.json::<CommonResource>().unwrap_or(local);
                writeln!(writer, "Added common object resource: {name}")?;
                write_definition(writer, &resource)
            }
        }
    }
}

fn write_definition<W: Write>(writer: &mut W, resource: &CommonResource) -> Result<(), CliError> {
    writeln!(writer, "Field levels: {}", resource.level)?;
    let mut table = Table::new(["Path", "Type"]);
    for field in &resource.fields {
        table.push([field.path.clone(), field.kind.clone()]);
    }
    table.write(writer)
}

/// Common resources as a table.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct ResourceList(pub Vec<CommonResource>);

impl ResourceList {
    fn table(&self) -> Table {
        let mut table = Table::new(["Name", "Mapped Instances", "#", "Fields"]);
        for resource in &self.0 {
            table.push([
                resource.name.clone(),
                resource.mapped_summary(),
                resource.fields.len().to_string(),
                resource.field_paths(),
            ]);
        }
        table
    }
}

impl TableDisplay for ResourceList {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        self.table().write(writer)
    }

    fn write_csv<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        self.table().write_csv(writer, false)
    }
}
