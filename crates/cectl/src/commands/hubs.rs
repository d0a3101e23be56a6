//! Hub listing.

use std::io::Write;

use serde::Serialize;

use super::passthrough;
use crate::cli::HubCommands;
use crate::client::ApiClient;
use crate::error::CliError;
use crate::model::Hub;
use crate::output::{OutputFormat, Table, TableDisplay};

/// Hub command executor.
pub struct HubCommand {
    client: ApiClient,
}

impl HubCommand {
    /// Create a new hub command.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Execute a hub subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &HubCommands,
    ) -> Result<(), CliError> {
        match command {
            HubCommands::List => {
                let response = self.client.get("/hubs").await?;
                if passthrough(writer, format, &response)? {
                    return Ok(());
                }
                let hubs: Vec<Hub> = response.ensure_ok()?.json()?;
                format.write(writer, &HubList(hubs))?;
            }
        }
        Ok(())
    }
}

/// Hubs as a table.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct HubList(pub Vec<Hub>);

impl HubList {
    fn table(&self) -> Table {
        let mut table = Table::new(["ID", "Name", "Key", "Active", "Description"]);
        for hub in &self.0 {
            table.push([
                hub.id.to_string(),
                hub.name.clone(),
                hub.key.clone(),
                hub.active.to_string(),
                hub.description.clone(),
            ]);
        }
        table
    }
}

impl TableDisplay for HubList {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        self.table().write(writer)
    }

    fn write_csv<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        self.table().write_csv(writer, false)
    }
}
