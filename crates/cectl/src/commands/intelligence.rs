//! Element intelligence command implementation.

use std::cmp::Reverse;
use std::io::Write;

use serde::Serialize;

use super::passthrough;
use crate::cli::IntelligenceOrder;
use crate::client::ApiClient;
use crate::error::CliError;
use crate::model::ElementMetadata;
use crate::output::{OutputFormat, Table, TableDisplay};

/// Intelligence command executor.
pub struct IntelligenceCommand {
    client: ApiClient,
}

impl IntelligenceCommand {
    /// Create a new intelligence command.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// List element capabilities and usage.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        key: Option<&str>,
        order: Option<IntelligenceOrder>,
    ) -> Result<(), CliError> {
        let response = self.client.get("/elements/intelligence").await?;
        if passthrough(writer, format, &response)? {
            return Ok(());
        }
        let mut metadata: Vec<ElementMetadata> = response.ensure_ok()?.json()?;
        if let Some(key) = key {
            metadata.retain(|m| m.key.eq_ignore_ascii_case(key));
        }
        sort_metadata(&mut metadata, order);
        format.write(writer, &IntelligenceList(metadata))
    }
}

/// Sort by id, then stably by the requested order. Counts sort highest
/// first, text sorts ascending.
pub fn sort_metadata(metadata: &mut [ElementMetadata], order: Option<IntelligenceOrder>) {
    metadata.sort_by_key(|m| m.id);
    match order {
        Some(IntelligenceOrder::Customers) => {
            metadata.sort_by_key(|m| Reverse(m.usage.customer_count));
        }
        Some(IntelligenceOrder::Instances) => {
            metadata.sort_by_key(|m| Reverse(m.usage.instance_count));
        }
        Some(IntelligenceOrder::Traffic) => metadata.sort_by_key(|m| Reverse(m.usage.traffic)),
        Some(IntelligenceOrder::Hub) => metadata.sort_by(|a, b| a.hub.cmp(&b.hub)),
        Some(IntelligenceOrder::Name) => metadata.sort_by_key(|m| m.name.to_lowercase()),
        Some(IntelligenceOrder::Api) => metadata.sort_by(|a, b| a.api.kind.cmp(&b.api.kind)),
        Some(IntelligenceOrder::Authn) => metadata.sort_by_key(ElementMetadata::authn),
        None => {}
    }
}

/// Element metadata as a table; CSV output carries the header row.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct IntelligenceList(pub Vec<ElementMetadata>);

impl IntelligenceList {
    fn table(&self) -> Table {
        let mut table = Table::new([
            "ID",
            "Key",
            "Name",
            "Hub",
            "API",
            "Authn",
            "Transforms",
            "Active",
            "Beta",
            "Disc Metadata (N)",
            "Disc Objects (N)",
            "Traffic",
            "Customers",
            "Instances",
        ]);
        for m in &self.0 {
            table.push([
                m.id.to_string(),
                m.key.clone(),
                m.name.clone(),
                m.hub.clone(),
                m.api.kind.clone(),
                m.authn(),
                m.transformations.to_string(),
                m.active.to_string(),
                m.beta.to_string(),
                m.discovery.native_object_metadata_discovery.to_string(),
                m.discovery.native_object_discovery.to_string(),
                m.usage.traffic.to_string(),
                m.usage.customer_count.to_string(),
                m.usage.instance_count.to_string(),
            ]);
        }
        table
    }
}

impl TableDisplay for IntelligenceList {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        self.table().write(writer)
    }

    fn write_csv<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        self.table().write_csv(writer, true)
    }
}
