//! Element command implementation.
//!
//! Element arguments accept either a numeric id or an element key; keys are
//! resolved against `/elements` before the request is made.

use std::collections::HashMap;
use std::io::Write;

use serde::Serialize;

use super::instances::{InstanceCommand, InstanceList};
use super::{passthrough, read_input};
use crate::cli::{ElementCommands, ElementOrder};
use crate::client::{require_int, ApiClient};
use crate::error::CliError;
use crate::model::{Element, ElementInstance, ElementMetadata, Transformations};
use crate::output::{pretty_json, write_raw, OutputFormat, Table, TableDisplay};

/// Element command executor.
pub struct ElementCommand {
    client: ApiClient,
}

impl ElementCommand {
    /// Create a new element command.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Execute an element subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if an element cannot be resolved or a request fails.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &ElementCommands,
    ) -> Result<(), CliError> {
        match command {
            ElementCommands::List { key, order, roi } => {
                if *roi {
                    return self.roi(writer).await;
                }
                self.list(writer, format, key.as_deref(), *order).await
            }
            ElementCommands::Docs { element } => {
                let id = self.client.element_id(element).await?;
                let response = self.client.get(&format!("/elements/{id}/docs")).await?;
                write_raw(writer, response.ensure_ok()?.body())
            }
            ElementCommands::Metadata { element } => {
                let id = self.client.element_id(element).await?;
                self.pretty(writer, format, &format!("/elements/{id}/metadata"))
                    .await
            }
            ElementCommands::Export { element } => {
                let id = self.client.element_id(element).await?;
                self.pretty(writer, format, &format!("/elements/{id}")).await
            }
            ElementCommands::Instances { key } => match key {
                None => {
                    InstanceCommand::new(self.client.clone())
                        .list(writer, format)
                        .await
                }
                Some(key) => self.instances(writer, format, key).await,
            },
            ElementCommands::Import { file } => {
                let body = read_input(file)?;
                let element: Element = serde_json::from_slice(&body)?;
                let response = self.client.post("/elements", body).await?;
                if passthrough(writer, format, &response)? {
                    return Ok(());
                }
                if !response.is_ok() {
                    return Err(CliError::Api {
                        status: response.status().as_u16(),
                        message: response.text(),
                    });
                }
                writeln!(writer, "Element {} imported", element.name)?;
                Ok(())
            }
            ElementCommands::Transformations { element } => {
                let id = self.client.element_id(element).await?;
                let response = self
                    .client
                    .get(&format!("/elements/{id}/transformations"))
                    .await?;
                if passthrough(writer, format, &response)? {
                    return Ok(());
                }
                let transformations: Transformations = response.ensure_ok()?.json()?;
                format.write(writer, &ElementTransformations(transformations))
            }
            ElementCommands::Validate { element } => {
                let id = self.client.element_id(element).await?;
                let response = self.client.get(&format!("/elements/{id}/validate")).await?;
                write_raw(writer, response.body())
            }
            ElementCommands::Delete { id } => {
                let id = require_int(id, "Element ID must be a number")?;
                let response = self.client.delete(&format!("/elements/{id}")).await?;
                if passthrough(writer, format, &response)? {
                    return Ok(());
                }
                if response.is_ok() {
                    writeln!(writer, "Deleted Element ID {id}")?;
                } else {
                    write_raw(writer, response.body())?;
                }
                Ok(())
            }
        }
    }

    async fn list<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        key: Option<&str>,
        order: Option<ElementOrder>,
    ) -> Result<(), CliError> {
        let response = self.client.get("/elements").await?;
        if passthrough(writer, format, &response)? {
            return Ok(());
        }
        let mut elements: Vec<Element> = response.ensure_ok()?.json()?;
        if let Some(key) = key {
            elements.retain(|e| e.key == key);
        }
        sort_elements(&mut elements, order);
        format.write(writer, &ElementList(elements))
    }

    async fn roi<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        let elements: Vec<Element> = self.client.get("/elements").await?.ensure_ok()?.json()?;
        let metadata: Vec<ElementMetadata> = self
            .client
            .get("/elements/intelligence")
            .await?
            .ensure_ok()?
            .json()?;
        let entries = roi_entries(&elements, &metadata);
        serde_json::to_writer(&mut *writer, &entries)
            .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
        writeln!(writer)?;
        Ok(())
    }

    async fn instances<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        key: &str,
    ) -> Result<(), CliError> {
        let response = self.client.get(&format!("/elements/{key}/instances")).await?;
        if passthrough(writer, format, &response)? {
            return Ok(());
        }
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            let envelope = response.error_envelope().unwrap_or_default();
            writeln!(writer, "{}", envelope.message)?;
            writeln!(writer, "Request ID: {}", envelope.request_id)?;
            return Ok(());
        }
        let instances: Vec<ElementInstance> = response.ensure_ok()?.json()?;
        format.write(writer, &InstanceList(instances))
    }

    async fn pretty<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        path: &str,
    ) -> Result<(), CliError> {
        let response = self.client.get(path).await?;
        if passthrough(writer, format, &response)? {
            return Ok(());
        }
        let response = response.ensure_ok()?;
        writeln!(writer, "{}", pretty_json(response.body(), 4)?)?;
        Ok(())
    }
}

/// Sort by id, then stably by the requested order.
pub fn sort_elements(elements: &mut [Element], order: Option<ElementOrder>) {
    elements.sort_by_key(|e| e.id);
    match order {
        Some(ElementOrder::Name) => elements.sort_by_key(|e| e.name.to_lowercase()),
        Some(ElementOrder::Hub) => elements.sort_by(|a, b| a.hub.cmp(&b.hub)),
        None => {}
    }
}

/// One element in the ROI calculator feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiEntry {
    /// Element name.
    pub name: String,
    /// Element key.
    pub key: String,
    /// Hub key.
    pub hub: String,
    /// API style from the intelligence feed.
    pub api_type: String,
    /// Whether the element is in beta.
    pub beta: bool,
    /// Whether the element is active.
    pub active: bool,
}

/// Public, active elements that have a known API style.
pub fn roi_entries(elements: &[Element], metadata: &[ElementMetadata]) -> Vec<RoiEntry> {
    let api_types: HashMap<&str, &str> = metadata
        .iter()
        .map(|m| (m.key.as_str(), m.api.kind.as_str()))
        .collect();
    let mut elements: Vec<&Element> = elements.iter().collect();
    elements.sort_by_key(|e| e.id);
    elements
        .into_iter()
        .filter(|e| e.active && !e.private)
        .filter_map(|e| {
            let api_type = api_types.get(e.key.as_str()).copied().unwrap_or_default();
            (!api_type.is_empty()).then(|| RoiEntry {
                name: e.name.clone(),
                key: e.key.clone(),
                hub: e.hub.clone(),
                api_type: api_type.to_string(),
                beta: e.beta,
                active: e.active,
            })
        })
        .collect()
}

/// Elements as a table.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct ElementList(pub Vec<Element>);

impl ElementList {
    fn table(&self) -> Table {
        let mut table = Table::new([
            "ID", "Key", "Name", "Hub", "Configs", "Private", "Active", "Extendable",
        ]);
        for element in &self.0 {
            table.push([
                element.id.to_string(),
                element.key.clone(),
                element.name.clone(),
                element.hub.clone(),
                element.configuration.len().to_string(),
                element.private.to_string(),
                element.active.to_string(),
                element.extendable.to_string(),
            ]);
        }
        table
    }
}

impl TableDisplay for ElementList {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        self.table().write(writer)
    }

    fn write_csv<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        self.table().write_csv(writer, false)
    }
}

/// Transformations defined on one element.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct ElementTransformations(pub Transformations);

impl ElementTransformations {
    fn table(&self) -> Table {
        let mut table = Table::new([
            "Resource",
            "Vendor",
            "Level",
            "# Fields",
            "# Configs",
            "Script",
            "Legacy",
            "Start Date",
        ]);
        for (resource, t) in &self.0 {
            table.push([
                resource.clone(),
                t.vendor_name.clone(),
                t.level.clone(),
                t.fields.len().to_string(),
                t.configuration.len().to_string(),
                t.has_script().to_string(),
                t.is_legacy.to_string(),
                t.start_date.clone(),
            ]);
        }
        table
    }
}

impl TableDisplay for ElementTransformations {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        self.table().write(writer)
    }

    fn write_csv<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        self.table().write_csv(writer, false)
    }
}
